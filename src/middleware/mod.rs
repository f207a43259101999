//! Request middleware: request IDs and session cookies

pub mod request_id;
pub mod session;

pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
pub use session::{SESSION_COOKIE, session_middleware};

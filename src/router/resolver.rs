//! Category resolution with deterministic tie-breaking

use super::{CategoryScores, IntentCategory, Resolution};

/// Tie-break order, highest priority first
///
/// When several categories share the maximum score, the one appearing first
/// here wins. Specific domains outrank General so that filler words never
/// beat an equally strong domain keyword.
pub const TIE_BREAK_PRIORITY: [IntentCategory; 6] = [
    IntentCategory::Programming,
    IntentCategory::SourcesAndLinks,
    IntentCategory::MathLogic,
    IntentCategory::Factual,
    IntentCategory::LongForm,
    IntentCategory::General,
];

/// Pick the winning category
///
/// Returns General with score 0 when nothing matched.
pub fn resolve(scores: &CategoryScores) -> Resolution {
    let max = scores.max();
    if max == 0 {
        return Resolution::new(IntentCategory::General, 0);
    }

    // TIE_BREAK_PRIORITY lists every category, so a max-scoring one is always found
    let category = TIE_BREAK_PRIORITY
        .into_iter()
        .find(|c| scores.get(*c) == max)
        .unwrap_or(IntentCategory::General);

    Resolution::new(category, max)
}

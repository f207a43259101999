//! Per-session provider subscription toggles

use crate::providers::ProviderId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which providers are active ("subscribed") for a session
///
/// Every provider always has an entry. Serializes as a JSON/TOML map keyed
/// by provider id; providers missing from a deserialized map default to
/// active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionState([bool; 6]);

impl SubscriptionState {
    /// Every provider active (the default)
    pub fn all_active() -> Self {
        Self([true; 6])
    }

    /// Every provider inactive
    pub fn all_inactive() -> Self {
        Self([false; 6])
    }

    fn index(provider: ProviderId) -> usize {
        provider as usize
    }

    /// Whether a provider is active
    pub fn is_active(&self, provider: ProviderId) -> bool {
        self.0[Self::index(provider)]
    }

    /// Set a provider's toggle, returning the previous value
    pub fn set(&mut self, provider: ProviderId, active: bool) -> bool {
        std::mem::replace(&mut self.0[Self::index(provider)], active)
    }

    /// Number of active providers
    pub fn active_count(&self) -> usize {
        self.0.iter().filter(|active| **active).count()
    }

    /// Iterate `(provider, active)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (ProviderId, bool)> + '_ {
        ProviderId::ALL.into_iter().map(|p| (p, self.is_active(p)))
    }
}

impl Default for SubscriptionState {
    fn default() -> Self {
        Self::all_active()
    }
}

impl Serialize for SubscriptionState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(ProviderId::ALL.len()))?;
        for (provider, active) in self.iter() {
            map.serialize_entry(provider.as_str(), &active)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SubscriptionState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = BTreeMap::<String, bool>::deserialize(deserializer)?;

        let mut state = Self::all_active();
        for (key, active) in raw {
            let provider = key
                .parse::<ProviderId>()
                .map_err(serde::de::Error::custom)?;
            state.set(provider, active);
        }
        Ok(state)
    }
}

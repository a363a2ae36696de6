use crate::{model::Units, storage::{KeyValueStore, UNITS_KEY}};

/// Persisted display-unit preference.
pub struct UnitPreference;

impl UnitPreference {
    /// Falls back to metric when nothing (or nothing readable) is stored.
    pub async fn load(store: &dyn KeyValueStore) -> Units {
        match store.get(UNITS_KEY).await {
            Ok(Some(raw)) => Units::try_from(raw.as_str()).unwrap_or_else(|e| {
                tracing::warn!("Ignoring stored unit preference: {e}");
                Units::default()
            }),
            Ok(None) => Units::default(),
            Err(e) => {
                tracing::warn!("Failed to read unit preference: {e:#}");
                Units::default()
            }
        }
    }

    pub async fn save(store: &dyn KeyValueStore, units: Units) {
        if let Err(e) = store.set(UNITS_KEY, units.as_str()).await {
            tracing::warn!("Failed to save unit preference: {e:#}");
        }
    }
}

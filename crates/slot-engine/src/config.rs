//! Engine settings shared by every front end.

use serde::{Deserialize, Serialize};

use crate::interval::SlotDuration;

/// Tunables for slot generation.
///
/// Deserializes from `{ "slot_minutes": 30 }` (or TOML `slot_minutes = 30`);
/// a missing key falls back to the 30-minute platform default and a zero is
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default)]
    pub slot_minutes: SlotDuration,
}

impl SchedulerConfig {
    pub fn slot_duration(&self) -> SlotDuration {
        self.slot_minutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_slot_minutes_defaults_to_thirty() {
        let cfg: SchedulerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.slot_duration().as_minutes(), 30);
    }

    #[test]
    fn zero_slot_minutes_is_rejected() {
        assert!(serde_json::from_str::<SchedulerConfig>(r#"{"slot_minutes":0}"#).is_err());
    }
}

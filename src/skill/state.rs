//! Dialog state machine — which stage a user's conversation is in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stages of the conversation.
///
/// Only `AwaitingConfirmation` and `Ended` are reachable: the skill has no
/// data-collection turns, so `CollectingData` and `Predicted` exist for the
/// transition table but nothing enters them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogStage {
    AwaitingConfirmation,
    CollectingData,
    Predicted,
    Ended,
}

impl DialogStage {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: DialogStage) -> bool {
        use DialogStage::*;
        matches!(
            (self, target),
            (AwaitingConfirmation, CollectingData)
                | (AwaitingConfirmation, Predicted)
                | (AwaitingConfirmation, Ended)
                | (CollectingData, Predicted)
                | (Predicted, Ended)
        )
    }

    /// Whether this stage is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ended)
    }
}

impl Default for DialogStage {
    fn default() -> Self {
        Self::AwaitingConfirmation
    }
}

impl std::fmt::Display for DialogStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AwaitingConfirmation => "awaiting_confirmation",
            Self::CollectingData => "collecting_data",
            Self::Predicted => "predicted",
            Self::Ended => "ended",
        };
        write!(f, "{s}")
    }
}

/// Per-user session record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user_id: String,
    /// Gates the confirmation phase. False after the greeting and never
    /// flipped by any turn.
    pub session_started: bool,
    pub stage: DialogStage,
    /// Years.
    pub age: Option<f64>,
    /// Plasma glucose.
    pub glucose: Option<f64>,
    /// Metres.
    pub height: Option<f64>,
    /// Kilograms.
    pub weight: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Fresh record for a new session: not started, nothing collected.
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            session_started: false,
            stage: DialogStage::default(),
            age: None,
            glucose: None,
            height: None,
            weight: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Body-mass index `weight / height²` rounded to two decimals, if both
    /// measurements are known.
    pub fn bmi(&self) -> Option<f64> {
        let (weight, height) = (self.weight?, self.height?);
        Some((weight / (height * height) * 100.0).round() / 100.0)
    }

    /// Move to `target`. Returns an error string if the transition is not in
    /// the table; re-entering the current stage is a no-op.
    pub fn transition(&mut self, target: DialogStage) -> Result<(), String> {
        if self.stage == target {
            return Ok(());
        }
        if !self.stage.can_transition_to(target) {
            return Err(format!("Cannot transition from {} to {}", self.stage, target));
        }
        self.stage = target;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transitions() {
        use DialogStage::*;
        let transitions = [
            (AwaitingConfirmation, CollectingData),
            (AwaitingConfirmation, Predicted),
            (AwaitingConfirmation, Ended),
            (CollectingData, Predicted),
            (Predicted, Ended),
        ];
        for (from, to) in transitions {
            assert!(from.can_transition_to(to), "{from} should transition to {to}");
        }
    }

    #[test]
    fn invalid_transitions() {
        use DialogStage::*;
        assert!(!Ended.can_transition_to(AwaitingConfirmation));
        assert!(!Predicted.can_transition_to(CollectingData));
        assert!(!CollectingData.can_transition_to(Ended));
        assert!(!AwaitingConfirmation.can_transition_to(AwaitingConfirmation));
    }

    #[test]
    fn only_ended_is_terminal() {
        use DialogStage::*;
        assert!(Ended.is_terminal());
        assert!(!AwaitingConfirmation.is_terminal());
        assert!(!CollectingData.is_terminal());
        assert!(!Predicted.is_terminal());
    }

    #[test]
    fn display_matches_serde() {
        use DialogStage::*;
        for stage in [AwaitingConfirmation, CollectingData, Predicted, Ended] {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(format!("\"{stage}\""), json, "mismatch for {stage:?}");
        }
    }

    #[test]
    fn new_record_is_unstarted_and_empty() {
        let record = SessionRecord::new("u1");
        assert_eq!(record.user_id, "u1");
        assert!(!record.session_started);
        assert_eq!(record.stage, DialogStage::AwaitingConfirmation);
        assert!(record.age.is_none());
        assert!(record.glucose.is_none());
        assert!(record.height.is_none());
        assert!(record.weight.is_none());
    }

    #[test]
    fn bmi_rounds_to_two_decimals() {
        let mut record = SessionRecord::new("u1");
        record.weight = Some(70.0);
        record.height = Some(1.75);
        // 70 / 3.0625 = 22.857...
        assert_eq!(record.bmi(), Some(22.86));
    }

    #[test]
    fn bmi_unset_without_both_measurements() {
        let mut record = SessionRecord::new("u1");
        assert_eq!(record.bmi(), None);
        record.weight = Some(80.0);
        assert_eq!(record.bmi(), None);
        record.weight = None;
        record.height = Some(1.8);
        assert_eq!(record.bmi(), None);
    }

    #[test]
    fn transition_to_ended_then_stuck() {
        let mut record = SessionRecord::new("u1");
        record.transition(DialogStage::Ended).unwrap();
        assert_eq!(record.stage, DialogStage::Ended);
        // Re-entering is fine, leaving is not
        assert!(record.transition(DialogStage::Ended).is_ok());
        assert!(record.transition(DialogStage::CollectingData).is_err());
    }
}

/// Phase definitions for a single analysis run
///
/// A run moves strictly forward: `Idle -> Fetching -> Analyzing -> Aggregating
/// -> Done`, or from `Fetching`/`Analyzing` to `Failed`.
use crate::SitelensError;
use serde::Serialize;
use std::fmt;

/// The current phase of an analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisPhase {
    // ===== Active Phases =====
    /// Request accepted, nothing started
    Idle,

    /// Target page is being fetched
    Fetching,

    /// Analyzers are running
    Analyzing,

    /// Sub-results are being folded into one report
    Aggregating,

    // ===== Terminal Phases =====
    Done,

    /// The run was aborted (global fetch-failure policy)
    Failed,
}

impl AnalysisPhase {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if `next` is a legal successor of this phase
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Fetching)
                | (Self::Fetching, Self::Analyzing)
                | (Self::Fetching, Self::Failed)
                | (Self::Analyzing, Self::Aggregating)
                | (Self::Analyzing, Self::Failed)
                | (Self::Aggregating, Self::Done)
        )
    }

    /// Moves to `next`, rejecting illegal transitions
    pub fn transition(self, next: Self) -> Result<Self, SitelensError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(SitelensError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Analyzing => "analyzing",
            Self::Aggregating => "aggregating",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Returns all phases
    pub fn all_phases() -> Vec<Self> {
        vec![
            Self::Idle,
            Self::Fetching,
            Self::Analyzing,
            Self::Aggregating,
            Self::Done,
            Self::Failed,
        ]
    }
}

impl fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(!AnalysisPhase::Idle.is_terminal());
        assert!(!AnalysisPhase::Fetching.is_terminal());
        assert!(!AnalysisPhase::Analyzing.is_terminal());
        assert!(!AnalysisPhase::Aggregating.is_terminal());

        assert!(AnalysisPhase::Done.is_terminal());
        assert!(AnalysisPhase::Failed.is_terminal());
    }

    #[test]
    fn test_happy_path() {
        let phase = AnalysisPhase::Idle
            .transition(AnalysisPhase::Fetching)
            .and_then(|p| p.transition(AnalysisPhase::Analyzing))
            .and_then(|p| p.transition(AnalysisPhase::Aggregating))
            .and_then(|p| p.transition(AnalysisPhase::Done))
            .unwrap();
        assert_eq!(phase, AnalysisPhase::Done);
    }

    #[test]
    fn test_illegal_transitions() {
        let err = AnalysisPhase::Idle
            .transition(AnalysisPhase::Done)
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid phase transition: idle -> done");

        assert!(AnalysisPhase::Aggregating
            .transition(AnalysisPhase::Failed)
            .is_err());
        assert!(AnalysisPhase::Analyzing
            .transition(AnalysisPhase::Fetching)
            .is_err());
    }

    #[test]
    fn test_terminal_phases_have_no_successor() {
        for from in [AnalysisPhase::Done, AnalysisPhase::Failed] {
            for to in AnalysisPhase::all_phases() {
                assert!(!from.can_transition_to(to), "{} -> {} allowed", from, to);
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", AnalysisPhase::Aggregating), "aggregating");
        assert_eq!(
            serde_json::to_string(&AnalysisPhase::Failed).unwrap(),
            "\"failed\""
        );
    }
}

//! Exercise stages in their fixed order

use serde::Serialize;

use crate::skeleton::Side;

/// Phase of the guided exercise
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// No session running
    Idle,
    Rest,
    ArmsRaised,
    LeftLegCycle,
    RightLegCycle,
    ReturnToRest,
    Complete,
}

impl Stage {
    /// The exercise order, excluding `Idle`
    pub const SEQUENCE: [Stage; 6] = [
        Stage::Rest,
        Stage::ArmsRaised,
        Stage::LeftLegCycle,
        Stage::RightLegCycle,
        Stage::ReturnToRest,
        Stage::Complete,
    ];

    /// Position in the exercise (Rest = 0 .. ReturnToRest = 4)
    pub fn index(self) -> Option<u8> {
        match self {
            Stage::Rest => Some(0),
            Stage::ArmsRaised => Some(1),
            Stage::LeftLegCycle => Some(2),
            Stage::RightLegCycle => Some(3),
            Stage::ReturnToRest => Some(4),
            Stage::Idle | Stage::Complete => None,
        }
    }

    /// Forward successor; `Complete` and `Idle` have none
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Rest => Some(Stage::ArmsRaised),
            Stage::ArmsRaised => Some(Stage::LeftLegCycle),
            Stage::LeftLegCycle => Some(Stage::RightLegCycle),
            Stage::RightLegCycle => Some(Stage::ReturnToRest),
            Stage::ReturnToRest => Some(Stage::Complete),
            Stage::Complete | Stage::Idle => None,
        }
    }

    /// Leg exercised by a leg-cycle stage
    pub fn leg_side(self) -> Option<Side> {
        match self {
            Stage::LeftLegCycle => Some(Side::Left),
            Stage::RightLegCycle => Some(Side::Right),
            _ => None,
        }
    }

    pub fn instruction(self) -> &'static str {
        match self {
            Stage::Idle => "Press start when you are ready",
            Stage::Rest => "Starting position: arms relaxed, feet together",
            Stage::ArmsRaised => "Raise both arms above your shoulders",
            Stage::LeftLegCycle => {
                "Keep your arms up, raise your left leg sideways and bring it back"
            }
            Stage::RightLegCycle => {
                "Keep your arms up, raise your right leg sideways and bring it back"
            }
            Stage::ReturnToRest => "Back to the starting position: arms relaxed, feet together",
            Stage::Complete => "Exercise complete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_follows_next() {
        for pair in Stage::SEQUENCE.windows(2) {
            assert_eq!(pair[0].next(), Some(pair[1]));
        }
        assert_eq!(Stage::Complete.next(), None);
        assert_eq!(Stage::Idle.next(), None);
    }

    #[test]
    fn test_indices() {
        assert_eq!(Stage::Rest.index(), Some(0));
        assert_eq!(Stage::ReturnToRest.index(), Some(4));
        assert_eq!(Stage::Idle.index(), None);
    }

    #[test]
    fn test_leg_sides() {
        assert_eq!(Stage::LeftLegCycle.leg_side(), Some(Side::Left));
        assert_eq!(Stage::RightLegCycle.leg_side(), Some(Side::Right));
        assert_eq!(Stage::ArmsRaised.leg_side(), None);
    }
}

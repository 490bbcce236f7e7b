use serde::{Deserialize, Serialize};
use terrace_core::{Decimal256, PolicyConstraints};

/// Which branch of a feedback law produced the candidate value.
///
/// A window with no revenue signal is not a numerical accident: the policy
/// is to hike to the ceiling, so it is a variant of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackBranch {
    /// The closed-form law produced this candidate.
    Formula(Decimal256),
    /// No revenue in the window: go to the policy's `rate_max`.
    MaxOnDormant,
}

impl FeedbackBranch {
    /// Candidate before clamping.
    pub fn candidate(self, policy: &PolicyConstraints) -> Decimal256 {
        match self {
            FeedbackBranch::Formula(value) => value,
            FeedbackBranch::MaxOnDormant => policy.rate_max,
        }
    }

    /// Final value: every branch goes through the policy clamp.
    pub fn resolve(self, old: Decimal256, policy: &PolicyConstraints) -> Decimal256 {
        policy.clamp(old, self.candidate(policy))
    }

    pub fn is_dormant(self) -> bool {
        matches!(self, FeedbackBranch::MaxOnDormant)
    }
}

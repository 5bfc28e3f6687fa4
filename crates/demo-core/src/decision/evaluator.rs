//! Decision table evaluation

use super::{Answer, Outcome, Stakeholder};
use serde::{Deserialize, Serialize};

/// Context gathered by non-terminal steps and consumed by step 5
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionContext {
    pub has_competition: bool,
    pub stakeholder: Option<Stakeholder>,
}

/// Apply one answer at `step`.
///
/// Returns the terminal outcome if the answer ends the tree, `None` to
/// continue. Steps 4 and 5 record into `context`. Answers that do not belong
/// to a step are treated as "continue" here; callers validate tokens first.
pub fn evaluate(step: u8, answer: Answer, context: &mut DecisionContext) -> Option<Outcome> {
    match (step, answer) {
        (1 | 2, Answer::No) => Some(Outcome::GuidedTrial),
        (3, Answer::Basic) => Some(Outcome::SandboxTrial),
        (3, Answer::Quality) => Some(Outcome::TechnicalValidationTier1To2),
        (4, _) => {
            context.has_competition = answer == Answer::Yes;
            None
        }
        (5, _) => {
            context.stakeholder = Stakeholder::from_answer(answer);
            Some(compute_final_result(context.stakeholder, context.has_competition))
        }
        _ => None,
    }
}

/// Final motion from buying group and competitive context
pub fn compute_final_result(stakeholder: Option<Stakeholder>, has_competition: bool) -> Outcome {
    match (stakeholder, has_competition) {
        (Some(Stakeholder::Exec), _) => Outcome::ProofOfValue,
        (Some(Stakeholder::BizDev), true) => Outcome::CompetitiveBakeoffTier3To4,
        (Some(Stakeholder::BizDev), false) => Outcome::TechnicalValidationTier2To3,
        (Some(Stakeholder::Committee), true) => Outcome::CompetitiveBakeoffTier4,
        (Some(Stakeholder::Committee), false) => Outcome::TechnicalValidationTier3To4,
        (None, _) => Outcome::TechnicalValidationTier2To3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_early_exits() {
        let mut ctx = DecisionContext::default();
        assert_eq!(evaluate(1, Answer::No, &mut ctx), Some(Outcome::GuidedTrial));
        assert_eq!(evaluate(1, Answer::Yes, &mut ctx), None);
        assert_eq!(evaluate(2, Answer::No, &mut ctx), Some(Outcome::GuidedTrial));
        assert_eq!(evaluate(3, Answer::Basic, &mut ctx), Some(Outcome::SandboxTrial));
        assert_eq!(
            evaluate(3, Answer::Quality, &mut ctx),
            Some(Outcome::TechnicalValidationTier1To2)
        );
        assert_eq!(evaluate(3, Answer::Complex, &mut ctx), None);
        assert_eq!(ctx, DecisionContext::default());
    }

    #[test]
    fn test_step_four_never_terminal() {
        let mut ctx = DecisionContext::default();
        assert_eq!(evaluate(4, Answer::Yes, &mut ctx), None);
        assert!(ctx.has_competition);
        assert_eq!(evaluate(4, Answer::No, &mut ctx), None);
        assert!(!ctx.has_competition);
    }

    #[test]
    fn test_final_result_matrix() {
        use crate::decision::Stakeholder::*;
        let cases = [
            (Exec, true, Outcome::ProofOfValue),
            (Exec, false, Outcome::ProofOfValue),
            (BizDev, true, Outcome::CompetitiveBakeoffTier3To4),
            (BizDev, false, Outcome::TechnicalValidationTier2To3),
            (Committee, true, Outcome::CompetitiveBakeoffTier4),
            (Committee, false, Outcome::TechnicalValidationTier3To4),
        ];
        for (stakeholder, competition, expected) in cases {
            assert_eq!(compute_final_result(Some(stakeholder), competition), expected);
        }
        assert_eq!(compute_final_result(None, true), Outcome::TechnicalValidationTier2To3);
    }

    #[test]
    fn test_step_five_records_stakeholder() {
        let mut ctx = DecisionContext {
            has_competition: true,
            stakeholder: None,
        };
        assert_eq!(
            evaluate(5, Answer::Committee, &mut ctx),
            Some(Outcome::CompetitiveBakeoffTier4)
        );
        assert_eq!(ctx.stakeholder, Some(Stakeholder::Committee));
    }
}

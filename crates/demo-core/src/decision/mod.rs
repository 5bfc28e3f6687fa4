//! POC motion decision tree
//!
//! Five questions narrow a customer down to a recommended POC motion:
//! 1. Clear use case? (`no` ends with a guided trial)
//! 2. Developer resources committed? (`no` ends with a guided trial)
//! 3. Level of technical validation: basic, quality, or complex
//! 4. Competitors involved? (recorded, never terminal)
//! 5. Buying group: biz-dev, committee, or exec (always terminal)

pub mod evaluator;
pub mod questions;
pub mod session;

pub use evaluator::{compute_final_result, evaluate, DecisionContext};
pub use questions::{question, Question, QuestionOption, QUESTIONS};
pub use session::{DecisionExport, DecisionSession, Progress};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// First step of the tree
pub const FIRST_STEP: u8 = 1;

/// Number of questions in the tree
pub const TOTAL_STEPS: u8 = 5;

/// Answer tokens accepted across all steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Answer {
    Yes,
    No,
    Basic,
    Quality,
    Complex,
    BizDev,
    Committee,
    Exec,
}

impl Answer {
    pub const ALL: [Answer; 8] = [
        Answer::Yes,
        Answer::No,
        Answer::Basic,
        Answer::Quality,
        Answer::Complex,
        Answer::BizDev,
        Answer::Committee,
        Answer::Exec,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            Answer::Yes => "yes",
            Answer::No => "no",
            Answer::Basic => "basic",
            Answer::Quality => "quality",
            Answer::Complex => "complex",
            Answer::BizDev => "biz-dev",
            Answer::Committee => "committee",
            Answer::Exec => "exec",
        }
    }
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Answer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Answer::ALL
            .into_iter()
            .find(|answer| answer.token() == s)
            .ok_or_else(|| format!("unknown answer token '{}'", s))
    }
}

/// Buying group recorded at step 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stakeholder {
    BizDev,
    Committee,
    Exec,
}

impl Stakeholder {
    pub fn from_answer(answer: Answer) -> Option<Self> {
        match answer {
            Answer::BizDev => Some(Stakeholder::BizDev),
            Answer::Committee => Some(Stakeholder::Committee),
            Answer::Exec => Some(Stakeholder::Exec),
            _ => None,
        }
    }
}

/// Recommended POC motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "guided-trial")]
    GuidedTrial,
    /// Reference entry only; no path through the tree produces it
    #[serde(rename = "no-poc")]
    NoPoc,
    #[serde(rename = "sandbox-trial")]
    SandboxTrial,
    #[serde(rename = "technical-validation-tier1-2")]
    TechnicalValidationTier1To2,
    #[serde(rename = "technical-validation-tier2-3")]
    TechnicalValidationTier2To3,
    #[serde(rename = "technical-validation-tier3-4")]
    TechnicalValidationTier3To4,
    #[serde(rename = "competitive-bakeoff-tier3-4")]
    CompetitiveBakeoffTier3To4,
    #[serde(rename = "competitive-bakeoff-tier4")]
    CompetitiveBakeoffTier4,
    #[serde(rename = "proof-of-value")]
    ProofOfValue,
}

/// Static display data for an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutcomeInfo {
    pub tag: &'static str,
    pub motion: &'static str,
    pub description: &'static str,
    pub class: &'static str,
}

impl Outcome {
    pub const ALL: [Outcome; 9] = [
        Outcome::GuidedTrial,
        Outcome::NoPoc,
        Outcome::SandboxTrial,
        Outcome::TechnicalValidationTier1To2,
        Outcome::TechnicalValidationTier2To3,
        Outcome::TechnicalValidationTier3To4,
        Outcome::CompetitiveBakeoffTier3To4,
        Outcome::CompetitiveBakeoffTier4,
        Outcome::ProofOfValue,
    ];

    pub fn tag(&self) -> &'static str {
        self.info().tag
    }

    pub fn motion(&self) -> &'static str {
        self.info().motion
    }

    pub fn description(&self) -> &'static str {
        self.info().description
    }

    pub fn info(&self) -> OutcomeInfo {
        match self {
            Outcome::GuidedTrial => OutcomeInfo {
                tag: "guided-trial",
                motion: "Guided Trial",
                description: "Customer needs more guidance to clarify their use case or lacks the necessary resources. A guided trial will help them explore the platform with support.",
                class: "guided-trial",
            },
            Outcome::NoPoc => OutcomeInfo {
                tag: "no-poc",
                motion: "No-POC / Value Exploration",
                description: "Discovery and education motion when the customer is not ready for a POC.",
                class: "no-poc",
            },
            Outcome::SandboxTrial => OutcomeInfo {
                tag: "sandbox-trial",
                motion: "Sandbox Trial",
                description: "Lightweight, low-complexity validation to confirm basic functionality.",
                class: "sandbox-trial",
            },
            Outcome::TechnicalValidationTier1To2 => OutcomeInfo {
                tag: "technical-validation-tier1-2",
                motion: "Technical Validation (Tier 3)",
                description: "Focused validation of improvements vs current solution. Does OneSignal make better coffee?",
                class: "technical-validation",
            },
            Outcome::TechnicalValidationTier2To3 => OutcomeInfo {
                tag: "technical-validation-tier2-3",
                motion: "Technical Validation POC (3)",
                description: "For customers comparing capabilities and validating improvements.",
                class: "technical-validation",
            },
            Outcome::TechnicalValidationTier3To4 => OutcomeInfo {
                tag: "technical-validation-tier3-4",
                motion: "Technical Validation POC (Tier 3)",
                description: "For customers comparing capabilities and validating improvements.",
                class: "technical-validation",
            },
            Outcome::CompetitiveBakeoffTier3To4 => OutcomeInfo {
                tag: "competitive-bakeoff-tier3-4",
                motion: "Competitive Bake-Off (Tier 4)",
                description: "For competitive evaluations requiring A/B comparisons.",
                class: "competitive-bakeoff",
            },
            Outcome::CompetitiveBakeoffTier4 => OutcomeInfo {
                tag: "competitive-bakeoff-tier4",
                motion: "Competitive Bake-Off (Tier 4)",
                description: "For competitive evaluations requiring A/B comparisons.",
                class: "competitive-bakeoff",
            },
            Outcome::ProofOfValue => OutcomeInfo {
                tag: "proof-of-value",
                motion: "Proof of Value (Tier 5)",
                description: "Executive-sponsored, strategic POC validating OneSignal as the future-state platform.",
                class: "proof-of-value",
            },
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Outcome::ALL
            .into_iter()
            .find(|outcome| outcome.tag() == s)
            .ok_or_else(|| format!("unknown outcome tag '{}'", s))
    }
}

/// Result of feeding one answer into the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Transition {
    /// More input needed at `next_step`
    Continue { next_step: u8 },
    /// The tree terminated
    #[serde(rename = "complete")]
    Outcome { outcome: Outcome },
}

impl Transition {
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Transition::Continue { .. } => None,
            Transition::Outcome { outcome } => Some(*outcome),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_tokens() {
        for answer in Answer::ALL {
            assert_eq!(answer.token().parse::<Answer>(), Ok(answer));
            assert_eq!(
                serde_json::to_value(answer).unwrap(),
                serde_json::Value::String(answer.token().to_string())
            );
        }
        assert!("maybe".parse::<Answer>().is_err());
        assert!("YES".parse::<Answer>().is_err());
    }

    #[test]
    fn test_outcome_tags_match_serde() {
        for outcome in Outcome::ALL {
            assert_eq!(
                serde_json::to_value(outcome).unwrap(),
                serde_json::Value::String(outcome.tag().to_string())
            );
            assert_eq!(outcome.tag().parse::<Outcome>(), Ok(outcome));
        }
    }

    #[test]
    fn test_transition_serialization() {
        let json = serde_json::to_value(Transition::Continue { next_step: 2 }).unwrap();
        assert_eq!(json, serde_json::json!({"status": "continue", "next_step": 2}));

        let json = serde_json::to_value(Transition::Outcome {
            outcome: Outcome::SandboxTrial,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"status": "complete", "outcome": "sandbox-trial"}));
    }
}

//! Question configuration for each step of the decision tree

use super::{Answer, FIRST_STEP, TOTAL_STEPS};
use serde::Serialize;

/// A prompt shown at one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub step: u8,
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<&'static str>,
    pub options: &'static [QuestionOption],
}

/// One selectable answer for a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionOption {
    pub text: &'static str,
    pub value: Answer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<&'static str>,
}

impl QuestionOption {
    const fn simple(text: &'static str, value: Answer) -> Self {
        Self {
            text,
            value,
            subtitle: None,
            description: None,
            examples: None,
        }
    }
}

impl Question {
    /// Whether `answer` is one of this question's options
    pub fn accepts(&self, answer: Answer) -> bool {
        self.options.iter().any(|option| option.value == answer)
    }

    pub fn valid_answers(&self) -> impl Iterator<Item = Answer> + '_ {
        self.options.iter().map(|option| option.value)
    }
}

const YES_NO: &[QuestionOption] = &[
    QuestionOption::simple("Yes", Answer::Yes),
    QuestionOption::simple("No", Answer::No),
];

pub static QUESTIONS: [Question; TOTAL_STEPS as usize] = [
    Question {
        step: 1,
        title: "Does the customer have a clear use case or problem statement?",
        subtitle: None,
        options: YES_NO,
    },
    Question {
        step: 2,
        title: "Are developer resources committed and available to implement/testing?",
        subtitle: None,
        options: YES_NO,
    },
    Question {
        step: 3,
        title: "Which type of validation does the customer need?",
        subtitle: Some("Level of Technical Validation (Coffee Analogy)"),
        options: &[
            QuestionOption {
                text: "Option A: 'Can OneSignal Make Coffee?'",
                value: Answer::Basic,
                subtitle: Some("Basic Functionality"),
                description: Some("Validate core functionality only"),
                examples: Some("Send & receive messages, trigger webhooks, SDK installs, simple API requests, basic segments, one journey"),
            },
            QuestionOption {
                text: "Option B: 'Can OneSignal Make Good Coffee?'",
                value: Answer::Quality,
                subtitle: Some("Quality vs Current Solution"),
                description: Some("Validate improvement over existing system"),
                examples: Some("Higher deliverability, better identity mapping, flexible customization, better analytics, improved automation"),
            },
            QuestionOption {
                text: "Option C: 'Can OneSignal Become the Barista?'",
                value: Answer::Complex,
                subtitle: Some("Complex Validation"),
                description: Some("Deeper, multi-team, multi-system technical validation"),
                examples: Some("Multi-channel workflows, API triggers & backend integrations, migration feasibility, scale/latency testing, multi-threaded teams, data governance"),
            },
        ],
    },
    Question {
        step: 4,
        title: "Is the customer actively evaluating competitors alongside OneSignal?",
        subtitle: None,
        options: YES_NO,
    },
    Question {
        step: 5,
        title: "What does the customer's buying group look like?",
        subtitle: None,
        options: &[
            QuestionOption::simple("Option A: Business User + Developer Only", Answer::BizDev),
            QuestionOption::simple("Option B: Cross-Functional Buying Committee", Answer::Committee),
            QuestionOption::simple("Option C: Executive Sponsor Involved", Answer::Exec),
        ],
    },
];

/// Question for `step`, if it is within the tree
pub fn question(step: u8) -> Option<&'static Question> {
    if (FIRST_STEP..=TOTAL_STEPS).contains(&step) {
        QUESTIONS.get(usize::from(step - FIRST_STEP))
    } else {
        None
    }
}

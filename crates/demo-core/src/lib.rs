//! Engagement Demo Core Logic
//!
//! This crate provides the logic behind the engagement demo site: the static
//! tariff catalog and its lookup filter, the POC motion decision tree, and the
//! actions that forward user input to an engagement SDK.

pub mod decision;
pub mod engagement;
pub mod tariffs;

use thiserror::Error;

pub use decision::{DecisionExport, DecisionSession, Outcome, Progress, Question, Transition};
pub use engagement::{
    EngagementActions, EngagementClient, EngagementError, Notification, VisitorClients,
};
pub use tariffs::{filter, TariffCatalog, TariffQuery, TariffQueryResult, TariffRecord};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid answer '{answer}' for step {step}")]
    InvalidAnswerToken { step: u8, answer: String },

    #[error("Decision session is already complete")]
    SessionComplete,

    #[error("Decision session is not complete")]
    NotComplete,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;

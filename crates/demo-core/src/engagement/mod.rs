//! Engagement SDK actions
//!
//! The demo site lets a visitor log in with an external id, log out, and add,
//! remove or list tags on their profile. The SDK itself sits behind
//! [`EngagementClient`]; [`EngagementActions`] validates the visitor's input,
//! makes the call and turns the result into a [`Notification`].

pub mod memory;
pub mod visitors;

pub use memory::InMemoryEngagement;
pub use visitors::{normalize_visitor_id, VisitorClients, DEFAULT_MAX_VISITORS};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{error, info};

/// Display time for notifications that do not override it
pub const DEFAULT_NOTIFICATION_MS: u64 = 4000;

/// Display time for input validation notifications
pub const VALIDATION_NOTIFICATION_MS: u64 = 3000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngagementError {
    #[error("No user is logged in")]
    NotLoggedIn,

    #[error("Request rejected: {0}")]
    Rejected(String),
}

pub type EngagementResult<T> = Result<T, EngagementError>;

/// Identity and tagging capability of the engagement SDK
#[async_trait]
pub trait EngagementClient: Send + Sync {
    async fn login(&self, external_id: &str) -> EngagementResult<()>;

    async fn logout(&self) -> EngagementResult<()>;

    async fn add_tag(&self, key: &str, value: &str) -> EngagementResult<()>;

    async fn remove_tag(&self, key: &str) -> EngagementResult<()>;

    async fn get_tags(&self) -> EngagementResult<BTreeMap<String, String>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Message shown to the visitor after an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub level: NotificationLevel,
    pub duration_ms: u64,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: NotificationLevel::Success,
            duration_ms: DEFAULT_NOTIFICATION_MS,
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: NotificationLevel::Error,
            duration_ms: DEFAULT_NOTIFICATION_MS,
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn is_success(&self) -> bool {
        self.level == NotificationLevel::Success
    }
}

/// Why an action produced an error notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionFailure {
    /// Input was rejected before reaching the SDK
    Validation,
    /// The SDK call failed
    Client,
}

/// Outcome of a visitor action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    pub notification: Notification,
    pub failure: Option<ActionFailure>,
}

impl ActionReport {
    fn ok(notification: Notification) -> Self {
        Self {
            notification,
            failure: None,
        }
    }

    fn failed(notification: Notification, failure: ActionFailure) -> Self {
        Self {
            notification,
            failure: Some(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// What a tag form submission does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagChange<'a> {
    Add { key: &'a str, value: &'a str },
    Remove { key: &'a str },
}

impl<'a> TagChange<'a> {
    /// An empty value means remove. `None` when the key is blank.
    pub fn from_form(key: &'a str, value: &'a str) -> Option<Self> {
        let key = key.trim();
        let value = value.trim();

        if key.is_empty() {
            None
        } else if value.is_empty() {
            Some(TagChange::Remove { key })
        } else {
            Some(TagChange::Add { key, value })
        }
    }
}

/// Visitor-facing actions over an engagement client
pub struct EngagementActions<C> {
    client: C,
}

impl<C: EngagementClient> EngagementActions<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn login(&self, username: &str) -> ActionReport {
        let username = username.trim();
        if username.is_empty() {
            return ActionReport::failed(
                Notification::error("Error", "Please enter a username")
                    .with_duration(VALIDATION_NOTIFICATION_MS),
                ActionFailure::Validation,
            );
        }

        match self.client.login(username).await {
            Ok(()) => {
                info!("Logged in with external_id: {}", username);
                ActionReport::ok(Notification::success(
                    "Login Successful",
                    format!("Successfully logged in as: {}", username),
                ))
            }
            Err(e) => {
                error!("Login error: {}", e);
                ActionReport::failed(
                    Notification::error("Login Failed", "Login failed. Please try again."),
                    ActionFailure::Client,
                )
            }
        }
    }

    pub async fn logout(&self) -> ActionReport {
        match self.client.logout().await {
            Ok(()) => {
                info!("Logged out");
                ActionReport::ok(Notification::success(
                    "Logout Successful",
                    "You have been successfully logged out",
                ))
            }
            Err(e) => {
                error!("Logout error: {}", e);
                ActionReport::failed(
                    Notification::error("Logout Failed", "Logout failed. Please try again."),
                    ActionFailure::Client,
                )
            }
        }
    }

    /// Add a tag, or remove it when `value` is blank
    pub async fn modify_tag(&self, key: &str, value: &str) -> ActionReport {
        let Some(change) = TagChange::from_form(key, value) else {
            return ActionReport::failed(
                Notification::error("Error", "Please enter a tag key")
                    .with_duration(VALIDATION_NOTIFICATION_MS),
                ActionFailure::Validation,
            );
        };

        let (result, action) = match change {
            TagChange::Add { key, value } => (self.client.add_tag(key, value).await, "add"),
            TagChange::Remove { key } => (self.client.remove_tag(key).await, "remove"),
        };

        match (result, change) {
            (Ok(()), TagChange::Add { key, value }) => {
                info!("Added tag: {} = {}", key, value);
                ActionReport::ok(Notification::success(
                    "Tag Added",
                    format!("Successfully added tag: {} = {}", key, value),
                ))
            }
            (Ok(()), TagChange::Remove { key }) => {
                info!("Removed tag: {}", key);
                ActionReport::ok(Notification::success(
                    "Tag Removed",
                    format!("Successfully removed tag: {}", key),
                ))
            }
            (Err(e), _) => {
                error!("Tag modification error: {}", e);
                ActionReport::failed(
                    Notification::error(
                        "Tag Modification Failed",
                        format!("Failed to {} tag. Please try again.", action),
                    ),
                    ActionFailure::Client,
                )
            }
        }
    }

    /// Current profile tags
    pub async fn view_tags(&self) -> Result<BTreeMap<String, String>, ActionReport> {
        self.client.get_tags().await.map_err(|e| {
            error!("Error loading tags: {}", e);
            ActionReport::failed(
                Notification::error("Error", "Error loading tags. Please try again."),
                ActionFailure::Client,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_change_from_form() {
        assert_eq!(
            TagChange::from_form(" plan ", " gold "),
            Some(TagChange::Add {
                key: "plan",
                value: "gold"
            })
        );
        assert_eq!(
            TagChange::from_form("plan", "   "),
            Some(TagChange::Remove { key: "plan" })
        );
        assert_eq!(TagChange::from_form("  ", "gold"), None);
    }

    #[test]
    fn test_notification_serialization() {
        let json = serde_json::to_value(Notification::error("Error", "nope").with_duration(3000)).unwrap();
        assert_eq!(json["level"], "error");
        assert_eq!(json["duration_ms"], 3000);
    }

    #[tokio::test]
    async fn test_blank_username_never_reaches_client() {
        let actions = EngagementActions::new(InMemoryEngagement::new());
        let report = actions.login("   ").await;

        assert_eq!(report.failure, Some(ActionFailure::Validation));
        assert_eq!(report.notification.message, "Please enter a username");
        assert_eq!(report.notification.duration_ms, VALIDATION_NOTIFICATION_MS);
        assert_eq!(actions.client().external_id().await, None);
    }

    #[tokio::test]
    async fn test_login_trims_and_notifies() {
        let actions = EngagementActions::new(InMemoryEngagement::new());
        let report = actions.login("  ada  ").await;

        assert!(report.is_success());
        assert_eq!(report.notification.message, "Successfully logged in as: ada");
        assert_eq!(actions.client().external_id().await.as_deref(), Some("ada"));
    }

    #[tokio::test]
    async fn test_tag_add_then_remove() {
        let actions = EngagementActions::new(InMemoryEngagement::new());
        actions.login("ada").await;

        let added = actions.modify_tag("plan", "gold").await;
        assert_eq!(added.notification.title, "Tag Added");
        assert_eq!(actions.view_tags().await.unwrap().get("plan").map(String::as_str), Some("gold"));

        let removed = actions.modify_tag("plan", "").await;
        assert_eq!(removed.notification.title, "Tag Removed");
        assert!(actions.view_tags().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_client_failures_reported() {
        let actions = EngagementActions::new(InMemoryEngagement::new());

        let report = actions.modify_tag("plan", "").await;
        assert_eq!(report.failure, Some(ActionFailure::Client));
        assert_eq!(report.notification.message, "Failed to remove tag. Please try again.");

        let report = actions.logout().await;
        assert_eq!(report.notification.title, "Logout Failed");
        assert!(actions.view_tags().await.is_err());

        let report = actions.modify_tag("", "gold").await;
        assert_eq!(report.failure, Some(ActionFailure::Validation));
    }
}

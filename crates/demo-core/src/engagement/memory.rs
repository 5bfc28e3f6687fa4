//! In-process engagement client

use super::{EngagementClient, EngagementError, EngagementResult};
use async_trait::async_trait;
use lru::LruCache;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use tokio::sync::Mutex;

/// Profiles remembered per client before the least recently used is dropped
pub const MAX_PROFILES: usize = 16;

#[derive(Debug)]
struct ProfileState {
    external_id: Option<String>,
    profiles: LruCache<String, BTreeMap<String, String>>,
}

/// Engagement client for a single visitor, keeping profiles in memory.
///
/// Tags belong to the logged-in external id and survive logout, so logging
/// back in with the same id shows the same tags. At most `capacity` profiles
/// are kept; logging in promotes a profile, so the logged-in one is never the
/// first to go.
#[derive(Debug)]
pub struct InMemoryEngagement {
    state: Mutex<ProfileState>,
}

impl InMemoryEngagement {
    pub fn new() -> Self {
        Self::with_capacity(MAX_PROFILES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            state: Mutex::new(ProfileState {
                external_id: None,
                profiles: LruCache::new(capacity),
            }),
        }
    }

    /// Currently logged-in external id
    pub async fn external_id(&self) -> Option<String> {
        self.state.lock().await.external_id.clone()
    }

    /// Number of profiles still remembered
    pub async fn profile_count(&self) -> usize {
        self.state.lock().await.profiles.len()
    }
}

impl Default for InMemoryEngagement {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EngagementClient for InMemoryEngagement {
    async fn login(&self, external_id: &str) -> EngagementResult<()> {
        if external_id.is_empty() {
            return Err(EngagementError::Rejected("external id is empty".to_string()));
        }

        let mut state = self.state.lock().await;
        state
            .profiles
            .get_or_insert_mut(external_id.to_string(), BTreeMap::new);
        state.external_id = Some(external_id.to_string());
        Ok(())
    }

    async fn logout(&self) -> EngagementResult<()> {
        let mut state = self.state.lock().await;
        state
            .external_id
            .take()
            .map(|_| ())
            .ok_or(EngagementError::NotLoggedIn)
    }

    async fn add_tag(&self, key: &str, value: &str) -> EngagementResult<()> {
        let mut state = self.state.lock().await;
        let ProfileState {
            external_id,
            profiles,
        } = &mut *state;
        let id = external_id.as_ref().ok_or(EngagementError::NotLoggedIn)?;
        profiles
            .get_or_insert_mut(id.clone(), BTreeMap::new)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_tag(&self, key: &str) -> EngagementResult<()> {
        let mut state = self.state.lock().await;
        let ProfileState {
            external_id,
            profiles,
        } = &mut *state;
        let id = external_id.as_ref().ok_or(EngagementError::NotLoggedIn)?;
        if let Some(profile) = profiles.get_mut(id) {
            profile.remove(key);
        }
        Ok(())
    }

    async fn get_tags(&self) -> EngagementResult<BTreeMap<String, String>> {
        let state = self.state.lock().await;
        let id = state.external_id.as_ref().ok_or(EngagementError::NotLoggedIn)?;
        Ok(state.profiles.peek(id).cloned().unwrap_or_default())
    }
}

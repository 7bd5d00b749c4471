//! Client for the remote data service holding user profiles and reviews.
//! The core never retries transport errors: a failed fetch degrades to an
//! empty snapshot with an explicit flag, and the caller decides what to do.

use crate::{
    error::Result,
    model::{Review, SkillPatch, UserProfile},
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// In-memory snapshot of the remote directory. `complete` is false when
/// any fetch failed, so callers can show "no matches" instead of an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorySnapshot {
    pub profiles: Vec<UserProfile>,
    pub reviews: Vec<Review>,
    pub complete: bool,
}

impl DirectorySnapshot {
    pub fn empty() -> Self {
        Self {
            profiles: Vec::new(),
            reviews: Vec::new(),
            complete: false,
        }
    }
}

pub struct DirectoryClient {
    endpoint: String,
    client: Client,
}

impl DirectoryClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            client: Client::new(),
        }
    }

    pub fn with_timeout(endpoint: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn get_profiles(&self) -> Result<Vec<UserProfile>> {
        let response = self
            .client
            .get(format!("{}/users", self.endpoint))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn get_reviews(&self) -> Result<Vec<Review>> {
        let response = self
            .client
            .get(format!("{}/swapReviews", self.endpoint))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// Fetches profiles and reviews, degrading each side to an empty list
    /// on transport failure rather than surfacing an error.
    pub async fn fetch_snapshot(&self) -> DirectorySnapshot {
        let mut complete = true;

        let profiles = match self.get_profiles().await {
            Ok(profiles) => profiles,
            Err(err) => {
                tracing::warn!(%err, "profile fetch failed, using empty set");
                complete = false;
                Vec::new()
            }
        };

        let reviews = match self.get_reviews().await {
            Ok(reviews) => reviews,
            Err(err) => {
                tracing::warn!(%err, "review fetch failed, using empty set");
                complete = false;
                Vec::new()
            }
        };

        DirectorySnapshot {
            profiles,
            reviews,
            complete,
        }
    }

    /// Pushes a changed skill set to the remote service. Best-effort: the
    /// in-memory profile is already updated and a failure here is logged
    /// by the caller, never rolled back.
    pub async fn patch_skills(&self, identity: &str, patch: &SkillPatch) -> Result<()> {
        self.client
            .patch(format!("{}/users/{}", self.endpoint, identity))
            .json(patch)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

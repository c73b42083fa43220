//! User lookup.

use serde::Deserialize;
use tracing::{error, instrument};

use crate::error::ApiError;
use crate::{check_status, GitHubClient};

/// GitHub user account.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// Login name.
    pub login: String,

    /// Numeric account identifier.
    pub id: u64,

    /// Account type: `"User"`, `"Organization"`, or `"Bot"`.
    #[serde(rename = "type", default)]
    pub user_type: Option<String>,

    /// Display name, when the account has one.
    #[serde(default)]
    pub name: Option<String>,
}

impl GitHubClient {
    /// Fetch a user's account details.
    ///
    /// Auxiliary operation; not exercised by the main approval flow. Any
    /// failure is logged and reported as `None`.
    #[instrument(skip(self))]
    pub async fn get_user(&self, username: &str) -> Option<User> {
        match self.try_get_user(username).await {
            Ok(user) => Some(user),
            Err(e) => {
                error!(error = %e, username, "Failed to fetch user details");
                None
            }
        }
    }

    async fn try_get_user(&self, username: &str) -> Result<User, ApiError> {
        let url = self.endpoint(&format!("/users/{}", username));
        let response = check_status(self.get(&url).await?).await?;
        response.json().await.map_err(ApiError::from)
    }
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;

//! Display name to game account resolution.
//!
//! Guild members are matched to players by display name. The search
//! endpoint is fuzzy, so each candidate is fetched and compared by exact
//! username. Successful matches are memoised for the lifetime of the
//! process: usernames are assumed stable once resolved.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::api::{GameApi, GameApiError};
use crate::types::GameUser;

/// Resolves display names to fresh [`GameUser`] records.
///
/// Shared by every job that needs game data; the memo table sits behind an
/// async lock so concurrent jobs can use one instance.
pub struct UserResolver {
    api: Arc<dyn GameApi>,
    /// Display name -> game user id.
    memo: RwLock<HashMap<String, String>>,
}

impl UserResolver {
    pub fn new(api: Arc<dyn GameApi>) -> Self {
        Self {
            api,
            memo: RwLock::new(HashMap::new()),
        }
    }

    /// The underlying API client.
    pub fn api(&self) -> &Arc<dyn GameApi> {
        &self.api
    }

    /// Number of memoised names.
    pub async fn memo_len(&self) -> usize {
        self.memo.read().await.len()
    }

    /// Resolve `display_name` to a player, fetched fresh.
    ///
    /// Returns `Ok(None)` only when every candidate loaded and none has
    /// exactly that username. A candidate that fails to load is skipped while
    /// later candidates are tried; if none of them matches, the first such
    /// failure is returned instead of a miss.
    pub async fn resolve(&self, display_name: &str) -> Result<Option<GameUser>, GameApiError> {
        let memoised = self.memo.read().await.get(display_name).cloned();
        if let Some(user_id) = memoised {
            return self.api.get_user_lite(&user_id).await;
        }

        let search = match self.api.search_user(display_name).await? {
            Some(search) if search.has_data => search,
            _ => {
                tracing::debug!(display_name, "No search results");
                return Ok(None);
            }
        };

        let mut first_error: Option<GameApiError> = None;
        for user_id in &search.user_ids {
            let user = match self.api.get_user_lite(user_id).await {
                Ok(Some(user)) => user,
                Ok(None) => continue,
                Err(e) => {
                    tracing::debug!(display_name, user_id = %user_id, error = %e, "Candidate lookup failed");
                    first_error.get_or_insert(e);
                    continue;
                }
            };

            if user.username == display_name {
                self.memo
                    .write()
                    .await
                    .insert(display_name.to_string(), user.id.clone());
                return Ok(Some(user));
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        tracing::debug!(
            display_name,
            candidates = search.user_ids.len(),
            "No candidate matched exactly"
        );
        Ok(None)
    }
}

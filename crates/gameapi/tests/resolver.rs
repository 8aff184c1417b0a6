//! Integration tests for [`UserResolver`].
//!
//! Drive the resolver against an in-memory [`GameApi`] that counts calls, to
//! verify exact-name matching and memoisation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use warbot_gameapi::{
    Country, GameApi, GameApiError, GameUser, Government, Leveling, SearchResult, UserResolver,
};

#[derive(Default)]
struct CountingApi {
    search: HashMap<String, Vec<String>>,
    users: HashMap<String, GameUser>,
    failing_users: Vec<String>,
    fail_search: bool,
    search_calls: AtomicUsize,
    user_calls: AtomicUsize,
}

fn user(id: &str, username: &str) -> GameUser {
    GameUser {
        id: id.to_string(),
        username: username.to_string(),
        skills: Default::default(),
        leveling: Leveling {
            total_skill_points: 10,
            available_skill_points: 0,
        },
        military_unit_id: None,
    }
}

#[async_trait]
impl GameApi for CountingApi {
    async fn search_user(&self, display_name: &str) -> Result<Option<SearchResult>, GameApiError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_search {
            return Err(GameApiError::ApiError {
                status: 503,
                body: "unavailable".into(),
            });
        }
        Ok(self.search.get(display_name).map(|ids| SearchResult {
            has_data: !ids.is_empty(),
            user_ids: ids.clone(),
        }))
    }

    async fn get_user_lite(&self, user_id: &str) -> Result<Option<GameUser>, GameApiError> {
        self.user_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_users.iter().any(|u| u == user_id) {
            return Err(GameApiError::ApiError {
                status: 500,
                body: "boom".into(),
            });
        }
        Ok(self.users.get(user_id).cloned())
    }

    async fn list_countries(&self) -> Result<Vec<Country>, GameApiError> {
        Ok(Vec::new())
    }

    async fn get_country_government(
        &self,
        _country_id: &str,
    ) -> Result<Option<Government>, GameApiError> {
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// Test: exact match among fuzzy candidates
// ---------------------------------------------------------------------------

#[tokio::test]
async fn picks_exact_username_among_candidates() {
    let mut api = CountingApi::default();
    api.search
        .insert("alice".into(), vec!["u-alicia".into(), "u-alice".into()]);
    api.users.insert("u-alicia".into(), user("u-alicia", "alicia"));
    api.users.insert("u-alice".into(), user("u-alice", "alice"));

    let resolver = UserResolver::new(Arc::new(api));
    let found = resolver.resolve("alice").await.unwrap().unwrap();

    assert_eq!(found.id, "u-alice");
    assert_eq!(resolver.memo_len().await, 1);
}

// ---------------------------------------------------------------------------
// Test: memoised names skip the search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn second_resolution_uses_memo() {
    let mut api = CountingApi::default();
    api.search.insert("bob".into(), vec!["u-bob".into()]);
    api.users.insert("u-bob".into(), user("u-bob", "bob"));
    let api = Arc::new(api);

    let resolver = UserResolver::new(api.clone());
    resolver.resolve("bob").await.unwrap().unwrap();
    resolver.resolve("bob").await.unwrap().unwrap();

    assert_eq!(api.search_calls.load(Ordering::SeqCst), 1);
    // one candidate fetch + one memoised fetch
    assert_eq!(api.user_calls.load(Ordering::SeqCst), 2);
}

// ---------------------------------------------------------------------------
// Test: misses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_name_is_none_and_not_memoised() {
    let mut api = CountingApi::default();
    api.search.insert("carol".into(), vec!["u-caroline".into()]);
    api.users
        .insert("u-caroline".into(), user("u-caroline", "caroline"));

    let resolver = UserResolver::new(Arc::new(api));

    assert!(resolver.resolve("carol").await.unwrap().is_none());
    assert!(resolver.resolve("nobody").await.unwrap().is_none());
    assert_eq!(resolver.memo_len().await, 0);
}

#[tokio::test]
async fn search_without_data_is_none() {
    let mut api = CountingApi::default();
    api.search.insert("dave".into(), Vec::new());

    let resolver = UserResolver::new(Arc::new(api));
    assert!(resolver.resolve("dave").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Test: failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_failure_propagates() {
    let api = CountingApi {
        fail_search: true,
        ..Default::default()
    };

    let resolver = UserResolver::new(Arc::new(api));
    let err = resolver.resolve("erin").await.unwrap_err();
    assert_matches!(err, GameApiError::ApiError { status: 503, .. });
}

#[tokio::test]
async fn failing_candidate_is_skipped() {
    let mut api = CountingApi::default();
    api.search
        .insert("frank".into(), vec!["u-broken".into(), "u-frank".into()]);
    api.failing_users.push("u-broken".into());
    api.users.insert("u-frank".into(), user("u-frank", "frank"));

    let resolver = UserResolver::new(Arc::new(api));
    let found = resolver.resolve("frank").await.unwrap().unwrap();
    assert_eq!(found.id, "u-frank");
}

#[tokio::test]
async fn failing_candidate_without_match_is_an_error() {
    let mut api = CountingApi::default();
    api.search
        .insert("gina".into(), vec!["u-broken".into(), "u-georgina".into()]);
    api.failing_users.push("u-broken".into());
    api.users
        .insert("u-georgina".into(), user("u-georgina", "georgina"));

    let resolver = UserResolver::new(Arc::new(api));
    let err = resolver.resolve("gina").await.unwrap_err();

    assert_matches!(err, GameApiError::ApiError { status: 500, .. });
    assert_eq!(resolver.memo_len().await, 0);
}

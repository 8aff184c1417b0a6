//! HTTP client for the WarEra tRPC endpoints.
//!
//! Every procedure is a `GET {base}/{procedure}?input=<json>` request that
//! answers with a `{"result": {"data": ...}}` envelope. Non-2xx statuses and
//! bodies that do not match the expected shape are errors; a `null` data
//! field is a miss, not an error.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::types::{Country, Envelope, GameUser, Government, SearchResult};

/// Default base URL of the tRPC API.
pub const DEFAULT_API_URL: &str = "https://api2.warera.io/trpc";

const PROC_SEARCH: &str = "search.searchAnything";
const PROC_USER_LITE: &str = "user.getUserLite";
const PROC_ALL_COUNTRIES: &str = "country.getAllCountries";
const PROC_GOVERNMENT: &str = "government.getByCountryId";

/// Errors from the game API layer.
#[derive(Debug, thiserror::Error)]
pub enum GameApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("Game API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("Unexpected payload from {procedure}: {source}")]
    Decode {
        procedure: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Logical operations the bot needs from the game.
///
/// `Ok(None)` means the game has no matching record.
#[async_trait]
pub trait GameApi: Send + Sync {
    /// Free-text search for accounts matching a display name.
    async fn search_user(&self, display_name: &str) -> Result<Option<SearchResult>, GameApiError>;

    /// Fetch a single player.
    async fn get_user_lite(&self, user_id: &str) -> Result<Option<GameUser>, GameApiError>;

    /// Fetch every country in the game.
    async fn list_countries(&self) -> Result<Vec<Country>, GameApiError>;

    /// Fetch the government record of a country.
    async fn get_country_government(
        &self,
        country_id: &str,
    ) -> Result<Option<Government>, GameApiError>;
}

/// HTTP implementation of [`GameApi`].
pub struct WarEraApi {
    client: reqwest::Client,
    api_url: String,
}

impl WarEraApi {
    /// Create a client with its own connection pool and a per-request
    /// timeout.
    ///
    /// * `api_url` - Base tRPC URL, e.g. [`DEFAULT_API_URL`].
    pub fn new(api_url: String, timeout: Duration) -> Result<Self, GameApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, api_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    // ---- private helpers ----

    /// Call a procedure and unwrap the tRPC envelope.
    async fn query<T: DeserializeOwned>(
        &self,
        procedure: &'static str,
        input: serde_json::Value,
    ) -> Result<Option<T>, GameApiError> {
        let response = self
            .client
            .get(format!("{}/{}", self.api_url, procedure))
            .query(&[("input", input.to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GameApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        decode_envelope(procedure, &body)
    }
}

/// Parse a tRPC envelope, mapping shape mismatches to [`GameApiError::Decode`].
pub(crate) fn decode_envelope<T: DeserializeOwned>(
    procedure: &'static str,
    body: &str,
) -> Result<Option<T>, GameApiError> {
    let envelope: Envelope<T> = serde_json::from_str(body)
        .map_err(|source| GameApiError::Decode { procedure, source })?;
    Ok(envelope.result.data)
}

#[async_trait]
impl GameApi for WarEraApi {
    async fn search_user(&self, display_name: &str) -> Result<Option<SearchResult>, GameApiError> {
        self.query(PROC_SEARCH, serde_json::json!({ "searchText": display_name }))
            .await
    }

    async fn get_user_lite(&self, user_id: &str) -> Result<Option<GameUser>, GameApiError> {
        self.query(PROC_USER_LITE, serde_json::json!({ "userId": user_id }))
            .await
    }

    async fn list_countries(&self) -> Result<Vec<Country>, GameApiError> {
        let countries: Option<Vec<Country>> =
            self.query(PROC_ALL_COUNTRIES, serde_json::json!({})).await?;
        Ok(countries.unwrap_or_default())
    }

    async fn get_country_government(
        &self,
        country_id: &str,
    ) -> Result<Option<Government>, GameApiError> {
        self.query(PROC_GOVERNMENT, serde_json::json!({ "countryId": country_id }))
            .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

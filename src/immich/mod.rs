//! Immich REST client: the person roster, metadata search, and album
//! endpoints consumed by the sync engine. Authenticates with an API key
//! sent as an `x-api-key` header on every request.

pub mod error;
pub mod types;

use std::collections::HashSet;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde_json::json;
use tracing::debug;

use error::ApiError;
use types::{
    Album, AlbumAssetsResponse, Asset, BulkIdResult, PeopleResponse, Person, SearchResponse,
};

/// Page size accepted by `/api/search/metadata`.
const SEARCH_PAGE_SIZE: usize = 1000;

/// Error bodies can embed full validation output; keep log lines readable.
const MAX_ERROR_BODY: usize = 300;

/// The server operations the sync engine depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ImmichApi: Send + Sync {
    /// Fetch the full person roster.
    async fn list_people(&self) -> Result<Vec<Person>, ApiError>;

    /// Search for assets associated with the given people. With `match_all`
    /// the ids are sent together in one query, which the server treats as
    /// "all of these people appear"; otherwise the query carries one id.
    async fn search_assets(
        &self,
        person_ids: &[String],
        match_all: bool,
    ) -> Result<Vec<Asset>, ApiError>;

    /// Ids of the assets currently in the album.
    async fn album_asset_ids(&self, album_id: &str) -> Result<HashSet<String>, ApiError>;

    /// Add assets to the album in one batch, returning per-id outcomes.
    async fn add_assets_to_album(
        &self,
        album_id: &str,
        asset_ids: &[String],
    ) -> Result<Vec<BulkIdResult>, ApiError>;

    /// List all albums visible to the API key.
    async fn list_albums(&self) -> Result<Vec<Album>, ApiError>;
}

pub struct ImmichClient {
    http: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for ImmichClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImmichClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ImmichClient {
    /// Build a client for the given server. The API key lands in the default
    /// headers so every request carries it.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut key = HeaderValue::from_str(api_key).map_err(|_| ApiError::InvalidApiKey)?;
        key.set_sensitive(true);
        headers.insert("x-api-key", key);

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn a non-success response into an [`ApiError::Status`] carrying a
/// truncated copy of the body.
async fn check(endpoint: &str, resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::Status {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        body: truncate_body(&body),
    })
}

fn truncate_body(body: &str) -> String {
    let body = body.trim();
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[async_trait::async_trait]
impl ImmichApi for ImmichClient {
    async fn list_people(&self) -> Result<Vec<Person>, ApiError> {
        let resp = self.http.get(self.url("/api/people")).send().await?;
        let resp = check("/api/people", resp).await?;
        let people: PeopleResponse = resp.json().await?;
        Ok(people.into_people())
    }

    async fn search_assets(
        &self,
        person_ids: &[String],
        match_all: bool,
    ) -> Result<Vec<Asset>, ApiError> {
        let url = self.url("/api/search/metadata");
        let mode = if match_all { "all-of" } else { "any-of" };
        let mut assets: Vec<Asset> = Vec::new();
        let mut page: u64 = 1;

        loop {
            let body = json!({
                "personIds": person_ids,
                "size": SEARCH_PAGE_SIZE,
                "page": page,
            });
            debug!(mode, page, "POST /api/search/metadata");
            let resp = self.http.post(&url).json(&body).send().await?;
            let resp = check("/api/search/metadata", resp).await?;
            let parsed: SearchResponse = resp.json().await?;

            let items = parsed.assets.items;
            let full_page = items.len() >= SEARCH_PAGE_SIZE;
            assets.extend(items);
            if !full_page {
                break;
            }
            page += 1;
        }

        debug!(mode, count = assets.len(), "search finished");
        Ok(assets)
    }

    async fn album_asset_ids(&self, album_id: &str) -> Result<HashSet<String>, ApiError> {
        let path = format!("/api/albums/{}", album_id);
        let resp = self.http.get(self.url(&path)).send().await?;
        let resp = check(&path, resp).await?;
        let album: AlbumAssetsResponse = resp.json().await?;
        Ok(album.assets.into_iter().map(|a| a.id).collect())
    }

    async fn add_assets_to_album(
        &self,
        album_id: &str,
        asset_ids: &[String],
    ) -> Result<Vec<BulkIdResult>, ApiError> {
        let path = format!("/api/albums/{}/assets", album_id);
        let body = json!({ "ids": asset_ids });
        let resp = self.http.put(self.url(&path)).json(&body).send().await?;
        let resp = check(&path, resp).await?;
        let results: Vec<BulkIdResult> = resp.json().await?;
        Ok(results)
    }

    async fn list_albums(&self) -> Result<Vec<Album>, ApiError> {
        let resp = self.http.get(self.url("/api/albums")).send().await?;
        let resp = check("/api/albums", resp).await?;
        let albums: Vec<Album> = resp.json().await?;
        Ok(albums)
    }
}

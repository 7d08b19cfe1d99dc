//! OMDb repository implementation.
//!
//! OMDb answers every request with HTTP 200 and signals failure in the body:
//! `{"Response":"False","Error":"..."}`. A search that matches nothing comes
//! back the same way (`"Movie not found!"`), which we treat as an empty
//! success rather than an error.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;

use super::error::{ErrorInfo, Fetched, RepositoryError};
use super::repository::CatalogRepository;
use super::types::{CatalogItem, CatalogPayload, DetailRecord};

pub const DEFAULT_OMDB_BASE_URL: &str = "https://www.omdbapi.com";

// ============================================================================
// OMDb Wire Types
// ============================================================================

/// Body of `?s=<query>`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct SearchResponse {
    response: String,
    #[serde(default)]
    search: Vec<SearchHit>,
    #[serde(rename = "totalResults", default)]
    total_results: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct SearchHit {
    title: String,
    #[serde(default)]
    year: String,
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Type", default)]
    kind: String,
    #[serde(default)]
    poster: Option<String>,
}

/// Body of `?i=<id>`. Everything is optional because failures share the shape.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct DetailResponse {
    response: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(rename = "imdbID", default)]
    imdb_id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    year: Option<String>,
    #[serde(default)]
    plot: Option<String>,
    #[serde(default)]
    rated: Option<String>,
    #[serde(default)]
    released: Option<String>,
    #[serde(default)]
    runtime: Option<String>,
    #[serde(default)]
    genre: Option<String>,
    #[serde(default)]
    director: Option<String>,
    #[serde(default)]
    actors: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: Option<String>,
    #[serde(default)]
    poster: Option<String>,
}

/// Error envelope OMDb also sends with non-2xx statuses (e.g. 401 on a bad key).
#[derive(Deserialize, Debug)]
struct ErrorBody {
    #[serde(rename = "Error")]
    error: Option<String>,
}

// ============================================================================
// Translation Layer
// ============================================================================

/// OMDb uses "N/A" for absent values.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != "N/A")
}

fn is_success(response: &str) -> bool {
    response.eq_ignore_ascii_case("true")
}

/// "Movie not found!", "Series not found!" and friends.
fn is_no_match(message: &str) -> bool {
    message.trim_end().ends_with("not found!")
}

/// Prefers OMDb's own `Error` text; falls back to the raw body, then the status.
fn upstream_message(status: u16, body: String) -> String {
    if let Ok(ErrorBody { error: Some(message) }) = serde_json::from_str::<ErrorBody>(&body) {
        return message;
    }
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP {status}")
    } else {
        body.to_string()
    }
}

fn search_to_payload(body: SearchResponse) -> Result<CatalogPayload, RepositoryError> {
    if !is_success(&body.response) {
        let message = body.error.unwrap_or_else(|| "unknown error".to_string());
        if is_no_match(&message) {
            debug!("OMDb reported no matches: {}", message);
            return Ok(CatalogPayload::empty());
        }
        return Err(RepositoryError::Upstream {
            status: 200,
            message,
        });
    }

    // Upstream pages occasionally repeat an id; keep the first so ids stay unique.
    let mut seen = HashSet::new();
    let mut items = Vec::with_capacity(body.search.len());
    for hit in body.search {
        if !seen.insert(hit.imdb_id.clone()) {
            debug!("Dropping duplicate search hit {}", hit.imdb_id);
            continue;
        }
        items.push(CatalogItem {
            id: hit.imdb_id,
            title: hit.title,
            year: hit.year,
            kind: hit.kind,
            poster_url: present(hit.poster),
        });
    }

    let total_results = body
        .total_results
        .and_then(|t| t.trim().parse::<usize>().ok())
        .unwrap_or(items.len());

    Ok(CatalogPayload {
        items,
        total_results,
    })
}

fn detail_to_record(body: DetailResponse) -> Result<DetailRecord, RepositoryError> {
    if !is_success(&body.response) {
        return Err(RepositoryError::Upstream {
            status: 200,
            message: body.error.unwrap_or_else(|| "unknown error".to_string()),
        });
    }

    let id = present(body.imdb_id)
        .ok_or_else(|| RepositoryError::Decode("detail response is missing imdbID".to_string()))?;
    let title = present(body.title)
        .ok_or_else(|| RepositoryError::Decode("detail response is missing Title".to_string()))?;

    Ok(DetailRecord {
        id,
        title,
        year: present(body.year).unwrap_or_default(),
        plot: present(body.plot).unwrap_or_default(),
        rated: present(body.rated),
        released: present(body.released),
        runtime: present(body.runtime),
        genre: present(body.genre),
        director: present(body.director),
        actors: present(body.actors),
        language: present(body.language),
        imdb_rating: present(body.imdb_rating),
        poster_url: present(body.poster),
    })
}

// ============================================================================
// Repository Implementation
// ============================================================================

/// Catalog repository backed by the OMDb HTTP API.
pub struct OmdbRepository {
    base_url: String,
    client: reqwest::Client,
}

impl OmdbRepository {
    /// Builds a repository whose every request gives up after `timeout`.
    pub fn new(base_url: Option<String>, timeout: Duration) -> Result<Self, RepositoryError> {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_OMDB_BASE_URL.to_string());
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RepositoryError::from)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Issues one GET and returns the raw body of a 2xx response.
    async fn get(&self, params: &[(&str, &str)]) -> Result<String, RepositoryError> {
        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .query(params)
            .send()
            .await?;

        debug!("OMDb response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("OMDb API error: {} - {}", status, err_body);
            return Err(RepositoryError::Upstream {
                status,
                message: upstream_message(status, err_body),
            });
        }

        Ok(response.text().await?)
    }

    async fn search(&self, api_key: &str, query: &str) -> Result<CatalogPayload, RepositoryError> {
        let body = self.get(&[("apikey", api_key), ("s", query)]).await?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| RepositoryError::Decode(e.to_string()))?;
        search_to_payload(parsed)
    }

    async fn detail(&self, api_key: &str, id: &str) -> Result<DetailRecord, RepositoryError> {
        let body = self
            .get(&[("apikey", api_key), ("i", id), ("plot", "full")])
            .await?;
        let parsed: DetailResponse =
            serde_json::from_str(&body).map_err(|e| RepositoryError::Decode(e.to_string()))?;
        detail_to_record(parsed)
    }
}

#[async_trait]
impl CatalogRepository for OmdbRepository {
    fn name(&self) -> &str {
        "omdb"
    }

    async fn search_catalog(&self, api_key: &str, query: &str) -> Fetched<CatalogPayload> {
        info!("OMDb search: query={:?}", query);
        match self.search(api_key, query).await {
            Ok(payload) => {
                info!(
                    "OMDb search returned {} items ({} total)",
                    payload.items.len(),
                    payload.total_results
                );
                Ok(payload)
            }
            Err(e) => {
                warn!("OMDb search failed: {}", e);
                Err(ErrorInfo::from(e))
            }
        }
    }

    async fn fetch_detail(&self, api_key: &str, id: &str) -> Fetched<DetailRecord> {
        info!("OMDb detail: id={}", id);
        self.detail(api_key, id).await.map_err(|e| {
            warn!("OMDb detail failed: {}", e);
            ErrorInfo::from(e)
        })
    }
}

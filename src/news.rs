//! Headline source backed by the NewsAPI `everything` endpoint.
//!
//! Only titles are kept. Results come back ranked by relevancy, in English,
//! limited to the query's page size. Titles NewsAPI blanks out as
//! `[Removed]` and exact duplicates (syndicated stories) are dropped.

use crate::error::{LinkcraftError, Result};
use crate::models::HeadlineQuery;
use itertools::Itertools;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

const SERVICE: &str = "NewsAPI";
const REMOVED_TITLE: &str = "[Removed]";

/// Anything that can list headlines for an industry and date range.
pub trait HeadlineSource {
    async fn headlines(&self, query: &HeadlineQuery) -> Result<Vec<String>>;
}

/// NewsAPI `/v2/everything` client.
pub struct NewsApiClient {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl std::fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

impl NewsApiClient {
    pub fn new(client: Client, api_key: String, base_url: &Url) -> Result<Self> {
        let endpoint = base_url
            .join("everything")
            .map_err(|source| LinkcraftError::InvalidUrl {
                what: "news API",
                source,
            })?;
        Ok(Self {
            client,
            api_key,
            endpoint,
        })
    }
}

impl HeadlineSource for NewsApiClient {
    #[instrument(level = "info", skip_all, fields(industry = %query.industry, range = %query.range))]
    async fn headlines(&self, query: &HeadlineQuery) -> Result<Vec<String>> {
        let t0 = Instant::now();
        let page_size = query.limit.to_string();
        let from = query.range.start().to_string();
        let to = query.range.end().to_string();

        let response = self
            .client
            .get(self.endpoint.clone())
            .header("X-Api-Key", &self.api_key)
            .query(&[
                ("q", query.industry.as_str()),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("sortBy", "relevancy"),
                ("language", "en"),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let elapsed_ms = t0.elapsed().as_millis();

        match decode_everything(status, &body, query.limit) {
            Ok(titles) => {
                info!(count = titles.len(), elapsed_ms, "Fetched headlines");
                debug!(?titles, "Headlines");
                Ok(titles)
            }
            Err(e) => {
                warn!(%status, elapsed_ms, error = %e, "Headline fetch failed");
                Err(e)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    articles: Vec<Article>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
}

/// Turn an `everything` response into a clean list of titles.
fn decode_everything(status: StatusCode, body: &str, limit: usize) -> Result<Vec<String>> {
    let parsed: EverythingResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) if status.is_success() => {
            return Err(LinkcraftError::ExternalService {
                service: SERVICE,
                message: format!("unreadable response: {e}"),
            });
        }
        Err(_) => {
            return Err(LinkcraftError::ExternalService {
                service: SERVICE,
                message: format!("HTTP {status}"),
            });
        }
    };

    if !status.is_success() || parsed.status != "ok" {
        let message = match (parsed.code, parsed.message) {
            (Some(code), Some(message)) => format!("{code}: {message}"),
            (None, Some(message)) => message,
            (Some(code), None) => code,
            (None, None) => format!("HTTP {status}"),
        };
        return Err(LinkcraftError::ExternalService {
            service: SERVICE,
            message,
        });
    }

    Ok(parsed
        .articles
        .into_iter()
        .filter_map(|article| article.title)
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty() && title != REMOVED_TITLE)
        .unique()
        .take(limit)
        .collect())
}

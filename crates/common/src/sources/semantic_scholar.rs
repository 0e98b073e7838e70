//! Semantic Scholar Graph API source
//!
//! See: https://api.semanticscholar.org/api-docs/graph

use super::{PaperSource, SourcePage};
use crate::errors::{AppError, Result};
use crate::models::Paper;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.semanticscholar.org/graph/v1";

const FIELDS: &str =
    "title,authors,year,citationCount,abstract,venue,externalIds,url,isOpenAccess,fieldsOfStudy";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    data: Vec<ApiPaper>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPaper {
    paper_id: String,
    title: Option<String>,
    #[serde(default)]
    authors: Vec<ApiAuthor>,
    year: Option<i32>,
    citation_count: Option<u64>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    venue: Option<String>,
    external_ids: Option<ExternalIds>,
    url: Option<String>,
    #[serde(default)]
    is_open_access: bool,
    fields_of_study: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ApiAuthor {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExternalIds {
    #[serde(rename = "DOI")]
    doi: Option<String>,
}

impl From<ApiPaper> for Paper {
    fn from(p: ApiPaper) -> Self {
        Paper {
            id: p.paper_id,
            title: p.title.unwrap_or_default(),
            authors: p.authors.into_iter().filter_map(|a| a.name).collect(),
            year: p.year.unwrap_or_default(),
            citations: p.citation_count.unwrap_or_default(),
            abstract_text: p.abstract_text.unwrap_or_default(),
            keywords: p.fields_of_study.unwrap_or_default(),
            venue: p.venue.unwrap_or_default(),
            doi: p.external_ids.and_then(|ids| ids.doi),
            url: p.url,
            open_access: p.is_open_access,
            references: Vec::new(),
        }
    }
}

/// Client for the Semantic Scholar paper search
pub struct SemanticScholarSource {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl SemanticScholarSource {
    /// Create a new source
    ///
    /// # Arguments
    /// * `api_key` - Optional API key for higher rate limits
    /// * `base_url` - Override for the Graph API root
    pub fn new(
        api_key: Option<String>,
        base_url: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    /// Build a request with optional API key header
    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self.client.get(url);
        if let Some(ref key) = self.api_key {
            req = req.header("x-api-key", key);
        }
        req
    }

    fn upstream(message: impl Into<String>) -> AppError {
        AppError::Upstream {
            message: message.into(),
        }
    }
}

#[async_trait]
impl PaperSource for SemanticScholarSource {
    async fn search(&self, query: &str, page: u32, page_size: u32) -> Result<SourcePage> {
        let url = format!("{}/paper/search", self.base_url);
        let offset = (page.max(1) - 1)
            .checked_mul(page_size)
            .ok_or_else(|| AppError::Validation {
                message: format!("page {} is out of range", page),
                field: Some("page".to_string()),
            })?;

        debug!(query, offset, limit = page_size, "Semantic Scholar search");

        let response = self
            .build_request(&url)
            .query(&[
                ("query", query.to_string()),
                ("offset", offset.to_string()),
                ("limit", page_size.to_string()),
                ("fields", FIELDS.to_string()),
            ])
            .send()
            .await
            .map_err(|e| Self::upstream(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::upstream(format!("API error {}: {}", status, body)));
        }

        let result: SearchResponse = response
            .json()
            .await
            .map_err(|e| Self::upstream(format!("Failed to parse response: {}", e)))?;

        Ok(SourcePage {
            total: result.total,
            papers: result.data.into_iter().map(Paper::from).collect(),
        })
    }

    async fn fetch(&self, id: &str) -> Result<Option<Paper>> {
        let url = format!("{}/paper/{}", self.base_url, id);

        let response = self
            .build_request(&url)
            .query(&[("fields", FIELDS)])
            .send()
            .await
            .map_err(|e| Self::upstream(format!("request failed: {}", e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let paper: ApiPaper = response
                    .json()
                    .await
                    .map_err(|e| Self::upstream(format!("Failed to parse response: {}", e)))?;
                Ok(Some(paper.into()))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(Self::upstream(format!("API error {}: {}", status, body)))
            }
        }
    }

    fn name(&self) -> &str {
        "semantic_scholar"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_paper_conversion() {
        let json = r#"{
            "total": 1,
            "data": [{
                "paperId": "204e3073870fae3d05bcbc2f6a8e263d9b72e776",
                "title": "Attention Is All You Need",
                "authors": [{ "name": "Ashish Vaswani" }, { "name": null }],
                "year": 2017,
                "citationCount": 100000,
                "abstract": null,
                "venue": "NeurIPS",
                "externalIds": { "DOI": "10.5555/3295222.3295349" },
                "url": "https://www.semanticscholar.org/paper/204e",
                "isOpenAccess": true,
                "fieldsOfStudy": ["Computer Science"]
            }]
        }"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let paper: Paper = response.data.into_iter().next().unwrap().into();

        assert_eq!(paper.authors, vec!["Ashish Vaswani"]);
        assert_eq!(paper.citations, 100000);
        assert_eq!(paper.abstract_text, "");
        assert_eq!(paper.keywords, vec!["Computer Science"]);
        assert_eq!(paper.doi.as_deref(), Some("10.5555/3295222.3295349"));
        assert!(paper.open_access);
    }

    #[tokio::test]
    async fn test_unreachable_source_is_upstream_error() {
        let source =
            SemanticScholarSource::new(None, Some("http://127.0.0.1:9".to_string()), 2).unwrap();
        let err = source.search("transformers", 1, 10).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream { .. }));
    }

    #[tokio::test]
    async fn test_offset_overflow_rejected() {
        let source =
            SemanticScholarSource::new(None, Some("http://127.0.0.1:9".to_string()), 2).unwrap();
        let err = source.search("transformers", 100_000_000, 50).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { field: Some(ref f), .. } if f == "page"));
    }
}

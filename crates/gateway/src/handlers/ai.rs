//! AI analysis handlers
//!
//! `GET /api/ai` serves offline analytics over papers from the configured
//! source. `POST /api/ai` forwards a task prompt to the chat-completion
//! provider and relays the text unchanged.

use super::{required, X_API_KEY};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use chrono::{DateTime, Datelike, Utc};
use scholarnexus_common::{
    errors::{AppError, Result},
    insight::{self, KeywordCluster, Recommendation, TrendAnalysis},
    llm::prompts,
    models::Paper,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{info, warn};
use validator::Validate;

/// Interests used by `recommend` when none are given
const DEFAULT_INTERESTS: &str = "Deep Learning,NLP";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisType {
    Trends,
    Keywords,
    Recommend,
    Summarize,
}

impl FromStr for AnalysisType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "trends" => Ok(AnalysisType::Trends),
            "keywords" => Ok(AnalysisType::Keywords),
            "recommend" => Ok(AnalysisType::Recommend),
            "summarize" => Ok(AnalysisType::Summarize),
            _ => Err(AppError::Validation {
                message: "Invalid analysis type".to_string(),
                field: Some("type".to_string()),
            }),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisParams {
    #[serde(rename = "type")]
    pub analysis: Option<String>,
    pub q: Option<String>,
    pub paper_id: Option<String>,
    /// Comma-separated research interests
    pub keywords: Option<String>,
}

/// Where a summary came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummarySource {
    Llm,
    Heuristic,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    Trends {
        trends: Vec<TrendAnalysis>,
        #[serde(rename = "generatedAt")]
        generated_at: DateTime<Utc>,
    },
    Keywords {
        clusters: Vec<KeywordCluster>,
        #[serde(rename = "generatedAt")]
        generated_at: DateTime<Utc>,
    },
    Recommend {
        recommendations: Vec<Recommendation>,
        #[serde(rename = "generatedAt")]
        generated_at: DateTime<Utc>,
    },
    Summarize {
        summary: String,
        #[serde(rename = "generatedAt")]
        generated_at: DateTime<Utc>,
        source: SummarySource,
    },
}

/// Split a comma-separated list, dropping blanks
fn split_interests(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Papers the analytics run over
async fn corpus(state: &AppState, topic: Option<&str>) -> Result<Vec<Paper>> {
    let topic = topic
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(state.config.llm.default_topic.as_str());

    Ok(state
        .source
        .search(topic, 1, state.config.search.max_page_size)
        .await?
        .papers)
}

async fn summarize(state: &AppState, paper_id: &str) -> Result<(String, SummarySource)> {
    let paper = state
        .source
        .fetch(paper_id)
        .await?
        .ok_or_else(|| AppError::PaperNotFound {
            id: paper_id.to_string(),
        })?;

    if let Ok(api_key) = state.llm.resolve_key(None) {
        match state.llm.complete(api_key, &prompts::summarize(&paper)).await {
            Ok(summary) if !summary.trim().is_empty() => {
                return Ok((summary, SummarySource::Llm))
            }
            Ok(_) => warn!(paper_id, "Empty LLM summary, using heuristic"),
            Err(e) => warn!(error = %e, paper_id, "LLM summary failed, using heuristic"),
        }
    }

    Ok((insight::heuristic_summary(&paper), SummarySource::Heuristic))
}

/// Run an offline analysis
pub async fn analyze(
    State(state): State<AppState>,
    Query(params): Query<AnalysisParams>,
) -> Result<Json<AnalysisResponse>> {
    let analysis = params.analysis.as_deref().unwrap_or("trends").parse::<AnalysisType>()?;
    let current_year = Utc::now().year();

    let response = match analysis {
        AnalysisType::Trends => {
            let papers = corpus(&state, params.q.as_deref()).await?;
            AnalysisResponse::Trends {
                trends: insight::analyze_trends(&papers, current_year),
                generated_at: Utc::now(),
            }
        }
        AnalysisType::Keywords => {
            let papers = corpus(&state, params.q.as_deref()).await?;
            AnalysisResponse::Keywords {
                clusters: insight::keyword_clusters(&papers, current_year),
                generated_at: Utc::now(),
            }
        }
        AnalysisType::Recommend => {
            let interests =
                split_interests(params.keywords.as_deref().unwrap_or(DEFAULT_INTERESTS));
            let papers = corpus(&state, params.q.as_deref()).await?;
            let candidates = insight::profile_authors(&papers);
            AnalysisResponse::Recommend {
                recommendations: insight::recommend_collaborators(&interests, &candidates),
                generated_at: Utc::now(),
            }
        }
        AnalysisType::Summarize => {
            let paper_id = required(params.paper_id.as_deref(), "paperId")?;
            let (summary, source) = summarize(&state, paper_id).await?;
            AnalysisResponse::Summarize {
                summary,
                generated_at: Utc::now(),
                source,
            }
        }
    };

    info!(analysis = ?analysis, "Analysis completed");
    Ok(Json(response))
}

/// Tasks forwarded to the chat-completion provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiTask {
    Summarize,
    AnalyzeTrends,
    Recommend,
}

impl FromStr for AiTask {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "summarize" => Ok(AiTask::Summarize),
            "analyze-trends" => Ok(AiTask::AnalyzeTrends),
            "recommend" => Ok(AiTask::Recommend),
            other => Err(AppError::Validation {
                message: format!("Invalid task: {}", other),
                field: Some("task".to_string()),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AiTaskRequest {
    pub task: String,

    pub paper: Option<Paper>,

    #[serde(default)]
    #[validate(length(max = 100))]
    pub papers: Vec<Paper>,

    #[validate(length(max = 1000))]
    pub query: Option<String>,
}

impl AiTaskRequest {
    /// Prompt for the requested task, checking its inputs
    pub fn prompt(&self) -> Result<prompts::Prompt> {
        self.validate().map_err(|e| AppError::Validation {
            message: e.to_string(),
            field: None,
        })?;

        match self.task.parse::<AiTask>()? {
            AiTask::Summarize => {
                let paper = self.paper.as_ref().ok_or_else(|| AppError::missing("paper"))?;
                Ok(prompts::summarize(paper))
            }
            AiTask::AnalyzeTrends => {
                if self.papers.is_empty() {
                    return Err(AppError::missing("papers"));
                }
                Ok(prompts::trends(&self.papers))
            }
            AiTask::Recommend => {
                let query = required(self.query.as_deref(), "query")?;
                Ok(prompts::recommend(query, &self.papers))
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AiTaskResponse {
    pub content: String,
}

/// Forward a task to the LLM provider
pub async fn complete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AiTaskRequest>,
) -> Result<Json<AiTaskResponse>> {
    let prompt = request.prompt()?;

    let supplied = headers.get(X_API_KEY).and_then(|v| v.to_str().ok());
    let api_key = state.llm.resolve_key(supplied)?;

    let content = state.llm.complete(api_key, &prompt).await?;

    info!(task = %request.task, model = state.llm.model(), "AI task completed");
    Ok(Json(AiTaskResponse { content }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper() -> Paper {
        serde_json::from_str(r#"{ "id": "p1", "title": "Attention", "year": 2017 }"#).unwrap()
    }

    #[test]
    fn test_analysis_type_parsing() {
        assert_eq!("keywords".parse::<AnalysisType>().unwrap(), AnalysisType::Keywords);
        let err = "sentiment".parse::<AnalysisType>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid analysis type");
    }

    #[test]
    fn test_split_interests() {
        assert_eq!(split_interests("Deep Learning, NLP,,"), vec!["Deep Learning", "NLP"]);
        assert!(split_interests(" , ").is_empty());
    }

    #[test]
    fn test_task_prompts_require_inputs() {
        let request = AiTaskRequest {
            task: "summarize".into(),
            paper: None,
            papers: vec![],
            query: None,
        };
        assert!(matches!(request.prompt(), Err(AppError::MissingField { .. })));

        let request = AiTaskRequest {
            task: "summarize".into(),
            paper: Some(paper()),
            papers: vec![],
            query: None,
        };
        assert!(request.prompt().is_ok());

        let request = AiTaskRequest {
            task: "analyze-trends".into(),
            paper: None,
            papers: vec![],
            query: None,
        };
        assert!(request.prompt().is_err());

        let request = AiTaskRequest {
            task: "recommend".into(),
            paper: None,
            papers: vec![paper()],
            query: Some("graph learning".into()),
        };
        assert!(request.prompt().unwrap().user.contains("graph learning"));
    }

    #[test]
    fn test_unknown_task() {
        let request = AiTaskRequest {
            task: "translate".into(),
            paper: None,
            papers: vec![],
            query: None,
        };
        assert!(matches!(request.prompt(), Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_summary_response_shape() {
        let response = AnalysisResponse::Summarize {
            summary: "s".into(),
            generated_at: Utc::now(),
            source: SummarySource::Heuristic,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["source"], "heuristic");
        assert!(value["generatedAt"].is_string());
    }
}

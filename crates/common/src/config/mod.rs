//! Configuration management for ScholarNexus services
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default, config/<env>, config/local)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Redis configuration
    #[serde(default)]
    pub redis: RedisConfig,

    /// Paper source configuration
    #[serde(default)]
    pub source: SourceConfig,

    /// Search gateway configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Knowledge graph configuration
    #[serde(default)]
    pub graph: GraphConfig,

    /// LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    /// Redis URL; the in-memory store is used when unset
    pub url: Option<String>,

    /// Key prefix for namespacing
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

/// Which paper source backs search and graph requests
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Built-in catalogue of well-known papers
    #[default]
    Mock,
    /// Semantic Scholar Graph API
    SemanticScholar,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,

    /// API key for the remote source (optional)
    pub api_key: Option<String>,

    /// API base URL override
    pub api_base: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_source_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// TTL of cached search pages in seconds
    #[serde(default = "default_search_ttl")]
    pub cache_ttl_secs: u64,

    /// Default page size
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Upper bound for page size
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GraphConfig {
    /// TTL of cached graphs in seconds
    #[serde(default = "default_graph_ttl")]
    pub cache_ttl_secs: u64,

    /// Number of papers fetched for one graph
    #[serde(default = "default_graph_papers")]
    pub max_papers: u32,

    /// Authors linked per paper
    #[serde(default = "default_per_paper_cap")]
    pub max_authors_per_paper: usize,

    /// Keywords linked per paper
    #[serde(default = "default_per_paper_cap")]
    pub max_keywords_per_paper: usize,

    /// Emit author-to-author coauthor links
    #[serde(default = "default_enabled")]
    pub coauthor_links: bool,

    /// Canvas used to seed initial positions
    #[serde(default = "default_layout_width")]
    pub layout_width: f64,

    #[serde(default = "default_layout_height")]
    pub layout_height: f64,
}

/// Chat-completion provider
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    #[default]
    Qwen,
    Openai,
}

impl LlmProvider {
    /// Default chat-completions endpoint for the provider
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            LlmProvider::Qwen => "https://dashscope.aliyuncs.com/compatible-mode/v1/chat/completions",
            LlmProvider::Openai => "https://api.openai.com/v1/chat/completions",
        }
    }

    /// Default model for the provider
    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::Qwen => "qwen-turbo",
            LlmProvider::Openai => "gpt-4o-mini",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProvider,

    /// Credential used when the request does not carry one
    pub api_key: Option<String>,

    /// Endpoint override
    pub endpoint: Option<String>,

    /// Model override
    pub model: Option<String>,

    /// Topic analyzed when `/api/ai` gets no query
    #[serde(default = "default_topic")]
    pub default_topic: String,
}

impl LlmConfig {
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.provider.default_endpoint())
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_enabled")]
    pub json_logging: bool,

    /// Metrics port (0 to disable)
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Requests per second (global)
    #[serde(default = "default_rate_limit")]
    pub requests_per_second: u32,

    /// Burst capacity
    #[serde(default = "default_burst")]
    pub burst: u32,

    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_request_timeout() -> u64 { 30 }
fn default_key_prefix() -> String { "scholarnexus".to_string() }
fn default_source_timeout() -> u64 { 15 }
fn default_search_ttl() -> u64 { 1800 }
fn default_page_size() -> u32 { 20 }
fn default_max_page_size() -> u32 { 50 }
fn default_graph_ttl() -> u64 { 3600 }
fn default_graph_papers() -> u32 { 20 }
fn default_per_paper_cap() -> usize { 3 }
fn default_layout_width() -> f64 { 800.0 }
fn default_layout_height() -> f64 { 600.0 }
fn default_topic() -> String { "deep learning".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_metrics_port() -> u16 { 9090 }
fn default_rate_limit() -> u32 { 50 }
fn default_burst() -> u32 { 100 }
fn default_enabled() -> bool { true }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: None,
            key_prefix: default_key_prefix(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            api_key: None,
            endpoint: None,
            model: None,
            default_topic: default_topic(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            api_key: None,
            api_base: None,
            timeout_secs: default_source_timeout(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_search_ttl(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_graph_ttl(),
            max_papers: default_graph_papers(),
            max_authors_per_paper: default_per_paper_cap(),
            max_keywords_per_paper: default_per_paper_cap(),
            coauthor_links: default_enabled(),
            layout_width: default_layout_width(),
            layout_height: default_layout_height(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_enabled(),
            metrics_port: default_metrics_port(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_rate_limit(),
            burst: default_burst(),
            enabled: default_enabled(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Load base config file
            .add_source(File::with_name("config/default").required(false))
            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // Load local overrides
            .add_source(File::with_name("config/local").required(false))
            // e.g., APP__SERVER__PORT=8081
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            redis: RedisConfig::default(),
            source: SourceConfig::default(),
            search: SearchConfig::default(),
            graph: GraphConfig::default(),
            llm: LlmConfig::default(),
            observability: ObservabilityConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

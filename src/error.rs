use async_graphql::ErrorExtensions;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("upstream returned {status} for {method} {url}")]
    UpstreamStatus {
        method: reqwest::Method,
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("upstream response carried no total-count header")]
    MissingTotalCount,

    #[error("upstream total-count header is not an integer: {value:?}")]
    InvalidTotalCount { value: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl GatewayError {
    /// Machine-readable code attached to GraphQL errors under `extensions.code`.
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Upstream(_) | GatewayError::UpstreamStatus { .. } => "UPSTREAM_FAILURE",
            GatewayError::MissingTotalCount => "MISSING_TOTAL_COUNT",
            GatewayError::InvalidTotalCount { .. } => "INVALID_TOTAL_COUNT",
            GatewayError::Config(_) | GatewayError::Io(_) | GatewayError::Yaml(_) => "CONFIG",
        }
    }
}

impl ErrorExtensions for GatewayError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", self.code()))
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

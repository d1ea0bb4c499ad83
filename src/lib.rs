pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod posts_query;
pub mod resolvers;
pub mod schema;
pub mod upstream;

pub use config::{Args, GatewayConfig, UpstreamConfig};
pub use error::{GatewayError, Result};
pub use gateway::PostsGateway;
pub use posts_query::PostsQuery;
pub use upstream::{HttpPostsApi, PostsApi, PostsPage, SharedPostsApi};

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequest {
    pub query: String,
    #[serde(default)]
    pub variables: Option<Value>,
    #[serde(default)]
    pub operation_name: Option<String>,
}

impl GraphQLRequest {
    pub fn new(query: impl Into<String>) -> Self {
        GraphQLRequest {
            query: query.into(),
            variables: None,
            operation_name: None,
        }
    }

    pub fn with_variables(mut self, variables: Value) -> Self {
        self.variables = Some(variables);
        self
    }
}

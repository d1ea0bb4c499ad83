use async_graphql::{Request, Response, Variables};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::GraphQLRequest;
use crate::schema::{PostsSchema, build_schema};
use crate::upstream::SharedPostsApi;

/// A POST body: either one operation or a JSON array of them.
///
/// async-graphql's `BatchRequest` executes batch items one after another;
/// this type lets `process_batch` run them concurrently.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum GraphQLBody {
    Single(GraphQLRequest),
    Batch(Vec<GraphQLRequest>),
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum GraphQLResponse {
    Single(Response),
    Batch(Vec<Response>),
}

pub struct PostsGateway {
    schema: PostsSchema,
}

impl PostsGateway {
    pub fn new(api: SharedPostsApi) -> Self {
        PostsGateway {
            schema: build_schema(api),
        }
    }

    pub async fn process_request(&self, request: GraphQLRequest) -> Response {
        debug!(operation = ?request.operation_name, "processing request");

        let mut graphql_request = Request::new(request.query);
        if let Some(variables) = request.variables {
            graphql_request = graphql_request.variables(Variables::from_json(variables));
        }
        if let Some(operation_name) = request.operation_name {
            graphql_request = graphql_request.operation_name(operation_name);
        }

        self.schema.execute(graphql_request).await
    }

    /// Runs every operation of a batch concurrently; a failure in one only
    /// shows up in that operation's response.
    pub async fn process_batch(&self, requests: Vec<GraphQLRequest>) -> Vec<Response> {
        let futures = requests
            .into_iter()
            .map(|request| self.process_request(request));

        join_all(futures).await
    }

    pub async fn process_body(&self, body: GraphQLBody) -> GraphQLResponse {
        match body {
            GraphQLBody::Single(request) => {
                GraphQLResponse::Single(self.process_request(request).await)
            }
            GraphQLBody::Batch(requests) => {
                GraphQLResponse::Batch(self.process_batch(requests).await)
            }
        }
    }

    /// The schema in SDL form.
    pub fn sdl(&self) -> String {
        self.schema.sdl()
    }
}

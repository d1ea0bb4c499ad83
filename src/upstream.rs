use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::UpstreamConfig;
use crate::error::{GatewayError, Result};
use crate::model::{Post, PostInput};
use crate::posts_query::PostsQuery;

/// The upstream blog-post API, one method per REST call.
#[async_trait]
pub trait PostsApi {
    async fn list_posts(&self, query: &PostsQuery) -> Result<PostsPage>;
    async fn create_post(&self, post: &PostInput) -> Result<Post>;
    async fn update_post(&self, post_id: i32, post: &PostInput) -> Result<Post>;
    async fn delete_post(&self, post_id: i32) -> Result<()>;
}

pub type SharedPostsApi = Arc<dyn PostsApi + Send + Sync>;

/// A page of the post collection together with the upstream's total-count header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostsPage {
    pub posts: Vec<Post>,
    pub total_count: Option<String>,
}

impl PostsPage {
    pub fn total(&self) -> Result<i32> {
        let raw = self
            .total_count
            .as_deref()
            .ok_or(GatewayError::MissingTotalCount)?;

        raw.trim()
            .parse()
            .map_err(|_| GatewayError::InvalidTotalCount {
                value: raw.to_string(),
            })
    }
}

/// Write calls wrap their payload in `{"data": ...}` and the upstream echoes
/// the record back under the same key.
#[derive(Serialize, Deserialize, Debug)]
struct DataEnvelope<T> {
    data: T,
}

pub struct HttpPostsApi {
    client: reqwest::Client,
    base_url: String,
    total_count_header: String,
}

impl HttpPostsApi {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self::with_client(
            builder.build()?,
            &config.base_url,
            &config.total_count_header,
        ))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str, total_count_header: &str) -> Self {
        HttpPostsApi {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            total_count_header: total_count_header.to_string(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/posts", self.base_url)
    }

    fn item_url(&self, post_id: i32) -> String {
        format!("{}/posts/{}", self.base_url, post_id)
    }

    async fn send(&self, method: Method, url: String, request: RequestBuilder) -> Result<Response> {
        debug!(%method, %url, "calling upstream");

        let response = request.send().await.map_err(|e| {
            warn!(%method, %url, error = %e, "upstream request failed");
            GatewayError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%method, %url, %status, "upstream returned an error status");
            return Err(GatewayError::UpstreamStatus {
                method,
                url,
                status,
            });
        }

        Ok(response)
    }

    async fn write_post(&self, method: Method, url: String, post: &PostInput) -> Result<Post> {
        let request = self
            .client
            .request(method.clone(), &url)
            .json(&DataEnvelope { data: post });

        let envelope: DataEnvelope<Post> = self.send(method, url, request).await?.json().await?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl PostsApi for HttpPostsApi {
    async fn list_posts(&self, query: &PostsQuery) -> Result<PostsPage> {
        let url = self.collection_url();
        let request = self.client.get(&url).query(&query.query_pairs());
        let response = self.send(Method::GET, url, request).await?;

        let total_count = response
            .headers()
            .get(self.total_count_header.as_str())
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());

        let posts = response.json::<Vec<Post>>().await?;

        Ok(PostsPage { posts, total_count })
    }

    async fn create_post(&self, post: &PostInput) -> Result<Post> {
        self.write_post(Method::POST, self.collection_url(), post)
            .await
    }

    async fn update_post(&self, post_id: i32, post: &PostInput) -> Result<Post> {
        self.write_post(Method::PUT, self.item_url(post_id), post)
            .await
    }

    async fn delete_post(&self, post_id: i32) -> Result<()> {
        let url = self.item_url(post_id);
        let request = self.client.delete(&url);
        self.send(Method::DELETE, url, request).await?;
        Ok(())
    }
}

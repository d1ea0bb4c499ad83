use async_graphql::{Context, ErrorExtensions, Object, Result};
use tracing::debug;

use crate::model::{Metadata, PaginatedResult, Post, PostInput};
use crate::posts_query::PostsQuery;
use crate::upstream::SharedPostsApi;

pub struct QueryRoot {
    api: SharedPostsApi,
}

impl QueryRoot {
    pub fn new(api: SharedPostsApi) -> Self {
        QueryRoot { api }
    }
}

#[Object(name = "Query")]
impl QueryRoot {
    /// One page of posts, exactly as the upstream returns it.
    ///
    /// The field is nullable, so an upstream failure is reported as a field
    /// error and the field itself resolves to `null`.
    async fn posts(
        &self,
        ctx: &Context<'_>,
        page: Option<i32>,
        limit: Option<i32>,
        sort: Option<String>,
        order: Option<String>,
    ) -> Option<Vec<Option<Post>>> {
        let query = PostsQuery::new(page, limit, sort, order);

        match self.api.list_posts(&query).await {
            Ok(page) => Some(page.posts.into_iter().map(Some).collect()),
            Err(e) => {
                let error = e.extend().into_server_error(ctx.item.pos);
                ctx.add_error(ctx.set_error_path(error));
                None
            }
        }
    }

    /// One page of posts plus the upstream's total record count.
    async fn posts_with_meta(
        &self,
        page: Option<i32>,
        limit: i32,
        sort: Option<String>,
        order: Option<String>,
    ) -> Result<PaginatedResult> {
        let query = PostsQuery::new(page, Some(limit), sort, order);
        let page = self.api.list_posts(&query).await.map_err(|e| e.extend())?;
        let total = page.total().map_err(|e| e.extend())?;

        Ok(PaginatedResult {
            metadata: Metadata { total },
            data: page.posts,
        })
    }
}

pub struct MutationRoot {
    api: SharedPostsApi,
}

impl MutationRoot {
    pub fn new(api: SharedPostsApi) -> Self {
        MutationRoot { api }
    }
}

#[Object(name = "Mutation")]
impl MutationRoot {
    /// Returns the record the upstream echoes back, including its `id` and `userId`.
    async fn create_post(&self, post: PostInput) -> Result<Post> {
        self.api.create_post(&post).await.map_err(|e| e.extend())
    }

    async fn update_post(&self, post: PostInput, post_id: i32) -> Result<Post> {
        self.api
            .update_post(post_id, &post)
            .await
            .map_err(|e| e.extend())
    }

    /// Returns the id it was given; the upstream response body is never inspected.
    async fn delete_post(&self, post_id: i32) -> Result<i32> {
        self.api.delete_post(post_id).await.map_err(|e| e.extend())?;
        debug!(post_id, "post deleted upstream");

        Ok(post_id)
    }
}

use async_trait::async_trait;
use posts_gateway::model::{Post, PostInput};
use posts_gateway::{
    GatewayError, GraphQLRequest, PostsApi, PostsGateway, PostsPage, PostsQuery, Result,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    List(PostsQuery),
    Create(PostInput),
    Update(i32, PostInput),
    Delete(i32),
}

// Test double that records every upstream call and answers from canned data
struct RecordingApi {
    calls: Mutex<Vec<Call>>,
    posts: Vec<Post>,
    total_count: Option<String>,
    fail: bool,
}

impl RecordingApi {
    fn new() -> Self {
        RecordingApi {
            calls: Mutex::new(Vec::new()),
            posts: vec![post(1, "first"), post(2, "second")],
            total_count: Some("100".to_string()),
            fail: false,
        }
    }

    fn failing() -> Self {
        RecordingApi {
            fail: true,
            ..RecordingApi::new()
        }
    }

    fn record(&self, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            return Err(GatewayError::UpstreamStatus {
                method: reqwest::Method::GET,
                url: "http://upstream.test/posts".to_string(),
                status: reqwest::StatusCode::BAD_GATEWAY,
            });
        }
        Ok(())
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PostsApi for RecordingApi {
    async fn list_posts(&self, query: &PostsQuery) -> Result<PostsPage> {
        self.record(Call::List(query.clone()))?;
        Ok(PostsPage {
            posts: self.posts.clone(),
            total_count: self.total_count.clone(),
        })
    }

    async fn create_post(&self, post: &PostInput) -> Result<Post> {
        self.record(Call::Create(post.clone()))?;
        // Upstream assigns its own id and owner
        Ok(Post {
            user_id: 12,
            id: 101,
            title: post.title.clone(),
            body: post.body.clone(),
        })
    }

    async fn update_post(&self, post_id: i32, post: &PostInput) -> Result<Post> {
        self.record(Call::Update(post_id, post.clone()))?;
        // Echo carries an id unrelated to the path id
        Ok(Post {
            user_id: post.user_id,
            id: 77,
            title: post.title.clone(),
            body: post.body.clone(),
        })
    }

    async fn delete_post(&self, post_id: i32) -> Result<()> {
        self.record(Call::Delete(post_id))
    }
}

fn post(id: i32, title: &str) -> Post {
    Post {
        user_id: 1,
        id,
        title: title.to_string(),
        body: format!("{} body", title),
    }
}

fn input(title: &str) -> PostInput {
    PostInput {
        user_id: 3,
        id: 4,
        title: title.to_string(),
        body: "b".to_string(),
    }
}

async fn execute(api: Arc<RecordingApi>, query: &str, variables: Option<Value>) -> Value {
    let gateway = PostsGateway::new(api);
    let mut request = GraphQLRequest::new(query);
    request.variables = variables;

    let response = gateway.process_request(request).await;
    serde_json::to_value(response).unwrap()
}

#[tokio::test]
async fn posts_forwards_only_provided_arguments() {
    let api = Arc::new(RecordingApi::new());

    let result = execute(
        api.clone(),
        r#"{ posts(limit: 2, order: "desc") { id title } }"#,
        None,
    )
    .await;

    assert_eq!(
        result["data"]["posts"],
        json!([{ "id": 1, "title": "first" }, { "id": 2, "title": "second" }])
    );
    assert_eq!(
        api.calls(),
        vec![Call::List(PostsQuery::new(
            None,
            Some(2),
            None,
            Some("desc".to_string())
        ))]
    );
}

#[tokio::test]
async fn posts_without_arguments_injects_no_defaults() {
    let api = Arc::new(RecordingApi::new());

    execute(api.clone(), "{ posts { id } }", None).await;

    assert_eq!(api.calls(), vec![Call::List(PostsQuery::default())]);
}

#[tokio::test]
async fn posts_with_meta_wraps_total_and_body() {
    let api = Arc::new(RecordingApi::new());

    let result = execute(
        api.clone(),
        r#"{ postsWithMeta(page: 3, limit: 2, sort: "id") { metadata { total } data { userId id title body } } }"#,
        None,
    )
    .await;

    assert_eq!(
        result["data"]["postsWithMeta"],
        json!({
            "metadata": { "total": 100 },
            "data": [
                { "userId": 1, "id": 1, "title": "first", "body": "first body" },
                { "userId": 1, "id": 2, "title": "second", "body": "second body" }
            ]
        })
    );
    assert_eq!(
        api.calls(),
        vec![Call::List(PostsQuery::new(
            Some(3),
            Some(2),
            Some("id".to_string()),
            None
        ))]
    );
}

#[tokio::test]
async fn posts_with_meta_requires_limit() {
    let api = Arc::new(RecordingApi::new());

    let result = execute(api.clone(), "{ postsWithMeta { metadata { total } } }", None).await;

    assert!(result["errors"].is_array());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn posts_with_meta_fails_without_total_header() {
    let api = Arc::new(RecordingApi {
        total_count: None,
        ..RecordingApi::new()
    });

    let result = execute(
        api,
        "{ postsWithMeta(limit: 2) { metadata { total } } }",
        None,
    )
    .await;

    assert_eq!(result["data"], Value::Null);
    assert_eq!(
        result["errors"][0]["extensions"]["code"],
        "MISSING_TOTAL_COUNT"
    );
}

#[tokio::test]
async fn posts_with_meta_rejects_non_numeric_total() {
    let api = Arc::new(RecordingApi {
        total_count: Some("lots".to_string()),
        ..RecordingApi::new()
    });

    let result = execute(
        api,
        "{ postsWithMeta(limit: 2) { metadata { total } } }",
        None,
    )
    .await;

    assert_eq!(
        result["errors"][0]["extensions"]["code"],
        "INVALID_TOTAL_COUNT"
    );
}

#[tokio::test]
async fn create_post_returns_upstream_record_unmodified() {
    let api = Arc::new(RecordingApi::new());

    let result = execute(
        api.clone(),
        "mutation($post: PostInput!) { createPost(post: $post) { userId id title body } }",
        Some(json!({ "post": { "userId": 3, "id": 4, "title": "t", "body": "b" } })),
    )
    .await;

    assert_eq!(
        result["data"]["createPost"],
        json!({ "userId": 12, "id": 101, "title": "t", "body": "b" })
    );
    assert_eq!(api.calls(), vec![Call::Create(input("t"))]);
}

#[tokio::test]
async fn update_post_targets_given_id() {
    let api = Arc::new(RecordingApi::new());

    let result = execute(
        api.clone(),
        "mutation($post: PostInput!) { updatePost(post: $post, postId: 5) { userId id title body } }",
        Some(json!({ "post": { "userId": 3, "id": 4, "title": "new", "body": "b" } })),
    )
    .await;

    assert_eq!(
        result["data"]["updatePost"],
        json!({ "userId": 3, "id": 77, "title": "new", "body": "b" })
    );
    assert_eq!(api.calls(), vec![Call::Update(5, input("new"))]);
}

#[tokio::test]
async fn delete_post_echoes_requested_id() {
    let api = Arc::new(RecordingApi::new());

    let result = execute(api.clone(), "mutation { deletePost(postId: 7) }", None).await;

    assert_eq!(result["data"], json!({ "deletePost": 7 }));
    assert_eq!(api.calls(), vec![Call::Delete(7)]);
}

#[tokio::test]
async fn upstream_failure_becomes_field_error() {
    let api = Arc::new(RecordingApi::failing());

    let result = execute(api, "mutation { deletePost(postId: 7) }", None).await;

    assert_eq!(result["data"], Value::Null);
    let errors = result["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["extensions"]["code"], "UPSTREAM_FAILURE");
    assert_eq!(errors[0]["path"], json!(["deletePost"]));
}

#[tokio::test]
async fn failing_operation_does_not_abort_its_batch_siblings() {
    let healthy = PostsGateway::new(Arc::new(RecordingApi::new()));
    let failing = PostsGateway::new(Arc::new(RecordingApi::failing()));

    let ok = healthy
        .process_batch(vec![
            GraphQLRequest::new("{ posts { id } }"),
            GraphQLRequest::new("mutation { deletePost(postId: 9) }"),
        ])
        .await;
    assert_eq!(ok.len(), 2);
    assert!(ok.iter().all(|response| response.errors.is_empty()));

    let mixed = failing
        .process_batch(vec![
            GraphQLRequest::new("{ posts { id } }"),
            GraphQLRequest::new("{ __typename }"),
        ])
        .await;
    assert_eq!(mixed.len(), 2);
    assert_eq!(mixed[0].errors.len(), 1);
    assert!(mixed[1].errors.is_empty());
    assert_eq!(
        serde_json::to_value(&mixed[1]).unwrap()["data"],
        json!({ "__typename": "Query" })
    );
}

#[tokio::test]
async fn nullable_list_field_fails_alone() {
    let api = Arc::new(RecordingApi::failing());

    let result = execute(api, "{ posts { id } __typename }", None).await;

    assert_eq!(
        result["data"],
        json!({ "posts": null, "__typename": "Query" })
    );
    assert_eq!(result["errors"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn failed_posts_resolves_to_null_with_field_error() {
    let api = Arc::new(RecordingApi::failing());

    let result = execute(api, "{ posts { id } }", None).await;

    assert_eq!(result["data"], json!({ "posts": null }));
    let errors = result["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["extensions"]["code"], "UPSTREAM_FAILURE");
    assert_eq!(errors[0]["path"], json!(["posts"]));
}

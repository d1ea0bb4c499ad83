use async_graphql::{EmptySubscription, Schema};

use crate::model::{Comment, User};
use crate::resolvers::{MutationRoot, QueryRoot};
use crate::upstream::SharedPostsApi;

pub type PostsSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Builds the executable schema around the given upstream client.
///
/// `Comment` and `User` (and through it `Address` and `Company`) are not
/// reachable from any root field, so they are registered explicitly to keep
/// them in the published SDL.
pub fn build_schema(api: SharedPostsApi) -> PostsSchema {
    Schema::build(
        QueryRoot::new(api.clone()),
        MutationRoot::new(api),
        EmptySubscription,
    )
    .register_output_type::<Comment>()
    .register_output_type::<User>()
    .finish()
}

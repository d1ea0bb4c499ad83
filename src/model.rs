//! Entity shapes exposed through the GraphQL schema.
//!
//! `Post` and `PostInput` travel to and from the upstream API as JSON, so they
//! carry serde derives using the upstream's camelCase field names. The remaining
//! entities are declared for schema compatibility only; no resolver produces them.

use async_graphql::{InputObject, SimpleObject};
use serde::{Deserialize, Serialize};

#[derive(SimpleObject, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub user_id: i32,
    pub id: i32,
    pub title: String,
    pub body: String,
}

/// Mutation payload. The upstream assigns nothing we override, so the full
/// record is required and echoed back as-is.
#[derive(InputObject, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostInput {
    pub user_id: i32,
    pub id: i32,
    pub title: String,
    pub body: String,
}

#[derive(SimpleObject, Clone, Debug, PartialEq, Eq)]
pub struct Metadata {
    /// Number of records upstream matched before pagination was applied.
    pub total: i32,
}

#[derive(SimpleObject, Clone, Debug, PartialEq, Eq)]
pub struct PaginatedResult {
    pub metadata: Metadata,
    pub data: Vec<Post>,
}

#[derive(SimpleObject, Clone, Debug)]
pub struct Comment {
    pub post_id: String,
    pub id: i32,
    pub name: String,
    pub email: String,
    pub body: String,
}

#[derive(SimpleObject, Clone, Debug)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub username: String,
    pub email: String,
    pub address: Address,
    pub phone: String,
    pub website: String,
    pub company: Company,
}

#[derive(SimpleObject, Clone, Debug)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
}

#[derive(SimpleObject, Clone, Debug)]
pub struct Company {
    pub name: String,
    pub catch_phrase: String,
    pub bs: String,
}

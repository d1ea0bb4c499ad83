/// Pagination and sort arguments for the post collection.
///
/// Only arguments the client supplied are forwarded; nothing is defaulted here
/// because the upstream applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostsQuery {
    pub page: Option<i32>,
    pub limit: Option<i32>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl PostsQuery {
    pub fn new(
        page: Option<i32>,
        limit: Option<i32>,
        sort: Option<String>,
        order: Option<String>,
    ) -> Self {
        PostsQuery {
            page,
            limit,
            sort,
            order,
        }
    }

    /// Upstream query parameters, in a stable order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);

        if let Some(page) = self.page {
            pairs.push(("_page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("_limit", limit.to_string()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("_sort", sort.clone()));
        }
        if let Some(order) = &self.order {
            pairs.push(("_order", order.clone()));
        }

        pairs
    }
}

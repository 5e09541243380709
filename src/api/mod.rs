//! Definition of the GraphQL API.

use juniper::{EmptyMutation, EmptySubscription};

use self::query::Query;

pub(crate) mod err;
pub(crate) mod model;

mod context;
mod query;


pub(crate) use self::context::Context;


/// Creates and returns the API root node.
pub(crate) fn root_node() -> RootNode {
    RootNode::new(Query, EmptyMutation::new(), EmptySubscription::new())
}

/// Type of our API root node. The API is read-only: there are neither
/// mutations nor subscriptions.
pub(crate) type RootNode = juniper::RootNode<
    'static,
    Query,
    EmptyMutation<Context>,
    EmptySubscription<Context>,
>;

//! GraphQL HTTP route handlers
//!
//! - `POST /graphql` - Execute a query against the schema
//! - `GET /graphql/playground` - GraphQL Playground (development only)
//!
//! Each request's `Authorization` header is resolved into a
//! [`Session`](crate::services::Session) and attached to the GraphQL request.
//! Authentication never fails the request; bad credentials yield an
//! anonymous session.

use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};

use crate::graphql::AgoraSchema;
use crate::services::SessionResolver;

/// Shared state for the GraphQL handlers
#[derive(Clone)]
pub struct GraphQLState {
    pub schema: AgoraSchema,
    pub resolver: SessionResolver,
}

impl GraphQLState {
    pub fn new(schema: AgoraSchema, resolver: SessionResolver) -> Self {
        Self { schema, resolver }
    }
}

/// Create the GraphQL router
///
/// The playground is mounted only when `playground` is true.
pub fn graphql_router(state: GraphQLState, playground: bool) -> Router {
    let mut router = Router::new().route("/graphql", post(graphql_handler));
    if playground {
        router = router.route("/graphql/playground", get(graphql_playground));
    }
    router.with_state(state)
}

async fn graphql_handler(
    State(state): State<GraphQLState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let session = state.resolver.resolve(authorization).await;
    if session.is_authenticated() {
        tracing::debug!(user_id = ?session.user_id(), "GraphQL request authenticated");
    }

    let request = req.into_inner().data(session);
    state.schema.execute(request).await.into()
}

/// GraphQL Playground handler for development
async fn graphql_playground() -> impl IntoResponse {
    Html(async_graphql::http::playground_source(
        async_graphql::http::GraphQLPlaygroundConfig::new("/graphql"),
    ))
}

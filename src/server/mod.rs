//! HTTP transport for the aggregation engine.
//!
//! Two endpoints:
//! - `GET /feeds?sources=a,b&topics=x` returns the merged, time-ordered items.
//! - `GET /feeds/meta` returns source/topic metadata for client discovery.
//!
//! Selection parameters are accepted both comma-delimited and repeated;
//! an absent or empty parameter selects everything of that kind.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::app::{AppContext, Result};
use crate::catalog::{Meta, SelectionRequest};
use crate::domain::ItemsResponse;

pub fn create_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/feeds", get(feed_items))
        .route("/feeds/meta", get(feed_meta))
        .with_state(ctx)
}

pub async fn serve(ctx: Arc<AppContext>, addr: SocketAddr) -> Result<()> {
    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn feed_items(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<ItemsResponse> {
    let request = SelectionRequest {
        sources: merged_delimited_params(&params, "sources"),
        topics: merged_delimited_params(&params, "topics"),
    };
    Json(ctx.get_feed_items(&request).await)
}

async fn feed_meta(State(ctx): State<Arc<AppContext>>) -> Json<Meta> {
    Json(ctx.meta().clone())
}

/// Merge repeated query params, splitting each value on `,`, so
/// `?topics=uk,world&topics=technology` yields `["uk", "world", "technology"]`.
/// Empty fragments are discarded, leaving an empty result to mean "all".
fn merged_delimited_params(params: &[(String, String)], key: &str) -> Vec<String> {
    params
        .iter()
        .filter(|(k, _)| k == key)
        .flat_map(|(_, v)| v.split(','))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

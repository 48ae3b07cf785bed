use std::net::SocketAddr;
use std::sync::Arc;

use crate::app::{AppContext, Result};
use crate::catalog::SelectionRequest;
use crate::server;

pub async fn serve(ctx: AppContext, addr: SocketAddr) -> Result<()> {
    server::serve(Arc::new(ctx), addr).await
}

pub async fn print_items(
    ctx: &AppContext,
    sources: Vec<String>,
    topics: Vec<String>,
) -> Result<()> {
    let request = SelectionRequest { sources, topics };
    let response = ctx.get_feed_items(&request).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

pub fn print_meta(ctx: &AppContext) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(ctx.meta())?);
    Ok(())
}

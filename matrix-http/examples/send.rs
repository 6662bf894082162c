//! Minimal end-to-end smoke test against a live homeserver.
//!
//! Creates (or joins) a room by alias, then sends a hello and prints the
//! server's reply.
//!
//! Run from the workspace root:
//!   cargo run -p matrix-http --example send
//!
//! Env vars (shown with defaults; the token has no default):
//!   MATRIX_HS     http://localhost:8008
//!   MATRIX_TOKEN  (required — an access token from a prior login)
//!   MATRIX_ALIAS  #matrix-http-dev:localhost
//!   RUST_LOG      matrix_http=debug

use matrix_http::{ClientConfig, MatrixClient};
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "matrix_http=debug".into()),
        )
        .init();

    let homeserver = env::var("MATRIX_HS").unwrap_or_else(|_| "http://localhost:8008".into());
    let token = env::var("MATRIX_TOKEN")?;
    let alias = env::var("MATRIX_ALIAS").unwrap_or_else(|_| "#matrix-http-dev:localhost".into());

    info!("connecting to {homeserver}");
    let client = MatrixClient::new(ClientConfig::new(&homeserver, &token)?, reqwest::Client::new());

    // Best-effort: create the room, then join it; either may already be done.
    let resp = client.create_room(&alias).await?;
    info!("createRoom: {}", resp.status());
    client.join_room(&alias).await?;

    // Resolve the alias to its internal room id.
    let resp = client.room_id(&alias).await?;
    let body: serde_json::Value = resp.json().await?;
    let Some(room_id) = body["room_id"].as_str() else {
        return Err(format!("alias {alias} did not resolve: {body}").into());
    };
    info!("{alias} → {room_id}");

    let resp = client.send_message(room_id, "hello from matrix-http").await?;
    info!("send: {}", resp.status());
    println!("{}", resp.text().await?);

    Ok(())
}

// mx: poke a Matrix homeserver from the command line.
// Usage:
//   mx send <room_id> <text>
//   mx resolve <alias>
//   mx join <alias>
//   mx create <alias>
//
// Env vars:
//   MATRIX_HS      http://localhost:8008 (default)
//   MATRIX_TOKEN   access token (required)
//   MATRIX_QUIRKS  "upstream" to reproduce the reference client's defects
//   RUST_LOG       matrix_http=debug

use anyhow::{bail, Context};
use matrix_http::{ClientConfig, MatrixClient, Quirks};
use std::env;
use tracing::warn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "matrix_http=debug".into()),
        )
        .init();

    let homeserver = env::var("MATRIX_HS").unwrap_or_else(|_| "http://localhost:8008".into());
    let token = env::var("MATRIX_TOKEN").context("MATRIX_TOKEN is not set")?;

    let quirks = match env::var("MATRIX_QUIRKS").as_deref() {
        Ok("upstream") => Quirks::upstream(),
        Ok(other) => {
            warn!("unknown MATRIX_QUIRKS value {other:?}, using fixed behavior");
            Quirks::default()
        }
        Err(_) => Quirks::default(),
    };

    let config = ClientConfig::new(&homeserver, &token)?.with_quirks(quirks);
    let client = MatrixClient::new(config, reqwest::Client::new());

    let args: Vec<String> = env::args().skip(1).collect();
    match args.as_slice() {
        [cmd, room_id, text] if cmd == "send" => {
            print_response(client.send_message(room_id, text).await?).await
        }
        [cmd, alias] if cmd == "resolve" => {
            print_response(client.room_id(alias).await?).await
        }
        [cmd, alias] if cmd == "join" => {
            client.join_room(alias).await?;
            println!("join requested for {alias}");
            Ok(())
        }
        [cmd, alias] if cmd == "create" => {
            print_response(client.create_room(alias).await?).await
        }
        _ => bail!("usage: mx send <room_id> <text> | resolve <alias> | join <alias> | create <alias>"),
    }
}

async fn print_response(resp: reqwest::Response) -> anyhow::Result<()> {
    let status = resp.status();
    let body = resp.text().await?;
    println!("{status}\n{body}");
    Ok(())
}

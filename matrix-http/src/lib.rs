//! Minimal Matrix client-server HTTP layer.
//!
//! Thin request builders over an injected [`reqwest::Client`]: send a text
//! message, look up a room by alias, join a room, create a room. No sync
//! loop, no retries, no encryption — the caller owns the transport (pooling,
//! TLS, timeouts) and inspects the raw [`reqwest::Response`] itself; this
//! crate never interprets status codes.
//!
//! ```no_run
//! # async fn run() -> Result<(), matrix_http::MatrixError> {
//! use matrix_http::{ClientConfig, MatrixClient};
//!
//! let config = ClientConfig::new("http://localhost:8008", "syt_token")?;
//! let client = MatrixClient::new(config, reqwest::Client::new());
//! client.join_room("#spoke-dev:localhost").await?;
//! let resp = client.send_message("!room:localhost", "hello").await?;
//! println!("{}", resp.status());
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod message;
mod request;

pub use client::MatrixClient;
pub use config::{ClientConfig, Quirks};
pub use error::MatrixError;
pub use message::Message;
pub use request::{ApiPrefix, RequestOptions};

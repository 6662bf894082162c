use std::time::{SystemTime, UNIX_EPOCH};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{header::CONTENT_TYPE, Response};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::{
    config::ClientConfig,
    error::MatrixError,
    message::Message,
    request::{ApiPrefix, RequestOptions},
};

/// Percent-encode everything except unreserved characters and `/`, the same
/// set `urllib.parse.quote` leaves bare.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'.')
    .remove(b'_')
    .remove(b'-')
    .remove(b'~');

fn quote(s: &str) -> String {
    utf8_percent_encode(s, PATH_SEGMENT).to_string()
}

fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

/// Client-assigned transaction identifier: the wall clock in milliseconds.
/// Deterministic for a given clock reading; two sends within the same
/// millisecond share an id, which is all the dedup the server needs.
fn txn_id(now_ms: u128) -> String {
    now_ms.to_string()
}

/// Derive the alias localpart: everything before the first `:`, minus the
/// leading sigil. `#foo:example.org` → `foo`.
fn alias_localpart(alias: &str) -> Result<&str, MatrixError> {
    let first = alias.split(':').next().unwrap_or_default();
    let local = first
        .char_indices()
        .nth(1)
        .map(|(i, _)| &first[i..])
        .unwrap_or_default();
    if local.is_empty() {
        return Err(MatrixError::InvalidAlias(alias.to_owned()));
    }
    Ok(local)
}

/// A handle to a Matrix homeserver's client-server HTTP API.
///
/// Owns nothing but its config and a cheaply-clonable `reqwest::Client`
/// supplied by the caller; pooling, TLS and timeouts belong to that client.
/// Every operation is one independent request/response exchange returning
/// the live [`Response`] — callers inspect the status and consume the body
/// themselves, on every exit path.
pub struct MatrixClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl MatrixClient {
    pub fn new(config: ClientConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    /// Resolve `endpoint` under `prefix`, then the result under the base
    /// URL, with standard URL-reference resolution. Pure: same inputs, same
    /// URL, no side effects.
    pub fn build_url(&self, endpoint: &str, prefix: ApiPrefix) -> Result<Url, MatrixError> {
        let base = self.config.base_url.join(prefix.as_str())?;
        Ok(base.join(endpoint)?)
    }

    /// Generic request helper behind all the operations. Builds the URL,
    /// appends query pairs, serializes the JSON body to bytes and issues the
    /// request, surfacing transport failures untranslated.
    pub async fn send(&self, opts: RequestOptions) -> Result<Response, MatrixError> {
        let mut url = self.build_url(&opts.path, opts.prefix)?;
        for (name, value) in &opts.query {
            url.query_pairs_mut().append_pair(name, value);
        }

        let mut req = self.http.request(opts.method.clone(), url.clone());
        for (name, value) in &opts.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &opts.body {
            let bytes = serde_json::to_vec(body)?;
            debug!(method = %opts.method, %url, body = %body, "sending request");
            req = req.header(CONTENT_TYPE, "application/json").body(bytes);
        } else {
            debug!(method = %opts.method, %url, "sending request");
        }

        Ok(req.send().await?)
    }

    /// POST a text message to a room. Returns the live response; the caller
    /// consumes it (the event id is in the body on success).
    pub async fn send_message(&self, room_id: &str, text: &str) -> Result<Response, MatrixError> {
        // TODO: switch to PUT rooms/{id}/send/{type}/{txn_id} so the server
        // can actually dedup retried sends; for now the id is only logged.
        let txn = txn_id(now_ms());
        debug!(%txn, room_id, "sending m.room.message");

        let path = format!("rooms/{}/send/{}", quote(room_id), quote("m.room.message"));
        let body = serde_json::to_value(Message::text(text))?;

        self.send(
            RequestOptions::post(path, body)
                .prefix(ApiPrefix::R0)
                .query("access_token", &self.config.access_token),
        )
        .await
    }

    /// Look up a room's internal id by its alias via the room directory.
    /// No access token: the directory is readable unauthenticated.
    pub async fn room_id(&self, room_alias: &str) -> Result<Response, MatrixError> {
        self.send(
            RequestOptions::get(self.directory_path(room_alias)).prefix(ApiPrefix::R0),
        )
        .await
    }

    fn directory_path(&self, room_alias: &str) -> String {
        if self.config.quirks.literal_directory_path {
            // Reference-client defect: the placeholder was never
            // interpolated, so the alias never reaches the wire.
            "directory/room/{room_alias}".to_owned()
        } else {
            format!("directory/room/{}", quote(room_alias))
        }
    }

    /// Join a room by alias. Fire-and-forget: the response is dropped after
    /// its status is logged.
    pub async fn join_room(&self, room_alias: &str) -> Result<(), MatrixError> {
        let path = format!("join/{}", quote(room_alias));
        let resp = self
            .send(
                RequestOptions::post(path, serde_json::json!({}))
                    .prefix(ApiPrefix::R0)
                    .query("access_token", &self.config.access_token),
            )
            .await?;
        debug!(status = %resp.status(), room_alias, "join response discarded");
        Ok(())
    }

    /// Create a room whose alias localpart is derived from `alias_name`
    /// (`#foo:example.org` → `foo`).
    pub async fn create_room(&self, alias_name: &str) -> Result<Response, MatrixError> {
        let localpart = alias_localpart(alias_name)?;
        let content = serde_json::json!({ "room_alias_name": localpart });

        let body = if self.config.quirks.double_encoded_create_room {
            // Reference-client defect: the object was serialized once by the
            // caller and again by the post helper, so the wire payload is a
            // JSON string, not an object.
            Value::String(serde_json::to_string(&content)?)
        } else {
            content
        };

        self.send(
            RequestOptions::post("createRoom", body)
                .prefix(ApiPrefix::R0)
                .query("access_token", &self.config.access_token),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Quirks;

    fn client() -> MatrixClient {
        let config = ClientConfig::new("http://localhost:8008", "TOK").unwrap();
        MatrixClient::new(config, reqwest::Client::new())
    }

    #[test]
    fn build_url_joins_prefix_then_endpoint() {
        let url = client().build_url("createRoom", ApiPrefix::R0).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8008/_matrix/client/r0/createRoom"
        );
    }

    #[test]
    fn build_url_v1_prefix() {
        let url = client().build_url("events", ApiPrefix::V1).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8008/_matrix/client/api/v1/events"
        );
    }

    #[test]
    fn build_url_is_idempotent() {
        let c = client();
        let a = c.build_url("join/%23x%3Ay", ApiPrefix::R0).unwrap();
        let b = c.build_url("join/%23x%3Ay", ApiPrefix::R0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn encoded_alias_ends_the_path() {
        let c = client();
        let alias = "#general:example.org";
        let url = c
            .build_url(&format!("directory/room/{}", quote(alias)), ApiPrefix::R0)
            .unwrap();
        assert!(url.path().ends_with("%23general%3Aexample.org"));
    }

    #[test]
    fn quote_matches_urllib_defaults() {
        assert_eq!(quote("#room:host/x"), "%23room%3Ahost/x");
        assert_eq!(quote("m.room.message"), "m.room.message");
        assert_eq!(quote("!id:host"), "%21id%3Ahost");
    }

    #[test]
    fn txn_id_is_deterministic_for_a_fixed_clock() {
        assert_eq!(txn_id(1_700_000_000_123), txn_id(1_700_000_000_123));
        assert_eq!(txn_id(1_700_000_000_123), "1700000000123");
    }

    #[test]
    fn localpart_strips_sigil_and_server() {
        assert_eq!(alias_localpart("#foo:example.org").unwrap(), "foo");
        assert_eq!(alias_localpart("#foo").unwrap(), "foo");
    }

    #[test]
    fn localpart_rejects_degenerate_aliases() {
        assert!(matches!(
            alias_localpart("#"),
            Err(MatrixError::InvalidAlias(_))
        ));
        assert!(matches!(
            alias_localpart(":example.org"),
            Err(MatrixError::InvalidAlias(_))
        ));
        assert!(matches!(alias_localpart(""), Err(MatrixError::InvalidAlias(_))));
    }

    #[test]
    fn directory_path_honors_the_literal_quirk() {
        let fixed = client();
        assert_eq!(
            fixed.directory_path("#a:b"),
            "directory/room/%23a%3Ab"
        );

        let config = ClientConfig::new("http://localhost:8008", "TOK")
            .unwrap()
            .with_quirks(Quirks::upstream());
        let quirky = MatrixClient::new(config, reqwest::Client::new());
        assert_eq!(quirky.directory_path("#a:b"), "directory/room/{room_alias}");
    }
}

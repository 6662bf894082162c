use url::Url;

use crate::error::MatrixError;

/// Immutable per-client settings, supplied once at construction.
///
/// The base URL is an explicit field here rather than a shared constant, so
/// two clients can talk to two homeservers.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub access_token: String,
    pub quirks: Quirks,
}

impl ClientConfig {
    /// Parse `base_url` and pair it with a pre-obtained access token.
    /// Obtaining the token (login/registration) is out of scope here.
    pub fn new(base_url: &str, access_token: &str) -> Result<Self, MatrixError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            access_token: access_token.to_owned(),
            quirks: Quirks::default(),
        })
    }

    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }
}

/// Switches reproducing two defects of the reference client, for callers that
/// depend on the observed wire behavior rather than the intended one.
///
/// The defaults are the fixed behaviors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quirks {
    /// Send the room directory lookup with a literal `{room_alias}` path
    /// segment instead of interpolating the alias, as the reference client
    /// does.
    pub literal_directory_path: bool,

    /// Serialize the createRoom body twice, so the payload is a JSON string
    /// containing the serialized object rather than the object itself.
    pub double_encoded_create_room: bool,
}

impl Quirks {
    /// All reference-client defects preserved.
    pub fn upstream() -> Self {
        Self {
            literal_directory_path: true,
            double_encoded_create_room: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_fixed_behavior() {
        let q = Quirks::default();
        assert!(!q.literal_directory_path);
        assert!(!q.double_encoded_create_room);
    }

    #[test]
    fn upstream_preserves_both_defects() {
        let q = Quirks::upstream();
        assert!(q.literal_directory_path);
        assert!(q.double_encoded_create_room);
    }

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(matches!(
            ClientConfig::new("not a url", "TOK"),
            Err(MatrixError::Url(_))
        ));
    }
}

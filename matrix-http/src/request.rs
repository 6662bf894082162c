use reqwest::Method;
use serde_json::Value;

/// Which API namespace a path is resolved under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiPrefix {
    /// Legacy `_matrix/client/api/v1/` namespace. The default, matching the
    /// generic send helper's fallback.
    #[default]
    V1,
    /// `_matrix/client/r0/` namespace used by all the room endpoints.
    R0,
}

impl ApiPrefix {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiPrefix::V1 => "_matrix/client/api/v1/",
            ApiPrefix::R0 => "_matrix/client/r0/",
        }
    }
}

/// Everything a single request needs, named and passed by value. Replaces
/// opaque keyword forwarding into the transport: if a field isn't here, the
/// client doesn't support it.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub path: String,
    pub prefix: ApiPrefix,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    /// JSON body, serialized to bytes at send time. `None` sends no body.
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            prefix: ApiPrefix::default(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        let mut opts = Self::new(Method::POST, path);
        opts.body = Some(body);
        opts
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        let mut opts = Self::new(Method::PUT, path);
        opts.body = Some(body);
        opts
    }

    pub fn prefix(mut self, prefix: ApiPrefix) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_defaults_to_v1_with_no_body() {
        let opts = RequestOptions::get("events");
        assert_eq!(opts.method, Method::GET);
        assert_eq!(opts.prefix, ApiPrefix::V1);
        assert!(opts.body.is_none());
        assert!(opts.headers.is_empty());
        assert!(opts.query.is_empty());
    }

    #[test]
    fn builder_setters_accumulate() {
        let opts = RequestOptions::post("createRoom", serde_json::json!({}))
            .prefix(ApiPrefix::R0)
            .query("access_token", "TOK")
            .header("X-Debug", "1");
        assert_eq!(opts.prefix, ApiPrefix::R0);
        assert_eq!(opts.query, vec![("access_token".into(), "TOK".into())]);
        assert_eq!(opts.headers, vec![("X-Debug".into(), "1".into())]);
    }

    #[test]
    fn prefixes_end_with_slash() {
        // Url::join drops the final segment of a base that lacks the slash.
        assert!(ApiPrefix::V1.as_str().ends_with('/'));
        assert!(ApiPrefix::R0.as_str().ends_with('/'));
    }
}

//! Request/response shapes for the dispatcher-facing handlers.
//!
//! Handlers receive one decoded request and return one response; every
//! response carries the permissive cross-origin header set so the static
//! frontend can call the API directly.

use serde_json::{json, Value};

/// Inbound HTTP method marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Options,
}

impl std::str::FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "OPTIONS" => Ok(Method::Options),
            other => Err(format!("unsupported method: {other}")),
        }
    }
}

/// One inbound request as delivered by the external dispatcher.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn post(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body.into()),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn options(path: impl Into<String>) -> Self {
        Self {
            method: Method::Options,
            path: path.into(),
            body: None,
        }
    }
}

/// Cross-origin response policy.
#[derive(Debug, Clone)]
pub struct Cors {
    allow_origin: String,
}

impl Cors {
    /// Build from configured origins; multiple origins degrade to `*` since
    /// the response carries a single header value.
    pub fn from_origins(origins: &[String]) -> Self {
        let allow_origin = match origins {
            [single] => single.clone(),
            _ => "*".to_string(),
        };
        Self { allow_origin }
    }

    pub fn permissive() -> Self {
        Self {
            allow_origin: "*".into(),
        }
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            (
                "Access-Control-Allow-Origin".into(),
                self.allow_origin.clone(),
            ),
            ("Access-Control-Allow-Headers".into(), "Content-Type".into()),
            (
                "Access-Control-Allow-Methods".into(),
                "OPTIONS,POST,GET".into(),
            ),
        ]
    }
}

impl Default for Cors {
    fn default() -> Self {
        Self::permissive()
    }
}

/// One outbound response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Build a JSON response with cross-origin headers attached.
    pub fn json(status: u16, body: &Value, cors: &Cors) -> Self {
        Self {
            status,
            headers: cors.headers(),
            body: body.to_string(),
        }
    }

    /// Structured error body in the shared `{"error": …}` shape.
    pub fn error(status: u16, message: impl std::fmt::Display, cors: &Cors) -> Self {
        Self::json(status, &json!({ "error": message.to_string() }), cors)
    }

    /// Immediate preflight acknowledgement; bypasses validation and any
    /// external call.
    pub fn preflight(cors: &Cors) -> Self {
        Self::json(200, &json!({ "message": "CORS preflight OK" }), cors)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preflight_is_success_with_cors_headers() {
        let response = HttpResponse::preflight(&Cors::permissive());
        assert_eq!(response.status, 200);
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
        assert_eq!(
            response.header("access-control-allow-methods"),
            Some("OPTIONS,POST,GET")
        );
    }

    #[test]
    fn single_configured_origin_is_echoed() {
        let cors = Cors::from_origins(&["https://example.com".to_string()]);
        let response = HttpResponse::json(200, &json!({}), &cors);
        assert_eq!(
            response.header("Access-Control-Allow-Origin"),
            Some("https://example.com")
        );
    }

    #[test]
    fn multiple_origins_degrade_to_wildcard() {
        let cors = Cors::from_origins(&["https://a.com".into(), "https://b.com".into()]);
        let response = HttpResponse::json(200, &json!({}), &cors);
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
    }

    #[test]
    fn method_parsing_is_case_insensitive() {
        assert_eq!("options".parse::<Method>().unwrap(), Method::Options);
        assert!("PATCH".parse::<Method>().is_err());
    }
}

//! Inbound forward request models.

use std::fmt;
use std::str::FromStr;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// Methods the relay will forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// Whether a caller-supplied body is sent with this method.
    pub fn carries_body(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }

    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Patch => reqwest::Method::PATCH,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses an already-canonical (uppercase) method name.
impl FromStr for HttpMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or(())
    }
}

/// A JSON object of string values, kept in the order the caller wrote it.
///
/// Some APIs sign the query string, so parameters must not be reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedPairs(pub Vec<(String, String)>);

impl<'de> Deserialize<'de> for OrderedPairs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PairsVisitor;

        impl<'de> Visitor<'de> for PairsVisitor {
            type Value = OrderedPairs;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object with string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(pair) = map.next_entry::<String, String>()? {
                    pairs.push(pair);
                }
                Ok(OrderedPairs(pairs))
            }
        }

        deserializer.deserialize_map(PairsVisitor)
    }
}

/// Forward request exactly as the caller sent it, before validation.
///
/// Every field is optional here so that missing `method`/`url` surface as
/// field errors rather than as a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ForwardPayload {
    pub method: Option<String>,

    pub url: Option<String>,

    pub headers: Option<OrderedPairs>,

    /// Query parameters appended to the target URL, in caller order.
    pub params: Option<OrderedPairs>,

    /// Body to send; a JSON string is forwarded as raw text.
    pub body: Option<Value>,

    /// Caller's account identifier, used for attribution only.
    #[serde(alias = "userId")]
    pub identity: Option<String>,
}

/// A validated request, ready to forward.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub query_params: Vec<(String, String)>,
    pub body: Option<Value>,
    pub identity: Option<String>,
}

impl ProxyRequest {
    /// Start a request with no headers, params, body or identity.
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            query_params: Vec::new(),
            body: None,
            identity: None,
        }
    }

    /// The body that will actually go on the wire, if any.
    pub fn outbound_body(&self) -> Option<&Value> {
        if !self.method.carries_body() {
            return None;
        }
        match &self.body {
            None | Some(Value::Null) => None,
            Some(body) => Some(body),
        }
    }

    /// Whether the caller set a header, compared case-insensitively.
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

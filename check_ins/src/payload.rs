use crate::{Error, Result};
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use serde_json::{value::RawValue, Value};
use std::collections::HashMap;

/// Body field carrying the verb a form submission stands in for
pub const METHOD_FIELD: &str = "_method";
/// Header alternative to [`METHOD_FIELD`]
pub const METHOD_OVERRIDE_HEADER: &str = "x-http-method-override";

/// Keys the page form submits for its own bookkeeping. They are never
/// treated as record fields.
const TRANSPORT_FIELDS: &[&str] = &["check-in-id", "_token"];

/// A single submitted value after normalization. Strings are trimmed and an
/// empty string is read as `Null`, so a blank form input and an explicit
/// JSON `null` look the same to validation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Text(String),
    Number(f64),
    Bool(bool),
    /// A JSON array or object
    Composite,
}

impl FieldValue {
    fn text(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Self::Null
        } else {
            Self::Text(trimmed.to_string())
        }
    }

    fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::String(s) => Self::text(&s),
            Value::Number(n) => n.as_f64().map_or(Self::Composite, Self::Number),
            Value::Bool(b) => Self::Bool(b),
            Value::Array(_) | Value::Object(_) => Self::Composite,
        }
    }

    /// A JSON value that did not decode on its own. A number literal past
    /// the `f64` range reads as an infinite number.
    fn from_raw_json(raw: &RawValue) -> Self {
        match serde_json::from_str::<Value>(raw.get()) {
            Ok(value) => Self::from_json(value),
            Err(_) => raw.get().parse::<f64>().map_or(Self::Composite, Self::Number),
        }
    }
}

/// Request body for Create and Update, whatever the transport encoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    fields: HashMap<String, FieldValue>,
    method_override: Option<String>,
}

impl Payload {
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(Error::malformed("expected a JSON object"));
        };

        let mut payload = Self::default();
        for (key, value) in map {
            if key == METHOD_FIELD {
                payload.method_override = value.as_str().map(str::to_string);
            } else {
                payload.insert(key, FieldValue::from_json(value));
            }
        }
        Ok(payload)
    }

    /// Decode a JSON body. Out of range number literals fail `Value`
    /// decoding, so a body that does not decode as a whole is retried as an
    /// object of raw values and such fields are kept for validation to
    /// judge.
    pub fn from_json_slice(body: &[u8]) -> Result<Self> {
        let err = match serde_json::from_slice::<Value>(body) {
            Ok(value) => return Self::from_json(value),
            Err(err) => err,
        };
        let Ok(map) = serde_json::from_slice::<HashMap<String, Box<RawValue>>>(body) else {
            return Err(Error::malformed(err));
        };

        let mut payload = Self::default();
        for (key, raw) in map {
            if key == METHOD_FIELD {
                payload.method_override = serde_json::from_str::<String>(raw.get()).ok();
            } else {
                payload.insert(key, FieldValue::from_raw_json(&raw));
            }
        }
        Ok(payload)
    }

    fn insert(&mut self, key: String, value: FieldValue) {
        if !TRANSPORT_FIELDS.contains(&key.as_str()) {
            self.fields.insert(key, value);
        }
    }

    /// Build from form encoded pairs. When a key repeats the last value wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut payload = Self::default();
        for (key, value) in pairs {
            let key = key.into();
            if key == METHOD_FIELD {
                payload.method_override = Some(value.as_ref().trim().to_string());
            } else {
                payload.insert(key, FieldValue::text(value.as_ref()));
            }
        }
        payload
    }

    /// `None` when the key was not submitted at all, which is distinct
    /// from a submitted `null`.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn method_override(&self) -> Option<&str> {
        self.method_override.as_deref()
    }

    fn or_method_override(mut self, header: Option<String>) -> Self {
        if self.method_override.is_none() {
            self.method_override = header;
        }
        self
    }
}

#[async_trait]
impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_ascii_lowercase);
        let header_override = req
            .headers()
            .get(METHOD_OVERRIDE_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_string());

        let payload = match content_type.as_deref() {
            Some(ct) if ct.starts_with("application/json") => {
                let body = Bytes::from_request(req, state)
                    .await
                    .map_err(Error::malformed)?;
                if body.is_empty() {
                    Self::default()
                } else {
                    Self::from_json_slice(&body)?
                }
            }
            Some(ct) if ct.starts_with("multipart/form-data") => {
                let mut multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(Error::malformed)?;
                let mut pairs = Vec::new();
                while let Some(field) = multipart.next_field().await.map_err(Error::malformed)? {
                    let Some(name) = field.name().map(str::to_string) else {
                        continue;
                    };
                    let value = field.text().await.map_err(Error::malformed)?;
                    pairs.push((name, value));
                }
                Self::from_pairs(pairs)
            }
            Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(Error::malformed)?;
                Self::from_pairs(pairs)
            }
            None => {
                let body = Bytes::from_request(req, state)
                    .await
                    .map_err(Error::malformed)?;
                if !body.is_empty() {
                    return Err(Error::UnsupportedMediaType("none".to_string()));
                }
                Self::default()
            }
            Some(other) => return Err(Error::UnsupportedMediaType(other.to_string())),
        };

        Ok(payload.or_method_override(header_override))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde_json::json;

    #[test]
    fn json_strings_are_trimmed_and_blank_is_null() {
        let payload = Payload::from_json(json!({
            "description": "  coffee  ",
            "lat": "",
            "lng": null,
            "notes": "   ",
        }))
        .unwrap();

        assert_eq!(
            payload.get("description"),
            Some(&FieldValue::Text("coffee".to_string()))
        );
        assert_eq!(payload.get("lat"), Some(&FieldValue::Null));
        assert_eq!(payload.get("lng"), Some(&FieldValue::Null));
        assert_eq!(payload.get("notes"), Some(&FieldValue::Null));
        assert_eq!(payload.get("missing"), None);
    }

    #[test]
    fn json_non_object_is_malformed() {
        let err = Payload::from_json(json!(["description"])).unwrap_err();
        assert!(matches!(err, Error::MalformedPayload(_)));
    }

    #[test]
    fn json_keeps_value_kinds() {
        let payload = Payload::from_json(json!({
            "lat": 40.5,
            "lng": true,
            "notes": {"a": 1},
        }))
        .unwrap();

        assert_eq!(payload.get("lat"), Some(&FieldValue::Number(40.5)));
        assert_eq!(payload.get("lng"), Some(&FieldValue::Bool(true)));
        assert_eq!(payload.get("notes"), Some(&FieldValue::Composite));
    }

    #[test]
    fn form_pairs_strip_transport_fields() {
        let payload = Payload::from_pairs([
            ("_method", "PUT"),
            ("check-in-id", "12"),
            ("_token", "abc"),
            ("description", "lunch"),
        ]);

        assert_eq!(payload.method_override(), Some("PUT"));
        assert_eq!(payload.get("check-in-id"), None);
        assert_eq!(payload.get("_token"), None);
        assert_eq!(
            payload.get("description"),
            Some(&FieldValue::Text("lunch".to_string()))
        );
    }

    #[test]
    fn json_number_past_f64_range_is_infinite() {
        let body = br#"{"description":"x","lat":1e400,"lng":-1e400,"_method":"PUT"}"#;
        let payload = Payload::from_json_slice(body).unwrap();

        assert_eq!(payload.get("lat"), Some(&FieldValue::Number(f64::INFINITY)));
        assert_eq!(payload.get("lng"), Some(&FieldValue::Number(f64::NEG_INFINITY)));
        assert_eq!(
            payload.get("description"),
            Some(&FieldValue::Text("x".to_string()))
        );
        assert_eq!(payload.method_override(), Some("PUT"));
    }

    #[test]
    fn json_slice_still_rejects_broken_bodies() {
        for body in ["{\"description\": ", "[1e400]", "nope"] {
            let err = Payload::from_json_slice(body.as_bytes()).unwrap_err();
            assert!(matches!(err, Error::MalformedPayload(_)));
        }
    }

    #[tokio::test]
    async fn extracts_urlencoded_body_with_header_override() {
        let req = Request::builder()
            .method("POST")
            .uri("/check-ins/1")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(METHOD_OVERRIDE_HEADER, "patch")
            .body(Body::from("description=park&lat=1.5&lng="))
            .unwrap();

        let payload = Payload::from_request(req, &()).await.unwrap();

        assert_eq!(payload.method_override(), Some("patch"));
        assert_eq!(payload.get("lat"), Some(&FieldValue::Text("1.5".to_string())));
        assert_eq!(payload.get("lng"), Some(&FieldValue::Null));
    }

    #[tokio::test]
    async fn rejects_unsupported_content_type() {
        let req = Request::builder()
            .method("POST")
            .uri("/check-ins")
            .header(CONTENT_TYPE, "text/plain")
            .body(Body::from("description=park"))
            .unwrap();

        let err = Payload::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedMediaType(_)));
    }

    #[tokio::test]
    async fn rejects_broken_json() {
        let req = Request::builder()
            .method("POST")
            .uri("/check-ins")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{\"description\": "))
            .unwrap();

        let err = Payload::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, Error::MalformedPayload(_)));
    }

    #[tokio::test]
    async fn empty_body_without_content_type_is_empty_payload() {
        let req = Request::builder()
            .method("POST")
            .uri("/check-ins")
            .body(Body::empty())
            .unwrap();

        let payload = Payload::from_request(req, &()).await.unwrap();
        assert_eq!(payload, Payload::default());
    }
}

//! Inbound body decoding and validation.
//!
//! # Data Flow
//! ```text
//! Content-Type
//!     → BodyEncoding (form | multipart | json | 415)
//!     → RawConversionRequest (every field optional)
//!     → validate() → ConversionRequest
//! ```
//!
//! Framing failures (unreadable body, broken multipart, non-JSON bytes)
//! are unexpected faults and surface as 500. Missing or invalid values
//! are client faults and surface as 400.

use axum::{
    body::Body,
    extract::{FromRequest, Multipart},
    http::{header, Request},
    Form,
};
use serde_json::Value;

use crate::conversion::types::{
    ConversionError, ConversionRequest, ConversionResult, MeasurementSystem, MSG_INGREDIENTS_NOT_ARRAY,
    MSG_INVALID_INGREDIENTS_FIELD, MSG_MISSING_PARAMETERS, MSG_UNSUPPORTED_CONTENT_TYPE,
};

/// Supported body encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    UrlEncodedForm,
    Multipart,
    Json,
}

impl BodyEncoding {
    /// Pick the decoder for a `Content-Type` value.
    pub fn detect(content_type: &str) -> ConversionResult<Self> {
        if content_type.contains("application/x-www-form-urlencoded") {
            Ok(BodyEncoding::UrlEncodedForm)
        } else if content_type.contains("multipart/form-data") {
            Ok(BodyEncoding::Multipart)
        } else if content_type.contains("application/json") {
            Ok(BodyEncoding::Json)
        } else {
            Err(ConversionError::UnsupportedMediaType(MSG_UNSUPPORTED_CONTENT_TYPE.to_string()))
        }
    }
}

/// Decoded but not yet validated request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawConversionRequest {
    pub source_system: Option<String>,
    pub target_system: Option<String>,
    pub ingredients: Option<Value>,
}

impl RawConversionRequest {
    /// Build from form fields; `ingredients` carries a JSON array as text.
    pub fn from_form_fields(
        source_system: Option<String>,
        target_system: Option<String>,
        ingredients: Option<&str>,
    ) -> ConversionResult<Self> {
        let ingredients = ingredients
            .and_then(|text| serde_json::from_str::<Value>(text).ok())
            .ok_or_else(|| ConversionError::BadRequest(MSG_INVALID_INGREDIENTS_FIELD.to_string()))?;

        Ok(Self {
            source_system,
            target_system,
            ingredients: Some(ingredients),
        })
    }

    /// Build from a JSON document body.
    pub fn from_json(bytes: &[u8]) -> ConversionResult<Self> {
        let document: Value =
            serde_json::from_slice(bytes).map_err(|e| ConversionError::Internal(e.to_string()))?;
        let Value::Object(mut fields) = document else {
            return Err(ConversionError::Internal("request body must be a JSON object".to_string()));
        };

        Ok(Self {
            source_system: system_field(fields.remove("source_system")),
            target_system: system_field(fields.remove("target_system")),
            ingredients: fields.remove("ingredients"),
        })
    }

    /// Apply presence and domain checks.
    pub fn validate(self) -> ConversionResult<ConversionRequest> {
        let source = self.source_system.filter(|s| !s.is_empty());
        let target = self.target_system.filter(|s| !s.is_empty());
        let ingredients = match self.ingredients {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) if items.is_empty() => None,
            Some(other) => Some(other),
        };

        let (Some(source), Some(target), Some(ingredients)) = (source, target, ingredients) else {
            return Err(ConversionError::BadRequest(MSG_MISSING_PARAMETERS.to_string()));
        };

        let source_system: MeasurementSystem = source.parse()?;
        let target_system: MeasurementSystem = target.parse()?;

        let Value::Array(ingredients) = ingredients else {
            return Err(ConversionError::BadRequest(MSG_INGREDIENTS_NOT_ARRAY.to_string()));
        };

        Ok(ConversionRequest {
            source_system,
            target_system,
            ingredients,
        })
    }
}

// Non-string system values are kept as their JSON text so they fail the
// system check instead of looking absent.
fn system_field(value: Option<Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    }
}

// Repeated form fields keep their first occurrence.
fn first_value(pairs: &[(String, String)], name: &str) -> Option<String> {
    pairs.iter().find(|(key, _)| key == name).map(|(_, value)| value.clone())
}

/// Decode a POST request into a [`RawConversionRequest`].
pub async fn decode_request(request: Request<Body>, max_body_bytes: usize) -> ConversionResult<RawConversionRequest> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    match BodyEncoding::detect(&content_type)? {
        BodyEncoding::UrlEncodedForm => {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(request, &())
                .await
                .map_err(|e| ConversionError::Internal(e.body_text()))?;
            RawConversionRequest::from_form_fields(
                first_value(&pairs, "source_system"),
                first_value(&pairs, "target_system"),
                first_value(&pairs, "ingredients").as_deref(),
            )
        }
        BodyEncoding::Multipart => {
            let mut multipart = Multipart::from_request(request, &())
                .await
                .map_err(|e| ConversionError::Internal(e.body_text()))?;

            let mut source_system = None;
            let mut target_system = None;
            let mut ingredients = None;
            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(|e| ConversionError::Internal(e.body_text()))?
            {
                let name = field.name().map(str::to_owned);
                let text = field.text().await.map_err(|e| ConversionError::Internal(e.body_text()))?;
                match name.as_deref() {
                    Some("source_system") => source_system = source_system.or(Some(text)),
                    Some("target_system") => target_system = target_system.or(Some(text)),
                    Some("ingredients") => ingredients = ingredients.or(Some(text)),
                    _ => {}
                }
            }
            RawConversionRequest::from_form_fields(source_system, target_system, ingredients.as_deref())
        }
        BodyEncoding::Json => {
            let bytes = axum::body::to_bytes(request.into_body(), max_body_bytes)
                .await
                .map_err(|e| ConversionError::Internal(e.to_string()))?;
            RawConversionRequest::from_json(&bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bad_request(err: ConversionError) -> String {
        match err {
            ConversionError::BadRequest(msg) => msg,
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_detect_encoding() {
        assert_eq!(
            BodyEncoding::detect("application/x-www-form-urlencoded").unwrap(),
            BodyEncoding::UrlEncodedForm
        );
        assert_eq!(
            BodyEncoding::detect("multipart/form-data; boundary=xyz").unwrap(),
            BodyEncoding::Multipart
        );
        assert_eq!(
            BodyEncoding::detect("application/json; charset=utf-8").unwrap(),
            BodyEncoding::Json
        );
        assert!(matches!(
            BodyEncoding::detect("text/plain"),
            Err(ConversionError::UnsupportedMediaType(_))
        ));
        assert!(matches!(BodyEncoding::detect(""), Err(ConversionError::UnsupportedMediaType(_))));
    }

    #[test]
    fn test_json_body() {
        let raw = RawConversionRequest::from_json(
            br#"{"source_system":"metric","target_system":"imperial","ingredients":[{"name":"flour","amount":2,"unit":"cup"}]}"#,
        )
        .unwrap();
        let req = raw.validate().unwrap();
        assert_eq!(req.source_system, MeasurementSystem::Metric);
        assert_eq!(req.target_system, MeasurementSystem::Imperial);
        assert_eq!(req.ingredients.len(), 1);
    }

    #[test]
    fn test_json_body_not_json_is_internal() {
        assert!(matches!(
            RawConversionRequest::from_json(b"{nope"),
            Err(ConversionError::Internal(_))
        ));
        assert!(matches!(
            RawConversionRequest::from_json(b"[1, 2]"),
            Err(ConversionError::Internal(_))
        ));
    }

    #[test]
    fn test_missing_parameters() {
        for body in [
            json!({"target_system": "imperial", "ingredients": [{"name": "a", "amount": 1, "unit": "g"}]}),
            json!({"source_system": "metric", "ingredients": [{"name": "a", "amount": 1, "unit": "g"}]}),
            json!({"source_system": "metric", "target_system": "imperial"}),
            json!({"source_system": "metric", "target_system": "imperial", "ingredients": []}),
            json!({"source_system": "", "target_system": "imperial", "ingredients": [{}]}),
        ] {
            let raw = RawConversionRequest::from_json(body.to_string().as_bytes()).unwrap();
            assert_eq!(bad_request(raw.validate().unwrap_err()), MSG_MISSING_PARAMETERS);
        }
    }

    #[test]
    fn test_invalid_system() {
        for (source, target) in [(json!("metrico"), json!("imperial")), (json!("metric"), json!(5))] {
            let body = json!({"source_system": source, "target_system": target, "ingredients": [{}]});
            let raw = RawConversionRequest::from_json(body.to_string().as_bytes()).unwrap();
            assert_eq!(
                bad_request(raw.validate().unwrap_err()),
                crate::conversion::types::MSG_INVALID_SYSTEM
            );
        }
    }

    #[test]
    fn test_ingredients_must_be_array() {
        let body = json!({"source_system": "metric", "target_system": "imperial", "ingredients": {"name": "x"}});
        let raw = RawConversionRequest::from_json(body.to_string().as_bytes()).unwrap();
        assert_eq!(bad_request(raw.validate().unwrap_err()), MSG_INGREDIENTS_NOT_ARRAY);
    }

    #[test]
    fn test_form_fields() {
        let raw = RawConversionRequest::from_form_fields(
            Some("imperial".into()),
            Some("metric".into()),
            Some(r#"[{"name": "sugar", "amount": 0.5, "unit": "lb"}]"#),
        )
        .unwrap();
        let req = raw.validate().unwrap();
        assert_eq!(req.source_system, MeasurementSystem::Imperial);
        assert_eq!(req.ingredients[0]["unit"], "lb");
    }

    #[test]
    fn test_form_ingredients_not_json() {
        for ingredients in [Some("[{broken"), None] {
            let err =
                RawConversionRequest::from_form_fields(Some("metric".into()), Some("imperial".into()), ingredients)
                    .unwrap_err();
            assert_eq!(bad_request(err), MSG_INVALID_INGREDIENTS_FIELD);
        }
    }

    #[tokio::test]
    async fn test_decode_urlencoded_request() {
        let body = "source_system=metric&target_system=imperial&ingredients=%5B%7B%22name%22%3A%22flour%22%2C%22amount%22%3A2%2C%22unit%22%3A%22cup%22%7D%5D";
        let request = Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();

        let raw = decode_request(request, 1024).await.unwrap();
        assert_eq!(raw.source_system.as_deref(), Some("metric"));
        assert_eq!(raw.ingredients, Some(json!([{"name": "flour", "amount": 2, "unit": "cup"}])));
    }

    #[tokio::test]
    async fn test_decode_urlencoded_repeated_fields_keep_first() {
        let body = "source_system=metric&target_system=imperial&source_system=imperial&ingredients=%5B%5D&ingredients=%7B%7D";
        let request = Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();

        let raw = decode_request(request, 1024).await.unwrap();
        assert_eq!(raw.source_system.as_deref(), Some("metric"));
        assert_eq!(raw.target_system.as_deref(), Some("imperial"));
        assert_eq!(raw.ingredients, Some(json!([])));
    }

    #[tokio::test]
    async fn test_decode_multipart_request() {
        let body = concat!(
            "--XYZ\r\n",
            "Content-Disposition: form-data; name=\"source_system\"\r\n\r\n",
            "metric\r\n",
            "--XYZ\r\n",
            "Content-Disposition: form-data; name=\"target_system\"\r\n\r\n",
            "imperial\r\n",
            "--XYZ\r\n",
            "Content-Disposition: form-data; name=\"ingredients\"\r\n\r\n",
            "[{\"name\": \"flour\", \"amount\": 2, \"unit\": \"cup\"}]\r\n",
            "--XYZ--\r\n",
        );
        let request = Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XYZ")
            .body(Body::from(body))
            .unwrap();

        let req = decode_request(request, 4096).await.unwrap().validate().unwrap();
        assert_eq!(req.target_system, MeasurementSystem::Imperial);
        assert_eq!(req.ingredients[0]["name"], "flour");
    }

    #[tokio::test]
    async fn test_decode_unsupported() {
        let request = Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("hello"))
            .unwrap();
        assert!(matches!(
            decode_request(request, 1024).await,
            Err(ConversionError::UnsupportedMediaType(_))
        ));
    }
}

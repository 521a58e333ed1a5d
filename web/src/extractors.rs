//! Custom Axum extractors.
//!
//! - `CorrelationId`: the request's correlation ID (set by the middleware, or read from the header)
//! - `WantsJson`: whether the caller is a programmatic client (see [`wants_json`])
//! - `JsonOrForm<T>`: a body decoded as JSON or as an urlencoded form, by `Content-Type`
//!
//! # Examples
//!
//! ```ignore
//! async fn create_order(
//!     correlation_id: CorrelationId,
//!     WantsJson(json): WantsJson,
//!     JsonOrForm(body): JsonOrForm<CreateOrderBody>,
//! ) -> Result<Json<CreateOrderResponse>, AppError> {
//!     tracing::info!(correlation_id = %correlation_id.0, json, "Creating order");
//!     ...
//! }
//! ```

use crate::error::AppError;
use crate::middleware::CORRELATION_ID_HEADER;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap},
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Correlation ID for request tracing.
///
/// Uses the ID stored by [`correlation_id_layer`](crate::middleware::correlation_id_layer)
/// when the layer is installed, otherwise parses `X-Correlation-ID` or generates a new v4 UUID.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<Uuid>() {
            return Ok(Self(*id));
        }

        let correlation_id = parts
            .headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(correlation_id))
    }
}

/// Does the request come from a programmatic client?
///
/// True when any of these hold:
/// - `Accept` mentions `json`
/// - `Content-Type` is `application/json`
/// - `X-Requested-With: XMLHttpRequest` (fetch/XHR from a page)
///
/// Browsers navigating to a page send none of these, so they get redirects
/// instead of JSON errors.
#[must_use]
pub fn wants_json(headers: &HeaderMap) -> bool {
    let accept_json = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("json"));

    let xhr = headers
        .get("X-Requested-With")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"));

    accept_json || xhr || content_type_is_json(headers)
}

fn content_type_is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

/// Content-negotiation signal, see [`wants_json`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WantsJson(pub bool);

#[async_trait]
impl<S> FromRequestParts<S> for WantsJson
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(wants_json(&parts.headers)))
    }
}

/// Request body accepted either as JSON or as `application/x-www-form-urlencoded`.
///
/// A JSON `Content-Type` selects JSON; anything else (including no body at all)
/// is decoded as a form, so an empty body deserializes to a struct of `None`s.
#[derive(Debug, Clone)]
pub struct JsonOrForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = content_type_is_json(req.headers());

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        if is_json {
            serde_json::from_slice(&bytes)
                .map(Self)
                .map_err(|e| AppError::bad_request(format!("Invalid JSON body: {e}")))
        } else {
            serde_urlencoded::from_bytes(&bytes)
                .map(Self)
                .map_err(|e| AppError::bad_request(format!("Invalid form body: {e}")))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct OrderBody {
        title: Option<String>,
        price: Option<f64>,
    }

    #[tokio::test]
    async fn test_correlation_id_from_header() {
        let uuid = Uuid::new_v4();
        let req = Request::builder()
            .header(CORRELATION_ID_HEADER, uuid.to_string())
            .body(())
            .expect("Valid request");

        let (mut parts, _) = req.into_parts();
        let correlation_id = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(correlation_id.0, uuid);
    }

    #[tokio::test]
    async fn test_correlation_id_prefers_extension() {
        let from_layer = Uuid::new_v4();
        let mut req = Request::builder()
            .header(CORRELATION_ID_HEADER, Uuid::new_v4().to_string())
            .body(())
            .expect("Valid request");
        req.extensions_mut().insert(from_layer);

        let (mut parts, _) = req.into_parts();
        let correlation_id = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(correlation_id.0, from_layer);
    }

    #[test]
    fn test_wants_json_signals() {
        let mut headers = HeaderMap::new();
        assert!(!wants_json(&headers));

        headers.insert(header::ACCEPT, "text/html".parse().unwrap());
        assert!(!wants_json(&headers));

        headers.insert(header::ACCEPT, "application/json, text/plain".parse().unwrap());
        assert!(wants_json(&headers));

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            "application/json; charset=utf-8".parse().unwrap(),
        );
        assert!(wants_json(&headers));

        let mut headers = HeaderMap::new();
        headers.insert("X-Requested-With", "XMLHttpRequest".parse().unwrap());
        assert!(wants_json(&headers));
    }

    #[tokio::test]
    async fn test_json_or_form_decodes_json() {
        let req = Request::builder()
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"title":"Mug","price":12.5}"#))
            .unwrap();

        let JsonOrForm(body) = JsonOrForm::<OrderBody>::from_request(req, &()).await.unwrap();

        assert_eq!(
            body,
            OrderBody {
                title: Some("Mug".to_string()),
                price: Some(12.5)
            }
        );
    }

    #[tokio::test]
    async fn test_json_or_form_decodes_form() {
        let req = Request::builder()
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("title=Blue+Mug"))
            .unwrap();

        let JsonOrForm(body) = JsonOrForm::<OrderBody>::from_request(req, &()).await.unwrap();

        assert_eq!(body.title.as_deref(), Some("Blue Mug"));
        assert_eq!(body.price, None);
    }

    #[tokio::test]
    async fn test_json_or_form_empty_body() {
        let req = Request::builder().body(Body::empty()).unwrap();

        let JsonOrForm(body) = JsonOrForm::<OrderBody>::from_request(req, &()).await.unwrap();

        assert_eq!(body, OrderBody { title: None, price: None });
    }

    #[tokio::test]
    async fn test_json_or_form_rejects_bad_json() {
        let req = Request::builder()
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let err = JsonOrForm::<OrderBody>::from_request(req, &()).await.unwrap_err();

        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }
}

//! Extractors that validate input before a handler body runs.
//!
//! Both reject with [`AppError::Validation`], so malformed requests never
//! reach application code.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use validator::{Validate, ValidationErrors};

use crate::error::AppError;

/// JSON body deserialized into `T` and checked with [`Validate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

/// Path parameters deserialized into `T` and checked with [`Validate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedPath<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            AppError::validation(
                vec![json!({ "location": "body", "error": rejection.body_text() })],
                "request body is invalid",
            )
        })?;

        value
            .validate()
            .map_err(|errors| AppError::validation(field_details("body", &errors), "request body is invalid"))?;

        Ok(Self(value))
    }
}

impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::validation(
                    vec![json!({ "location": "path", "error": rejection.body_text() })],
                    "path parameters are invalid",
                )
            })?;

        value.validate().map_err(|errors| {
            AppError::validation(field_details("path", &errors), "path parameters are invalid")
        })?;

        Ok(Self(value))
    }
}

/// Flatten validator output into `{location, field, error}` entries, sorted by field.
fn field_details(location: &str, errors: &ValidationErrors) -> Vec<serde_json::Value> {
    let mut entries: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors
                .iter()
                .map(move |error| (field.to_string(), error.code.to_string()))
        })
        .collect();
    entries.sort();

    entries
        .into_iter()
        .map(|(field, code)| json!({ "location": location, "field": field, "error": code }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Method, StatusCode},
        routing::{get, post},
        Router,
    };
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct Probe {
        #[validate(length(min = 1))]
        name: String,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Slot {
        #[validate(range(min = 1, max = 9))]
        slot: u8,
    }

    fn app() -> Router {
        Router::new()
            .route(
                "/probe",
                post(|ValidatedJson(probe): ValidatedJson<Probe>| async move { probe.name }),
            )
            .route(
                "/slots/{slot}",
                get(|ValidatedPath(slot): ValidatedPath<Slot>| async move { slot.slot.to_string() }),
            )
    }

    async fn send(request: axum::http::Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    fn post_json(uri: &str, body: &str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn valid_body_reaches_handler() {
        let response = app().oneshot(post_json("/probe", r#"{"name":"ok"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn failed_rule_reports_field() {
        let (status, json) = send(post_json("/probe", r#"{"name":""}"#)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["details"][0]["field"], "name");
        assert_eq!(json["error"]["details"][0]["error"], "length");
    }

    #[tokio::test]
    async fn undeserializable_body_is_a_validation_error() {
        let (status, json) = send(post_json("/probe", r#"{}"#)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["details"][0]["location"], "body");
    }

    #[tokio::test]
    async fn path_rules_are_checked() {
        let request = axum::http::Request::builder()
            .uri("/slots/12")
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["details"][0]["field"], "slot");
    }
}

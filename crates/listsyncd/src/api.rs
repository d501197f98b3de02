//! Routes, handlers, and the error envelope
//!
//! Success responses are `200` with the entity's local view. Every failure
//! uses the envelope
//! `{success, status, response_code, message, errors}` with the status code
//! taken from the core error taxonomy's total mapping.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde::Serialize;
use serde_json::{Value, json};
use uuid::Uuid;

use listsync_core::{Error, ListPatch, MemberPatch, SyncEngine};

/// Build the HTTP router over a wired engine
pub fn router(engine: Arc<SyncEngine>) -> Router {
    Router::new()
        .route("/lists", post(create_list))
        .route(
            "/lists/:list_id",
            get(show_list).put(update_list).delete(remove_list),
        )
        .route("/lists/:list_id/members", post(create_member))
        .route(
            "/lists/:list_id/members/:member_id",
            get(show_member).put(update_member).delete(remove_member),
        )
        .with_state(engine)
}

/// Error envelope returned for every non-200 response
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    success: bool,
    status: u16,
    response_code: &'static str,
    message: String,
    errors: Value,
}

impl ErrorEnvelope {
    fn new(status: u16, message: String, errors: Value) -> Self {
        let response_code = match status {
            404 => "HTTP_NOT_FOUND",
            422 => "HTTP_UNPROCESSABLE_ENTITY",
            _ => "HTTP_INTERNAL_SERVER_ERROR",
        };
        Self {
            success: false,
            status,
            response_code,
            message,
            errors,
        }
    }

    /// Envelope for a request body that failed to decode
    fn undecodable(message: String) -> Self {
        Self::new(422, message, json!({}))
    }
}

impl From<Error> for ErrorEnvelope {
    fn from(err: Error) -> Self {
        let status = err.http_status();
        match &err {
            Error::Validation(violations) => Self::new(
                status,
                "Unprocessable Entity".to_string(),
                serde_json::to_value(violations).unwrap_or_else(|_| json!({})),
            ),
            _ => Self::new(status, err.to_string(), json!({})),
        }
    }
}

impl IntoResponse for ErrorEnvelope {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(serde_json::to_value(&self).unwrap_or(Value::Null))).into_response()
    }
}

/// Decode a request body into a patch, ignoring unknown keys
fn decode<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, ErrorEnvelope> {
    serde_json::from_value(body).map_err(|e| ErrorEnvelope::undecodable(e.to_string()))
}

// Ids in the URL are opaque strings to the caller. One that is not a stored
// identity resolves to "not found", whether or not it parses as a UUID.

fn parse_list_id(raw: &str) -> Result<Uuid, ErrorEnvelope> {
    raw.parse()
        .map_err(|_| ErrorEnvelope::from(Error::list_not_found(raw)))
}

fn parse_member_id(raw: &str) -> Result<Uuid, ErrorEnvelope> {
    raw.parse()
        .map_err(|_| ErrorEnvelope::from(Error::member_not_found(raw)))
}

// ---- list handlers ----

async fn create_list(
    State(engine): State<Arc<SyncEngine>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ErrorEnvelope> {
    let patch: ListPatch = decode(body)?;
    let list = engine.create_list(patch).await?;
    Ok(Json(list.local_view()))
}

async fn show_list(
    State(engine): State<Arc<SyncEngine>>,
    Path(list_id): Path<String>,
) -> Result<Json<Value>, ErrorEnvelope> {
    let list = engine.show_list(parse_list_id(&list_id)?).await?;
    Ok(Json(list.local_view()))
}

async fn update_list(
    State(engine): State<Arc<SyncEngine>>,
    Path(list_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ErrorEnvelope> {
    let list_id = parse_list_id(&list_id)?;
    let patch: ListPatch = decode(body)?;
    let list = engine.update_list(list_id, patch).await?;
    Ok(Json(list.local_view()))
}

async fn remove_list(
    State(engine): State<Arc<SyncEngine>>,
    Path(list_id): Path<String>,
) -> Result<Json<Value>, ErrorEnvelope> {
    engine.remove_list(parse_list_id(&list_id)?).await?;
    Ok(Json(json!({})))
}

// ---- member handlers ----

async fn create_member(
    State(engine): State<Arc<SyncEngine>>,
    Path(list_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ErrorEnvelope> {
    let list_id = parse_list_id(&list_id)?;
    let patch: MemberPatch = decode(body)?;
    let member = engine.create_member(list_id, patch).await?;
    Ok(Json(member.local_view()))
}

async fn show_member(
    State(engine): State<Arc<SyncEngine>>,
    Path((list_id, member_id)): Path<(String, String)>,
) -> Result<Json<Value>, ErrorEnvelope> {
    let member = engine
        .show_member(parse_list_id(&list_id)?, parse_member_id(&member_id)?)
        .await?;
    Ok(Json(member.local_view()))
}

async fn update_member(
    State(engine): State<Arc<SyncEngine>>,
    Path((list_id, member_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ErrorEnvelope> {
    let list_id = parse_list_id(&list_id)?;
    let member_id = parse_member_id(&member_id)?;
    let patch: MemberPatch = decode(body)?;
    let member = engine.update_member(list_id, member_id, patch).await?;
    Ok(Json(member.local_view()))
}

async fn remove_member(
    State(engine): State<Arc<SyncEngine>>,
    Path((list_id, member_id)): Path<(String, String)>,
) -> Result<Json<Value>, ErrorEnvelope> {
    engine
        .remove_member(parse_list_id(&list_id)?, parse_member_id(&member_id)?)
        .await?;
    Ok(Json(json!({})))
}

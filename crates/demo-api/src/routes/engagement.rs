//! Engagement demo routes
//!
//! Every call is scoped to the visitor named by the `X-Visitor-Id` header.

use crate::error::ApiError;
use crate::visitor::Visitor;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use demo_core::engagement::{ActionFailure, ActionReport};
use demo_core::Notification;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub external_id: String,
}

#[derive(Deserialize)]
pub struct TagRequest {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Serialize)]
pub struct TagsResponse {
    pub tags: BTreeMap<String, String>,
}

type ReportResponse = (StatusCode, Json<Notification>);

fn into_response(report: ActionReport) -> ReportResponse {
    let status = match report.failure {
        None => StatusCode::OK,
        Some(ActionFailure::Validation) => StatusCode::BAD_REQUEST,
        Some(ActionFailure::Client) => StatusCode::BAD_GATEWAY,
    };

    (status, Json(report.notification))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Visitor(visitor): Visitor,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ReportResponse, ApiError> {
    let Json(payload) = payload?;
    let actions = state.engagement.for_visitor(&visitor).await;
    Ok(into_response(actions.login(&payload.external_id).await))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    Visitor(visitor): Visitor,
) -> ReportResponse {
    let actions = state.engagement.for_visitor(&visitor).await;
    into_response(actions.logout().await)
}

pub async fn modify_tag(
    State(state): State<Arc<AppState>>,
    Visitor(visitor): Visitor,
    payload: Result<Json<TagRequest>, JsonRejection>,
) -> Result<ReportResponse, ApiError> {
    let Json(payload) = payload?;
    let actions = state.engagement.for_visitor(&visitor).await;
    Ok(into_response(
        actions.modify_tag(&payload.key, &payload.value).await,
    ))
}

pub async fn get_tags(
    State(state): State<Arc<AppState>>,
    Visitor(visitor): Visitor,
) -> Result<Json<TagsResponse>, ReportResponse> {
    state
        .engagement
        .for_visitor(&visitor)
        .await
        .view_tags()
        .await
        .map(|tags| Json(TagsResponse { tags }))
        .map_err(into_response)
}

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use super::{
    error::ApiError,
    response::{success, ApiResponse},
};
use crate::{
    auth::AuthBearer,
    domain::{NotificationService, NotificationSetting, NotificationSettingUpdate},
    notification::previous_day,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route(
            "/notification-settings",
            get(get_notification_settings).put(update_notification_settings),
        )
        .route("/notifications/due", get(notification_due))
        .route("/notifications/preview", get(preview_notification))
        .route("/notifications/run", post(run_notification))
}

pub async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}

/// Settings as shown to clients; the API key itself never leaves the server.
#[derive(Debug, Serialize)]
pub struct NotificationSettingView {
    pub notification_service: Option<NotificationService>,
    pub api_key_set: bool,
    pub next_notification: Option<NaiveDate>,
}

impl From<NotificationSetting> for NotificationSettingView {
    fn from(s: NotificationSetting) -> Self {
        Self {
            notification_service: s.notification_service,
            api_key_set: !s.api_key.is_empty(),
            next_notification: s.next_notification,
        }
    }
}

pub async fn get_notification_settings(
    State(st): State<AppState>,
    _auth: AuthBearer,
) -> Result<ApiResponse<NotificationSettingView>, ApiError> {
    let settings = st.db.notification_settings().get_solo().await?;
    Ok(success(settings.into()))
}

pub async fn update_notification_settings(
    State(st): State<AppState>,
    _auth: AuthBearer,
    Json(update): Json<NotificationSettingUpdate>,
) -> Result<ApiResponse<NotificationSettingView>, ApiError> {
    update.validate()?;

    let repo = st.db.notification_settings();
    let mut settings = repo.get_solo().await?;
    update.apply_to(&mut settings);
    repo.save(&settings).await?;

    info!(service = ?settings.notification_service, "Notification settings updated");
    Ok(success(settings.into()))
}

#[derive(Debug, Serialize)]
pub struct DueResponse {
    pub due: bool,
}

pub async fn notification_due(
    State(st): State<AppState>,
    _auth: AuthBearer,
) -> Result<ApiResponse<DueResponse>, ApiError> {
    let due = st.notifier.should_notify().await?;
    Ok(success(DueResponse { due }))
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub day: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub day: NaiveDate,
    pub message: String,
}

pub async fn preview_notification(
    State(st): State<AppState>,
    _auth: AuthBearer,
    Query(q): Query<PreviewQuery>,
) -> Result<ApiResponse<PreviewResponse>, ApiError> {
    let day = q
        .day
        .unwrap_or_else(|| previous_day(st.notifier.now()));

    let stats = st
        .db
        .day_statistics()
        .find_by_day(day)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("day statistics for {day}")))?;

    let message = st.notifier.create_notification_message(day, &stats).await?;
    Ok(success(PreviewResponse { day, message }))
}

#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub sent: bool,
}

/// Entry point for the external daily trigger.
pub async fn run_notification(
    State(st): State<AppState>,
    _auth: AuthBearer,
) -> Result<ApiResponse<RunResponse>, ApiError> {
    let sent = st.notifier.notify().await?;
    Ok(success(RunResponse { sent }))
}

//! HTTP request handlers.

use super::types::{
    iso_timestamp, ApiResponse, AutoReplyRequest, AutoReplyStatus, HealthResponse, SendData,
    SendMessageRequest, SendOtpRequest,
};
use super::AppState;
use crate::error::{ApiError, GatewayError};
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::Utc;
use tracing::{error, info};
use whatsapp_client::ClientInfo;

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Unwrap a JSON body, reporting malformed input in the API's error shape.
fn body<T>(payload: Result<Json<T>, JsonRejection>, failure: &'static str) -> Result<T, ApiError> {
    payload
        .map(|Json(request)| request)
        .map_err(|e| GatewayError::Validation(e.body_text()).during(failure))
}

fn report(err: GatewayError, failure: &'static str) -> ApiError {
    if err.status_code().is_server_error() {
        error!("{}: {}", failure, err);
    }
    err.during(failure)
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let ready = state.readiness.status().ready;

    Json(HealthResponse {
        success: true,
        status: if ready { "ready" } else { "not_ready" }.to_string(),
        message: if ready {
            "WhatsApp client is ready"
        } else {
            "WhatsApp client is not ready. Please scan QR code."
        }
        .to_string(),
    })
}

/// Send an arbitrary text message.
pub async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> ApiResult<SendData> {
    const FAILURE: &str = "Failed to send message";
    let request = body(payload, FAILURE)?;
    info!(phone_number = %request.phone_number, "Sending message");

    let receipt = state
        .dispatcher
        .send(&request.phone_number, &request.message)
        .await
        .map_err(|e| report(e, FAILURE))?;

    Ok(Json(ApiResponse::success(
        "Message sent successfully",
        SendData::new(receipt, request.phone_number),
    )))
}

/// Send the configured OTP text.
pub async fn send_otp(
    State(state): State<AppState>,
    payload: Result<Json<SendOtpRequest>, JsonRejection>,
) -> ApiResult<SendData> {
    const FAILURE: &str = "Failed to send OTP";
    let request = body(payload, FAILURE)?;
    info!(phone_number = %request.phone_number, "Sending OTP");

    let receipt = state
        .dispatcher
        .send_otp(&request.phone_number)
        .await
        .map_err(|e| report(e, FAILURE))?;

    Ok(Json(ApiResponse::success(
        "OTP sent successfully",
        SendData::new(receipt, request.phone_number),
    )))
}

/// Send a chat message to a number that must have a WhatsApp account.
pub async fn send_chat(
    State(state): State<AppState>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> ApiResult<SendData> {
    const FAILURE: &str = "Failed to send chat";
    let request = body(payload, FAILURE)?;
    info!(phone_number = %request.phone_number, "Sending chat");

    let receipt = state
        .dispatcher
        .send(&request.phone_number, &request.message)
        .await
        .map_err(|e| report(e, FAILURE))?;

    Ok(Json(ApiResponse::success(
        "Chat sent successfully",
        SendData::new(receipt, request.phone_number),
    )))
}

/// Details of the paired account.
pub async fn client_info(State(state): State<AppState>) -> ApiResult<ClientInfo> {
    let info = state
        .dispatcher
        .client_info()
        .await
        .map_err(|e| report(e, "Failed to get client info"))?;

    Ok(Json(ApiResponse::success("Client info retrieved", info)))
}

/// Current auto-reply setting.
pub async fn get_auto_reply(State(state): State<AppState>) -> Json<ApiResponse<AutoReplyStatus>> {
    Json(ApiResponse::success(
        "Auto-reply status retrieved",
        auto_reply_status(&state),
    ))
}

/// Enable or disable auto-reply for inbound messages.
pub async fn set_auto_reply(
    State(state): State<AppState>,
    payload: Result<Json<AutoReplyRequest>, JsonRejection>,
) -> ApiResult<AutoReplyStatus> {
    let request = body(payload, "Failed to update auto-reply")?;
    state.readiness.set_auto_reply(request.enabled);

    let message = if request.enabled {
        "Auto-reply enabled"
    } else {
        "Auto-reply disabled"
    };
    Ok(Json(ApiResponse::success(message, auto_reply_status(&state))))
}

fn auto_reply_status(state: &AppState) -> AutoReplyStatus {
    AutoReplyStatus {
        auto_reply_enabled: state.readiness.status().auto_reply_enabled,
        timestamp: iso_timestamp(Utc::now()),
    }
}

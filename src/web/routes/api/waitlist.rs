use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use strum_macros::AsRefStr;
use tracing::info;

use crate::{
    model::StoreError,
    web::{
        self,
        types::{
            CountResponse, DeserWaitlistEntry, SubmitResponse, ValidWaitlistEntry,
            ValidationErrors,
        },
        ClientError, WebResult,
    },
    AppState,
};

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum WaitlistError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("email is already on the waitlist")]
    AlreadyRegistered,

    #[error("failed to store waitlist entry: {0}")]
    Join(StoreError),

    #[error("failed to count waitlist entries: {0}")]
    Count(StoreError),
}

impl WaitlistError {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        match self {
            WaitlistError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ClientError::InvalidInput(errors.violations()),
            ),
            WaitlistError::AlreadyRegistered => (StatusCode::CONFLICT, ClientError::AlreadyRegistered),
            WaitlistError::Join(er) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ClientError::ServiceError {
                    message: "Failed to join waitlist",
                    detail: er.to_string(),
                },
            ),
            WaitlistError::Count(er) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ClientError::ServiceError {
                    message: "Failed to get count",
                    detail: er.to_string(),
                },
            ),
        }
    }
}

// ###################################
// ->   API
// ###################################

/// `POST /waitlist`
///
/// Validates and stores the entry, then tries to send a confirmation email.
/// The outcome of the email is reported in `emailSent` and never fails the request.
/// An email that is already on the waitlist is answered with `409 CONFLICT`.
#[tracing::instrument(name = "Adding a new waitlist entry", skip(app_state, payload))]
pub async fn waitlist_submit(
    State(app_state): State<AppState>,
    payload: Result<Json<DeserWaitlistEntry>, JsonRejection>,
) -> WebResult<(StatusCode, Json<SubmitResponse>)> {
    let Json(entry) = payload.map_err(|rejection| web::Error::InvalidBody(rejection.body_text()))?;
    let entry = ValidWaitlistEntry::try_from(entry).map_err(WaitlistError::Validation)?;

    let stored = match app_state.store.add_entry(&entry).await {
        Ok(stored) => stored,
        Err(StoreError::DuplicateKey) => {
            info!("Email already registered, nothing stored");
            return Err(WaitlistError::AlreadyRegistered.into());
        }
        Err(er) => return Err(WaitlistError::Join(er).into()),
    };

    let email_sent = app_state.notifier.notify(&entry.name, &entry.email).await;

    info!(entry_id = %stored.id, email_sent, "Waitlist entry created");

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            success: true,
            data: stored,
            email_sent,
        }),
    ))
}

/// `GET /waitlist/count`
#[tracing::instrument(name = "Counting waitlist entries", skip(app_state))]
pub async fn waitlist_count(State(app_state): State<AppState>) -> WebResult<Json<CountResponse>> {
    let count = app_state
        .store
        .count_entries()
        .await
        .map_err(WaitlistError::Count)?;

    Ok(Json(CountResponse { count }))
}

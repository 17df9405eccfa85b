use chrono::NaiveDateTime;

use super::{repository::CancelRepository, utils::time_until_label};
use crate::api::{ApiClient, ApiError, AppointmentCheck, AppointmentStatus};

pub const ALREADY_CANCELLED: &str = "This appointment has already been cancelled.";
pub const OUTSIDE_WINDOW: &str =
    "Appointments can only be cancelled up to 2 hours before the scheduled time.";
pub const CANCELLED: &str =
    "Your appointment has been successfully cancelled. A confirmation email has been sent to you.";

/// What the cancel page shows after the link check.
#[derive(Debug, Clone, PartialEq)]
pub enum CancelState {
    Loading,
    Cancellable(AppointmentCheck),
    AlreadyCancelled(AppointmentCheck),
    TooLate(AppointmentCheck),
    Cancelled,
    Failed(String),
}

#[derive(Debug)]
pub struct CancelViewModel {
    repository: CancelRepository,
    token: String,
    state: CancelState,
    error: Option<String>,
}

impl CancelViewModel {
    pub fn new(api: ApiClient, token: impl Into<String>) -> Self {
        Self {
            repository: CancelRepository::new(api),
            token: token.into(),
            state: CancelState::Loading,
            error: None,
        }
    }

    pub fn state(&self) -> &CancelState {
        &self.state
    }

    /// Error of the last cancel attempt; the appointment stays on screen.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn appointment(&self) -> Option<&AppointmentCheck> {
        match &self.state {
            CancelState::Cancellable(check)
            | CancelState::AlreadyCancelled(check)
            | CancelState::TooLate(check) => Some(check),
            _ => None,
        }
    }

    pub fn time_until(&self, now: NaiveDateTime) -> Option<String> {
        self.appointment()
            .map(|check| time_until_label(check.appointment_datetime, now))
    }

    pub async fn check(&mut self) -> &CancelState {
        self.error = None;
        self.state = match self.repository.check(&self.token).await {
            Ok(check) if check.status == AppointmentStatus::Cancelled => {
                CancelState::AlreadyCancelled(check)
            }
            Ok(check) if !check.can_cancel => CancelState::TooLate(check),
            Ok(check) => CancelState::Cancellable(check),
            Err(err) => {
                log::warn!("Cancel link check failed: {}", err);
                CancelState::Failed(failure_message(&err, "Failed to load appointment details"))
            }
        };
        &self.state
    }

    /// Only sent when the last check said the appointment can be cancelled.
    pub async fn cancel(&mut self) -> Result<(), ApiError> {
        let refusal = match &self.state {
            CancelState::Cancellable(_) => None,
            CancelState::AlreadyCancelled(_) => Some(ALREADY_CANCELLED),
            CancelState::TooLate(_) => Some(OUTSIDE_WINDOW),
            _ => Some("Check the appointment before cancelling it"),
        };
        if let Some(reason) = refusal {
            return Err(ApiError::Rejected(reason.into()));
        }
        match self.repository.cancel(&self.token).await {
            Ok(response) => {
                log::info!("Appointment {:?} cancelled by client", response.appointment_id);
                self.error = None;
                self.state = CancelState::Cancelled;
                Ok(())
            }
            Err(err) => {
                log::warn!("Cancel failed: {}", err);
                self.error = Some(failure_message(&err, "Failed to cancel appointment"));
                Err(err)
            }
        }
    }
}

fn failure_message(err: &ApiError, fallback: &str) -> String {
    match err {
        ApiError::Validation(msg) | ApiError::Rejected(msg) | ApiError::NotFound(msg) => {
            msg.clone()
        }
        _ => fallback.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state::session::SessionStore, test_support::helpers::at};
    use httpmock::prelude::*;
    use serde_json::json;

    fn view_model(server: &MockServer) -> CancelViewModel {
        CancelViewModel::new(
            ApiClient::new_with_base_url(server.url("/api"), SessionStore::in_memory()),
            "tok",
        )
    }

    async fn mock_check(server: &MockServer, status: &str, can_cancel: bool) {
        let body = json!({
            "appointment_id": 8,
            "client_name": "Ana",
            "appointment_datetime": "2025-03-10T18:00:00",
            "status": status,
            "can_cancel": can_cancel,
            "barber_name": "Marco"
        });
        server
            .mock_async(move |when, then| {
                when.method(GET).path("/api/appointments/check/tok");
                then.status(200).json_body(body);
            })
            .await;
    }

    #[tokio::test]
    async fn cancellable_appointment_is_cancelled() {
        let server = MockServer::start_async().await;
        mock_check(&server, "confirmed", true).await;
        let cancel = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/appointments/cancel/tok");
                then.status(200).json_body(json!({
                    "message": "Appointment cancelled successfully",
                    "appointment_id": 8
                }));
            })
            .await;

        let mut vm = view_model(&server);
        assert!(matches!(vm.check().await, CancelState::Cancellable(_)));
        assert_eq!(
            vm.time_until(at(2025, 3, 10, 15, 20)).as_deref(),
            Some("2h 40m until appointment")
        );

        vm.cancel().await.unwrap();
        cancel.assert_async().await;
        assert_eq!(vm.state(), &CancelState::Cancelled);
    }

    #[tokio::test]
    async fn late_cancel_is_refused_locally() {
        let server = MockServer::start_async().await;
        mock_check(&server, "pending", false).await;
        let cancel = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/appointments/cancel/tok");
                then.status(200);
            })
            .await;

        let mut vm = view_model(&server);
        assert!(matches!(vm.check().await, CancelState::TooLate(_)));
        assert_eq!(
            vm.cancel().await.unwrap_err(),
            ApiError::Rejected(OUTSIDE_WINDOW.into())
        );
        assert_eq!(cancel.hits_async().await, 0);
    }

    #[tokio::test]
    async fn already_cancelled_is_reported() {
        let server = MockServer::start_async().await;
        mock_check(&server, "cancelled", false).await;

        let mut vm = view_model(&server);
        assert!(matches!(vm.check().await, CancelState::AlreadyCancelled(_)));
        assert!(vm.cancel().await.is_err());
    }

    #[tokio::test]
    async fn server_rejection_keeps_appointment_visible() {
        let server = MockServer::start_async().await;
        mock_check(&server, "confirmed", true).await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/appointments/cancel/tok");
                then.status(400).json_body(json!({
                    "detail": "Cannot cancel appointments less than 2 hours before the scheduled time"
                }));
            })
            .await;

        let mut vm = view_model(&server);
        vm.check().await;
        assert!(vm.cancel().await.is_err());
        assert!(vm.appointment().is_some());
        assert_eq!(
            vm.error(),
            Some("Cannot cancel appointments less than 2 hours before the scheduled time")
        );
    }

    #[tokio::test]
    async fn unknown_link_fails_with_server_detail() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/appointments/check/tok");
                then.status(404)
                    .json_body(json!({ "detail": "Invalid cancellation link" }));
            })
            .await;

        let mut vm = view_model(&server);
        assert_eq!(
            vm.check().await,
            &CancelState::Failed("Invalid cancellation link".into())
        );
        assert!(vm.time_until(at(2025, 1, 1, 0, 0)).is_none());
    }
}

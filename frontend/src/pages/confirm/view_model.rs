use super::repository::ConfirmRepository;
use crate::api::{ApiClient, ApiError, MessageResponse};

pub const INVALID_LINK: &str = "Invalid confirmation link or appointment already confirmed.";
pub const CONFIRM_FAILED: &str = "Failed to confirm appointment. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome {
    Pending,
    Confirmed(MessageResponse),
    Failed(String),
}

/// Confirmation link landing: one request, one outcome.
#[derive(Debug)]
pub struct ConfirmViewModel {
    repository: ConfirmRepository,
    token: String,
    outcome: ConfirmOutcome,
}

impl ConfirmViewModel {
    pub fn new(api: ApiClient, token: impl Into<String>) -> Self {
        Self {
            repository: ConfirmRepository::new(api),
            token: token.into(),
            outcome: ConfirmOutcome::Pending,
        }
    }

    pub fn outcome(&self) -> &ConfirmOutcome {
        &self.outcome
    }

    pub async fn confirm(&mut self) -> &ConfirmOutcome {
        self.outcome = match self.repository.confirm(&self.token).await {
            Ok(response) => {
                log::info!("Appointment {:?} confirmed", response.appointment_id);
                ConfirmOutcome::Confirmed(response)
            }
            Err(err) => {
                log::warn!("Confirmation failed: {}", err);
                ConfirmOutcome::Failed(failure_message(&err))
            }
        };
        &self.outcome
    }
}

fn failure_message(err: &ApiError) -> String {
    match err {
        ApiError::NotFound(_) => INVALID_LINK.into(),
        ApiError::Validation(msg) => msg.clone(),
        _ => CONFIRM_FAILED.into(),
    }
}

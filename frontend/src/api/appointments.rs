use validator::Validate;

use super::{
    client::{encode_segment, ApiClient},
    types::{Appointment, AppointmentCheck, ApiError, CreateAppointmentRequest, MessageResponse},
};

impl ApiClient {
    pub async fn book(&self, request: &CreateAppointmentRequest) -> Result<Appointment, ApiError> {
        request.validate()?;
        let response = self
            .send(self.http_client().post(self.url("/appointments")).json(request))
            .await?;
        let appointment: Appointment = Self::read_json(response).await?;
        log::info!(
            "Booked appointment {} with barber {}",
            appointment.id,
            appointment.barber_id
        );
        Ok(appointment)
    }

    pub async fn confirm(&self, token: &str) -> Result<MessageResponse, ApiError> {
        let token = require_token(token)?;
        self.get_json(&format!("/appointments/confirm/{}", encode_segment(token)))
            .await
    }

    pub async fn check(&self, token: &str) -> Result<AppointmentCheck, ApiError> {
        let token = require_token(token)?;
        self.get_json(&format!("/appointments/check/{}", encode_segment(token)))
            .await
    }

    /// The cancellation window is enforced by the backend; a late cancel
    /// comes back as `ApiError::Rejected`.
    pub async fn cancel(&self, token: &str) -> Result<MessageResponse, ApiError> {
        let token = require_token(token)?;
        let response = self
            .send(self.http_client().post(
                self.url(&format!("/appointments/cancel/{}", encode_segment(token))),
            ))
            .await?;
        Self::read_json(response).await
    }
}

fn require_token(token: &str) -> Result<&str, ApiError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ApiError::validation("Missing link token"));
    }
    Ok(token)
}

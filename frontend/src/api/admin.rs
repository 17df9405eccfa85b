use validator::Validate;

use super::{
    client::ApiClient,
    types::{
        Appointment, AppointmentId, AppointmentStatus, ApiError, Barber, BarberId, BarberPayload,
        NewService, Service, ServiceId, ServiceUpdate, UpdateAppointmentRequest,
    },
};

impl ApiClient {
    pub async fn admin_list_appointments(
        &self,
        status: Option<AppointmentStatus>,
    ) -> Result<Vec<Appointment>, ApiError> {
        let headers = self.auth_headers()?;
        let mut request = self
            .http_client()
            .get(self.url("/admin/appointments"))
            .headers(headers);
        if let Some(status) = status {
            request = request.query(&[("status", status.as_str())]);
        }
        let response = self.send(request).await?;
        Self::read_json(response).await
    }

    pub async fn admin_get_appointment(
        &self,
        appointment_id: AppointmentId,
    ) -> Result<Appointment, ApiError> {
        self.admin_get_json(&format!("/admin/appointments/{}", appointment_id))
            .await
    }

    pub async fn admin_update_appointment(
        &self,
        appointment_id: AppointmentId,
        update: &UpdateAppointmentRequest,
    ) -> Result<Appointment, ApiError> {
        let headers = self.auth_headers()?;
        let response = self
            .send(
                self.http_client()
                    .put(self.url(&format!("/admin/appointments/{}", appointment_id)))
                    .headers(headers)
                    .json(update),
            )
            .await?;
        Self::read_json(response).await
    }

    pub async fn create_barber(&self, payload: &BarberPayload) -> Result<Barber, ApiError> {
        payload.validate()?;
        if payload.name.is_none() {
            return Err(ApiError::validation("Barber name is required"));
        }
        let headers = self.auth_headers()?;
        let response = self
            .send(
                self.http_client()
                    .post(self.url("/admin/barbers"))
                    .headers(headers)
                    .json(payload),
            )
            .await?;
        Self::read_json(response).await
    }

    pub async fn update_barber(
        &self,
        barber_id: BarberId,
        payload: &BarberPayload,
    ) -> Result<Barber, ApiError> {
        payload.validate()?;
        let headers = self.auth_headers()?;
        let response = self
            .send(
                self.http_client()
                    .put(self.url(&format!("/admin/barbers/{}", barber_id)))
                    .headers(headers)
                    .json(payload),
            )
            .await?;
        Self::read_json(response).await
    }

    /// Soft delete: the backend only flips the barber to inactive.
    pub async fn deactivate_barber(&self, barber_id: BarberId) -> Result<(), ApiError> {
        let headers = self.auth_headers()?;
        let response = self
            .send(
                self.http_client()
                    .delete(self.url(&format!("/admin/barbers/{}", barber_id)))
                    .headers(headers),
            )
            .await?;
        Self::read_empty(response).await
    }

    pub async fn create_service(&self, service: &NewService) -> Result<Service, ApiError> {
        service.validate()?;
        let headers = self.auth_headers()?;
        let response = self
            .send(
                self.http_client()
                    .post(self.url("/admin/services"))
                    .headers(headers)
                    .json(service),
            )
            .await?;
        Self::read_json(response).await
    }

    pub async fn update_service(
        &self,
        service_id: ServiceId,
        update: &ServiceUpdate,
    ) -> Result<Service, ApiError> {
        update.validate()?;
        let headers = self.auth_headers()?;
        let response = self
            .send(
                self.http_client()
                    .put(self.url(&format!("/admin/services/{}", service_id)))
                    .headers(headers)
                    .json(update),
            )
            .await?;
        Self::read_json(response).await
    }

    pub async fn delete_service(&self, service_id: ServiceId) -> Result<(), ApiError> {
        let headers = self.auth_headers()?;
        let response = self
            .send(
                self.http_client()
                    .delete(self.url(&format!("/admin/services/{}", service_id)))
                    .headers(headers),
            )
            .await?;
        Self::read_empty(response).await
    }
}

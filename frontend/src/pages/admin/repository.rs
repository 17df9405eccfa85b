use std::sync::Arc;

use crate::api::{
    ApiClient, ApiError, Appointment, AppointmentId, AppointmentStatus, Barber,
    UpdateAppointmentRequest,
};

/// Everything the dashboard renders from, fetched together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminSnapshot {
    pub appointments: Vec<Appointment>,
    pub barbers: Vec<Barber>,
}

#[derive(Clone, Debug)]
pub struct AdminRepository {
    client: Arc<ApiClient>,
}

impl AdminRepository {
    pub fn new(api: ApiClient) -> Self {
        Self {
            client: Arc::new(api),
        }
    }

    pub async fn fetch_snapshot(&self) -> Result<AdminSnapshot, ApiError> {
        let (appointments, barbers) = tokio::try_join!(
            self.client.admin_list_appointments(None),
            self.client.list_barbers()
        )?;
        log::debug!(
            "Fetched {} appointments and {} barbers",
            appointments.len(),
            barbers.len()
        );
        Ok(AdminSnapshot {
            appointments,
            barbers,
        })
    }

    pub async fn fetch_appointment(&self, id: AppointmentId) -> Result<Appointment, ApiError> {
        self.client.admin_get_appointment(id).await
    }

    /// Refuses transitions the appointment lifecycle does not allow before
    /// anything is sent.
    pub async fn update_status(
        &self,
        appointment: &Appointment,
        status: AppointmentStatus,
    ) -> Result<Appointment, ApiError> {
        if !appointment.status.can_transition_to(status) {
            return Err(ApiError::validation(format!(
                "Cannot change a {} appointment to {}",
                appointment.status, status
            )));
        }
        let update = UpdateAppointmentRequest {
            status: Some(status),
            ..Default::default()
        };
        self.client
            .admin_update_appointment(appointment.id, &update)
            .await
    }
}

use chrono::NaiveDate;
use std::sync::Arc;

use crate::api::{
    ApiClient, ApiError, Appointment, AvailableSlot, Barber, BarberId, CreateAppointmentRequest,
    Service,
};

#[derive(Clone, Debug)]
pub struct BookingRepository {
    client: Arc<ApiClient>,
}

impl BookingRepository {
    pub fn new(api: ApiClient) -> Self {
        Self {
            client: Arc::new(api),
        }
    }

    pub async fn list_barbers(&self) -> Result<Vec<Barber>, ApiError> {
        self.client.list_barbers().await
    }

    pub async fn list_services(&self, barber_id: BarberId) -> Result<Vec<Service>, ApiError> {
        self.client.list_services(barber_id, false).await
    }

    pub async fn available_slots(
        &self,
        barber_id: BarberId,
        date: NaiveDate,
        duration_minutes: u32,
    ) -> Result<Vec<AvailableSlot>, ApiError> {
        self.client
            .available_slots(barber_id, date, duration_minutes)
            .await
    }

    pub async fn book(&self, payload: CreateAppointmentRequest) -> Result<Appointment, ApiError> {
        self.client.book(&payload).await
    }
}

use chrono::NaiveDate;

use super::{
    client::ApiClient,
    types::{ApiError, AvailableSlot, AvailableSlotsResponse, Barber, BarberId, Service},
};

impl ApiClient {
    pub async fn list_barbers(&self) -> Result<Vec<Barber>, ApiError> {
        self.get_json("/barbers").await
    }

    pub async fn get_barber(&self, barber_id: BarberId) -> Result<Barber, ApiError> {
        self.get_json(&format!("/barbers/{}", barber_id)).await
    }

    pub async fn list_services(
        &self,
        barber_id: BarberId,
        include_inactive: bool,
    ) -> Result<Vec<Service>, ApiError> {
        let mut request = self
            .http_client()
            .get(self.url(&format!("/barbers/{}/services", barber_id)));
        if include_inactive {
            request = request.query(&[("include_inactive", "true")]);
        }
        let response = self.send(request).await?;
        Self::read_json(response).await
    }

    /// Slots computed by the backend for the given day and total duration.
    pub async fn available_slots(
        &self,
        barber_id: BarberId,
        date: NaiveDate,
        duration_minutes: u32,
    ) -> Result<Vec<AvailableSlot>, ApiError> {
        if duration_minutes == 0 {
            return Err(ApiError::validation("Please select at least one service"));
        }
        let request = self
            .http_client()
            .get(self.url(&format!("/barbers/{}/available-slots", barber_id)))
            .query(&[
                ("date", date.format("%Y-%m-%d").to_string()),
                ("duration_minutes", duration_minutes.to_string()),
            ]);
        let response = self.send(request).await?;
        let body: AvailableSlotsResponse = Self::read_json(response).await?;
        Ok(body.slots)
    }
}

use std::sync::Arc;

use crate::api::{
    ApiClient, ApiError, Barber, BarberId, BarberPayload, NewService, Service, ServiceId,
    ServiceUpdate,
};

#[derive(Clone, Debug)]
pub struct AdminBarbersRepository {
    client: Arc<ApiClient>,
}

impl AdminBarbersRepository {
    pub fn new(api: ApiClient) -> Self {
        Self {
            client: Arc::new(api),
        }
    }

    pub async fn fetch_barber(&self, id: BarberId) -> Result<Barber, ApiError> {
        self.client.get_barber(id).await
    }

    pub async fn create_barber(&self, payload: BarberPayload) -> Result<Barber, ApiError> {
        self.client.create_barber(&payload).await
    }

    pub async fn update_barber(
        &self,
        id: BarberId,
        payload: BarberPayload,
    ) -> Result<Barber, ApiError> {
        self.client.update_barber(id, &payload).await
    }

    pub async fn deactivate_barber(&self, id: BarberId) -> Result<(), ApiError> {
        self.client.deactivate_barber(id).await
    }

    /// Barber and its full service list, inactive services included.
    pub async fn fetch_catalog(&self, id: BarberId) -> Result<(Barber, Vec<Service>), ApiError> {
        tokio::try_join!(self.client.get_barber(id), self.client.list_services(id, true))
    }

    pub async fn create_service(&self, payload: NewService) -> Result<Service, ApiError> {
        self.client.create_service(&payload).await
    }

    pub async fn set_service_active(
        &self,
        id: ServiceId,
        is_active: bool,
    ) -> Result<Service, ApiError> {
        let update = ServiceUpdate {
            is_active: Some(is_active),
            ..Default::default()
        };
        self.client.update_service(id, &update).await
    }

    pub async fn delete_service(&self, id: ServiceId) -> Result<(), ApiError> {
        self.client.delete_service(id).await
    }
}

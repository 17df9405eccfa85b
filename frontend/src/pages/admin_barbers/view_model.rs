use super::{
    repository::AdminBarbersRepository,
    utils::{BarberForm, ServiceForm},
};
use crate::{
    api::{ApiClient, ApiError, Barber, BarberId, Service, ServiceId},
    state::{
        load::{LoadGuard, LoadTicket},
        notifications::Notifications,
    },
};

/// Create-or-edit form for one barber profile.
#[derive(Debug)]
pub struct BarberEditorViewModel {
    repository: AdminBarbersRepository,
    barber_id: Option<BarberId>,
    loads: LoadGuard,
    pub form: BarberForm,
    pub notifications: Notifications,
}

impl BarberEditorViewModel {
    pub fn new_barber(api: ApiClient) -> Self {
        Self {
            repository: AdminBarbersRepository::new(api),
            barber_id: None,
            loads: LoadGuard::new(),
            form: BarberForm::default(),
            notifications: Notifications::new(),
        }
    }

    pub fn edit_barber(api: ApiClient, barber_id: BarberId) -> Self {
        Self {
            barber_id: Some(barber_id),
            ..Self::new_barber(api)
        }
    }

    pub fn barber_id(&self) -> Option<BarberId> {
        self.barber_id
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.loads.begin()
    }

    pub fn apply_load(&mut self, ticket: LoadTicket, result: Result<Barber, ApiError>) -> bool {
        if !self.loads.accept(ticket) {
            return false;
        }
        match result {
            Ok(barber) => self.form = BarberForm::from_barber(&barber),
            Err(err) => self.notifications.error("Failed to load barber data", &err),
        }
        true
    }

    /// Fills the form from the backend when editing; a new barber starts from
    /// the default week.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        let Some(barber_id) = self.barber_id else {
            return Ok(());
        };
        let ticket = self.begin_load();
        let result = self.repository.fetch_barber(barber_id).await;
        let outcome = result.as_ref().map(|_| ()).map_err(ApiError::clone);
        self.apply_load(ticket, result);
        outcome
    }

    pub async fn save(&mut self) -> Result<Barber, ApiError> {
        let result = match self.form.to_payload() {
            Ok(payload) => match self.barber_id {
                Some(id) => self.repository.update_barber(id, payload).await,
                None => self.repository.create_barber(payload).await,
            },
            Err(err) => Err(err),
        };
        match &result {
            Ok(barber) => {
                let verb = if self.barber_id.is_some() { "updated" } else { "created" };
                self.barber_id = Some(barber.id);
                self.notifications
                    .success(format!("Barber {} {} successfully!", barber.name, verb));
            }
            Err(err) => self.notifications.error("Failed to save barber", err),
        }
        result
    }

    pub async fn deactivate(&mut self) -> Result<(), ApiError> {
        let Some(barber_id) = self.barber_id else {
            return Err(ApiError::validation("Save the barber before deactivating it"));
        };
        match self.repository.deactivate_barber(barber_id).await {
            Ok(()) => {
                self.notifications.success("Barber deactivated");
                Ok(())
            }
            Err(err) => {
                self.notifications.error("Failed to deactivate barber", &err);
                Err(err)
            }
        }
    }

    pub fn dispose(&mut self) {
        self.loads.dispose();
    }
}

/// Service list of one barber, inactive services included.
#[derive(Debug)]
pub struct ServicesViewModel {
    repository: AdminBarbersRepository,
    barber_id: BarberId,
    loads: LoadGuard,
    barber: Option<Barber>,
    services: Vec<Service>,
    pub form: ServiceForm,
    pub notifications: Notifications,
}

impl ServicesViewModel {
    pub fn new(api: ApiClient, barber_id: BarberId) -> Self {
        Self {
            repository: AdminBarbersRepository::new(api),
            barber_id,
            loads: LoadGuard::new(),
            barber: None,
            services: Vec::new(),
            form: ServiceForm::default(),
            notifications: Notifications::new(),
        }
    }

    pub fn barber(&self) -> Option<&Barber> {
        self.barber.as_ref()
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn begin_refresh(&mut self) -> LoadTicket {
        self.loads.begin()
    }

    pub fn apply_refresh(
        &mut self,
        ticket: LoadTicket,
        result: Result<(Barber, Vec<Service>), ApiError>,
    ) -> bool {
        if !self.loads.accept(ticket) {
            return false;
        }
        match result {
            Ok((barber, services)) => {
                self.barber = Some(barber);
                self.services = services;
            }
            Err(err) => self.notifications.error("Failed to load data", &err),
        }
        true
    }

    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let ticket = self.begin_refresh();
        let result = self.repository.fetch_catalog(self.barber_id).await;
        let outcome = result.as_ref().map(|_| ()).map_err(ApiError::clone);
        self.apply_refresh(ticket, result);
        outcome
    }

    pub async fn add_service(&mut self) -> Result<Service, ApiError> {
        let result = match self.form.to_payload(self.barber_id) {
            Ok(payload) => self.repository.create_service(payload).await,
            Err(err) => Err(err),
        };
        match result {
            Ok(service) => {
                self.form.reset();
                self.notifications
                    .success(format!("Service {} created", service.name));
                self.refresh().await?;
                Ok(service)
            }
            Err(err) => {
                self.notifications.error("Failed to create service", &err);
                Err(err)
            }
        }
    }

    pub async fn toggle_service(&mut self, service_id: ServiceId) -> Result<(), ApiError> {
        let current = self
            .services
            .iter()
            .find(|service| service.id == service_id)
            .map(|service| service.is_active);
        let result = match current {
            Some(is_active) => self
                .repository
                .set_service_active(service_id, !is_active)
                .await
                .map(|_| ()),
            None => Err(ApiError::NotFound(format!("Service {service_id} not found"))),
        };
        match result {
            Ok(()) => self.refresh().await,
            Err(err) => {
                self.notifications
                    .error("Failed to update service status", &err);
                Err(err)
            }
        }
    }

    /// Permanent delete; the backend refuses services still referenced by
    /// appointments.
    pub async fn delete_service(&mut self, service_id: ServiceId) -> Result<(), ApiError> {
        match self.repository.delete_service(service_id).await {
            Ok(()) => {
                self.notifications.success("Service deleted");
                self.refresh().await
            }
            Err(err) => {
                self.notifications.error("Failed to delete service", &err);
                Err(err)
            }
        }
    }

    pub fn dispose(&mut self) {
        self.loads.dispose();
    }
}

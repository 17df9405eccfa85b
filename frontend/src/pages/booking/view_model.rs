use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use super::{
    repository::BookingRepository,
    utils::{
        normalize_datetime, total_duration, total_price, BookingStep, ContactForm,
        ServiceSelection,
    },
};
use crate::{
    api::{
        ApiClient, ApiError, Appointment, AvailableSlot, Barber, BarberId,
        CreateAppointmentRequest, Service, ServiceId,
    },
    state::{
        load::{LoadGuard, LoadTicket},
        notifications::Notifications,
    },
    utils::time::wall_clock,
};

pub const BOOKED_MESSAGE: &str = "Appointment booked! We've sent a confirmation email to your \
     address. Please click the confirmation link to confirm your appointment.";

/// Three-step public booking wizard.
#[derive(Debug)]
pub struct BookingViewModel {
    repository: BookingRepository,
    barber_loads: LoadGuard,
    slot_loads: LoadGuard,
    barbers: Vec<Barber>,
    barber_id: Option<BarberId>,
    services: Vec<Service>,
    selection: ServiceSelection,
    date: Option<NaiveDate>,
    slots: Vec<AvailableSlot>,
    scheduled: Option<(NaiveDateTime, String)>,
    step: BookingStep,
    booked: Option<Appointment>,
    pub contact: ContactForm,
    pub notifications: Notifications,
}

impl BookingViewModel {
    pub fn new(api: ApiClient) -> Self {
        Self {
            repository: BookingRepository::new(api),
            barber_loads: LoadGuard::new(),
            slot_loads: LoadGuard::new(),
            barbers: Vec::new(),
            barber_id: None,
            services: Vec::new(),
            selection: ServiceSelection::default(),
            date: None,
            slots: Vec::new(),
            scheduled: None,
            step: BookingStep::default(),
            booked: None,
            contact: ContactForm::default(),
            notifications: Notifications::new(),
        }
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn barbers(&self) -> &[Barber] {
        &self.barbers
    }

    pub fn selected_barber(&self) -> Option<&Barber> {
        self.barber_id
            .and_then(|id| self.barbers.iter().find(|barber| barber.id == id))
    }

    pub fn begin_load_barbers(&mut self) -> LoadTicket {
        self.barber_loads.begin()
    }

    /// Stores the barbers and preselects the first one.
    pub fn apply_barbers(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Barber>, ApiError>,
    ) -> bool {
        if !self.barber_loads.accept(ticket) {
            return false;
        }
        match result {
            Ok(barbers) => {
                self.barbers = barbers;
                let keep = self
                    .barber_id
                    .filter(|id| self.barbers.iter().any(|barber| barber.id == *id));
                match keep.or_else(|| self.barbers.first().map(|barber| barber.id)) {
                    Some(id) if Some(id) != self.barber_id => self.select_barber(id),
                    Some(_) => {}
                    None => {
                        self.barber_id = None;
                        self.services.clear();
                    }
                }
            }
            Err(err) => self.notifications.error("Failed to load barbers", &err),
        }
        true
    }

    pub async fn load_barbers(&mut self) -> Result<(), ApiError> {
        let ticket = self.begin_load_barbers();
        let result = self.repository.list_barbers().await;
        let outcome = result.as_ref().map(|_| ()).map_err(ApiError::clone);
        self.apply_barbers(ticket, result);
        outcome
    }

    /// Changing barber drops everything chosen for the previous one.
    pub fn select_barber(&mut self, id: BarberId) {
        let Some(barber) = self.barbers.iter().find(|barber| barber.id == id) else {
            log::warn!("Ignoring unknown barber {}", id);
            return;
        };
        self.services = active_only(barber.services.iter().cloned());
        self.barber_id = Some(id);
        self.selection.clear();
        self.clear_schedule();
        self.step = BookingStep::Services;
    }

    /// Fetches the selected barber's services when the barber list came
    /// without them.
    pub async fn load_services(&mut self) -> Result<(), ApiError> {
        let Some(barber_id) = self.barber_id else {
            return Ok(());
        };
        if !self.services.is_empty() {
            return Ok(());
        }
        match self.repository.list_services(barber_id).await {
            Ok(services) => {
                // The user may have switched barber meanwhile.
                if self.barber_id == Some(barber_id) {
                    self.services = active_only(services.into_iter());
                }
                Ok(())
            }
            Err(err) => {
                self.notifications.error("Failed to load services", &err);
                Err(err)
            }
        }
    }

    /// Active services offered by the selected barber.
    pub fn catalog(&self) -> &[Service] {
        &self.services
    }

    pub fn toggle_service(&mut self, id: ServiceId) {
        if !self.catalog().iter().any(|service| service.id == id) {
            log::warn!("Ignoring unknown service {}", id);
            return;
        }
        self.selection.toggle(id);
        // Slots depend on the total duration.
        self.clear_schedule();
    }

    pub fn selected_services(&self) -> Vec<&Service> {
        self.selection.resolve(&self.services)
    }

    pub fn total_price(&self) -> Decimal {
        total_price(&self.selected_services())
    }

    pub fn total_duration(&self) -> u32 {
        total_duration(&self.selected_services())
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn slots(&self) -> &[AvailableSlot] {
        &self.slots
    }

    pub fn begin_load_slots(&mut self, date: NaiveDate) -> LoadTicket {
        self.date = Some(date);
        self.slots.clear();
        self.slot_loads.begin()
    }

    pub fn apply_slots(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<AvailableSlot>, ApiError>,
    ) -> bool {
        if !self.slot_loads.accept(ticket) {
            return false;
        }
        match result {
            Ok(slots) => {
                if !slots.iter().any(|slot| slot.available) {
                    self.notifications.info("No available times on this day");
                }
                self.slots = slots;
            }
            Err(err) => self.notifications.error("Failed to load available times", &err),
        }
        true
    }

    pub async fn load_slots(&mut self, date: NaiveDate) -> Result<(), ApiError> {
        let barber_id = self
            .barber_id
            .ok_or_else(|| ApiError::validation("Please choose a barber"))?;
        let duration = self.total_duration();
        let ticket = self.begin_load_slots(date);
        let result = self
            .repository
            .available_slots(barber_id, date, duration)
            .await;
        let outcome = result.as_ref().map(|_| ()).map_err(ApiError::clone);
        self.apply_slots(ticket, result);
        outcome
    }

    /// Picks one of the loaded slots by its `HH:MM` label.
    pub fn choose_slot(&mut self, time: &str) -> Result<(), ApiError> {
        let slot = self
            .slots
            .iter()
            .find(|slot| slot.time == time.trim())
            .ok_or_else(|| ApiError::validation(format!("No slot at {}", time.trim())))?;
        if !slot.available {
            return Err(ApiError::Rejected("Time slot not available".into()));
        }
        let datetime = slot.datetime;
        self.scheduled = Some((datetime, wall_clock::to_wire(&datetime)));
        Ok(())
    }

    /// Free-form datetime input; must not be in the past.
    pub fn set_datetime(&mut self, raw: &str, now: NaiveDateTime) -> Result<(), ApiError> {
        let (parsed, wire) = normalize_datetime(raw)?;
        if parsed < now {
            return Err(ApiError::validation("Please choose a time in the future"));
        }
        self.scheduled = Some((parsed, wire));
        Ok(())
    }

    pub fn scheduled_at(&self) -> Option<NaiveDateTime> {
        self.scheduled.as_ref().map(|(at, _)| *at)
    }

    fn clear_schedule(&mut self) {
        self.date = None;
        self.slots.clear();
        self.scheduled = None;
    }

    fn check_step(&self, step: BookingStep) -> Result<(), ApiError> {
        match step {
            BookingStep::Services if self.selection.is_empty() => {
                Err(ApiError::validation("Please select at least one service"))
            }
            BookingStep::DateTime if self.scheduled.is_none() => {
                Err(ApiError::validation("Please select a date and time"))
            }
            BookingStep::Contact => self.contact.check(),
            _ => Ok(()),
        }
    }

    pub fn next_step(&mut self) -> Result<BookingStep, ApiError> {
        if let Err(err) = self.check_step(self.step) {
            self.notifications.error("Cannot continue", &err);
            return Err(err);
        }
        self.step = self.step.next();
        Ok(self.step)
    }

    pub fn previous_step(&mut self) -> BookingStep {
        self.step = self.step.previous();
        self.step
    }

    pub fn booked(&self) -> Option<&Appointment> {
        self.booked.as_ref()
    }

    pub async fn submit(&mut self) -> Result<Appointment, ApiError> {
        let result = match self.build_request() {
            Ok(payload) => self.repository.book(payload).await,
            Err(err) => Err(err),
        };
        match result {
            Ok(appointment) => {
                self.notifications.success(BOOKED_MESSAGE);
                self.booked = Some(appointment.clone());
                Ok(appointment)
            }
            Err(err) => {
                self.notifications.error("Failed to book appointment", &err);
                Err(err)
            }
        }
    }

    fn build_request(&self) -> Result<CreateAppointmentRequest, ApiError> {
        let barber_id = self
            .barber_id
            .ok_or_else(|| ApiError::validation("Please choose a barber"))?;
        self.check_step(BookingStep::Services)?;
        self.check_step(BookingStep::DateTime)?;
        let wire = self
            .scheduled
            .as_ref()
            .map(|(_, wire)| wire.clone())
            .unwrap_or_default();
        self.contact
            .to_payload(barber_id, self.selection.ids(), wire)
    }

    pub fn dispose(&mut self) {
        self.barber_loads.dispose();
        self.slot_loads.dispose();
    }
}

fn active_only(services: impl Iterator<Item = Service>) -> Vec<Service> {
    services.filter(|service| service.is_active).collect()
}

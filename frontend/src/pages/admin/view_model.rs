use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

use super::{
    analytics::DashboardReport,
    appointments,
    repository::{AdminRepository, AdminSnapshot},
    utils::HistoryFilterForm,
};
use crate::{
    api::{ApiClient, ApiError, Appointment, AppointmentId, AppointmentStatus, Barber},
    state::{
        load::{LoadGuard, LoadTicket},
        notifications::Notifications,
    },
    utils::time::{now_in, today_in},
};

/// State of the admin dashboard. The snapshot is only ever replaced as a
/// whole by a completed refresh.
#[derive(Debug)]
pub struct AdminViewModel {
    repository: AdminRepository,
    time_zone: Tz,
    loads: LoadGuard,
    snapshot: AdminSnapshot,
    loaded: bool,
    pub filters: HistoryFilterForm,
    pub notifications: Notifications,
}

impl AdminViewModel {
    pub fn new(api: ApiClient, time_zone: Tz) -> Self {
        Self {
            repository: AdminRepository::new(api),
            time_zone,
            loads: LoadGuard::new(),
            snapshot: AdminSnapshot::default(),
            loaded: false,
            filters: HistoryFilterForm::default(),
            notifications: Notifications::new(),
        }
    }

    pub fn repository(&self) -> &AdminRepository {
        &self.repository
    }

    pub fn begin_refresh(&mut self) -> LoadTicket {
        self.loads.begin()
    }

    /// Applies a fetch result if `ticket` is still current. Returns whether
    /// the view changed.
    pub fn apply_refresh(
        &mut self,
        ticket: LoadTicket,
        result: Result<AdminSnapshot, ApiError>,
    ) -> bool {
        if !self.loads.accept(ticket) {
            return false;
        }
        match result {
            Ok(snapshot) => {
                self.snapshot = snapshot;
                self.loaded = true;
            }
            Err(err) => self.notifications.error("Failed to load dashboard", &err),
        }
        true
    }

    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let ticket = self.begin_refresh();
        let result = self.repository.fetch_snapshot().await;
        let outcome = result.as_ref().map(|_| ()).map_err(ApiError::clone);
        self.apply_refresh(ticket, result);
        outcome
    }

    pub fn is_loading(&self) -> bool {
        self.loads.is_loading()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn dispose(&mut self) {
        self.loads.dispose();
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.snapshot.appointments
    }

    pub fn barbers(&self) -> &[Barber] {
        &self.snapshot.barbers
    }

    pub fn find(&self, id: AppointmentId) -> Option<&Appointment> {
        self.snapshot.appointments.iter().find(|a| a.id == id)
    }

    pub fn now(&self) -> NaiveDateTime {
        now_in(self.time_zone)
    }

    pub fn today(&self) -> NaiveDate {
        today_in(self.time_zone)
    }

    pub fn upcoming_at(&self, now: NaiveDateTime) -> Vec<&Appointment> {
        appointments::upcoming(&self.snapshot.appointments, now)
    }

    pub fn on_date(&self, date: NaiveDate) -> Vec<&Appointment> {
        appointments::by_date(&self.snapshot.appointments, date)
    }

    pub fn next_at(&self, now: NaiveDateTime) -> Option<&Appointment> {
        appointments::next(&self.snapshot.appointments, now)
    }

    /// History rows for the current filter form.
    pub fn history(&self) -> Result<Vec<&Appointment>, ApiError> {
        let filters = self.filters.to_filters()?;
        Ok(appointments::history(&self.snapshot.appointments, &filters))
    }

    pub fn report_for(&self, today: NaiveDate) -> DashboardReport {
        DashboardReport::build(&self.snapshot.appointments, &self.snapshot.barbers, today)
    }

    pub fn report(&self) -> DashboardReport {
        self.report_for(self.today())
    }

    /// Sends the status change, then refetches the whole snapshot.
    pub async fn update_status(
        &mut self,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<(), ApiError> {
        let result = match self.find(id).cloned() {
            Some(appointment) => self.repository.update_status(&appointment, status).await,
            None => Err(ApiError::NotFound(format!("Appointment {id} not found"))),
        };
        match result {
            Ok(updated) => {
                self.notifications.success(format!(
                    "Appointment #{} is now {}",
                    updated.id,
                    updated.status.label().to_lowercase()
                ));
                self.refresh().await
            }
            Err(err) => {
                self.notifications
                    .error("Failed to update appointment status", &err);
                Err(err)
            }
        }
    }
}

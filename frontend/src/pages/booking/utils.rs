use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::{
    api::{ApiError, BarberId, CreateAppointmentRequest, Service, ServiceId},
    utils::time::wall_clock,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum BookingStep {
    #[default]
    Services,
    DateTime,
    Contact,
}

impl BookingStep {
    pub const TOTAL: usize = 3;

    pub fn number(&self) -> usize {
        match self {
            BookingStep::Services => 1,
            BookingStep::DateTime => 2,
            BookingStep::Contact => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            BookingStep::Services => "Select Services",
            BookingStep::DateTime => "Choose Date & Time",
            BookingStep::Contact => "Your Information",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            BookingStep::Services => BookingStep::DateTime,
            BookingStep::DateTime | BookingStep::Contact => BookingStep::Contact,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            BookingStep::Services | BookingStep::DateTime => BookingStep::Services,
            BookingStep::Contact => BookingStep::DateTime,
        }
    }
}

/// Service ids in the order the client picked them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceSelection {
    ids: Vec<ServiceId>,
}

impl ServiceSelection {
    pub fn toggle(&mut self, id: ServiceId) {
        match self.ids.iter().position(|selected| *selected == id) {
            Some(index) => {
                self.ids.remove(index);
            }
            None => self.ids.push(id),
        }
    }

    pub fn contains(&self, id: ServiceId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[ServiceId] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn resolve<'a>(&self, catalog: &'a [Service]) -> Vec<&'a Service> {
        self.ids
            .iter()
            .filter_map(|id| catalog.iter().find(|service| service.id == *id))
            .collect()
    }
}

pub fn total_price(services: &[&Service]) -> Decimal {
    services.iter().map(|service| service.price).sum()
}

pub fn total_duration(services: &[&Service]) -> u32 {
    services.iter().map(|service| service.duration_minutes).sum()
}

/// Parses a `YYYY-MM-DDTHH:MM[:SS]` input, appending seconds when missing.
pub fn normalize_datetime(raw: &str) -> Result<(NaiveDateTime, String), ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ApiError::validation("Please select a date and time"));
    }
    let candidate = if raw.len() == 16 {
        format!("{raw}:00")
    } else {
        raw.to_string()
    };
    let parsed = wall_clock::parse(&candidate)
        .ok_or_else(|| ApiError::validation("Date and time must look like 2025-03-10T10:30"))?;
    Ok((parsed, wall_clock::to_wire(&parsed)))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub notes: String,
}

impl ContactForm {
    pub fn check(&self) -> Result<(), ApiError> {
        if self.client_name.trim().is_empty() {
            return Err(ApiError::validation("Name is required"));
        }
        if self.client_email.trim().is_empty() {
            return Err(ApiError::validation("Email is required"));
        }
        if self.client_phone.trim().is_empty() {
            return Err(ApiError::validation("Phone number is required"));
        }
        Ok(())
    }

    pub fn to_payload(
        &self,
        barber_id: BarberId,
        service_ids: &[ServiceId],
        appointment_datetime: String,
    ) -> Result<CreateAppointmentRequest, ApiError> {
        self.check()?;
        let notes = self.notes.trim();
        Ok(CreateAppointmentRequest {
            barber_id,
            service_ids: service_ids.to_vec(),
            client_name: self.client_name.trim().to_string(),
            client_email: self.client_email.trim().to_string(),
            client_phone: self.client_phone.trim().to_string(),
            appointment_datetime,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }
}

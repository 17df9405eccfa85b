use chrono::Weekday;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::api::{
    ApiError, Barber, BarberId, BarberPayload, DayHours, NewService, WorkingHours,
};

/// Editable copy of a barber profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarberForm {
    pub name: String,
    pub description: String,
    pub working_hours: WorkingHours,
}

impl BarberForm {
    pub fn from_barber(barber: &Barber) -> Self {
        Self {
            name: barber.name.clone(),
            description: barber.description.clone().unwrap_or_default(),
            working_hours: WorkingHours::for_barber(barber),
        }
    }

    /// Accepts `HH:MM-HH:MM` or `closed` for one day.
    pub fn set_day(&mut self, weekday: Weekday, raw: &str) -> Result<(), ApiError> {
        let hours = DayHours::parse(raw)?;
        self.working_hours.set(weekday, hours);
        Ok(())
    }

    pub fn to_payload(&self) -> Result<BarberPayload, ApiError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ApiError::validation("Name is required"));
        }
        Ok(BarberPayload {
            name: Some(name.to_string()),
            description: non_empty(&self.description),
            working_hours: Some(self.working_hours.to_wire()),
            is_active: None,
        })
    }
}

/// Raw inputs of the "add service" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub duration_minutes: String,
}

impl ServiceForm {
    pub fn to_payload(&self, barber_id: BarberId) -> Result<NewService, ApiError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ApiError::validation("Service name is required"));
        }
        Ok(NewService {
            barber_id,
            name: name.to_string(),
            description: non_empty(&self.description),
            price: parse_price(&self.price)?,
            duration_minutes: parse_duration(&self.duration_minutes)?,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub fn parse_price(raw: &str) -> Result<Decimal, ApiError> {
    let raw = raw.trim().trim_start_matches('€').trim();
    if raw.is_empty() {
        return Err(ApiError::validation("Price is required"));
    }
    let price = Decimal::from_str(raw)
        .map_err(|_| ApiError::validation("Price must be a number, e.g. 25.00"))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ApiError::validation("Price cannot be negative"));
    }
    if price.scale() > 2 {
        return Err(ApiError::validation("Price can have at most two decimals"));
    }
    Ok(price)
}

pub fn parse_duration(raw: &str) -> Result<u32, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ApiError::validation("Duration is required"));
    }
    match raw.parse::<u32>() {
        Ok(minutes) if minutes >= 1 => Ok(minutes),
        _ => Err(ApiError::validation("Duration must be at least 1 minute")),
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

//! Derived views over a fetched appointment list.
//!
//! Every function borrows the snapshot and never fails; an empty input simply
//! yields an empty result. Callers refetch and replace the snapshot instead of
//! patching it.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{
    api::{Appointment, AppointmentStatus, BarberId},
    utils::time::{end_of_day, start_of_day},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistorySort {
    #[default]
    DateDesc,
    DateAsc,
    ClientName,
    AmountDesc,
    AmountAsc,
}

impl HistorySort {
    pub const ALL: [HistorySort; 5] = [
        HistorySort::DateDesc,
        HistorySort::DateAsc,
        HistorySort::ClientName,
        HistorySort::AmountDesc,
        HistorySort::AmountAsc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HistorySort::DateDesc => "date_desc",
            HistorySort::DateAsc => "date_asc",
            HistorySort::ClientName => "client_name",
            HistorySort::AmountDesc => "amount_desc",
            HistorySort::AmountAsc => "amount_asc",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|sort| sort.as_str().eq_ignore_ascii_case(raw))
    }

    fn compare(&self, a: &Appointment, b: &Appointment) -> Ordering {
        match self {
            HistorySort::DateDesc => b.scheduled_at.cmp(&a.scheduled_at),
            HistorySort::DateAsc => a.scheduled_at.cmp(&b.scheduled_at),
            HistorySort::ClientName => a
                .client_name
                .to_lowercase()
                .cmp(&b.client_name.to_lowercase()),
            HistorySort::AmountDesc => b.total_price().cmp(&a.total_price()),
            HistorySort::AmountAsc => a.total_price().cmp(&b.total_price()),
        }
    }
}

/// Narrowing predicates of the history tab. `None` and an empty search mean "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilters {
    pub search: String,
    pub status: Option<AppointmentStatus>,
    pub barber_id: Option<BarberId>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub sort: HistorySort,
}

impl HistoryFilters {
    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.matches_search(appointment)
            && self.status.map_or(true, |status| appointment.status == status)
            && self
                .barber_id
                .map_or(true, |barber_id| appointment.barber_id == barber_id)
            && self.matches_range(appointment.scheduled_at)
    }

    fn matches_search(&self, appointment: &Appointment) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            &appointment.client_name,
            &appointment.client_email,
            &appointment.client_phone,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_range(&self, scheduled_at: NaiveDateTime) -> bool {
        let after_start = self
            .from
            .map_or(true, |from| scheduled_at >= start_of_day(from));
        let before_end = self.to.map_or(true, |to| scheduled_at <= end_of_day(to));
        after_start && before_end
    }
}

pub fn upcoming(appointments: &[Appointment], now: NaiveDateTime) -> Vec<&Appointment> {
    appointments
        .iter()
        .filter(|appointment| appointment.scheduled_at >= now)
        .collect()
}

pub fn by_date(appointments: &[Appointment], date: NaiveDate) -> Vec<&Appointment> {
    let start = start_of_day(date);
    let end = end_of_day(date);
    appointments
        .iter()
        .filter(|appointment| (start..=end).contains(&appointment.scheduled_at))
        .collect()
}

/// All appointments, past and future, narrowed by `filters` and sorted stably.
pub fn history<'a>(appointments: &'a [Appointment], filters: &HistoryFilters) -> Vec<&'a Appointment> {
    let mut rows: Vec<&Appointment> = appointments
        .iter()
        .filter(|appointment| filters.matches(appointment))
        .collect();
    rows.sort_by(|a, b| filters.sort.compare(a, b));
    rows
}

/// Earliest appointment at or after `now` that is still going ahead.
pub fn next(appointments: &[Appointment], now: NaiveDateTime) -> Option<&Appointment> {
    appointments
        .iter()
        .filter(|appointment| {
            appointment.scheduled_at >= now && appointment.status != AppointmentStatus::Cancelled
        })
        .min_by_key(|appointment| appointment.scheduled_at)
}

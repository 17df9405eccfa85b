use chrono::NaiveDate;

use super::appointments::{HistoryFilters, HistorySort};
use crate::api::{AppointmentStatus, ApiError, BarberId};

pub const ALL: &str = "all";

/// Raw inputs of the history tab's filter bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryFilterForm {
    pub search: String,
    pub status: String,
    pub barber: String,
    pub from: String,
    pub to: String,
    pub sort: String,
}

impl Default for HistoryFilterForm {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: ALL.into(),
            barber: ALL.into(),
            from: String::new(),
            to: String::new(),
            sort: HistorySort::default().as_str().into(),
        }
    }
}

impl HistoryFilterForm {
    pub fn to_filters(&self) -> Result<HistoryFilters, ApiError> {
        let (from, to) = parse_filter_window(&self.from, &self.to)?;
        Ok(HistoryFilters {
            search: self.search.trim().to_string(),
            status: parse_status_filter(&self.status)?,
            barber_id: parse_barber_filter(&self.barber)?,
            from,
            to,
            sort: parse_sort(&self.sort)?,
        })
    }
}

pub fn parse_status_filter(raw: &str) -> Result<Option<AppointmentStatus>, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case(ALL) {
        return Ok(None);
    }
    AppointmentStatus::parse(raw)
        .map(Some)
        .ok_or_else(|| ApiError::validation(format!("Unknown status '{raw}'")))
}

pub fn parse_barber_filter(raw: &str) -> Result<Option<BarberId>, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case(ALL) {
        return Ok(None);
    }
    raw.parse::<BarberId>()
        .map(Some)
        .map_err(|_| ApiError::validation(format!("Unknown barber '{raw}'")))
}

fn parse_sort(raw: &str) -> Result<HistorySort, ApiError> {
    if raw.trim().is_empty() {
        return Ok(HistorySort::default());
    }
    HistorySort::parse(raw).ok_or_else(|| {
        ApiError::validation(format!(
            "Sort must be one of: {}",
            HistorySort::ALL.map(|sort| sort.as_str()).join(", ")
        ))
    })
}

pub fn parse_date_input(value: &str, label: &str) -> Result<Option<NaiveDate>, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ApiError::validation(format!("{label} must use the YYYY-MM-DD format")))
}

fn parse_filter_window(
    from_raw: &str,
    to_raw: &str,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), ApiError> {
    let from = parse_date_input(from_raw, "Start date")?;
    let to = parse_date_input(to_raw, "End date")?;
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(ApiError::validation(
                "Start date must be on or before the end date",
            ));
        }
    }
    Ok((from, to))
}

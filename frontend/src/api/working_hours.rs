use chrono::{NaiveTime, Weekday};
use serde_json::{Map, Value};

use super::types::{ApiError, Barber};

pub const CLOSED: &str = "closed";

const DAYS: [(Weekday, &str); 7] = [
    (Weekday::Mon, "monday"),
    (Weekday::Tue, "tuesday"),
    (Weekday::Wed, "wednesday"),
    (Weekday::Thu, "thursday"),
    (Weekday::Fri, "friday"),
    (Weekday::Sat, "saturday"),
    (Weekday::Sun, "sunday"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayHours {
    Closed,
    Open { start: NaiveTime, end: NaiveTime },
}

impl DayHours {
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case(CLOSED) {
            return Ok(DayHours::Closed);
        }
        let (start, end) = raw.split_once('-').ok_or_else(|| {
            ApiError::validation(format!("Working hours must look like 09:00-17:00, got '{raw}'"))
        })?;
        let parse_time = |value: &str| {
            NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| {
                ApiError::validation(format!("Invalid time '{}' in working hours", value.trim()))
            })
        };
        let start = parse_time(start)?;
        let end = parse_time(end)?;
        if start >= end {
            return Err(ApiError::validation(format!(
                "Opening time must be before closing time in '{raw}'"
            )));
        }
        Ok(DayHours::Open { start, end })
    }

    pub fn to_wire(&self) -> String {
        match self {
            DayHours::Closed => CLOSED.to_string(),
            DayHours::Open { start, end } => {
                format!("{}-{}", start.format("%H:%M"), end.format("%H:%M"))
            }
        }
    }

    pub fn is_open_at(&self, time: NaiveTime) -> bool {
        match self {
            DayHours::Closed => false,
            DayHours::Open { start, end } => *start <= time && time < *end,
        }
    }
}

/// Weekly schedule of a barber, Monday first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingHours {
    days: [DayHours; 7],
}

impl Default for WorkingHours {
    fn default() -> Self {
        let weekday = DayHours::Open {
            start: hm(9, 0),
            end: hm(17, 0),
        };
        Self {
            days: [
                weekday,
                weekday,
                weekday,
                weekday,
                weekday,
                DayHours::Open {
                    start: hm(9, 0),
                    end: hm(15, 0),
                },
                DayHours::Closed,
            ],
        }
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

impl WorkingHours {
    /// Parses the serialized map stored on a barber. Days missing from the
    /// map keep their default hours.
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        let map: Map<String, Value> = serde_json::from_str(raw)
            .map_err(|_| ApiError::validation("Working hours are not a valid JSON object"))?;
        let mut hours = Self::default();
        for (weekday, key) in DAYS {
            if let Some(value) = map.get(key) {
                let value = value.as_str().ok_or_else(|| {
                    ApiError::validation(format!("Working hours for {key} must be a string"))
                })?;
                hours.set(weekday, DayHours::parse(value)?);
            }
        }
        Ok(hours)
    }

    pub fn for_barber(barber: &Barber) -> Self {
        match barber.working_hours.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Self::parse(raw).unwrap_or_else(|err| {
                log::warn!("Barber {} has unreadable working hours: {}", barber.id, err);
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    pub fn get(&self, weekday: Weekday) -> DayHours {
        self.days[weekday.num_days_from_monday() as usize]
    }

    pub fn set(&mut self, weekday: Weekday, hours: DayHours) {
        self.days[weekday.num_days_from_monday() as usize] = hours;
    }

    pub fn to_wire(&self) -> String {
        let map: Map<String, Value> = DAYS
            .iter()
            .map(|(weekday, key)| (key.to_string(), Value::String(self.get(*weekday).to_wire())))
            .collect();
        Value::Object(map).to_string()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&'static str, DayHours)> + '_ {
        DAYS.iter().map(|(weekday, key)| (*key, self.get(*weekday)))
    }
}

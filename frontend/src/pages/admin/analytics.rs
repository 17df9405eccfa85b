//! Dashboard statistics computed from an appointment snapshot.
//!
//! Revenue only ever counts confirmed appointments. Money stays in exact
//! decimals and ratios are not rounded here; see `utils::format` for display.

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    api::{Appointment, AppointmentStatus, Barber, BarberId, ServiceId},
    utils::time::{trailing_month_starts, weekday_label},
};

pub const TOP_SERVICES: usize = 5;
pub const MONTH_BUCKETS: u32 = 6;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub confirmed: usize,
    pub cancelled: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarberRevenue {
    pub barber_id: BarberId,
    pub barber_name: String,
    pub revenue: Decimal,
    pub appointments: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePopularity {
    pub service_id: ServiceId,
    pub name: String,
    pub occurrences: usize,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRevenue {
    /// First day of the bucket's month.
    pub month: NaiveDate,
    pub label: String,
    pub revenue: Decimal,
    pub appointments: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayRevenue {
    pub weekday: Weekday,
    pub label: String,
    pub total: Decimal,
    pub appointments: usize,
    pub average: Decimal,
}

fn confirmed(appointments: &[Appointment]) -> impl Iterator<Item = &Appointment> {
    appointments
        .iter()
        .filter(|appointment| appointment.status == AppointmentStatus::Confirmed)
}

pub fn total_revenue(appointments: &[Appointment]) -> Decimal {
    confirmed(appointments).map(Appointment::total_price).sum()
}

pub fn counts_by_status(appointments: &[Appointment]) -> StatusCounts {
    appointments
        .iter()
        .fold(StatusCounts::default(), |mut counts, appointment| {
            match appointment.status {
                AppointmentStatus::Pending => counts.pending += 1,
                AppointmentStatus::Confirmed => counts.confirmed += 1,
                AppointmentStatus::Cancelled => counts.cancelled += 1,
            }
            counts.total += 1;
            counts
        })
}

fn ratio(numerator: Decimal, count: usize) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        numerator / Decimal::from(count)
    }
}

pub fn average_order_value(appointments: &[Appointment]) -> Decimal {
    ratio(
        total_revenue(appointments),
        counts_by_status(appointments).confirmed,
    )
}

/// One row per barber, in the order given, including barbers without revenue.
pub fn revenue_by_barber(appointments: &[Appointment], barbers: &[Barber]) -> Vec<BarberRevenue> {
    barbers
        .iter()
        .map(|barber| {
            let (revenue, count) = confirmed(appointments)
                .filter(|appointment| appointment.barber_id == barber.id)
                .fold((Decimal::ZERO, 0), |(sum, count), appointment| {
                    (sum + appointment.total_price(), count + 1)
                });
            BarberRevenue {
                barber_id: barber.id,
                barber_name: barber.name.clone(),
                revenue,
                appointments: count,
            }
        })
        .collect()
}

/// Most booked services among confirmed appointments. Ties keep the order in
/// which the services were first seen.
pub fn popular_services(appointments: &[Appointment]) -> Vec<ServicePopularity> {
    let mut seen: Vec<ServicePopularity> = Vec::new();
    for service in confirmed(appointments).flat_map(|appointment| &appointment.services) {
        match seen.iter_mut().find(|entry| entry.service_id == service.id) {
            Some(entry) => {
                entry.occurrences += 1;
                entry.revenue += service.price;
            }
            None => seen.push(ServicePopularity {
                service_id: service.id,
                name: service.name.clone(),
                occurrences: 1,
                revenue: service.price,
            }),
        }
    }
    seen.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));
    seen.truncate(TOP_SERVICES);
    seen
}

/// Six monthly buckets ending with the month of `today`, oldest first.
pub fn revenue_by_month(appointments: &[Appointment], today: NaiveDate) -> Vec<MonthRevenue> {
    let mut buckets: Vec<MonthRevenue> = trailing_month_starts(today, MONTH_BUCKETS)
        .into_iter()
        .map(|month| MonthRevenue {
            month,
            label: month.format("%b %Y").to_string(),
            revenue: Decimal::ZERO,
            appointments: 0,
        })
        .collect();

    for appointment in confirmed(appointments) {
        let date = appointment.scheduled_at.date();
        if let Some(bucket) = buckets
            .iter_mut()
            .find(|bucket| bucket.month.year() == date.year() && bucket.month.month() == date.month())
        {
            bucket.revenue += appointment.total_price();
            bucket.appointments += 1;
        }
    }
    buckets
}

/// Monday through Sunday, with an average of 0 for days without bookings.
pub fn revenue_by_day_of_week(appointments: &[Appointment]) -> Vec<WeekdayRevenue> {
    WEEK.iter()
        .map(|&weekday| {
            let (total, count) = confirmed(appointments)
                .filter(|appointment| appointment.scheduled_at.weekday() == weekday)
                .fold((Decimal::ZERO, 0), |(sum, count), appointment| {
                    (sum + appointment.total_price(), count + 1)
                });
            WeekdayRevenue {
                weekday,
                label: weekday_label(weekday).to_string(),
                total,
                appointments: count,
                average: ratio(total, count),
            }
        })
        .collect()
}

pub fn cancellation_rate(appointments: &[Appointment]) -> Decimal {
    let counts = counts_by_status(appointments);
    ratio(Decimal::from(counts.cancelled), counts.total)
}

/// Everything the analytics tab shows, computed from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub total_revenue: Decimal,
    pub counts: StatusCounts,
    pub average_order_value: Decimal,
    pub cancellation_rate: Decimal,
    pub revenue_by_barber: Vec<BarberRevenue>,
    pub popular_services: Vec<ServicePopularity>,
    pub revenue_by_month: Vec<MonthRevenue>,
    pub revenue_by_day_of_week: Vec<WeekdayRevenue>,
}

impl DashboardReport {
    pub fn build(appointments: &[Appointment], barbers: &[Barber], today: NaiveDate) -> Self {
        Self {
            total_revenue: total_revenue(appointments),
            counts: counts_by_status(appointments),
            average_order_value: average_order_value(appointments),
            cancellation_rate: cancellation_rate(appointments),
            revenue_by_barber: revenue_by_barber(appointments, barbers),
            popular_services: popular_services(appointments),
            revenue_by_month: revenue_by_month(appointments, today),
            revenue_by_day_of_week: revenue_by_day_of_week(appointments),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{appointment, at, barber, service};
    use AppointmentStatus::*;

    fn euros(value: i64) -> Decimal {
        Decimal::from(value)
    }

    /// Confirmed totals of 20, 35 and 50 plus one cancelled booking worth 40.
    fn scenario() -> Vec<Appointment> {
        let cut = service(1, 1, "Cut", 20);
        let beard = service(2, 1, "Beard", 15);
        let color = service(3, 2, "Color", 50);
        let wash = service(4, 2, "Wash", 40);
        vec![
            appointment(1, 1, at(2025, 1, 6, 10, 0), Confirmed, vec![cut.clone()]),
            appointment(2, 1, at(2025, 1, 7, 11, 0), Confirmed, vec![cut, beard]),
            appointment(3, 2, at(2025, 2, 3, 12, 0), Confirmed, vec![color]),
            appointment(4, 2, at(2025, 2, 4, 12, 0), Cancelled, vec![wash]),
        ]
    }

    #[test]
    fn revenue_scenario_matches_expected_totals() {
        let all = scenario();
        assert_eq!(total_revenue(&all), euros(105));
        assert_eq!(cancellation_rate(&all), Decimal::new(25, 2));
        assert_eq!(average_order_value(&all), euros(35));
        assert_eq!(
            counts_by_status(&all),
            StatusCounts {
                pending: 0,
                confirmed: 3,
                cancelled: 1,
                total: 4
            }
        );
    }

    #[test]
    fn pending_bookings_do_not_count_as_revenue() {
        let all = vec![appointment(
            1,
            1,
            at(2025, 1, 6, 10, 0),
            Pending,
            vec![service(1, 1, "Cut", 20)],
        )];
        assert_eq!(total_revenue(&all), Decimal::ZERO);
        assert_eq!(counts_by_status(&all).pending, 1);
    }

    #[test]
    fn empty_snapshot_yields_zero_guards() {
        let none: Vec<Appointment> = Vec::new();
        assert_eq!(total_revenue(&none), Decimal::ZERO);
        assert_eq!(average_order_value(&none), Decimal::ZERO);
        assert_eq!(cancellation_rate(&none), Decimal::ZERO);
        assert!(popular_services(&none).is_empty());
        assert!(revenue_by_day_of_week(&none)
            .iter()
            .all(|day| day.average.is_zero() && day.appointments == 0));

        let only_cancelled = vec![appointment(1, 1, at(2025, 1, 6, 10, 0), Cancelled, vec![])];
        assert_eq!(average_order_value(&only_cancelled), Decimal::ZERO);
        assert_eq!(cancellation_rate(&only_cancelled), Decimal::ONE);
    }

    #[test]
    fn barbers_without_bookings_still_appear() {
        let barbers = vec![barber(1, "Marco"), barber(2, "Luca"), barber(3, "Gio")];
        let rows = revenue_by_barber(&scenario(), &barbers);
        assert_eq!(rows.len(), 3);
        assert_eq!((rows[0].revenue, rows[0].appointments), (euros(55), 2));
        assert_eq!((rows[1].revenue, rows[1].appointments), (euros(50), 1));
        assert_eq!(rows[2].barber_name, "Gio");
        assert_eq!((rows[2].revenue, rows[2].appointments), (Decimal::ZERO, 0));
    }

    #[test]
    fn popular_services_rank_by_occurrences() {
        let a = service(10, 1, "A", 10);
        let b = service(20, 1, "B", 12);
        let mut all = Vec::new();
        for id in 0..3 {
            all.push(appointment(id, 1, at(2025, 1, 6, 9, 0), Confirmed, vec![a.clone()]));
        }
        for id in 3..8 {
            all.push(appointment(id, 1, at(2025, 1, 6, 9, 0), Confirmed, vec![b.clone()]));
        }
        all.push(appointment(8, 1, at(2025, 1, 6, 9, 0), Cancelled, vec![a.clone(), a]));

        let ranked = popular_services(&all);
        assert_eq!(ranked[0].name, "B");
        assert_eq!(ranked[0].occurrences, 5);
        assert_eq!(ranked[0].revenue, euros(60));
        assert_eq!(ranked[1].name, "A");
        assert_eq!(ranked[1].occurrences, 3);
    }

    #[test]
    fn popular_services_keep_discovery_order_on_ties_and_cap_at_five() {
        let services: Vec<_> = (1..=7)
            .map(|id| service(id, 1, &format!("S{id}"), 10))
            .collect();
        let all = vec![appointment(1, 1, at(2025, 1, 6, 9, 0), Confirmed, services)];
        let ranked = popular_services(&all);
        assert_eq!(ranked.len(), TOP_SERVICES);
        let names: Vec<&str> = ranked.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["S1", "S2", "S3", "S4", "S5"]);
    }

    #[test]
    fn month_buckets_always_cover_six_months() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 18).unwrap();
        let buckets = revenue_by_month(&scenario(), today);
        assert_eq!(buckets.len(), 6);
        assert_eq!(buckets[0].month, NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
        assert_eq!(buckets[0].label, "Sep 2024");
        assert_eq!(buckets[4].revenue, euros(55));
        assert_eq!(buckets[4].appointments, 2);
        assert_eq!(buckets[5].revenue, euros(50));
        assert!(buckets[..4].iter().all(|bucket| bucket.revenue.is_zero()));

        let empty = revenue_by_month(&[], today);
        assert_eq!(empty.len(), 6);
        assert!(empty.windows(2).all(|pair| pair[0].month < pair[1].month));
    }

    #[test]
    fn bookings_outside_the_window_are_ignored() {
        let all = vec![appointment(
            1,
            1,
            at(2024, 8, 31, 10, 0),
            Confirmed,
            vec![service(1, 1, "Cut", 20)],
        )];
        let today = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        assert!(revenue_by_month(&all, today)
            .iter()
            .all(|bucket| bucket.revenue.is_zero()));
    }

    #[test]
    fn weekday_rows_start_on_monday() {
        let rows = revenue_by_day_of_week(&scenario());
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0].weekday, Weekday::Mon);
        assert_eq!(rows[6].label, "Sunday");
        // 2025-01-06 and 2025-02-03 are Mondays.
        assert_eq!(rows[0].total, euros(70));
        assert_eq!(rows[0].appointments, 2);
        assert_eq!(rows[0].average, euros(35));
        assert_eq!(rows[1].total, euros(35));
        assert!(rows[2].average.is_zero());
    }

    #[test]
    fn report_bundles_every_metric() {
        let barbers = vec![barber(1, "Marco"), barber(2, "Luca")];
        let today = NaiveDate::from_ymd_opt(2025, 2, 18).unwrap();
        let report = DashboardReport::build(&scenario(), &barbers, today);
        assert_eq!(report.total_revenue, euros(105));
        assert_eq!(report.counts.total, 4);
        assert_eq!(report.revenue_by_barber.len(), 2);
        assert_eq!(report.revenue_by_month.len(), 6);
        assert_eq!(report.revenue_by_day_of_week.len(), 7);
        assert_eq!(report.popular_services[0].name, "Cut");
    }
}

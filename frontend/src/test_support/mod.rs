#[cfg(test)]
pub mod helpers {
    use crate::api::{Appointment, AppointmentStatus, Barber, BarberId, Service, ServiceId};
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal::Decimal;

    pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    pub fn barber(id: BarberId, name: &str) -> Barber {
        Barber {
            id,
            name: name.into(),
            description: None,
            working_hours: None,
            is_active: true,
            created_at: None,
            services: Vec::new(),
        }
    }

    /// Price in whole euros.
    pub fn service(id: ServiceId, barber_id: BarberId, name: &str, euros: i64) -> Service {
        Service {
            id,
            barber_id,
            name: name.into(),
            description: None,
            price: Decimal::from(euros),
            duration_minutes: 30,
            is_active: true,
        }
    }

    pub fn appointment(
        id: i64,
        barber_id: BarberId,
        scheduled_at: NaiveDateTime,
        status: AppointmentStatus,
        services: Vec<Service>,
    ) -> Appointment {
        Appointment {
            id,
            barber_id,
            client_name: format!("Client {id}"),
            client_email: format!("client{id}@example.com"),
            client_phone: format!("600{id:06}"),
            scheduled_at,
            status,
            notes: None,
            created_at: None,
            barber: None,
            services,
        }
    }

    pub fn client(mut appointment: Appointment, name: &str, email: &str, phone: &str) -> Appointment {
        appointment.client_name = name.into();
        appointment.client_email = email.into();
        appointment.client_phone = phone.into();
        appointment
    }

    pub fn ids(appointments: &[&Appointment]) -> Vec<i64> {
        appointments.iter().map(|a| a.id).collect()
    }
}

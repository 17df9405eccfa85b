use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::utils::time::wall_clock;

pub type BarberId = i64;
pub type ServiceId = i64;
pub type AppointmentId = i64;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barber {
    pub id: BarberId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// JSON object serialized as a string, e.g. `{"monday":"09:00-17:00"}`.
    #[serde(default)]
    pub working_hours: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, with = "wall_clock::option")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub barber_id: BarberId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub duration_minutes: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 3] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }

    /// pending → confirmed | cancelled, confirmed → cancelled.
    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        matches!(
            (self, next),
            (AppointmentStatus::Pending, AppointmentStatus::Confirmed)
                | (AppointmentStatus::Pending, AppointmentStatus::Cancelled)
                | (AppointmentStatus::Confirmed, AppointmentStatus::Cancelled)
        )
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(AppointmentStatus::Pending),
            "confirmed" => Some(AppointmentStatus::Confirmed),
            "cancelled" | "canceled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub barber_id: BarberId,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    #[serde(rename = "appointment_datetime", with = "wall_clock")]
    pub scheduled_at: NaiveDateTime,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, with = "wall_clock::option")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub barber: Option<Barber>,
    #[serde(default)]
    pub services: Vec<Service>,
}

impl Appointment {
    pub fn total_price(&self) -> Decimal {
        self.services.iter().map(|service| service.price).sum()
    }

    pub fn total_duration_minutes(&self) -> u32 {
        self.services
            .iter()
            .map(|service| service.duration_minutes)
            .sum()
    }

    pub fn barber_name(&self) -> Option<&str> {
        self.barber.as_ref().map(|barber| barber.name.as_str())
    }

    pub fn service_names(&self) -> String {
        self.services
            .iter()
            .map(|service| service.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableSlot {
    pub time: String,
    #[serde(with = "wall_clock")]
    pub datetime: NaiveDateTime,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableSlotsResponse {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub slots: Vec<AvailableSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentCheck {
    pub appointment_id: AppointmentId,
    pub client_name: String,
    #[serde(with = "wall_clock")]
    pub appointment_datetime: NaiveDateTime,
    pub status: AppointmentStatus,
    pub can_cancel: bool,
    #[serde(default)]
    pub barber_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub appointment_id: Option<AppointmentId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateAppointmentRequest {
    pub barber_id: BarberId,
    #[validate(length(min = 1, message = "Please select at least one service"))]
    pub service_ids: Vec<ServiceId>,
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub client_name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub client_email: String,
    #[validate(length(min = 5, max = 20, message = "Please enter a valid phone number"))]
    pub client_phone: String,
    /// `YYYY-MM-DDTHH:MM:SS`, wall-clock time of the shop.
    pub appointment_datetime: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_datetime: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct BarberPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100, message = "Barber name is required"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_hours: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewService {
    pub barber_id: BarberId,
    #[validate(length(min = 1, max = 100, message = "Service name is required"))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[validate(range(min = 1, message = "Duration must be at least 1 minute"))]
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ServiceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100, message = "Service name is required"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    #[validate(custom(function = "validate_price"))]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "Duration must be at least 1 minute"))]
    pub duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        let mut error = ValidationError::new("price");
        error.message = Some("Price cannot be negative".into());
        return Err(error);
    }
    Ok(())
}

/// FastAPI error body: `{"detail": "..."}` or `{"detail": [{"loc": [...], "msg": "..."}]}`.
#[derive(Debug, Clone, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<ErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Message(String),
    Fields(Vec<FieldError>),
    Other(Value),
}

#[derive(Debug, Clone, Deserialize)]
struct FieldError {
    #[serde(default)]
    msg: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    NotFound(String),
    #[error("server error ({status})")]
    Server { status: u16 },
    #[error("authentication required")]
    Unauthorized,
    #[error("failed to parse response: {0}")]
    Decode(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Network(_) => "NETWORK_ERROR",
            ApiError::Timeout => "TIMEOUT",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Rejected(_) => "REJECTED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Server { .. } => "SERVER_ERROR",
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::Decode(_) => "DECODE_ERROR",
            ApiError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// No response was received at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Timeout)
    }

    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) | ApiError::Timeout => {
                "Unable to reach the server. Please check your connection and try again.".into()
            }
            ApiError::Validation(msg) | ApiError::Rejected(msg) | ApiError::NotFound(msg) => {
                msg.clone()
            }
            ApiError::Server { .. } => "Something went wrong. Please try again later.".into(),
            ApiError::Unauthorized => "Your session has expired. Please log in again.".into(),
            ApiError::Decode(_) => "Unexpected response from the server.".into(),
            ApiError::Storage(msg) => format!("Could not update the saved session: {msg}"),
        }
    }

    /// Maps a non-success status and its body onto the error taxonomy.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.detail);

        match status {
            401 => ApiError::Unauthorized,
            404 => ApiError::NotFound(
                detail
                    .and_then(detail_message)
                    .unwrap_or_else(|| "Not found".into()),
            ),
            422 => ApiError::Validation(
                detail
                    .and_then(detail_message)
                    .unwrap_or_else(|| "Invalid request".into()),
            ),
            400..=499 => match detail {
                Some(ErrorDetail::Fields(fields)) => {
                    ApiError::Validation(join_field_messages(&fields))
                }
                other => ApiError::Rejected(
                    other
                        .and_then(detail_message)
                        .unwrap_or_else(|| "Request failed".into()),
                ),
            },
            500..=599 => ApiError::Server { status },
            _ => ApiError::Rejected(format!("Unexpected response status {status}")),
        }
    }
}

fn detail_message(detail: ErrorDetail) -> Option<String> {
    match detail {
        ErrorDetail::Message(msg) if !msg.trim().is_empty() => Some(msg),
        ErrorDetail::Message(_) => None,
        ErrorDetail::Fields(fields) if !fields.is_empty() => Some(join_field_messages(&fields)),
        ErrorDetail::Fields(_) => None,
        ErrorDetail::Other(value) => Some(value.to_string()),
    }
}

fn join_field_messages(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|field| field.msg.as_str())
        .filter(|msg| !msg.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{}: {}", field, e.code),
                })
            })
            .collect();
        messages.sort();
        ApiError::Validation(messages.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn appointment_json() -> Value {
        json!({
            "id": 7,
            "barber_id": 1,
            "client_name": "Ana",
            "client_email": "ana@example.com",
            "client_phone": "600000000",
            "appointment_datetime": "2025-03-10T10:30:00",
            "status": "confirmed",
            "notes": null,
            "created_at": "2025-03-01T09:00:00.123456+00:00",
            "barber": { "id": 1, "name": "Marco", "description": null, "is_active": true },
            "services": [
                { "id": 3, "barber_id": 1, "name": "Cut", "price": 20.0, "duration_minutes": 30, "is_active": true },
                { "id": 4, "barber_id": 1, "name": "Beard", "price": 15.5, "duration_minutes": 20, "is_active": true }
            ]
        })
    }

    #[test]
    fn appointment_totals_sum_services() {
        let appointment: Appointment = serde_json::from_value(appointment_json()).unwrap();
        assert_eq!(appointment.total_price(), Decimal::new(355, 1));
        assert_eq!(appointment.total_duration_minutes(), 50);
        assert_eq!(appointment.barber_name(), Some("Marco"));
        assert_eq!(appointment.service_names(), "Cut, Beard");
        assert_eq!(appointment.status, AppointmentStatus::Confirmed);
        assert_eq!(
            appointment.scheduled_at.to_string(),
            "2025-03-10 10:30:00"
        );
    }

    #[test]
    fn appointment_without_services_totals_zero() {
        let mut value = appointment_json();
        value["services"] = json!([]);
        let appointment: Appointment = serde_json::from_value(value).unwrap();
        assert_eq!(appointment.total_price(), Decimal::ZERO);
        assert_eq!(appointment.total_duration_minutes(), 0);
    }

    #[test]
    fn status_transitions_follow_lifecycle() {
        use AppointmentStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn status_parse_accepts_known_values() {
        assert_eq!(AppointmentStatus::parse(" Confirmed "), Some(AppointmentStatus::Confirmed));
        assert_eq!(AppointmentStatus::parse("canceled"), Some(AppointmentStatus::Cancelled));
        assert_eq!(AppointmentStatus::parse("done"), None);
    }

    #[test]
    fn error_mapping_follows_taxonomy() {
        assert_eq!(
            ApiError::from_response(400, r#"{"detail":"Time slot not available"}"#),
            ApiError::Rejected("Time slot not available".into())
        );
        assert_eq!(
            ApiError::from_response(
                422,
                r#"{"detail":[{"loc":["body","client_email"],"msg":"value is not a valid email address"},{"loc":["body","client_phone"],"msg":"field required"}]}"#
            ),
            ApiError::Validation("value is not a valid email address; field required".into())
        );
        assert_eq!(
            ApiError::from_response(404, r#"{"detail":"Barber not found"}"#),
            ApiError::NotFound("Barber not found".into())
        );
        assert_eq!(ApiError::from_response(401, ""), ApiError::Unauthorized);
        assert_eq!(
            ApiError::from_response(503, "<html>down</html>"),
            ApiError::Server { status: 503 }
        );
        assert_eq!(
            ApiError::from_response(409, "not json"),
            ApiError::Rejected("Request failed".into())
        );
    }

    #[test]
    fn user_messages_hide_server_faults() {
        assert!(ApiError::Server { status: 500 }
            .user_message()
            .contains("try again later"));
        assert!(ApiError::Timeout.user_message().contains("connection"));
        assert!(ApiError::Network("refused".into()).is_transport());
        assert!(!ApiError::Server { status: 500 }.is_transport());
        assert_eq!(
            ApiError::Rejected("Cannot cancel within 2 hours".into()).user_message(),
            "Cannot cancel within 2 hours"
        );
        assert_eq!(ApiError::validation("bad").code(), "VALIDATION_ERROR");
    }

    #[test]
    fn new_service_validation_rejects_bad_values() {
        let service = NewService {
            barber_id: 1,
            name: String::new(),
            description: None,
            price: Decimal::new(-1, 0),
            duration_minutes: 0,
        };
        let err = ApiError::from(service.validate().unwrap_err());
        let ApiError::Validation(message) = err else {
            panic!("expected validation error");
        };
        assert!(message.contains("Price cannot be negative"));
        assert!(message.contains("Duration must be at least 1 minute"));
        assert!(message.contains("Service name is required"));
    }

    #[test]
    fn new_service_serializes_price_as_number() {
        let service = NewService {
            barber_id: 1,
            name: "Cut".into(),
            description: None,
            price: Decimal::new(2550, 2),
            duration_minutes: 30,
        };
        assert!(service.validate().is_ok());
        let value = serde_json::to_value(&service).unwrap();
        assert_eq!(value["price"], json!(25.5));
        assert!(value.get("description").is_none());
    }

    #[test]
    fn service_update_skips_unset_fields() {
        let update = ServiceUpdate {
            is_active: Some(false),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({ "is_active": false }));
    }
}

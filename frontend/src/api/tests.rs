use super::*;
use crate::state::session::SessionStore;
use chrono::NaiveDate;
use httpmock::prelude::*;
use rust_decimal::Decimal;
use serde_json::json;
use std::time::Duration;

fn barber_json(id: i64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "description": "Classic cuts",
        "working_hours": "{\"monday\":\"09:00-17:00\",\"sunday\":\"closed\"}",
        "is_active": true,
        "created_at": "2025-01-01T09:00:00"
    })
}

fn service_json(id: i64, name: &str, price: f64, minutes: u32) -> serde_json::Value {
    json!({
        "id": id,
        "barber_id": 1,
        "name": name,
        "description": null,
        "price": price,
        "duration_minutes": minutes,
        "is_active": true
    })
}

fn appointment_json(id: i64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "barber_id": 1,
        "client_name": "Ana",
        "client_email": "ana@example.com",
        "client_phone": "600123123",
        "appointment_datetime": "2025-03-10T10:30:00",
        "status": status,
        "notes": null,
        "created_at": "2025-03-01T09:00:00",
        "barber": barber_json(1, "Marco"),
        "services": [service_json(3, "Cut", 20.0, 30)]
    })
}

fn api_client(server: &MockServer) -> ApiClient {
    ApiClient::new_with_base_url(server.url("/api"), SessionStore::in_memory())
}

fn admin_client(server: &MockServer) -> ApiClient {
    let session = SessionStore::in_memory();
    session.set_token("admin-jwt").unwrap();
    ApiClient::new_with_base_url(server.url("/api"), session)
}

#[tokio::test]
async fn public_catalog_endpoints_succeed() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/barbers");
            then.status(200)
                .json_body(json!([barber_json(1, "Marco"), barber_json(2, "Luca")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/barbers/1");
            then.status(200).json_body(barber_json(1, "Marco"));
        })
        .await;
    let inactive = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/barbers/1/services")
                .query_param("include_inactive", "true");
            then.status(200)
                .json_body(json!([service_json(3, "Cut", 20.0, 30), service_json(4, "Beard", 15.5, 20)]));
        })
        .await;
    let slots = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/barbers/1/available-slots")
                .query_param("date", "2025-03-10")
                .query_param("duration_minutes", "50");
            then.status(200).json_body(json!({
                "date": "2025-03-10",
                "slots": [
                    { "time": "09:00", "datetime": "2025-03-10T09:00:00", "available": true },
                    { "time": "09:30", "datetime": "2025-03-10T09:30:00", "available": false }
                ]
            }));
        })
        .await;

    let client = api_client(&server);
    let barbers = client.list_barbers().await.unwrap();
    assert_eq!(barbers.len(), 2);
    assert_eq!(client.get_barber(1).await.unwrap().name, "Marco");

    let services = client.list_services(1, true).await.unwrap();
    assert_eq!(services[1].price, Decimal::new(155, 1));
    inactive.assert_async().await;

    let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let available = client.available_slots(1, date, 50).await.unwrap();
    assert_eq!(available.len(), 2);
    assert!(available[0].available);
    assert!(!available[1].available);
    slots.assert_async().await;
}

#[tokio::test]
async fn available_slots_require_a_duration() {
    let server = MockServer::start_async().await;
    let client = api_client(&server);
    let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let err = client.available_slots(1, date, 0).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn booking_flow_endpoints_succeed() {
    let server = MockServer::start_async().await;

    let book = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/appointments").json_body(json!({
                "barber_id": 1,
                "service_ids": [3],
                "client_name": "Ana",
                "client_email": "ana@example.com",
                "client_phone": "600123123",
                "appointment_datetime": "2025-03-10T10:30:00"
            }));
            then.status(200).json_body(appointment_json(7, "pending"));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/appointments/confirm/tok-1");
            then.status(200)
                .json_body(json!({ "message": "Appointment confirmed", "appointment_id": 7 }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/appointments/check/tok-2");
            then.status(200).json_body(json!({
                "appointment_id": 7,
                "client_name": "Ana",
                "appointment_datetime": "2025-03-10T10:30:00",
                "status": "confirmed",
                "can_cancel": true,
                "barber_name": "Marco"
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/appointments/cancel/tok-2");
            then.status(200)
                .json_body(json!({ "message": "Appointment cancelled successfully" }));
        })
        .await;

    let client = api_client(&server);
    let created = client
        .book(&CreateAppointmentRequest {
            barber_id: 1,
            service_ids: vec![3],
            client_name: "Ana".into(),
            client_email: "ana@example.com".into(),
            client_phone: "600123123".into(),
            appointment_datetime: "2025-03-10T10:30:00".into(),
            notes: None,
        })
        .await
        .unwrap();
    assert_eq!(created.id, 7);
    assert_eq!(created.status, AppointmentStatus::Pending);
    book.assert_async().await;

    let confirmed = client.confirm("tok-1").await.unwrap();
    assert_eq!(confirmed.appointment_id, Some(7));

    let check = client.check("tok-2").await.unwrap();
    assert!(check.can_cancel);
    assert_eq!(check.barber_name.as_deref(), Some("Marco"));

    let cancelled = client.cancel("tok-2").await.unwrap();
    assert_eq!(cancelled.message, "Appointment cancelled successfully");
}

#[tokio::test]
async fn booking_is_validated_before_sending() {
    let server = MockServer::start_async().await;
    let book = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/appointments");
            then.status(200).json_body(appointment_json(7, "pending"));
        })
        .await;

    let client = api_client(&server);
    let err = client
        .book(&CreateAppointmentRequest {
            barber_id: 1,
            service_ids: vec![],
            client_name: "Ana".into(),
            client_email: "not-an-email".into(),
            client_phone: "600123123".into(),
            appointment_datetime: "2025-03-10T10:30:00".into(),
            notes: None,
        })
        .await
        .unwrap_err();
    let ApiError::Validation(message) = err else {
        panic!("expected validation error");
    };
    assert!(message.contains("Please select at least one service"));
    assert!(message.contains("valid email"));
    assert_eq!(book.hits_async().await, 0);
}

#[tokio::test]
async fn business_rejections_keep_server_detail() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/appointments/cancel/late");
            then.status(400).json_body(json!({
                "detail": "Cannot cancel appointment less than 2 hours before the scheduled time"
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/appointments/confirm/used");
            then.status(404)
                .json_body(json!({ "detail": "Invalid confirmation token" }));
        })
        .await;

    let client = api_client(&server);
    let err = client.cancel("late").await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Rejected(
            "Cannot cancel appointment less than 2 hours before the scheduled time".into()
        )
    );
    let err = client.confirm("used").await.unwrap_err();
    assert_eq!(err, ApiError::NotFound("Invalid confirmation token".into()));
}

#[tokio::test]
async fn login_stores_token_and_admin_requests_send_bearer() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/auth/login")
                .json_body(json!({ "username": "admin", "password": "secret" }));
            then.status(200)
                .json_body(json!({ "access_token": "jwt-1", "token_type": "bearer" }));
        })
        .await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/admin/appointments")
                .query_param("status", "confirmed")
                .header("authorization", "Bearer jwt-1");
            then.status(200)
                .json_body(json!([appointment_json(7, "confirmed")]));
        })
        .await;

    let client = api_client(&server);
    client
        .login(&LoginRequest {
            username: "admin".into(),
            password: "secret".into(),
        })
        .await
        .unwrap();
    assert_eq!(client.session().token().as_deref(), Some("jwt-1"));

    let appointments = client
        .admin_list_appointments(Some(AppointmentStatus::Confirmed))
        .await
        .unwrap();
    assert_eq!(appointments.len(), 1);
    list.assert_async().await;

    client.logout().unwrap();
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn failed_login_leaves_session_empty() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(401)
                .json_body(json!({ "detail": "Incorrect username or password" }));
        })
        .await;

    let client = api_client(&server);
    let err = client
        .login(&LoginRequest {
            username: "admin".into(),
            password: "wrong".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn admin_requests_without_token_never_hit_the_server() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/admin/appointments");
            then.status(200).json_body(json!([]));
        })
        .await;

    let client = api_client(&server);
    let err = client.admin_list_appointments(None).await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);
    assert_eq!(list.hits_async().await, 0);
}

#[tokio::test]
async fn unauthorized_response_clears_session() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/admin/appointments/7");
            then.status(401)
                .json_body(json!({ "detail": "Could not validate credentials" }));
        })
        .await;

    let client = admin_client(&server);
    let err = client.admin_get_appointment(7).await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);
    assert!(client.session().token().is_none());
}

#[tokio::test]
async fn admin_management_endpoints_succeed() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/admin/appointments/7")
                .json_body(json!({ "status": "confirmed" }));
            then.status(200).json_body(appointment_json(7, "confirmed"));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/admin/barbers");
            then.status(200).json_body(barber_json(3, "Gio"));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/admin/barbers/3")
                .json_body(json!({ "description": "Fades" }));
            then.status(200).json_body(barber_json(3, "Gio"));
        })
        .await;
    let deactivate = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/admin/barbers/3");
            then.status(200)
                .json_body(json!({ "message": "Barber deactivated successfully" }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/admin/services").json_body(json!({
                "barber_id": 1,
                "name": "Shave",
                "price": 12.5,
                "duration_minutes": 15
            }));
            then.status(200).json_body(service_json(9, "Shave", 12.5, 15));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/admin/services/9")
                .json_body(json!({ "is_active": false }));
            then.status(200).json_body(service_json(9, "Shave", 12.5, 15));
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path("/api/admin/services/9")
                .header("authorization", "Bearer admin-jwt");
            then.status(204);
        })
        .await;

    let client = admin_client(&server);
    let updated = client
        .admin_update_appointment(
            7,
            &UpdateAppointmentRequest {
                status: Some(AppointmentStatus::Confirmed),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, AppointmentStatus::Confirmed);

    let created = client
        .create_barber(&BarberPayload {
            name: Some("Gio".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(created.id, 3);
    client
        .update_barber(
            3,
            &BarberPayload {
                description: Some("Fades".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    client.deactivate_barber(3).await.unwrap();
    deactivate.assert_async().await;

    let service = client
        .create_service(&NewService {
            barber_id: 1,
            name: "Shave".into(),
            description: None,
            price: Decimal::new(125, 1),
            duration_minutes: 15,
        })
        .await
        .unwrap();
    assert_eq!(service.id, 9);
    client
        .update_service(
            9,
            &ServiceUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    client.delete_service(9).await.unwrap();
    delete.assert_async().await;
}

#[tokio::test]
async fn create_barber_requires_a_name() {
    let server = MockServer::start_async().await;
    let client = admin_client(&server);
    let err = client
        .create_barber(&BarberPayload::default())
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::validation("Barber name is required"));
}

#[tokio::test]
async fn server_errors_and_bad_bodies_are_distinguished() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/barbers");
            then.status(500).body("Internal Server Error");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/barbers/1");
            then.status(200).body("{ not json");
        })
        .await;

    let client = api_client(&server);
    assert_eq!(
        client.list_barbers().await.unwrap_err(),
        ApiError::Server { status: 500 }
    );
    assert!(matches!(
        client.get_barber(1).await.unwrap_err(),
        ApiError::Decode(_)
    ));
}

#[tokio::test]
async fn slow_responses_time_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/barbers");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(json!([]));
        })
        .await;

    let client = ApiClient::with_timeout(
        server.url("/api"),
        Duration::from_millis(50),
        SessionStore::in_memory(),
    );
    let err = client.list_barbers().await.unwrap_err();
    assert_eq!(err, ApiError::Timeout);
    assert!(err.is_transport());
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let client = ApiClient::new_with_base_url("http://127.0.0.1:1/api", SessionStore::in_memory());
    let err = client.list_barbers().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}

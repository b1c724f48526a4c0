use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use shared::api::{
    ApiEnvelope, AppointmentPatch, ListAppointmentsQuery, MutationAck, NewAppointment,
};
use shared::Appointment;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, SendError};
use crate::transport::{ApiRequest, Method, Transport};

/// The four appointment operations, used for logging and default messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Phrase used in "Failed to ..." notifications
    pub fn verb(&self) -> &'static str {
        match self {
            Self::List => "load appointments",
            Self::Create => "create appointment",
            Self::Update => "update appointment",
            Self::Delete => "delete appointment",
        }
    }

    pub fn failure_default(&self) -> &'static str {
        match self {
            Self::List => "Failed to load appointments",
            Self::Create => "Failed to create appointment",
            Self::Update => "Failed to update appointment",
            Self::Delete => "Failed to delete appointment",
        }
    }

    pub fn success_default(&self) -> &'static str {
        match self {
            Self::List => "Appointments loaded",
            Self::Create => "Appointment created successfully",
            Self::Update => "Appointment updated successfully",
            Self::Delete => "Appointment deleted successfully",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// CRUD surface the calendar controller talks to
#[async_trait(?Send)]
pub trait AppointmentApi {
    async fn list(&self, query: &ListAppointmentsQuery) -> ClientResult<Vec<Appointment>>;
    async fn create(&self, draft: &NewAppointment) -> ClientResult<MutationAck>;
    async fn update(&self, id: &str, patch: &AppointmentPatch) -> ClientResult<MutationAck>;
    async fn delete(&self, id: &str) -> ClientResult<MutationAck>;
}

/// Appointments REST client with a one-shot fallback endpoint.
///
/// A request that gets no response at all is repeated once, unchanged,
/// against the fallback base. Anything the primary answered, including an
/// error status or a truncated body, is never retried.
pub struct AppointmentClient<T> {
    transport: T,
    config: ClientConfig,
}

impl<T: Transport> AppointmentClient<T> {
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn exchange(
        &self,
        operation: Operation,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<ApiEnvelope> {
        let primary = ApiRequest {
            method,
            url: self.config.primary_url(path),
            body,
        };
        debug!(%operation, %method, url = %primary.url, "sending appointments request");

        let sent = self.transport.send(&primary).await;
        let response = match sent {
            Ok(response) => response,
            Err(SendError::UnreadableBody { status, error }) => {
                return Err(ClientError::UnreadableBody { status, error });
            }
            Err(SendError::Unreachable(primary_err)) => {
                let fallback = ApiRequest {
                    url: self.config.fallback_url(path),
                    ..primary
                };
                warn!(
                    %operation,
                    error = %primary_err,
                    fallback = %fallback.url,
                    "primary endpoint unreachable, trying fallback"
                );
                match self.transport.send(&fallback).await {
                    Ok(response) => response,
                    Err(SendError::UnreadableBody { status, error }) => {
                        return Err(ClientError::UnreadableBody { status, error });
                    }
                    Err(SendError::Unreachable(fallback_err)) => {
                        return Err(ClientError::Transport {
                            primary: primary_err,
                            fallback: fallback_err,
                        });
                    }
                }
            }
        };
        debug!(%operation, status = response.status, "received appointments response");

        if !response.is_success() {
            let message = serde_json::from_str::<ApiEnvelope>(&response.body)
                .ok()
                .and_then(|envelope| envelope.error);
            return Err(ClientError::HttpStatus {
                status: response.status,
                message,
            });
        }

        let envelope: ApiEnvelope = serde_json::from_str(&response.body)?;
        if !envelope.success {
            let message = envelope
                .error
                .or(envelope.message)
                .unwrap_or_else(|| operation.failure_default().to_string());
            return Err(ClientError::Application(message));
        }

        Ok(envelope)
    }

    fn acknowledge(operation: Operation, envelope: ApiEnvelope) -> MutationAck {
        MutationAck {
            message: envelope
                .message
                .unwrap_or_else(|| operation.success_default().to_string()),
            appointment_id: envelope.appointment_id,
        }
    }
}

#[async_trait(?Send)]
impl<T: Transport> AppointmentApi for AppointmentClient<T> {
    async fn list(&self, query: &ListAppointmentsQuery) -> ClientResult<Vec<Appointment>> {
        let path = query_string(&query.params());
        let envelope = self
            .exchange(Operation::List, Method::Get, &path, None)
            .await?;
        Ok(envelope.appointments.unwrap_or_default())
    }

    async fn create(&self, draft: &NewAppointment) -> ClientResult<MutationAck> {
        let body = serde_json::to_value(draft)?;
        let envelope = self
            .exchange(Operation::Create, Method::Post, "", Some(body))
            .await?;
        Ok(Self::acknowledge(Operation::Create, envelope))
    }

    async fn update(&self, id: &str, patch: &AppointmentPatch) -> ClientResult<MutationAck> {
        let body = serde_json::to_value(patch)?;
        let path = item_path(id);
        let envelope = self
            .exchange(Operation::Update, Method::Put, &path, Some(body))
            .await?;
        Ok(Self::acknowledge(Operation::Update, envelope))
    }

    async fn delete(&self, id: &str) -> ClientResult<MutationAck> {
        let path = item_path(id);
        let envelope = self
            .exchange(Operation::Delete, Method::Delete, &path, None)
            .await?;
        Ok(Self::acknowledge(Operation::Delete, envelope))
    }
}

fn item_path(id: &str) -> String {
    format!("/{}", urlencoding::encode(id))
}

fn query_string(params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let pairs: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect();
    format!("?{}", pairs.join("&"))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use chrono::{NaiveDate, NaiveTime};
    use serde_json::json;
    use shared::{AppointmentStatus, Priority};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::error::TransportError;
    use crate::transport::{ApiResponse, ReqwestTransport};

    /// Origin nothing listens on
    fn dead_origin() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{port}")
    }

    fn live_config(server: &MockServer) -> ClientConfig {
        ClientConfig::default().with_origin(&server.uri())
    }

    fn fallback_only_config(server: &MockServer) -> ClientConfig {
        ClientConfig {
            primary_path: format!("{}/appointments/api", dead_origin()),
            fallback_path: format!("{}/api/appointments", server.uri()),
            ..ClientConfig::default()
        }
    }

    fn client(config: ClientConfig) -> AppointmentClient<ReqwestTransport> {
        AppointmentClient::new(ReqwestTransport::default(), config)
    }

    fn march_week() -> ListAppointmentsQuery {
        ListAppointmentsQuery {
            start_date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 16).unwrap(),
            clinic_id: Some("c 1".into()),
        }
    }

    fn draft() -> NewAppointment {
        NewAppointment {
            patient_name: "Ada".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            duration_minutes: 30,
            kind: "checkup".into(),
            priority: Priority::Normal,
            notes: String::new(),
            clinic_id: Some("c1".into()),
            patient_id: None,
        }
    }

    #[tokio::test]
    async fn list_sends_range_and_clinic() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/appointments/api"))
            .and(query_param("start_date", "2024-03-10"))
            .and(query_param("end_date", "2024-03-16"))
            .and(query_param("clinic_id", "c 1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "appointments": [
                    { "_id": "a1", "patient_name": "Ada", "date": "2024-03-15", "time": "09:00" }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let appointments = client(live_config(&server))
            .list(&march_week())
            .await
            .unwrap();
        assert_eq!(appointments.len(), 1);
        assert_eq!(appointments[0].id, "a1");
    }

    #[tokio::test]
    async fn list_without_appointments_key_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/appointments/api"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .mount(&server)
            .await;

        let appointments = client(live_config(&server))
            .list(&march_week())
            .await
            .unwrap();
        assert!(appointments.is_empty());
    }

    #[tokio::test]
    async fn create_falls_back_when_primary_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/appointments"))
            .and(body_json(serde_json::to_value(draft()).unwrap()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "appointment_id": "new-id",
                "message": "Appointment created"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ack = client(fallback_only_config(&server))
            .create(&draft())
            .await
            .unwrap();
        assert_eq!(ack.message, "Appointment created");
        assert_eq!(ack.appointment_id.as_deref(), Some("new-id"));
    }

    #[tokio::test]
    async fn http_error_is_not_retried_on_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/appointments/api"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "success": false,
                "error": "Time slot already booked"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/appointments"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(live_config(&server))
            .create(&draft())
            .await
            .unwrap_err();
        match err {
            ClientError::HttpStatus { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message.as_deref(), Some("Time slot already booked"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn application_failure_uses_server_message_or_default() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/appointments/api/a1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": "No changes made"
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/appointments/api/a1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
            .mount(&server)
            .await;

        let client = client(live_config(&server));
        let err = client
            .update("a1", &AppointmentPatch::status(AppointmentStatus::Completed))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No changes made");

        let err = client.delete("a1").await.unwrap_err();
        assert!(matches!(err, ClientError::Application(ref m) if m == "Failed to delete appointment"));
    }

    #[tokio::test]
    async fn delete_defaults_success_message() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/appointments/api/a1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .mount(&server)
            .await;

        let ack = client(live_config(&server)).delete("a1").await.unwrap();
        assert_eq!(ack.message, "Appointment deleted successfully");
        assert_eq!(ack.appointment_id, None);
    }

    #[tokio::test]
    async fn both_endpoints_down_is_transport_error() {
        let config = ClientConfig::default().with_origin(&dead_origin());
        let err = client(config).delete("a1").await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn garbage_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/appointments/api"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let err = client(live_config(&server))
            .list(&march_week())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    /// Transport answering from a script and remembering every request
    struct ScriptedTransport {
        replies: RefCell<VecDeque<Result<ApiResponse, SendError>>>,
        seen: RefCell<Vec<ApiRequest>>,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<Result<ApiResponse, SendError>>) -> Self {
            Self {
                replies: RefCell::new(replies.into()),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, SendError> {
            self.seen.borrow_mut().push(request.clone());
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::new("script exhausted").into()))
        }
    }

    #[tokio::test]
    async fn fallback_repeats_method_and_body() {
        let transport = ScriptedTransport::new(vec![
            Err(TransportError::new("connection reset").into()),
            Ok(ApiResponse {
                status: 200,
                body: r#"{"success":true,"message":"Appointment updated successfully"}"#.into(),
            }),
        ]);
        let client = AppointmentClient::new(transport, ClientConfig::default());

        let patch = AppointmentPatch::status(AppointmentStatus::Cancelled);
        client.update("id/1", &patch).await.unwrap();

        let seen = client.transport.seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].url, "/appointments/api/id%2F1");
        assert_eq!(seen[1].url, "/api/appointments/id%2F1");
        assert_eq!(seen[0].method, Method::Put);
        assert_eq!(seen[1].method, Method::Put);
        assert_eq!(seen[0].body, seen[1].body);
        assert_eq!(seen[1].body, Some(json!({ "status": "cancelled" })));
    }

    #[tokio::test]
    async fn primary_success_never_touches_fallback() {
        let transport = ScriptedTransport::new(vec![Ok(ApiResponse {
            status: 500,
            body: "Internal Server Error".into(),
        })]);
        let client = AppointmentClient::new(transport, ClientConfig::default());

        let err = client.list(&march_week()).await.unwrap_err();
        assert!(matches!(err, ClientError::HttpStatus { status: 500, message: None }));
        assert_eq!(client.transport.seen.borrow().len(), 1);
    }

    #[tokio::test]
    async fn unreadable_body_is_not_retried() {
        let transport = ScriptedTransport::new(vec![Err(SendError::UnreadableBody {
            status: 200,
            error: TransportError::new("unexpected end of body"),
        })]);
        let client = AppointmentClient::new(transport, ClientConfig::default());

        let err = client.create(&draft()).await.unwrap_err();
        assert!(matches!(err, ClientError::UnreadableBody { status: 200, .. }));
        assert!(!err.is_transport());
        assert_eq!(client.transport.seen.borrow().len(), 1);
    }

    /// Server that reads each request fully, promises a 200-byte body, sends
    /// a few bytes and hangs up
    async fn truncating_server(hits: Arc<AtomicUsize>) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let origin = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                hits.fetch_add(1, Ordering::SeqCst);
                let mut request = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    let n = socket.read(&mut chunk).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&chunk[..n]);
                    if request_complete(&request) {
                        break;
                    }
                }
                let _ = socket
                    .write_all(b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 200\r\n\r\n{\"succ")
                    .await;
                let _ = socket.shutdown().await;
            }
        });

        origin
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(head_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let length = text[..head_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        raw.len() >= head_end + 4 + length
    }

    #[tokio::test]
    async fn truncated_body_does_not_resend_create() {
        let hits = Arc::new(AtomicUsize::new(0));
        let origin = truncating_server(hits.clone()).await;

        let err = client(ClientConfig::default().with_origin(&origin))
            .create(&draft())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::UnreadableBody { status: 200, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn query_string_encodes_values() {
        assert_eq!(query_string(&[]), "");
        assert_eq!(
            query_string(&[("clinic_id", "a&b".to_string())]),
            "?clinic_id=a%26b"
        );
    }
}

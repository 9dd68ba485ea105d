use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::api::types::{CalendarResponse, Credentials, MessageBody, SessionInfo};
use crate::api::CalendarService;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{DayEntry, MonthKey};

/// Client for the attendance server's JSON API.
///
/// Holds a cookie jar so the session established by [`CalendarService::login`]
/// is presented on every later request.
#[derive(Clone)]
pub struct AttendanceClient {
    config: Config,
    client: Client,
}

impl AttendanceClient {
    /// Create a new client from config
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| Error::Network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { config: config.clone(), client })
    }

    async fn send_get(&self, path: &str, query: &[(&str, String)]) -> Result<Response> {
        let url = self.config.endpoint(path)?;
        self.client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Request to {path} failed: {e}")))
    }

    async fn send_post<B: serde::Serialize + Sync>(&self, path: &str, body: Option<&B>) -> Result<Response> {
        let url = self.config.endpoint(path)?;
        let mut request = self.client.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }
        request
            .send()
            .await
            .map_err(|e| Error::Network(format!("Request to {path} failed: {e}")))
    }
}

/// Decode a JSON body, reporting the endpoint on failure.
async fn read_json<T: DeserializeOwned>(resp: Response, path: &str) -> Result<T> {
    let status = resp.status();
    resp.json().await.map_err(|e| {
        if status.is_success() {
            Error::Parse(format!("Invalid JSON from {path}: {e}"))
        } else {
            Error::rejected(status.as_u16(), None)
        }
    })
}

/// Succeed on exactly HTTP 200, otherwise surface the body's `message`.
async fn expect_ok(resp: Response) -> Result<()> {
    let status = resp.status();
    if status == StatusCode::OK {
        return Ok(());
    }
    let body: MessageBody = resp.json().await.unwrap_or_default();
    Err(Error::rejected(status.as_u16(), body.message))
}

#[async_trait]
impl CalendarService for AttendanceClient {
    async fn fetch_month(&self, month: MonthKey) -> Result<Vec<DayEntry>> {
        let path = "/api/calendar";
        let resp = self
            .send_get(path, &[("year", month.year.to_string()), ("month", month.month.to_string())])
            .await?;
        let status = resp.status();

        // The envelope's `ok` flag decides, whatever the HTTP status.
        let body: CalendarResponse = read_json(resp, path).await?;
        if !body.ok {
            return Err(Error::rejected(status.as_u16(), body.message));
        }

        tracing::debug!("Fetched {} days for {month}", body.days.len());
        Ok(body.days)
    }

    async fn session(&self) -> Result<SessionInfo> {
        let path = "/api/session";
        let resp = self.send_get(path, &[]).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::rejected(status.as_u16(), None));
        }
        read_json(resp, path).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<()> {
        let resp = self.send_post("/api/login", Some(credentials)).await?;
        expect_ok(resp).await
    }

    async fn logout(&self) -> Result<()> {
        let resp = self.send_post::<()>("/api/logout", None).await?;
        tracing::debug!("Logout answered {}", resp.status());
        Ok(())
    }

    async fn save_entry(&self, entry: &DayEntry) -> Result<()> {
        let resp = self.send_post("/api/attendance", Some(entry)).await?;
        expect_ok(resp).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic, clippy::field_reassign_with_default)]

    use super::*;
    use crate::types::Status;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use url::Url;

    /// Read one request, body included, so the reply is not cut short.
    async fn read_request(socket: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let length = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    return;
                }
            }
        }
    }

    /// A client pointed at a local server answering every request with `status` and `body`.
    async fn client_answered_with(status: u16, body: &'static str) -> AttendanceClient {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    read_request(&mut socket).await;
                    let reply = format!(
                        "HTTP/1.1 {status} Reply\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(reply.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        let mut config = Config::default();
        config.base_url = Url::parse(&format!("http://{addr}")).unwrap();
        config.request_timeout = Duration::from_secs(5);
        AttendanceClient::new(&config).unwrap()
    }

    fn credentials() -> Credentials {
        Credentials { username: "admin".into(), password: "secret".into() }
    }

    fn entry() -> DayEntry {
        DayEntry { date: "2024-06-15".into(), status: Status::new("absent"), reason: "sick".into() }
    }

    #[tokio::test]
    async fn login_succeeds_only_on_200() {
        let client = client_answered_with(200, r#"{"ok":true}"#).await;
        client.login(&credentials()).await.unwrap();

        let client = client_answered_with(201, r#"{"ok":true}"#).await;
        let err = client.login(&credentials()).await.unwrap_err();
        assert!(matches!(err, Error::Rejected { status: 201, message: None }), "{err:?}");
    }

    #[tokio::test]
    async fn save_with_plain_text_error_keeps_status() {
        let client = client_answered_with(500, "Internal Server Error").await;
        let err = client.save_entry(&entry()).await.unwrap_err();
        assert!(matches!(err, Error::Rejected { status: 500, message: None }), "{err:?}");
    }

    #[tokio::test]
    async fn save_rejection_carries_server_message() {
        let client = client_answered_with(400, r#"{"message":"invalid status"}"#).await;
        let err = client.save_entry(&entry()).await.unwrap_err();
        assert_eq!(err.server_message(), Some("invalid status"));

        let client = client_answered_with(401, r#"{"message":"unauthorized"}"#).await;
        assert!(client.save_entry(&entry()).await.unwrap_err().is_unauthorized());
    }

    #[tokio::test]
    async fn calendar_body_decides_whatever_the_status() {
        let client = client_answered_with(400, r#"{"ok":false,"message":"bad month"}"#).await;
        let err = client.fetch_month(MonthKey::new(2024, 6)).await.unwrap_err();
        assert!(matches!(&err, Error::Rejected { status: 400, .. }), "{err:?}");
        assert_eq!(err.server_message(), Some("bad month"));

        let client = client_answered_with(200, r#"{"ok":false}"#).await;
        let err = client.fetch_month(MonthKey::new(2024, 6)).await.unwrap_err();
        assert!(matches!(err, Error::Rejected { status: 200, message: None }), "{err:?}");
    }

    #[tokio::test]
    async fn calendar_days_are_decoded() {
        let body = r#"{"ok":true,"days":[{"date":"2024-06-01","status":"present","reason":null},{"date":"2024-06-02","status":"none","reason":""}]}"#;
        let client = client_answered_with(200, body).await;
        let days = client.fetch_month(MonthKey::new(2024, 6)).await.unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].status.as_str(), "present");
        assert_eq!(days[0].reason, "");
    }

    #[tokio::test]
    async fn logout_is_done_on_any_reply() {
        let client = client_answered_with(500, "oops").await;
        client.logout().await.unwrap();
    }

    #[tokio::test]
    async fn session_is_decoded() {
        let client = client_answered_with(200, r#"{"logged_in":true,"username":"admin"}"#).await;
        let session = client.session().await.unwrap();
        assert_eq!(session, SessionInfo { logged_in: true, username: Some("admin".into()) });
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut config = Config::default();
        config.base_url = Url::parse(&format!("http://{addr}")).unwrap();
        let client = AttendanceClient::new(&config).unwrap();
        assert!(client.session().await.unwrap_err().is_transport());
    }
}

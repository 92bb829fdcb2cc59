//! Portfolio Backend Client
//!
//! HTTP client for the comments, session and chart endpoints.

use crate::backend::Backend;
use crate::backend::error::BackendError;
use crate::consts::cli_consts::http;
use crate::environment::Environment;
use crate::models::{Comment, LoginStatus, TransientResponse};
use log::debug;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue, LOCATION};
use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

// Build timestamp in milliseconds since epoch
const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP", "Build timestamp not available");

// User-Agent string with client version
const USER_AGENT: &str = concat!("portfolio-client/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    environment: Environment,
}

impl BackendClient {
    /// `session_cookie` is sent as the `Cookie` header of every request.
    pub fn new(
        environment: Environment,
        session_cookie: Option<&str>,
    ) -> Result<Self, BackendError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = session_cookie {
            let mut value = HeaderValue::from_str(cookie.trim()).map_err(|_| {
                BackendError::Validation("Session cookie contains invalid characters".to_string())
            })?;
            value.set_sensitive(true);
            headers.insert(COOKIE, value);
        }
        let client = ClientBuilder::new()
            .connect_timeout(http::connect_timeout())
            .timeout(http::request_timeout())
            .default_headers(headers)
            // Cookies set by the backend are replayed when no session cookie is configured.
            .cookie_store(true)
            // Redirects are inspected, not followed.
            .redirect(Policy::none())
            .build()?;
        Ok(Self {
            client,
            environment,
        })
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.environment.base_url().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    fn get(&self, endpoint: &str) -> RequestBuilder {
        self.client
            .get(self.build_url(endpoint))
            .header("User-Agent", USER_AGENT)
            .header("X-Build-Timestamp", BUILD_TIMESTAMP)
    }

    fn post(&self, endpoint: &str) -> RequestBuilder {
        self.client
            .post(self.build_url(endpoint))
            .header("User-Agent", USER_AGENT)
            .header("X-Build-Timestamp", BUILD_TIMESTAMP)
    }

    fn comments_request(&self, max_comments: Option<u32>) -> RequestBuilder {
        let request = self.get("/data");
        match max_comments {
            Some(max) => request.query(&[("maxComments", max)]),
            None => request,
        }
    }

    fn post_comment_request(&self, text: &str) -> RequestBuilder {
        self.post("/data").form(&[("text-input", text)])
    }

    fn delete_comment_request(&self, id: i64) -> RequestBuilder {
        self.post("/delete-data").form(&[("id", id)])
    }

    async fn handle_response_status(response: Response) -> Result<Response, BackendError> {
        if response.status().is_redirection() {
            return Err(Self::unexpected_redirect(&response));
        }
        if !response.status().is_success() {
            return Err(BackendError::from_response(response).await);
        }
        Ok(response)
    }

    /// Resolves the `Location` header against the request URL.
    fn redirect_target(response: &Response) -> Option<Url> {
        let location = response.headers().get(LOCATION)?.to_str().ok()?;
        response.url().join(location).ok()
    }

    fn unexpected_redirect(response: &Response) -> BackendError {
        let target = Self::redirect_target(response)
            .map(|url| url.to_string())
            .unwrap_or_else(|| "an unknown location".to_string());
        BackendError::Http {
            status: response.status().as_u16(),
            message: format!("Redirected to {}", target),
        }
    }

    /// A stored comment is answered with a redirect back to the page on the same host.
    /// Any other redirect, such as one to a login page, is a failure.
    async fn send_expecting_page_redirect(request: RequestBuilder) -> Result<(), BackendError> {
        let response = request.send().await?;
        if response.status().is_redirection() {
            return match Self::redirect_target(&response) {
                Some(target)
                    if target.path() == http::POST_REDIRECT_PATH
                        && target.origin() == response.url().origin() =>
                {
                    Ok(())
                }
                _ => Err(Self::unexpected_redirect(&response)),
            };
        }
        Self::handle_response_status(response).await?;
        Ok(())
    }

    async fn send_for_json<T: DeserializeOwned>(
        request: RequestBuilder,
    ) -> Result<T, BackendError> {
        let response = Self::handle_response_status(request.send().await?).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_no_response(request: RequestBuilder) -> Result<(), BackendError> {
        Self::handle_response_status(request.send().await?).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Backend for BackendClient {
    fn environment(&self) -> &Environment {
        &self.environment
    }

    async fn login_status(&self) -> Result<LoginStatus, BackendError> {
        debug!("GET /loginStat");
        Self::send_for_json(self.get("/loginStat")).await
    }

    async fn comments(&self, max_comments: Option<u32>) -> Result<Vec<Comment>, BackendError> {
        debug!("GET /data (maxComments={:?})", max_comments);
        Self::send_for_json(self.comments_request(max_comments)).await
    }

    async fn post_comment(&self, text: &str) -> Result<(), BackendError> {
        debug!("POST /data ({} chars)", text.len());
        Self::send_expecting_page_redirect(self.post_comment_request(text)).await
    }

    async fn delete_comment(&self, id: i64) -> Result<(), BackendError> {
        debug!("POST /delete-data id={}", id);
        Self::send_no_response(self.delete_comment_request(id)).await
    }

    async fn delete_all(&self) -> Result<(), BackendError> {
        debug!("POST /delete-all");
        Self::send_no_response(self.post("/delete-all")).await
    }

    async fn chart_data(&self) -> Result<TransientResponse, BackendError> {
        debug!("GET /chart-data");
        Self::send_for_json(self.get("/chart-data")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn client() -> BackendClient {
        client_for("http://127.0.0.1:9/", None)
    }

    fn client_for(base_url: &str, session_cookie: Option<&str>) -> BackendClient {
        BackendClient::new(
            Environment::Custom {
                base_url: base_url.to_string(),
            },
            session_cookie,
        )
        .unwrap()
    }

    fn body_of(request: RequestBuilder) -> String {
        let request = request.build().unwrap();
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap_or_default();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn http_response(status_line: &str, extra_headers: &[&str], body: &str) -> String {
        let mut response = format!("HTTP/1.1 {}\r\n", status_line);
        for header in extra_headers {
            response.push_str(header);
            response.push_str("\r\n");
        }
        response.push_str(&format!(
            "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        ));
        response
    }

    /// Answers one connection with `response` and hands back the raw request it read.
    async fn serve_once(response: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request
        });
        (base_url, handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).into_owned();
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|line| {
                        let line = line.to_ascii_lowercase();
                        line.strip_prefix("content-length:")
                            .and_then(|v| v.trim().parse::<usize>().ok())
                    })
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn delete_request_posts_form_encoded_id() {
        let request = client().delete_comment_request(42).build().unwrap();
        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "http://127.0.0.1:9/delete-data");
        assert_eq!(
            request.headers()["content-type"],
            "application/x-www-form-urlencoded"
        );
        assert_eq!(body_of(client().delete_comment_request(42)), "id=42");
    }

    #[test]
    fn comments_request_carries_bound_as_query() {
        let bounded = client().comments_request(Some(5)).build().unwrap();
        assert_eq!(bounded.url().path(), "/data");
        assert_eq!(bounded.url().query(), Some("maxComments=5"));

        let unbounded = client().comments_request(None).build().unwrap();
        assert_eq!(unbounded.url().query(), None);
    }

    #[test]
    fn post_comment_request_encodes_text() {
        assert_eq!(
            body_of(client().post_comment_request("hello there & bye")),
            "text-input=hello+there+%26+bye"
        );
    }

    #[test]
    fn requests_identify_the_client() {
        let request = client().get("/loginStat").build().unwrap();
        assert!(
            request.headers()["user-agent"]
                .to_str()
                .unwrap()
                .starts_with("portfolio-client/")
        );
        assert!(request.headers().contains_key("x-build-timestamp"));
    }

    #[test]
    fn session_cookie_with_control_characters_is_refused() {
        let result = BackendClient::new(Environment::Local, Some("SACSID=abc\ndef"));
        assert!(matches!(result, Err(BackendError::Validation(_))));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        // Port 9 (discard) is closed on test machines; the connect fails fast.
        let result = client().login_status().await;
        assert!(matches!(result, Err(BackendError::Network(_))));
    }

    #[tokio::test]
    async fn login_status_decodes_a_success_response() {
        let body = r#"{"userStatus":"True","userEmail":"ada@example.com"}"#;
        let (base_url, server) = serve_once(http_response("200 OK", &[], body)).await;

        let status = client_for(&base_url, None).login_status().await.unwrap();

        assert!(status.logged_in);
        assert_eq!(status.user_email, "ada@example.com");
        assert!(server.await.unwrap().starts_with("GET /loginStat "));
    }

    #[tokio::test]
    async fn server_error_carries_status_and_body() {
        let (base_url, _server) =
            serve_once(http_response("500 Internal Server Error", &[], " boom\n")).await;

        let result = client_for(&base_url, None).comments(Some(5)).await;

        match result {
            Err(BackendError::Http { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("expected an HTTP error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let (base_url, _server) =
            serve_once(http_response("200 OK", &[], "<html>not json</html>")).await;

        let result = client_for(&base_url, None).chart_data().await;

        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[tokio::test]
    async fn post_redirected_back_to_the_page_is_success() {
        let (base_url, server) = serve_once(http_response(
            "302 Found",
            &["Location: /index.html"],
            "",
        ))
        .await;

        client_for(&base_url, None).post_comment("hi").await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /data "));
        assert!(request.ends_with("text-input=hi"));
    }

    #[tokio::test]
    async fn post_redirected_to_login_is_an_error() {
        let (base_url, _server) = serve_once(http_response(
            "302 Found",
            &["Location: https://accounts.example.com/login?continue=/data"],
            "",
        ))
        .await;

        let result = client_for(&base_url, None).post_comment("hi").await;

        match result {
            Err(BackendError::Http { status, message }) => {
                assert_eq!(status, 302);
                assert!(message.contains("accounts.example.com/login"));
            }
            other => panic!("expected an HTTP error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn redirect_on_delete_is_an_error() {
        let (base_url, _server) = serve_once(http_response(
            "302 Found",
            &["Location: /index.html"],
            "",
        ))
        .await;

        let result = client_for(&base_url, None).delete_comment(3).await;

        assert!(matches!(result, Err(BackendError::Http { status: 302, .. })));
    }

    #[tokio::test]
    async fn session_cookie_is_sent_with_requests() {
        let (base_url, server) =
            serve_once(http_response("200 OK", &[], "[]")).await;

        let comments = client_for(&base_url, Some("SACSID=abc123"))
            .comments(None)
            .await
            .unwrap();

        assert!(comments.is_empty());
        let request = server.await.unwrap().to_ascii_lowercase();
        assert!(request.contains("\r\ncookie: sacsid=abc123\r\n"));
    }

    #[tokio::test]
    #[ignore] // This test requires a running backend on localhost:8080.
    async fn test_live_login_status() {
        let client = BackendClient::new(Environment::Local, None).unwrap();
        match client.login_status().await {
            Ok(status) => println!("Login status: {:?}", status),
            Err(e) => panic!("Failed to get login status: {}", e),
        }
    }
}

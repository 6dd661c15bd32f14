//! HTTP front end for the dashboard.
//!
//! Connections are handled one at a time and every request triggers a full
//! render pass, so there is no shared state to coordinate. A client gets
//! `request_timeout` to send its request head before it is dropped.

use std::time::Instant;

use anyhow::{Context, Result};
use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

use crate::dashboard::Dashboard;
use crate::filter::Selection;
use crate::logging::{self, log_request, obj, v_num, v_str, Domain};

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Response {
    fn html(body: String) -> Self {
        Self {
            status: 200,
            content_type: "text/html; charset=utf-8",
            body,
        }
    }

    fn json(body: String) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body,
        }
    }

    fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.into(),
        }
    }

    fn reason(&self) -> &'static str {
        match self.status {
            200 => "OK",
            400 => "Bad Request",
            404 => "Not Found",
            405 => "Method Not Allowed",
            408 => "Request Timeout",
            414 => "URI Too Long",
            431 => "Request Header Fields Too Large",
            _ => "Internal Server Error",
        }
    }

    pub fn to_http(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\n\
             Content-Type: {}\r\n\
             Content-Length: {}\r\n\
             Cache-Control: no-store\r\n\
             Connection: close\r\n\r\n{}",
            self.status,
            self.reason(),
            self.content_type,
            self.body.len(),
            self.body
        )
    }
}

fn server_error(err: anyhow::Error) -> Response {
    logging::error(
        Domain::Render,
        "render_failed",
        obj(&[("error", v_str(&format!("{:#}", err)))]),
    );
    Response::text(500, format!("{:#}", err))
}

fn with_selection(query: &str, f: impl FnOnce(Selection) -> Response) -> Response {
    match Selection::from_query(query) {
        Ok(sel) => f(sel),
        Err(err) => Response::text(400, err.to_string()),
    }
}

/// Answer one request. `target` is the request-target from the request
/// line (path plus optional query).
pub fn route(dashboard: &Dashboard, method: &str, target: &str) -> Response {
    if method != "GET" {
        return Response::text(405, "only GET is supported");
    }
    let (path, query) = target.split_once('?').unwrap_or((target, ""));

    match path {
        "/" | "/index.html" => with_selection(query, |sel| match dashboard.render(sel) {
            Ok(page) => Response::html(page.html),
            Err(err) => server_error(err),
        }),
        "/counts" => match dashboard.counts_page() {
            Ok(html) => Response::html(html),
            Err(err) => server_error(err),
        },
        "/api/bias" => with_selection(query, |sel| match dashboard.bias_json(sel) {
            Ok(value) => Response::json(value.to_string()),
            Err(err) => server_error(err),
        }),
        "/api/health" => Response::json(json!({"status": "ok"}).to_string()),
        _ => Response::text(404, "Not Found"),
    }
}

pub const MAX_REQUEST_LINE: usize = 8 * 1024;
pub const MAX_HEADER_LINES: usize = 100;

#[derive(Debug, PartialEq)]
pub enum RequestHead {
    /// The client closed the connection before sending anything.
    Closed,
    Line(String),
    Rejected(Response),
}

/// Read one line of at most `limit` bytes. `None` means the line did not
/// end within the limit.
async fn read_bounded_line<R>(reader: &mut R, limit: usize) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let n = (&mut *reader).take(limit as u64).read_line(&mut line).await?;
    if n == limit && !line.ends_with('\n') {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Read the request line and skip past the headers.
pub async fn read_request_head<R>(reader: &mut R) -> std::io::Result<RequestHead>
where
    R: AsyncBufRead + Unpin,
{
    let request_line = match read_bounded_line(reader, MAX_REQUEST_LINE).await? {
        Some(line) if line.is_empty() => return Ok(RequestHead::Closed),
        Some(line) => line,
        None => {
            return Ok(RequestHead::Rejected(Response::text(414, "request line too long")));
        }
    };

    // Headers are not used; read them off so the client sees a clean close.
    for _ in 0..MAX_HEADER_LINES {
        match read_bounded_line(reader, MAX_REQUEST_LINE).await? {
            Some(line) if line.trim().is_empty() => return Ok(RequestHead::Line(request_line)),
            Some(_) => {}
            None => break,
        }
    }
    Ok(RequestHead::Rejected(Response::text(431, "request headers too large")))
}

async fn handle_connection(dashboard: &Dashboard, stream: &mut TcpStream) -> Result<()> {
    let (reader, mut writer) = stream.split();
    let mut reader = BufReader::new(reader);

    let limit = dashboard.config().request_timeout;
    let response = match timeout(limit, read_request_head(&mut reader)).await {
        Err(_) => {
            logging::warn(
                Domain::Http,
                "request_timeout",
                obj(&[("after_ms", v_num(limit.as_millis() as f64))]),
            );
            Response::text(408, "request timed out")
        }
        Ok(head) => match head? {
            RequestHead::Closed => return Ok(()),
            RequestHead::Rejected(response) => response,
            RequestHead::Line(request_line) => {
                let started = Instant::now();
                let mut parts = request_line.split_whitespace();
                let method = parts.next().unwrap_or("");
                let target = parts.next().unwrap_or("/");
                let response = route(dashboard, method, target);
                log_request(
                    method,
                    target,
                    response.status,
                    started.elapsed().as_secs_f64() * 1000.0,
                );
                response
            }
        },
    };

    writer.write_all(response.to_http().as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

pub async fn serve(dashboard: Dashboard) -> Result<()> {
    let addr = dashboard.config().listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    serve_listener(listener, dashboard).await
}

/// Accept loop on an already bound listener.
pub async fn serve_listener(listener: TcpListener, dashboard: Dashboard) -> Result<()> {
    let addr = listener
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| dashboard.config().listen_addr());
    logging::info(
        Domain::System,
        "listening",
        obj(&[
            ("addr", v_str(&addr)),
            ("msg", v_str(&format!("dashboard at http://{}/", addr))),
        ]),
    );

    loop {
        let (mut stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(err) => {
                logging::warn(
                    Domain::Http,
                    "accept_failed",
                    obj(&[("error", v_str(&err.to_string()))]),
                );
                continue;
            }
        };
        if let Err(err) = handle_connection(&dashboard, &mut stream).await {
            logging::warn(
                Domain::Http,
                "connection_failed",
                obj(&[
                    ("peer", v_str(&peer.to_string())),
                    ("error", v_str(&format!("{:#}", err))),
                ]),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn head_of(raw: &[u8]) -> RequestHead {
        let mut reader = raw;
        read_request_head(&mut reader).await.unwrap()
    }

    #[tokio::test]
    async fn test_request_line_and_headers() {
        let head = head_of(b"GET /api/health HTTP/1.1\r\nHost: x\r\n\r\nleftover").await;
        assert_eq!(head, RequestHead::Line("GET /api/health HTTP/1.1\r\n".to_string()));
        assert_eq!(head_of(b"").await, RequestHead::Closed);
    }

    #[tokio::test]
    async fn test_oversized_request_line_is_rejected() {
        let mut raw = b"GET /".to_vec();
        raw.extend(std::iter::repeat(b'a').take(MAX_REQUEST_LINE));
        raw.extend_from_slice(b" HTTP/1.1\r\n\r\n");
        match head_of(&raw).await {
            RequestHead::Rejected(resp) => assert_eq!(resp.status, 414),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_too_many_headers_is_rejected() {
        let mut raw = b"GET / HTTP/1.1\r\n".to_vec();
        for i in 0..=MAX_HEADER_LINES {
            raw.extend_from_slice(format!("X-{}: y\r\n", i).as_bytes());
        }
        raw.extend_from_slice(b"\r\n");
        match head_of(&raw).await {
            RequestHead::Rejected(resp) => assert_eq!(resp.status, 431),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_timeout_status_line() {
        let resp = Response::text(408, "request timed out");
        assert!(resp.to_http().starts_with("HTTP/1.1 408 Request Timeout\r\n"));
    }
}

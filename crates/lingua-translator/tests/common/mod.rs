//! Minimal HTTP/1.1 server that records requests and replies with canned JSON

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::time::Duration;

use kanal::AsyncReceiver;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl CapturedRequest {
    pub fn form(&self) -> BTreeMap<String, String> {
        parse_pairs(&self.body)
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is not JSON")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }
}

/// `application/x-www-form-urlencoded` pairs, also used for query strings
fn parse_pairs(encoded: &str) -> BTreeMap<String, String> {
    encoded
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect()
}

fn decode(part: &str) -> String {
    let part = part.replace('+', " ");
    let decoded = match urlencoding::decode(&part) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => part.clone(),
    };
    decoded
}

pub struct FakeServer {
    pub url: String,
    requests: AsyncReceiver<CapturedRequest>,
}

impl FakeServer {
    /// Next recorded request, panics after two seconds
    pub async fn request(&self) -> CapturedRequest {
        timeout(Duration::from_secs(2), self.requests.recv())
            .await
            .expect("no request reached the fake server")
            .expect("fake server stopped")
    }

    pub async fn assert_no_request(&self) {
        let received = timeout(Duration::from_millis(200), self.requests.recv()).await;
        assert!(received.is_err(), "unexpected request: {received:?}");
    }
}

/// Answer every request with `status` and `body`
pub async fn serve(status: u16, body: impl Into<String>) -> FakeServer {
    let body = body.into();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/translate", listener.local_addr().unwrap());
    let (tx, rx) = kanal::unbounded_async();

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let Some(request) = read_request(&mut stream).await else {
                continue;
            };
            let _ = tx.send(request).await;

            let response = format!(
                "HTTP/1.1 {status} Fake\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    FakeServer { url, requests: rx }
}

/// Accept connections and never answer
pub async fn serve_silence() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/translate", listener.local_addr().unwrap());

    tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            open.push(stream);
        }
    });

    url
}

/// URL of a port nothing listens on
pub async fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/translate")
}

async fn read_request(stream: &mut TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let headers: BTreeMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_lowercase(), v.trim().to_string()))
        .collect();

    let content_length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (
            path.to_string(),
            parse_pairs(query),
        ),
        None => (target, BTreeMap::new()),
    };

    Some(CapturedRequest {
        method,
        path,
        query,
        headers,
        body,
    })
}

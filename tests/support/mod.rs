//! Minimal in-process HTTP fixture server for exercising provider traffic
//! without the network.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{Duration as DateDelta, NaiveDate};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub struct FixtureResponse {
    pub status: u16,
    pub body: String,
}

impl FixtureResponse {
    pub fn ok(body: String) -> Self {
        Self { status: 200, body }
    }

    pub fn error(status: u16) -> Self {
        Self {
            status,
            body: r#"{"reason":"fixture error"}"#.to_string(),
        }
    }
}

pub struct FixtureServer {
    addr: SocketAddr,
    handle: tokio::task::JoinHandle<()>,
}

impl FixtureServer {
    /// Starts a server on an ephemeral port. The responder sees the raw
    /// request head (request line plus headers) of every request.
    pub async fn spawn<F>(responder: F) -> Self
    where
        F: Fn(&str) -> FixtureResponse + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let responder = Arc::new(responder);
        let handle = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let responder = Arc::clone(&responder);
                tokio::spawn(async move {
                    serve_one(stream, responder).await;
                });
            }
        });
        Self { addr, handle }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve_one<F>(mut stream: TcpStream, responder: Arc<F>)
where
    F: Fn(&str) -> FixtureResponse + Send + Sync + 'static,
{
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        let Ok(n) = stream.read(&mut buf).await else {
            return;
        };
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
        if head.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }

    let head = String::from_utf8_lossy(&head).into_owned();
    let response = responder(&head);
    let reason = match response.status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        _ => "Unknown",
    };
    let reply = format!(
        "HTTP/1.1 {} {reason}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        response.status,
        response.body.len(),
        response.body
    );
    let _ = stream.write_all(reply.as_bytes()).await;
    let _ = stream.shutdown().await;
}

/// Pulls a query parameter out of a raw request head.
pub fn query_param(head: &str, name: &str) -> Option<String> {
    let needle = format!("{name}=");
    let start = head.find(&needle)? + needle.len();
    let rest = &head[start..];
    let end = rest
        .find(|c| c == '&' || c == ' ' || c == '\r')
        .unwrap_or(rest.len());
    Some(rest[..end].to_string())
}

/// Builds an Open-Meteo style columnar body covering an inclusive date
/// range, every day carrying the same set of values.
pub fn open_meteo_body(start: NaiveDate, end: NaiveDate, temp_max: f64) -> String {
    let mut time = Vec::new();
    let mut cursor = start;
    while cursor <= end {
        time.push(cursor.format("%Y-%m-%d").to_string());
        cursor = cursor + DateDelta::days(1);
    }
    let days = time.len();
    json!({
        "daily": {
            "time": time,
            "temperature_2m_max": vec![temp_max; days],
            "temperature_2m_min": vec![temp_max - 10.0; days],
            "temperature_2m_mean": vec![temp_max - 5.0; days],
            "precipitation_sum": vec![0.4; days],
            "windspeed_10m_max": vec![14.0; days],
            "windgusts_10m_max": vec![31.0; days],
        }
    })
    .to_string()
}

/// Builds a Meteostat style row body for a single day.
pub fn meteostat_body(date: NaiveDate, temp_max: f64) -> String {
    json!({
        "data": [{
            "date": date.format("%Y-%m-%d").to_string(),
            "tavg": temp_max - 5.0,
            "tmin": temp_max - 10.0,
            "tmax": temp_max,
            "prcp": 1.2,
            "snow": null,
            "wdir": 210,
            "wspd": 9.5,
            "wpgt": 24.0,
            "pres": 1015.2,
            "tsun": null
        }]
    })
    .to_string()
}

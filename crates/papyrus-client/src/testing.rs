// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Test doubles: a scripted in-memory backend and a one-shot HTTP stub server.

use std::collections::VecDeque;
use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use image::{DynamicImage, ImageFormat, RgbImage};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use papyrus_core::error::{PapyrusError, Result};
use papyrus_core::types::{Point, PointSet, TaskId};
use papyrus_document::SourceImage;

use crate::api::PapyrusApi;
use crate::protocol::{ResultResponse, SubmitResponse};

/// A small PNG named `corners.png`.
pub fn sample_image() -> SourceImage {
    let img = DynamicImage::ImageRgb8(RgbImage::new(8, 6));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    SourceImage::from_bytes(buf, "corners.png").unwrap()
}

/// A complete, already ordered selection inside an 8x6 image.
pub fn sample_points() -> PointSet {
    let mut set = PointSet::new();
    for (x, y) in [(0.0, 0.0), (8.0, 0.0), (8.0, 6.0), (0.0, 6.0)] {
        set.push(Point::new(x, y));
    }
    set
}

pub fn accepted(task_id: &str) -> Result<SubmitResponse> {
    Ok(SubmitResponse {
        status: "queued".into(),
        task_id: Some(task_id.into()),
    })
}

pub fn status(query_status: &str) -> Result<ResultResponse> {
    Ok(ResultResponse {
        query_status: query_status.into(),
        query_result: Vec::new(),
    })
}

pub fn success(urls: &[&str]) -> Result<ResultResponse> {
    Ok(ResultResponse {
        query_status: "SUCCESS".into(),
        query_result: urls.iter().map(|u| u.to_string()).collect(),
    })
}

/// Backend fake replaying scripted responses in order.
///
/// Once the status script runs out every status request answers `PENDING`.
#[derive(Default)]
pub struct FakeApi {
    submit_script: Mutex<VecDeque<Result<SubmitResponse>>>,
    status_script: Mutex<VecDeque<Result<ResultResponse>>>,
    /// Every submission received: (file name, coordinates JSON).
    pub submissions: Mutex<Vec<(String, String)>>,
    /// Every task id polled, in order.
    pub polls: Mutex<Vec<String>>,
    poll_delay: Duration,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FakeApi {
    pub fn new(submit: Vec<Result<SubmitResponse>>, statuses: Vec<Result<ResultResponse>>) -> Self {
        Self {
            submit_script: Mutex::new(submit.into_iter().collect()),
            status_script: Mutex::new(statuses.into_iter().collect()),
            ..Default::default()
        }
    }

    /// Make each status request take `delay` before answering.
    pub fn with_poll_delay(mut self, delay: Duration) -> Self {
        self.poll_delay = delay;
        self
    }

    pub fn poll_count(&self) -> usize {
        self.polls.lock().unwrap().len()
    }
}

impl PapyrusApi for FakeApi {
    async fn submit(&self, image: &SourceImage, coordinates: String) -> Result<SubmitResponse> {
        self.submissions
            .lock()
            .unwrap()
            .push((image.file_name().to_string(), coordinates));
        self.submit_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PapyrusError::Submission("no scripted response".into())))
    }

    async fn task_result(&self, task_id: &TaskId) -> Result<ResultResponse> {
        self.polls.lock().unwrap().push(task_id.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if self.poll_delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.poll_delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.status_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| status("PENDING"))
    }
}

/// HTTP server that answers exactly one request with a canned JSON body and
/// hands back the raw request it received.
pub struct StubServer {
    addr: SocketAddr,
    request_rx: oneshot::Receiver<String>,
}

impl StubServer {
    pub async fn start(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let body = body.to_string();
        let (tx, request_rx) = oneshot::channel();

        tokio::spawn(async move {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let request = read_request(&mut stream).await;
            let reason = if status < 400 { "OK" } else { "Error" };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
            let _ = tx.send(request);
        });

        Self { addr, request_rx }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// The raw request text (binary parts decoded lossily).
    pub async fn request(self) -> String {
        tokio::time::timeout(Duration::from_secs(5), self.request_rx)
            .await
            .expect("stub server saw no request")
            .expect("stub server task died")
    }
}

async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..head_end]).to_ascii_lowercase();
        let body_len = buf.len() - (head_end + 4);
        let content_length = head.lines().find_map(|line| {
            line.strip_prefix("content-length:")
                .and_then(|v| v.trim().parse::<usize>().ok())
        });
        match content_length {
            Some(expected) if body_len >= expected => break,
            Some(_) => continue,
            None if head.contains("transfer-encoding: chunked") => {
                if buf.ends_with(b"0\r\n\r\n") {
                    break;
                }
            }
            None => break,
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

//! Minimal HTTP/1.1 transfer service for integration tests.
//!
//! Verifies the `x-date` / `Authorization` signature of every request on its
//! own (independently of the client signer) and serves the job endpoints from
//! in-memory state. Unsigned or badly signed requests get 401.

use base64::Engine;
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use serde_json::{json, Value};
use sha1::Sha1;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct Job {
    pub finished: Vec<String>,
    pub pending: Vec<String>,
    pub failed: Vec<String>,
}

/// (size, speed, percentage); -1 means unknown.
pub type Metrics = (i64, i64, i64);

/// One request as the service saw it.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct ServiceState {
    pub access_key: String,
    pub secret_key: String,
    pub jobs: HashMap<String, Job>,
    pub metrics: HashMap<String, Metrics>,
    /// Answer `/joburlsinfo` in reverse request order.
    pub reverse_url_info: bool,
    pub schedule: Option<Value>,
    pub suspended: Vec<String>,
    pub seen: Vec<Seen>,
    next_job: u32,
}

#[derive(Clone)]
pub struct TransferService {
    pub base_url: String,
    pub state: Arc<Mutex<ServiceState>>,
}

impl TransferService {
    pub fn add_job(&self, id: &str, job: Job) {
        self.state.lock().unwrap().jobs.insert(id.to_string(), job);
    }

    pub fn set_metrics(&self, url: &str, m: Metrics) {
        self.state.lock().unwrap().metrics.insert(url.to_string(), m);
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.state.lock().unwrap().seen.clone()
    }

    pub fn seen_paths(&self) -> Vec<String> {
        self.seen().into_iter().map(|s| s.path).collect()
    }
}

/// Starts the service in a background thread accepting the given keys.
/// Runs until the process exits.
pub fn start(access_key: &str, secret_key: &str) -> TransferService {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let state = Arc::new(Mutex::new(ServiceState {
        access_key: access_key.to_string(),
        secret_key: secret_key.to_string(),
        ..ServiceState::default()
    }));
    let shared = Arc::clone(&state);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let state = Arc::clone(&shared);
            thread::spawn(move || handle(stream, &state));
        }
    });
    TransferService {
        base_url: format!("http://127.0.0.1:{port}"),
        state,
    }
}

struct Request {
    method: String,
    target: String,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut data = Vec::new();
    let mut buf = [0u8; 8192];
    let header_end = loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };
    let head = std::str::from_utf8(&data[..header_end]).ok()?.to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();
    let headers: HashMap<String, String> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();
    let len: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let mut body = data[header_end + 4..].to_vec();
    while body.len() < len {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&buf[..n]);
    }
    Some(Request {
        method,
        target,
        headers,
        body,
    })
}

fn respond(stream: &mut TcpStream, status: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

fn expected_authorization(state: &ServiceState, req: &Request, path: &str) -> Option<String> {
    let date = req.headers.get("x-date")?;
    let digest = hex::encode(Md5::digest(&req.body));
    let canonical = format!("{}\n{}\n{}\n{}", req.method, date, digest, path);
    let mut mac = Hmac::<Sha1>::new_from_slice(state.secret_key.as_bytes()).ok()?;
    mac.update(canonical.as_bytes());
    let sig = base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes());
    Some(format!("{}:{}", state.access_key, sig))
}

fn handle(mut stream: TcpStream, state: &Mutex<ServiceState>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some(req) = read_request(&mut stream) else {
        return;
    };
    let parsed = match url::Url::parse(&format!("http://service{}", req.target)) {
        Ok(u) => u,
        Err(_) => return respond(&mut stream, "400 Bad Request", "bad target"),
    };
    let path = parsed.path().to_string();
    let query: HashMap<String, String> = parsed.query_pairs().into_owned().collect();

    let mut st = state.lock().unwrap();
    st.seen.push(Seen {
        method: req.method.clone(),
        path: path.clone(),
        query: query.clone(),
        body: req.body.clone(),
    });

    let expected = expected_authorization(&st, &req, &path);
    if expected.is_none() || req.headers.get("authorization") != expected.as_ref() {
        return respond(&mut stream, "401 Unauthorized", "Failed to authenticate request");
    }

    let job_id = query.get("jobid").cloned().unwrap_or_default();
    let (status, body) = route(&mut st, &req.method, &path, &job_id, &req.body);
    drop(st);
    respond(&mut stream, status, &body);
}

fn metrics_json(st: &ServiceState, url: &str) -> Value {
    let (size, speed, pct) = st.metrics.get(url).copied().unwrap_or((-1, -1, -1));
    json!({"url": url, "size": size, "speed": speed, "percentage": pct})
}

fn route(
    st: &mut ServiceState,
    method: &str,
    path: &str,
    job_id: &str,
    body: &[u8],
) -> (&'static str, String) {
    match (method, path) {
        ("GET", "/status") => match st.jobs.get(job_id) {
            Some(job) => {
                // Empty lists go out as null, like the real service.
                let failed = if job.failed.is_empty() {
                    Value::Null
                } else {
                    json!(job.failed)
                };
                let body = json!({
                    "jobid": job_id,
                    "success-files": job.finished,
                    "queued-files": job.pending,
                    "failed-files": failed,
                });
                ("200 OK", body.to_string())
            }
            None => ("404 Not Found", format!("No such job: {job_id}")),
        },
        ("POST", "/joburlsinfo") => {
            let Ok(urls) = serde_json::from_slice::<Vec<String>>(body) else {
                return ("400 Bad Request", "bad url list".to_string());
            };
            let mut infos: Vec<Value> = urls.iter().map(|u| metrics_json(st, u)).collect();
            if st.reverse_url_info {
                infos.reverse();
            }
            ("200 OK", Value::Array(infos).to_string())
        }
        ("PUT", "/transferjob") => {
            let Ok(req) = serde_json::from_slice::<Value>(body) else {
                return ("400 Bad Request", "bad job".to_string());
            };
            st.next_job += 1;
            let id = format!("job-{}", st.next_job);
            let pending = req["origin-files"]
                .as_array()
                .map(|a| a.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
                .unwrap_or_default();
            st.jobs.insert(
                id.clone(),
                Job {
                    pending,
                    ..Job::default()
                },
            );
            ("202 Accepted", json!({ "jobid": id }).to_string())
        }
        ("GET", "/finishedsize") => {
            let total: i64 = st.metrics.values().filter(|m| m.2 == 100).map(|m| m.0).sum();
            ("200 OK", json!({ "finished-size": total }).to_string())
        }
        ("GET", "/currentspeed") => (
            "200 OK",
            json!({"upload-speed": 5, "download-speed": 9}).to_string(),
        ),
        ("GET", "/jobdetail") => match st.jobs.get(job_id) {
            Some(job) => {
                let rows: Vec<Value> = [
                    (&job.finished, "Finished"),
                    (&job.pending, "Pending"),
                    (&job.failed, "Failed"),
                ]
                .into_iter()
                .flat_map(|(urls, status)| {
                    urls.iter().map(move |u| (u.clone(), status))
                })
                .map(|(u, status)| {
                    let mut v = metrics_json(st, &u);
                    v["status"] = json!(status);
                    v
                })
                .collect();
                ("200 OK", Value::Array(rows).to_string())
            }
            None => ("404 Not Found", format!("No such job: {job_id}")),
        },
        ("GET", "/joblist") => {
            let mut ids: Vec<&String> = st.jobs.keys().collect();
            ids.sort();
            let rows: Vec<Value> = ids
                .into_iter()
                .filter(|id| job_id.is_empty() || id.as_str() == job_id)
                .map(|id| json!({"jobid": id, "create-time": 1546300800, "complete-time": 0, "satus": "Pending"}))
                .collect();
            ("200 OK", Value::Array(rows).to_string())
        }
        ("POST", "/suspendjob") => {
            st.suspended.push(job_id.to_string());
            ("200 OK", String::new())
        }
        ("POST", "/resumejob") => {
            st.suspended.retain(|j| j != job_id);
            ("200 OK", String::new())
        }
        ("PUT", "/schedule") => {
            st.schedule = serde_json::from_slice(body).ok();
            ("200 OK", String::new())
        }
        _ => ("404 Not Found", format!("no route for {method} {path}")),
    }
}

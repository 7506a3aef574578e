//! Minimal HTTP server answering fixed responses per route.
//!
//! Each route is keyed by request line prefix (`"POST /auth/login"`) and can
//! be changed while the server runs. Unknown routes answer 404. Every
//! connection is closed after one response.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

type Routes = Arc<Mutex<HashMap<String, (u16, String)>>>;

pub struct StubServer {
    pub url: String,
    routes: Routes,
    requests: Arc<Mutex<Vec<String>>>,
    task: JoinHandle<()>,
}

impl StubServer {
    /// Start a server answering `routes` of `(route, status, body)`.
    pub async fn start(routes: &[(&str, u16, serde_json::Value)]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub HTTP server");
        let url = format!(
            "http://{}",
            listener.local_addr().expect("get stub server address")
        );

        let routes: Routes = Arc::new(Mutex::new(
            routes
                .iter()
                .map(|(route, status, body)| ((*route).to_string(), (*status, body.to_string())))
                .collect(),
        ));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let (table, seen) = (routes.clone(), requests.clone());
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = table.clone();
                let seen = seen.clone();
                tokio::spawn(async move {
                    serve(stream, &routes, &seen).await;
                });
            }
        });

        Self {
            url,
            routes,
            requests,
            task,
        }
    }

    /// Replace the response for `route`.
    pub fn respond(&self, route: &str, status: u16, body: serde_json::Value) {
        self.routes
            .lock()
            .expect("routes lock")
            .insert(route.to_string(), (status, body.to_string()));
    }

    /// Request lines received so far, e.g. `"POST /auth/logout"`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn received(&self, route: &str) -> bool {
        self.requests().iter().any(|r| r == route)
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(
    mut stream: TcpStream,
    routes: &Mutex<HashMap<String, (u16, String)>>,
    seen: &Mutex<Vec<String>>,
) {
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    let head = loop {
        let Ok(n) = stream.read(&mut buf).await else {
            return;
        };
        if n == 0 {
            return;
        }
        request.extend_from_slice(&buf[..n]);
        let text = String::from_utf8_lossy(&request);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let headers = &text[..header_end];
            let content_length: usize = headers
                .lines()
                .find(|l| l.to_lowercase().starts_with("content-length:"))
                .and_then(|l| l.split(':').nth(1))
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0);
            if request.len() >= header_end + 4 + content_length {
                break headers.to_string();
            }
        }
    };

    // "POST /auth/login HTTP/1.1" -> "POST /auth/login"
    let route = head
        .lines()
        .next()
        .unwrap_or_default()
        .rsplit_once(' ')
        .map(|(route, _)| route.to_string())
        .unwrap_or_default();
    seen.lock().expect("requests lock").push(route.clone());

    let (status, body) = routes
        .lock()
        .expect("routes lock")
        .get(&route)
        .cloned()
        .unwrap_or((404, r#"{"error":"not found"}"#.to_string()));
    let response = format!(
        "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.flush().await;
}

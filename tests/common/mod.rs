#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicIsize, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use warp::http::StatusCode;
use warp::Filter;

use davaria::api::PanelClient;
use davaria::feedback::{Feedback, LoadingGuard, ToastLevel};
use davaria::video::VideoFilterConfig;
use davaria::Panel;

pub const MB: u64 = 1024 * 1024;

/// In-process stand-in for the panel backend.
#[derive(Default)]
pub struct MockBackend {
    pub hits: AtomicUsize,
    pub webdav: AtomicBool,
    pub aria2: AtomicBool,
    pub listings: Mutex<HashMap<String, Value>>,
    pub jobs: Mutex<Value>,
    pub submissions: Mutex<Vec<Value>>,
    pub actions: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new(webdav: bool, aria2: bool) -> Arc<Self> {
        let backend = Self::default();
        backend.webdav.store(webdav, Ordering::SeqCst);
        backend.aria2.store(aria2, Ordering::SeqCst);
        *backend.jobs.lock().unwrap() = json!([]);
        Arc::new(backend)
    }

    pub fn with_listing(self: &Arc<Self>, path: &str, files: Value) -> Arc<Self> {
        self.listings
            .lock()
            .unwrap()
            .insert(path.to_string(), files);
        Arc::clone(self)
    }

    pub fn set_jobs(&self, jobs: Value) {
        *self.jobs.lock().unwrap() = jobs;
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> Vec<Value> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().unwrap().clone()
    }
}

fn reply(status: StatusCode, body: Value) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(&body), status)
}

/// Serves `backend` on an ephemeral port and returns its base URL.
pub async fn serve(backend: Arc<MockBackend>) -> String {
    let b = Arc::clone(&backend);
    let status = warp::path!("api" / "status").and(warp::get()).map(move || {
        reply(
            StatusCode::OK,
            json!({
                "webdav_connected": b.webdav.load(Ordering::SeqCst),
                "aria2_connected": b.aria2.load(Ordering::SeqCst),
            }),
        )
    });

    let b = Arc::clone(&backend);
    let connect_webdav = warp::path!("api" / "connect" / "webdav")
        .and(warp::post())
        .and(warp::body::form::<HashMap<String, String>>())
        .map(move |form: HashMap<String, String>| {
            if form.get("webdav_url").map(String::as_str) == Some("http://down.local/") {
                b.webdav.store(false, Ordering::SeqCst);
                return reply(StatusCode::BAD_GATEWAY, json!({"detail": "WebDAV unreachable"}));
            }
            let ok = form.get("webdav_url").map(String::as_str) == Some("http://dav.local/")
                && form.get("password").map(String::as_str) == Some("secret");
            b.webdav.store(ok, Ordering::SeqCst);
            if ok {
                reply(StatusCode::OK, json!({"success": true, "message": "WebDAV connected"}))
            } else {
                reply(StatusCode::OK, json!({"success": false, "message": "401 Unauthorized"}))
            }
        });

    let b = Arc::clone(&backend);
    let connect_aria2 = warp::path!("api" / "connect" / "aria2")
        .and(warp::post())
        .and(warp::body::form::<HashMap<String, String>>())
        .map(move |form: HashMap<String, String>| {
            let ok = form.get("aria2_secret").map(String::as_str) == Some("token");
            b.aria2.store(ok, Ordering::SeqCst);
            reply(StatusCode::OK, json!({"success": ok}))
        });

    let b = Arc::clone(&backend);
    let files = warp::path!("api" / "files")
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .map(move |query: HashMap<String, String>| {
            let path = query.get("path").cloned().unwrap_or_else(|| "/".to_string());
            if path == "/broken" {
                return reply(StatusCode::BAD_REQUEST, json!({"detail": "WebDAV not connected"}));
            }
            match b.listings.lock().unwrap().get(&path) {
                Some(files) => reply(
                    StatusCode::OK,
                    json!({"success": true, "files": files, "current_path": path}),
                ),
                None => reply(
                    StatusCode::OK,
                    json!({"success": false, "message": format!("Failed to list {path}: 404")}),
                ),
            }
        });

    let b = Arc::clone(&backend);
    let download = warp::path!("api" / "download")
        .and(warp::post())
        .and(warp::body::json::<Value>())
        .map(move |body: Value| {
            let mut results = Vec::new();
            for file in body["files"].as_array().cloned().unwrap_or_default() {
                let name = file["name"].as_str().unwrap_or_default().to_string();
                if file["is_directory"].as_bool().unwrap_or(false) {
                    for i in 0..3 {
                        results.push(json!({"filename": format!("{name}/{i}.mkv"), "success": true}));
                    }
                } else if name.contains("fail") {
                    results.push(json!({"filename": name, "success": false, "message": "rejected by aria2"}));
                } else {
                    results.push(json!({"filename": name, "success": true, "gid": "0001"}));
                }
            }
            b.submissions.lock().unwrap().push(body);
            reply(StatusCode::OK, json!({"success": true, "results": results}))
        });

    let b = Arc::clone(&backend);
    let jobs = warp::path!("api" / "aria2" / "downloads")
        .and(warp::get())
        .map(move || {
            let jobs = b.jobs.lock().unwrap().clone();
            reply(StatusCode::OK, json!({"success": true, "downloads": jobs}))
        });

    let b = Arc::clone(&backend);
    let pause = warp::path!("api" / "aria2" / "pause" / String)
        .and(warp::post())
        .map(move |gid: String| {
            b.actions.lock().unwrap().push(format!("pause:{gid}"));
            reply(StatusCode::OK, json!({"success": true, "message": "paused"}))
        });

    let b = Arc::clone(&backend);
    let resume = warp::path!("api" / "aria2" / "resume" / String)
        .and(warp::post())
        .map(move |gid: String| {
            b.actions.lock().unwrap().push(format!("resume:{gid}"));
            reply(StatusCode::OK, json!({"success": false, "message": "GID not found"}))
        });

    let b = Arc::clone(&backend);
    let remove = warp::path!("api" / "aria2" / "remove" / String)
        .and(warp::delete())
        .map(move |gid: String| {
            b.actions.lock().unwrap().push(format!("remove:{gid}"));
            reply(StatusCode::OK, json!({"success": true, "message": "removed"}))
        });

    let b = Arc::clone(&backend);
    let daemon = warp::path!("api" / "aria2" / "status")
        .and(warp::get())
        .map(move || {
            let connected = b.aria2.load(Ordering::SeqCst);
            reply(
                StatusCode::OK,
                json!({"connected": connected, "version": {"version": "1.37.0", "enabledFeatures": []}}),
            )
        });

    let counter = Arc::clone(&backend);
    let routes = status
        .or(connect_webdav)
        .or(connect_aria2)
        .or(files)
        .or(download)
        .or(jobs)
        .or(pause)
        .or(resume)
        .or(remove)
        .or(daemon)
        .with(warp::log::custom(move |_| {
            counter.hits.fetch_add(1, Ordering::SeqCst);
        }));

    let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    format!("http://{}", addr)
}

/// Feedback that records instead of printing.
#[derive(Clone, Default)]
pub struct RecordingFeedback {
    pub toasts: Arc<Mutex<Vec<(ToastLevel, String)>>>,
    pub loading_depth: Arc<AtomicIsize>,
    pub loading_count: Arc<AtomicUsize>,
    pub confirm_answer: Arc<AtomicBool>,
    pub prompts: Arc<AtomicUsize>,
}

impl RecordingFeedback {
    pub fn toasts(&self) -> Vec<(ToastLevel, String)> {
        self.toasts.lock().unwrap().clone()
    }

    pub fn has_toast(&self, level: ToastLevel, needle: &str) -> bool {
        self.toasts()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }

    pub fn answer(&self, yes: bool) {
        self.confirm_answer.store(yes, Ordering::SeqCst);
    }

    pub fn depth(&self) -> isize {
        self.loading_depth.load(Ordering::SeqCst)
    }
}

impl Feedback for RecordingFeedback {
    fn toast(&self, level: ToastLevel, message: &str) {
        self.toasts.lock().unwrap().push((level, message.to_string()));
    }

    fn loading(&self, _label: &str) -> LoadingGuard {
        self.loading_count.fetch_add(1, Ordering::SeqCst);
        self.loading_depth.fetch_add(1, Ordering::SeqCst);
        let depth = Arc::clone(&self.loading_depth);
        LoadingGuard::new(move || {
            depth.fetch_sub(1, Ordering::SeqCst);
        })
    }

    fn confirm(&self, _question: &str) -> bool {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        self.confirm_answer.load(Ordering::SeqCst)
    }
}

pub fn panel(server: &str, filter: VideoFilterConfig) -> (Panel, RecordingFeedback) {
    let feedback = RecordingFeedback::default();
    let client = PanelClient::new(server, None, None).unwrap();
    let panel = Panel::new(client, filter, Box::new(feedback.clone()));
    (panel, feedback)
}

pub fn file(dir: &str, name: &str, size: u64) -> Value {
    json!({
        "name": name,
        "path": format!("{}/{}", dir.trim_end_matches('/'), name),
        "is_directory": false,
        "size": size,
    })
}

pub fn folder(dir: &str, name: &str) -> Value {
    json!({
        "name": name,
        "path": format!("{}/{}", dir.trim_end_matches('/'), name),
        "is_directory": true,
    })
}

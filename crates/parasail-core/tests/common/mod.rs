//! Shared fixtures: a scripted analysis service and library directories.

use parasail_core::sync::protocol::{read_message, write_json};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::io::BufReader;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Minimal analysis service on a local TCP port.
///
/// Records every notification it receives, confirms `library/add` and
/// `library/remove`, and answers `completions` and `checkErrors` with fixed
/// results.
pub struct FakeService {
    pub addr: SocketAddr,
    notifications: Arc<Mutex<Vec<Value>>>,
    task: JoinHandle<()>,
}

impl FakeService {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let notifications = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&notifications);

        let task = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (reader, mut writer) = stream.into_split();
            let mut reader = BufReader::new(reader);

            while let Ok(Some(body)) = read_message(&mut reader).await {
                let message: Value = serde_json::from_slice(&body).unwrap();
                let method = message["method"].as_str().unwrap_or_default().to_string();

                if message.get("id").is_none() {
                    seen.lock().unwrap().push(message.clone());
                    let confirmation = match method.as_str() {
                        "library/add" => Some("library/added"),
                        "library/remove" => Some("library/removed"),
                        _ => None,
                    };
                    if let Some(confirmation) = confirmation {
                        let params = &message["params"];
                        let reply = json!({
                            "jsonrpc": "2.0",
                            "method": confirmation,
                            "params": {"name": params["name"], "path": params["path"]}
                        });
                        write_json(&mut writer, &reply).await.unwrap();
                    }
                    continue;
                }

                let result = match method.as_str() {
                    "completions" => json!([
                        {"label": "Append", "detail": "func Append(var V : Vector; E : Elem)"},
                        {"label": "Length"}
                    ]),
                    "checkErrors" => json!([{
                        "range": {
                            "start": {"line": 2, "character": 4},
                            "end": {"line": 2, "character": 7}
                        },
                        "message": "Undefined: Foo",
                        "severity": 1
                    }]),
                    _ => Value::Null,
                };
                let reply = json!({"jsonrpc": "2.0", "id": message["id"], "result": result});
                write_json(&mut writer, &reply).await.unwrap();
            }
        });

        Self {
            addr,
            notifications,
            task,
        }
    }

    /// Notifications received so far.
    pub fn notifications(&self) -> Vec<Value> {
        self.notifications.lock().unwrap().clone()
    }

    /// Drop the connection from the service side.
    pub fn stop(&self) {
        self.task.abort();
    }
}

/// A directory holding the given (empty) files, created under `root`.
pub fn library_dir(root: &Path, name: &str, files: &[&str]) -> PathBuf {
    let dir = root.join(name);
    for file in files {
        let path = dir.join(file);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn create_test_env() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

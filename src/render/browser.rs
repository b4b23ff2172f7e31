//! Headless Chrome driven over the DevTools protocol.
//!
//! One browser process and one websocket connection serve the whole
//! process lifetime. Each render opens its own target (tab) with a
//! flattened session, so concurrent screenshots never share viewport
//! state; command replies are multiplexed over the shared socket by id.

use std::collections::HashMap;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use base64::Engine;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::process::{Child, Command};
use tokio::sync::{broadcast, oneshot, Mutex};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::template::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::error::{CarouselError, Result};

/// Bounded wait for the browser to announce its DevTools endpoint.
const LAUNCH_TIMEOUT: Duration = Duration::from_secs(20);
/// Bounded wait for a single command reply.
const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);
/// Bounded wait for a page's load event.
const LOAD_TIMEOUT: Duration = Duration::from_secs(15);

/// Chrome binaries tried in order when no override is configured.
const CHROME_CANDIDATES: [&str; 4] = ["google-chrome", "chromium", "chromium-browser", "chrome"];

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type PendingMap = Arc<StdMutex<HashMap<u64, oneshot::Sender<Value>>>>;

/// A protocol event observed on the shared connection.
#[derive(Debug, Clone)]
struct CdpEvent {
    method: String,
    session_id: Option<String>,
}

/// Owned handle to a headless Chrome instance.
///
/// Created lazily on first render and torn down via [`Browser::shutdown`];
/// there is no ambient global.
pub struct Browser {
    child: Mutex<Child>,
    writer: Mutex<WsSink>,
    next_id: AtomicU64,
    pending: PendingMap,
    events: broadcast::Sender<CdpEvent>,
    reader: tokio::task::JoinHandle<()>,
}

impl Browser {
    /// Spawn Chrome headless and connect to its DevTools websocket.
    pub async fn launch(chrome_bin: Option<&str>) -> Result<Self> {
        let (mut child, binary) = spawn_chrome(chrome_bin)?;
        tracing::info!(binary = %binary, "launched headless chrome");

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| CarouselError::Render("chrome stderr not captured".into()))?;
        let ws_url = tokio::time::timeout(LAUNCH_TIMEOUT, read_devtools_url(stderr))
            .await
            .map_err(|_| {
                CarouselError::Render("timed out waiting for DevTools endpoint".into())
            })??;

        let (socket, _) = connect_async(ws_url.as_str())
            .await
            .map_err(|e| CarouselError::Render(format!("DevTools connect failed: {e}")))?;
        let (writer, read_half) = socket.split();

        let pending: PendingMap = Arc::new(StdMutex::new(HashMap::new()));
        let (events, _) = broadcast::channel(256);
        let reader = tokio::spawn(dispatch_incoming(
            read_half,
            Arc::clone(&pending),
            events.clone(),
        ));

        Ok(Self {
            child: Mutex::new(child),
            writer: Mutex::new(writer),
            next_id: AtomicU64::new(1),
            pending,
            events,
            reader,
        })
    }

    /// Send one protocol command and await its reply.
    async fn command(
        &self,
        session_id: Option<&str>,
        method: &str,
        params: Value,
    ) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.pending.lock().expect("pending lock").insert(id, tx);

        let mut message = json!({ "id": id, "method": method, "params": params });
        if let Some(session) = session_id {
            message["sessionId"] = json!(session);
        }

        {
            let mut writer = self.writer.lock().await;
            writer
                .send(Message::text(message.to_string()))
                .await
                .map_err(|e| CarouselError::Render(format!("DevTools send failed: {e}")))?;
        }

        let reply = tokio::time::timeout(COMMAND_TIMEOUT, rx)
            .await
            .map_err(|_| CarouselError::Render(format!("{method} timed out")))?
            .map_err(|_| CarouselError::Render("DevTools connection closed".into()))?;

        if let Some(error) = reply.get("error") {
            return Err(CarouselError::Render(format!("{method} failed: {error}")));
        }
        Ok(reply.get("result").cloned().unwrap_or(Value::Null))
    }

    /// Render HTML in a fresh 1080x1350 target and return the PNG screenshot
    /// as base64.
    pub async fn render_html(&self, html: &str) -> Result<String> {
        let target_id = self
            .command(None, "Target.createTarget", json!({ "url": "about:blank" }))
            .await?
            .get("targetId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| CarouselError::Render("createTarget returned no targetId".into()))?;

        let result = self.render_in_target(&target_id, html).await;

        // Close the tab even when the render failed
        let closed = self
            .command(None, "Target.closeTarget", json!({ "targetId": target_id }))
            .await;
        if let Err(e) = closed {
            tracing::warn!(error = %e, "failed to close render target");
        }

        result
    }

    async fn render_in_target(&self, target_id: &str, html: &str) -> Result<String> {
        let session_id = self
            .command(
                None,
                "Target.attachToTarget",
                json!({ "targetId": target_id, "flatten": true }),
            )
            .await?
            .get("sessionId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| CarouselError::Render("attachToTarget returned no sessionId".into()))?;
        let session = Some(session_id.as_str());

        self.command(session, "Page.enable", json!({})).await?;
        self.command(
            session,
            "Emulation.setDeviceMetricsOverride",
            json!({
                "width": CANVAS_WIDTH,
                "height": CANVAS_HEIGHT,
                "deviceScaleFactor": 1,
                "mobile": false,
            }),
        )
        .await?;

        // Subscribe before navigating so the load event cannot be missed
        let mut events = self.events.subscribe();
        let data_url = format!(
            "data:text/html;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(html)
        );
        self.command(session, "Page.navigate", json!({ "url": data_url }))
            .await?;
        self.wait_for_load(&mut events, &session_id).await?;

        let screenshot = self
            .command(
                session,
                "Page.captureScreenshot",
                json!({
                    "format": "png",
                    "clip": {
                        "x": 0,
                        "y": 0,
                        "width": CANVAS_WIDTH,
                        "height": CANVAS_HEIGHT,
                        "scale": 1,
                    },
                }),
            )
            .await?;

        screenshot
            .get("data")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| CarouselError::Render("captureScreenshot returned no data".into()))
    }

    async fn wait_for_load(
        &self,
        events: &mut broadcast::Receiver<CdpEvent>,
        session_id: &str,
    ) -> Result<()> {
        let wait = async {
            loop {
                match events.recv().await {
                    Ok(event)
                        if event.method == "Page.loadEventFired"
                            && event.session_id.as_deref() == Some(session_id) =>
                    {
                        return Ok(());
                    }
                    Ok(_) => continue,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(CarouselError::Render("DevTools connection closed".into()));
                    }
                }
            }
        };
        tokio::time::timeout(LOAD_TIMEOUT, wait)
            .await
            .map_err(|_| CarouselError::Render("page load timed out".into()))?
    }

    /// Close the browser and reap the process.
    pub async fn shutdown(&self) {
        if let Err(e) = self.command(None, "Browser.close", json!({})).await {
            tracing::debug!(error = %e, "Browser.close failed, killing process");
        }
        self.reader.abort();
        let mut child = self.child.lock().await;
        let _ = child.kill().await;
    }
}

/// Route incoming frames: replies (by id) to their oneshot waiters,
/// events to the broadcast channel.
async fn dispatch_incoming(
    mut read_half: futures::stream::SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>,
    pending: PendingMap,
    events: broadcast::Sender<CdpEvent>,
) {
    while let Some(message) = read_half.next().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) | Err(_) => break,
            _ => continue,
        };
        let value: Value = match serde_json::from_str(&text) {
            Ok(v) => v,
            Err(_) => continue,
        };
        if let Some(id) = value.get("id").and_then(Value::as_u64) {
            let sender = pending.lock().expect("pending lock").remove(&id);
            if let Some(sender) = sender {
                let _ = sender.send(value);
            }
        } else if let Some(method) = value.get("method").and_then(Value::as_str) {
            let _ = events.send(CdpEvent {
                method: method.to_string(),
                session_id: value
                    .get("sessionId")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            });
        }
    }
    // Drop all waiters so in-flight commands fail fast instead of timing out
    pending.lock().expect("pending lock").clear();
    tracing::debug!("DevTools socket reader finished");
}

fn spawn_chrome(chrome_bin: Option<&str>) -> Result<(Child, String)> {
    let candidates: Vec<&str> = match chrome_bin {
        Some(bin) => vec![bin],
        None => CHROME_CANDIDATES.to_vec(),
    };

    for binary in candidates {
        let spawned = Command::new(binary)
            .args([
                "--headless=new",
                "--no-sandbox",
                "--disable-gpu",
                "--disable-dev-shm-usage",
                "--remote-debugging-port=0",
                "about:blank",
            ])
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();
        match spawned {
            Ok(child) => return Ok((child, binary.to_string())),
            Err(e) => tracing::debug!(binary, error = %e, "chrome candidate unavailable"),
        }
    }
    Err(CarouselError::Render(
        "no Chrome binary found; set CHROME_BIN".into(),
    ))
}

/// Scan chrome's stderr for the `DevTools listening on ws://...` line.
async fn read_devtools_url(stderr: tokio::process::ChildStderr) -> Result<String> {
    let mut lines = BufReader::new(stderr).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if let Some(rest) = line.trim().strip_prefix("DevTools listening on ") {
            let url = rest.to_string();
            // Keep draining so the pipe never fills and blocks chrome
            tokio::spawn(async move {
                let mut lines = lines;
                while let Ok(Some(line)) = lines.next_line().await {
                    tracing::trace!(target: "chrome_stderr", "{line}");
                }
            });
            return Ok(url);
        }
    }
    Err(CarouselError::Render(
        "chrome exited before announcing its DevTools endpoint".into(),
    ))
}

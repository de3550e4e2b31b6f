//! End-to-end tests for the replay CLI
//!
//! These tests run the built binary against client files in a temporary
//! directory and, where playback happens, a small local webhook server.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::{Arc, Mutex};
use std::thread;

/// Test context with an isolated working and settings directory
struct TestContext {
    _temp: tempfile::TempDir,
    dir: PathBuf,
    config_home: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let temp = tempfile::tempdir().expect("Failed to create temp dir");
        let dir = temp.path().join("clients");
        let config_home = temp.path().join("config");
        std::fs::create_dir_all(&dir).expect("Failed to create clients dir");
        std::fs::create_dir_all(&config_home).expect("Failed to create config dir");
        Self {
            _temp: temp,
            dir,
            config_home,
        }
    }

    fn write(&self, name: &str, content: &str) {
        std::fs::write(self.dir.join(name), content).expect("Failed to write client file");
    }

    fn write_client(&self, url: &str) {
        self.write_client_with(url, Some("http://img/a.jpg"));
    }

    fn write_client_with(&self, url: &str, media_url: Option<&str>) {
        let media = media_url
            .map(|m| format!(r#""mediaURL":"{}","#, m))
            .unwrap_or_default();
        self.write(
            "acme.json",
            &format!(
                r#"{{"from":"+1555","url":"{}",{}"workflows":{{"signup":["hi","image","done"]}}}}"#,
                url, media
            ),
        );
        self.write(
            "acme_config.json",
            r#"{"requestIntervalMs":0,"contexts":[],"translation":{"en":{"hi":"Hello!"}}}"#,
        );
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_sms-replay"))
            .args(args)
            .arg("--dir")
            .arg(&self.dir)
            .env("XDG_CONFIG_HOME", &self.config_home)
            .env("HOME", &self.config_home)
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env("NO_PROXY", "127.0.0.1,localhost")
            .env_remove("HTTP_PROXY")
            .env_remove("http_proxy")
            .env_remove("ALL_PROXY")
            .env_remove("all_proxy")
            .output()
            .expect("Failed to run sms-replay")
    }
}

/// Minimal webhook that records request bodies and always answers the
/// same prompt
struct Webhook {
    url: String,
    bodies: Arc<Mutex<Vec<String>>>,
}

impl Webhook {
    fn start(reply: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind webhook");
        let url = format!("http://{}/sms", listener.local_addr().unwrap());
        let bodies = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&bodies);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                if let Some(body) = handle(stream, reply) {
                    recorded.lock().unwrap().push(body);
                }
            }
        });

        Self { url, bodies }
    }

    fn bodies(&self) -> Vec<String> {
        self.bodies.lock().unwrap().clone()
    }
}

fn handle(stream: TcpStream, reply: &str) -> Option<String> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).ok()? == 0 {
            return None;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }

    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).ok()?;

    let mut stream = stream;
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.len(),
        reply
    );
    stream.write_all(response.as_bytes()).ok()?;
    stream.flush().ok()?;
    String::from_utf8(body).ok()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_unknown_workflow_exits_with_error() {
    let ctx = TestContext::new();
    let webhook = Webhook::start("<Message>unused</Message>");
    ctx.write_client(&webhook.url);

    let output = ctx.run(&["regis", "-c", "acme", "-w", "renew", "--reset", "skip"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Workflow 'renew' does not exist"));
    assert!(webhook.bodies().is_empty());
}

#[test]
fn test_missing_client_file_exits_with_error() {
    let ctx = TestContext::new();

    let output = ctx.run(&["regis", "-c", "nobody", "-w", "signup"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("nobody.json"));
}

#[test]
fn test_missing_required_flag_exits_with_error() {
    let ctx = TestContext::new();

    let output = ctx.run(&["regis", "-w", "signup"]);

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_missing_translation_exits_with_error() {
    let ctx = TestContext::new();
    ctx.write_client("http://127.0.0.1:9/sms");

    let output = ctx.run(&["regis", "-c", "acme", "-w", "signup", "-l", "fr"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Translation for 'fr' not provided"));
}

#[test]
fn test_replays_signup_workflow() {
    let ctx = TestContext::new();
    let webhook = Webhook::start("<Response><Message>What is your name?</Message></Response>");
    ctx.write_client(&webhook.url);

    let output = ctx.run(&["regis", "-c", "acme", "-w", "signup", "--reset", "skip"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let bodies = webhook.bodies();
    assert_eq!(bodies.len(), 3);
    let payloads: Vec<serde_json::Value> = bodies
        .iter()
        .map(|b| serde_json::from_str(b).expect("payload is JSON"))
        .collect();
    assert_eq!(payloads[0]["Body"], "Hello!");
    assert_eq!(payloads[1]["NumMedia"], "1");
    assert_eq!(payloads[1]["MediaUrl0"], "http://img/a.jpg");
    assert_eq!(payloads[2]["Body"], "done");
    assert!(payloads.iter().all(|p| p["From"] == "+1555"));

    let out = stdout(&output);
    assert_eq!(out.matches("What is your name?").count(), 3);
}

#[test]
fn test_image_step_without_media_url_is_sent() {
    let ctx = TestContext::new();
    let webhook = Webhook::start("<Response><Message>Got it</Message></Response>");
    ctx.write_client_with(&webhook.url, None);

    let output = ctx.run(&["regis", "-c", "acme", "-w", "signup", "--reset", "skip"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("has no media URL"));

    let payloads: Vec<serde_json::Value> = webhook
        .bodies()
        .iter()
        .map(|b| serde_json::from_str(b).expect("payload is JSON"))
        .collect();
    assert_eq!(payloads.len(), 3);
    assert_eq!(payloads[1]["Body"], "");
    assert_eq!(payloads[1]["NumMedia"], "1");
    assert_eq!(payloads[1]["MediaUrl0"], "");
}

#[test]
fn test_unreachable_webhook_is_not_fatal() {
    let ctx = TestContext::new();
    // Bind and drop to find a port with nothing listening
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    ctx.write_client(&format!("http://127.0.0.1:{}/sms", port));

    let output = ctx.run(&["regis", "-c", "acme", "-w", "signup"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("3 of 3 steps failed"));
}

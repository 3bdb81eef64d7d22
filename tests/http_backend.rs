//! Integration tests for `HttpBackend` against a local canned-response server.
//!
//! Each test starts a throwaway listener that answers a fixed sequence of
//! requests and records what it received.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use blobcrypt::api::{DecryptRequest, EncryptRequest};
use blobcrypt::{
    ApiError, Backend, BlobId, Field, FormController, FormState, HttpBackend, Orchestrator,
    SaveDefaults, SaveMeta, View,
};
use serde_json::Value;

/// A request as seen by the server.
#[derive(Debug)]
struct Captured {
    method: String,
    path: String,
    headers: HashMap<String, String>,
    body: String,
}

impl Captured {
    fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

/// Serve `replies` (status, body) in order, one per connection.
fn serve(replies: Vec<(u16, &str)>) -> (String, JoinHandle<Vec<Captured>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let replies: Vec<(u16, String)> = replies
        .into_iter()
        .map(|(status, body)| (status, body.to_string()))
        .collect();

    let handle = thread::spawn(move || {
        let mut captured = Vec::new();
        for (status, body) in replies {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut parts = request_line.split_whitespace();
            let method = parts.next().unwrap_or_default().to_string();
            let path = parts.next().unwrap_or_default().to_string();

            let mut headers = HashMap::new();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
                }
            }

            let len: usize = headers
                .get("content-length")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            let mut buf = vec![0u8; len];
            reader.read_exact(&mut buf).unwrap();

            let response = format!(
                "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let mut stream = reader.into_inner();
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();

            captured.push(Captured {
                method,
                path,
                headers,
                body: String::from_utf8(buf).unwrap(),
            });
        }
        captured
    });

    (base_url, handle)
}

/// A base URL nothing is listening on.
fn dead_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

#[test]
fn test_encrypt_posts_json() {
    let (base_url, server) = serve(vec![(200, r#"{"ciphertext_b64":"QQ=="}"#)]);
    let backend = HttpBackend::new(&base_url).unwrap();

    let resp = backend
        .encrypt(&EncryptRequest {
            plaintext: "A".to_string(),
            password: "pw".to_string(),
        })
        .unwrap();
    assert_eq!(resp.ciphertext_b64, "QQ==");

    let captured = server.join().unwrap();
    let req = &captured[0];
    assert_eq!(req.method, "POST");
    assert_eq!(req.path, "/api/encrypt");
    assert_eq!(req.headers["content-type"], "application/json");
    assert_eq!(req.json()["plaintext"], "A");
    assert_eq!(req.json()["password"], "pw");
}

#[test]
fn test_encrypt_error_keeps_body() {
    let (base_url, server) = serve(vec![(500, "boom")]);
    let backend = HttpBackend::new(&base_url).unwrap();

    let err = backend
        .encrypt(&EncryptRequest {
            plaintext: "A".to_string(),
            password: "pw".to_string(),
        })
        .unwrap_err();
    match &err {
        ApiError::Status { status, body } => {
            assert_eq!(*status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    server.join().unwrap();
}

#[test]
fn test_decrypt_error_detail() {
    let (base_url, server) = serve(vec![(
        400,
        r#"{"detail":"Decryption failed (bad password or corrupted data)"}"#,
    )]);
    let backend = HttpBackend::new(&base_url).unwrap();

    let err = backend
        .decrypt(&DecryptRequest {
            ciphertext_b64: "QQ==".to_string(),
            password: "wrong".to_string(),
        })
        .unwrap_err();
    assert_eq!(
        err.detail(),
        "Decryption failed (bad password or corrupted data)"
    );
    assert_eq!(server.join().unwrap()[0].path, "/api/decrypt");
}

#[test]
fn test_save_body_has_only_metadata() {
    let (base_url, server) = serve(vec![(
        200,
        r#"{"id":11,"created_at":"2024-05-01T10:00:00"}"#,
    )]);
    let orch = Orchestrator::new(
        HttpBackend::new(&base_url).unwrap(),
        SaveDefaults::default(),
    );

    let saved = orch.save("QQ==", SaveMeta::default()).unwrap();
    assert_eq!(saved.id, BlobId::Int(11));

    let captured = server.join().unwrap();
    let body = captured[0].json();
    let obj = body.as_object().unwrap();
    assert_eq!(captured[0].path, "/api/save");
    assert_eq!(obj.len(), 4);
    assert_eq!(obj["ciphertext_b64"], "QQ==");
    assert_eq!(obj["note"], "auto-saved");
    assert!(obj["filename"].is_null());
    assert!(obj["owner"].is_null());
}

#[test]
fn test_save_swallows_server_error() {
    let (base_url, server) = serve(vec![(503, r#"{"detail":"Database disabled"}"#)]);
    let orch = Orchestrator::new(
        HttpBackend::new(&base_url).unwrap(),
        SaveDefaults::default(),
    );

    assert!(orch.save("QQ==", SaveMeta::default()).is_none());
    server.join().unwrap();
}

#[test]
fn test_save_swallows_connection_failure() {
    let orch = Orchestrator::new(
        HttpBackend::new(&dead_base_url()).unwrap(),
        SaveDefaults::default(),
    );

    assert!(orch.save("QQ==", SaveMeta::default()).is_none());
}

#[test]
fn test_blob_endpoints() {
    let (base_url, server) = serve(vec![
        (
            200,
            r#"{"id":3,"ciphertext_b64":"QUJD","filename":null,"note":"n","algorithm":"AES-256-GCM","kdf":"PBKDF2:100000","owner":null,"created_at":"2024-05-01T10:00:00"}"#,
        ),
        (200, r#"[{"id":3,"filename":null,"note":"n","created_at":"2024-05-01T10:00:00"}]"#),
        (200, r#"{"deleted":true}"#),
        (200, r#"{"ok":true,"msg":"pong"}"#),
    ]);
    let backend = HttpBackend::new(&base_url).unwrap();

    let record = backend.get_blob(&BlobId::Int(3)).unwrap();
    assert_eq!(record.ciphertext_b64, "QUJD");

    let list = backend.list_blobs(5).unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].note.as_deref(), Some("n"));

    assert!(backend.delete_blob(&BlobId::Int(3)).unwrap().deleted);
    assert!(backend.ping().unwrap().ok);

    let captured = server.join().unwrap();
    let seen: Vec<(&str, &str)> = captured
        .iter()
        .map(|c| (c.method.as_str(), c.path.as_str()))
        .collect();
    assert_eq!(
        seen,
        vec![
            ("GET", "/api/blob/3"),
            ("GET", "/api/blobs?limit=5"),
            ("DELETE", "/api/blob/3"),
            ("GET", "/api/ping"),
        ]
    );
}

#[test]
fn test_encrypt_then_autosave_over_http() {
    let (base_url, server) = serve(vec![
        (200, r#"{"ciphertext_b64":"QQ=="}"#),
        (200, r#"{"id":1,"created_at":"2024-05-01T10:00:00"}"#),
    ]);
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(&base_url).unwrap());
    let controller =
        FormController::new(Orchestrator::from_arc(backend, SaveDefaults::default()));

    let mut form = FormState::new()
        .with(Field::Plaintext, "A")
        .with(Field::Password, "pw")
        .with(Field::Note, "from test");

    let outcome = controller.encrypt(&mut form).unwrap();
    assert_eq!(form.value(Field::Ciphertext).as_deref(), Some("QQ=="));
    assert_eq!(form.value(Field::CiphertextIn).as_deref(), Some("QQ=="));
    assert_eq!(outcome.autosave.unwrap().wait().unwrap().id, BlobId::Int(1));

    let captured = server.join().unwrap();
    assert_eq!(captured[1].path, "/api/save");
    let save = captured[1].json();
    assert_eq!(save["ciphertext_b64"], "QQ==");
    assert_eq!(save["note"], "from test");
    assert!(save.get("password").is_none());
    assert!(save.get("plaintext").is_none());
    assert!(!captured[1].body.contains("pw"));
}

#[test]
fn test_decrypt_failure_alerts_over_http() {
    let (base_url, server) = serve(vec![(400, "not json at all")]);
    let controller = FormController::new(Orchestrator::new(
        HttpBackend::new(&base_url).unwrap(),
        SaveDefaults::default(),
    ));

    let mut form = FormState::new()
        .with(Field::CiphertextIn, "QQ==")
        .with(Field::PasswordIn, "pw");

    assert!(controller.decrypt(&mut form).is_err());
    assert_eq!(
        form.last_alert(),
        Some("Decryption failed: not json at all")
    );
    server.join().unwrap();
}

#[test]
fn test_unreachable_service_alerts_on_encrypt_and_decrypt() {
    let base_url = dead_base_url();
    let backend = HttpBackend::new(&base_url).unwrap();

    let err = backend
        .encrypt(&EncryptRequest {
            plaintext: "A".to_string(),
            password: "pw".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.status(), None);

    let controller = FormController::new(Orchestrator::new(backend, SaveDefaults::default()));

    let mut form = FormState::new()
        .with(Field::Plaintext, "A")
        .with(Field::Password, "pw");
    assert!(controller.encrypt(&mut form).is_err());
    assert!(form
        .last_alert()
        .unwrap()
        .starts_with("Encryption failed: request failed"));
    assert_eq!(form.value(Field::Ciphertext), None);

    let mut form = FormState::new()
        .with(Field::CiphertextIn, "QQ==")
        .with(Field::PasswordIn, "pw");
    assert!(controller.decrypt(&mut form).is_err());
    assert!(form
        .last_alert()
        .unwrap()
        .starts_with("Decryption failed: request failed"));
    assert_eq!(form.value(Field::Recovered), None);
}

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use roster_analysis::{
    AnalysisBackend, AnalysisClient, AnalysisError, AnalysisRequest, AnalysisSettings,
    AnalysisTrigger, Result,
};
use roster_model::{ColumnMapping, FieldSchema, RawRow};

/// One-shot HTTP server answering a single request with `status` and `body`.
/// The join handle yields the request line and JSON body it received.
fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<(String, String)>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

        let mut request_line = String::new();
        reader.read_line(&mut request_line).expect("request line");
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("header line");
            if line.trim().is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':')
                && name.trim().eq_ignore_ascii_case("content-length")
            {
                content_length = value.trim().parse().expect("content length");
            }
        }
        let mut request_body = vec![0u8; content_length];
        reader.read_exact(&mut request_body).expect("request body");

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .expect("write response");
        stream.flush().expect("flush");

        (
            request_line.trim().to_string(),
            String::from_utf8(request_body).expect("utf-8 body"),
        )
    });
    (base_url, handle)
}

fn client(base_url: String) -> AnalysisClient {
    AnalysisClient::new(&AnalysisSettings {
        base_url,
        timeout_secs: 5,
    })
    .expect("client")
}

fn request() -> AnalysisRequest {
    let schema = FieldSchema::default();
    let headers = vec!["Name".to_string(), "Email".to_string()];
    let rows: Vec<RawRow> = (0..4)
        .map(|idx| {
            [("Name", format!("P{idx}")), ("Email", format!("p{idx}@example.com"))]
                .into_iter()
                .collect()
        })
        .collect();
    let mut mapping = ColumnMapping::unset(&schema);
    mapping.assign("name", Some("Name"), &headers).unwrap();
    mapping.assign("email", Some("Email"), &headers).unwrap();
    AnalysisRequest::new(&schema, &headers, &rows, &mapping)
}

#[test]
fn successful_analysis_returns_text() {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"{"success":true,"analysis":"Looks good: 4 participants."}"#,
    );
    let text = client(base_url).analyze(&request()).expect("analysis");
    assert_eq!(text, "Looks good: 4 participants.");

    let (request_line, body) = server.join().expect("server thread");
    assert_eq!(request_line, "POST /api/ai/analyze-qr-wizard HTTP/1.1");
    let json: serde_json::Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(json["step"], 4);
    assert_eq!(json["data"]["participantCount"], 4);
    assert_eq!(json["data"]["sampleData"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["data"]["mapping"]["email"], "Email");
}

#[test]
fn unsuccessful_analysis_is_rejected() {
    let (base_url, server) = serve_once("200 OK", r#"{"success":false,"error":"quota exceeded"}"#);
    let err = client(base_url).analyze(&request()).unwrap_err();
    assert_eq!(err, AnalysisError::Rejected("quota exceeded".to_string()));
    server.join().expect("server thread");
}

#[test]
fn server_error_reports_status() {
    let (base_url, server) = serve_once("500 Internal Server Error", r#"{"message":"boom"}"#);
    let err = client(base_url).analyze(&request()).unwrap_err();
    assert!(matches!(err, AnalysisError::Status { status: 500, .. }));
    server.join().expect("server thread");
}

#[test]
fn non_json_body_fails_to_decode() {
    let (base_url, server) = serve_once("200 OK", "<html>oops</html>");
    let err = client(base_url).analyze(&request()).unwrap_err();
    assert!(matches!(err, AnalysisError::Decode(_)));
    server.join().expect("server thread");
}

#[test]
fn unreachable_endpoint_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
    drop(listener);
    let err = client(base_url).analyze(&request()).unwrap_err();
    assert!(matches!(err, AnalysisError::Network(_)));
}

/// Backend that signals when it starts and waits for permission to finish.
struct GatedBackend {
    started: Sender<()>,
    release: Mutex<Receiver<()>>,
}

impl AnalysisBackend for GatedBackend {
    fn analyze(&self, _request: &AnalysisRequest) -> Result<String> {
        self.started.send(()).expect("signal start");
        self.release
            .lock()
            .expect("release lock")
            .recv()
            .expect("wait for release");
        Ok("done".to_string())
    }
}

#[test]
fn second_trigger_while_pending_is_refused() {
    let (started_tx, started_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let backend = Arc::new(GatedBackend {
        started: started_tx,
        release: Mutex::new(release_rx),
    });
    let trigger = AnalysisTrigger::new();

    let worker = {
        let backend = Arc::clone(&backend);
        let trigger = trigger.clone();
        thread::spawn(move || trigger.run(backend.as_ref(), &request()))
    };
    started_rx.recv().expect("worker started");
    assert!(trigger.is_pending());
    assert_eq!(
        trigger.run(backend.as_ref(), &request()).unwrap_err(),
        AnalysisError::InFlight
    );

    release_tx.send(()).expect("release worker");
    assert_eq!(worker.join().expect("worker thread"), Ok("done".to_string()));
    assert!(!trigger.is_pending());

    release_tx.send(()).expect("pre-release next call");
    assert_eq!(trigger.run(backend.as_ref(), &request()), Ok("done".to_string()));
    started_rx.recv().expect("second call started");
}

struct PanickingBackend;

impl AnalysisBackend for PanickingBackend {
    fn analyze(&self, _request: &AnalysisRequest) -> Result<String> {
        panic!("backend exploded");
    }
}

#[test]
fn panic_during_analysis_releases_trigger() {
    let trigger = AnalysisTrigger::new();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        trigger.run(&PanickingBackend, &request())
    }));
    assert!(outcome.is_err());
    assert!(!trigger.is_pending());
}

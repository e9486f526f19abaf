//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use admission_gate::config::GateConfig;
use admission_gate::forms::{FormProcessor, FormSubmission, ProcessError, ProcessOutcome};
use admission_gate::{Gate, HttpServer, Shutdown};

/// A running gate on an ephemeral port.
#[allow(dead_code)]
pub struct TestGate {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

#[allow(dead_code)]
impl TestGate {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn stop(self) {
        self.shutdown.trigger();
        let result = self.handle.await.expect("server task panicked");
        assert!(result.is_ok(), "server exited with {result:?}");
    }
}

/// Start the full HTTP stack with `config`, handing admitted forms to `processor`.
pub async fn start_gate(config: GateConfig, processor: Arc<dyn FormProcessor>) -> TestGate {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(Gate::build(config), processor);
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    TestGate { addr, shutdown, handle }
}

/// Processor that records every submission it receives.
#[derive(Default)]
pub struct RecordingProcessor {
    pub received: Mutex<Vec<FormSubmission>>,
}

#[allow(dead_code)]
impl RecordingProcessor {
    pub fn count(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

#[async_trait]
impl FormProcessor for RecordingProcessor {
    async fn process(&self, submission: FormSubmission) -> Result<ProcessOutcome, ProcessError> {
        if submission.payload.get("email").and_then(|v| v.as_str()).is_none() {
            return Err(ProcessError::Invalid("Email is required".into()));
        }
        self.received.lock().unwrap().push(submission);
        Ok(ProcessOutcome {
            message: "Thanks, we'll be in touch.".into(),
        })
    }
}

/// Client that never pools, so every request is a fresh connection.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

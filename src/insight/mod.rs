// LogDash - GPL-3.0-or-later
// This file is part of LogDash.
//
// Copyright (C) 2025 Daniel Freiermuth
//
// LogDash is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// LogDash is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with LogDash.  If not, see <https://www.gnu.org/licenses/>.

//! Natural-language insights for a set of log lines.
//!
//! The requestor builds a fixed production-support prompt, calls the
//! completion client once and always returns text: either the model's
//! answer or an inline error message. Failures are never propagated and
//! never retried.

pub mod client;

pub use client::{CompletionClient, CompletionError, CompletionRequest, OpenAiClient};

use crate::config::InsightConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub const NO_DATA_MESSAGE: &str = "No log lines available for analysis.";

/// How often a waiting request checks for cancellation
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Shared flag to abandon an in-flight insight request
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Build the production-support analysis prompt for `lines`
pub fn build_prompt(lines: &[String]) -> String {
    format!(
        "You are a production support engineer assistant.\n\
         Analyze the following log lines and provide a summary of:\n\
         - Critical errors or warnings\n\
         - Patterns or repeated issues\n\
         - Suggested actions for resolution\n\
         Logs:\n{}\n",
        lines.join("\n")
    )
}

pub struct InsightRequestor {
    config: InsightConfig,
    client: Arc<dyn CompletionClient>,
}

impl InsightRequestor {
    pub fn new(config: InsightConfig, client: Arc<dyn CompletionClient>) -> Self {
        Self { config, client }
    }

    /// Ask for insights on `lines` with at most `max_tokens` of output.
    ///
    /// Empty input returns [`NO_DATA_MESSAGE`] without calling the client.
    pub fn request(&self, lines: &[String], max_tokens: u32, cancel: &CancelToken) -> String {
        if lines.is_empty() {
            return NO_DATA_MESSAGE.to_string();
        }

        let request = CompletionRequest {
            model: self.config.model.clone(),
            prompt: build_prompt(lines),
            max_tokens,
            temperature: self.config.temperature,
        };

        let start_time = Instant::now();
        match self.call_with_deadline(request, cancel) {
            Ok(text) => {
                tracing::info!(
                    "Insight for {} lines received in {:?}",
                    lines.len(),
                    start_time.elapsed()
                );
                text.trim().to_string()
            }
            Err(e) => {
                tracing::warn!("Insight request failed: {e}");
                format!("Error generating insights: {e}")
            }
        }
    }

    /// Run the blocking client call on its own thread and wait for it until
    /// the deadline passes or `cancel` fires. An abandoned call finishes in
    /// the background and its result is discarded.
    fn call_with_deadline(
        &self,
        request: CompletionRequest,
        cancel: &CancelToken,
    ) -> Result<String, CompletionError> {
        let timeout = self.config.timeout();
        let deadline = Instant::now() + timeout;
        let (tx, rx) = channel();
        let client = Arc::clone(&self.client);

        thread::Builder::new()
            .name("insight-request".to_string())
            .spawn(move || {
                let _ = tx.send(client.complete(&request));
            })
            .map_err(CompletionError::Spawn)?;

        loop {
            if cancel.is_cancelled() {
                return Err(CompletionError::Cancelled);
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(CompletionError::TimedOut(timeout));
            }
            match rx.recv_timeout(POLL_INTERVAL.min(deadline - now)) {
                Ok(result) => return result,
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(CompletionError::InvalidResponse(
                        "request worker exited without a response".to_string(),
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    /// Fake client that records calls and replies with a fixed result
    struct FakeClient {
        calls: AtomicUsize,
        last_request: Mutex<Option<CompletionRequest>>,
        reply: fn() -> Result<String, CompletionError>,
        delay: Duration,
    }

    impl FakeClient {
        fn new(reply: fn() -> Result<String, CompletionError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
                reply,
                delay: Duration::ZERO,
            }
        }

        fn slow(reply: fn() -> Result<String, CompletionError>, delay: Duration) -> Self {
            Self {
                delay,
                ..Self::new(reply)
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl CompletionClient for FakeClient {
        fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut last) = self.last_request.lock() {
                *last = Some(request.clone());
            }
            thread::sleep(self.delay);
            (self.reply)()
        }
    }

    fn requestor(client: &Arc<FakeClient>, timeout_secs: u64) -> InsightRequestor {
        let config = InsightConfig {
            timeout_secs,
            ..InsightConfig::default()
        };
        InsightRequestor::new(config, Arc::clone(client) as Arc<dyn CompletionClient>)
    }

    fn lines() -> Vec<String> {
        vec![
            "2025-10-16 18:30:20 [ERROR] Database connection timeout".to_string(),
            "2025-10-16 18:31:03 [ERROR] Insert failed".to_string(),
        ]
    }

    #[test]
    fn test_empty_input_skips_client() {
        let client = Arc::new(FakeClient::new(|| Ok("unused".to_string())));
        let text = requestor(&client, 5).request(&[], 300, &CancelToken::new());
        assert_eq!(text, "No log lines available for analysis.");
        assert_eq!(client.calls(), 0);
    }

    #[test]
    fn test_success_is_trimmed_and_called_once() {
        let client = Arc::new(FakeClient::new(|| Ok("\n  Summary: DB timeouts.  \n".to_string())));
        let text = requestor(&client, 5).request(&lines(), 120, &CancelToken::new());
        assert_eq!(text, "Summary: DB timeouts.");
        assert_eq!(client.calls(), 1);

        let sent = client
            .last_request
            .lock()
            .expect("lock")
            .clone()
            .expect("request recorded");
        assert_eq!(sent.model, "gpt-3.5-turbo");
        assert_eq!(sent.max_tokens, 120);
        assert!((sent.temperature - 0.3).abs() < f64::EPSILON);
        assert!(sent.prompt.contains("Database connection timeout"));
        assert!(sent.prompt.contains("Suggested actions for resolution"));
    }

    #[test]
    fn test_failure_becomes_inline_message() {
        let client = Arc::new(FakeClient::new(|| {
            Err(CompletionError::Api {
                status: 401,
                body: "invalid api key".to_string(),
            })
        }));
        let text = requestor(&client, 5).request(&lines(), 300, &CancelToken::new());
        assert_eq!(
            text,
            "Error generating insights: API error (401): invalid api key"
        );
        assert_eq!(client.calls(), 1);
    }

    #[test]
    fn test_missing_key_message() {
        let client = Arc::new(FakeClient::new(|| Err(CompletionError::MissingApiKey)));
        let text = requestor(&client, 5).request(&lines(), 300, &CancelToken::new());
        assert!(text.starts_with("Error generating insights: no API key configured"));
    }

    #[test]
    fn test_timeout_does_not_block() {
        let client = Arc::new(FakeClient::slow(
            || Ok("too late".to_string()),
            Duration::from_secs(3),
        ));
        let start = Instant::now();
        let text = requestor(&client, 1).request(&lines(), 300, &CancelToken::new());
        assert_eq!(text, "Error generating insights: Request timed out after 1s");
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_cancelled_request() {
        let client = Arc::new(FakeClient::slow(
            || Ok("too late".to_string()),
            Duration::from_secs(2),
        ));
        let cancel = CancelToken::new();
        let canceller = cancel.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            canceller.cancel();
        });

        let start = Instant::now();
        let text = requestor(&client, 30).request(&lines(), 300, &cancel);
        assert_eq!(text, "Error generating insights: Request cancelled");
        assert!(start.elapsed() < Duration::from_secs(2));
        handle.join().expect("canceller thread");
    }

    #[test]
    fn test_prompt_template() {
        let prompt = build_prompt(&lines());
        assert!(prompt.starts_with("You are a production support engineer assistant.\n"));
        assert!(prompt.contains("- Critical errors or warnings\n"));
        assert!(prompt.contains("- Patterns or repeated issues\n"));
        assert!(prompt.ends_with(
            "Logs:\n2025-10-16 18:30:20 [ERROR] Database connection timeout\n2025-10-16 18:31:03 [ERROR] Insert failed\n"
        ));
    }
}

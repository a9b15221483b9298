//! Accident control over the simulation server's HTTP API.
//!
//! `POST {api_url}/api/accidents/start` and `.../stop` answer with
//! `{"message": "..."}` on success and a 400 with a plain-text reason when
//! accidents are already running (or not running).

use serde::Deserialize;
use std::fmt;
use tracing::{debug, info, warn};

/// Which endpoint to call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccidentAction {
    Start,
    Stop,
}

impl AccidentAction {
    pub fn path(&self) -> &'static str {
        match self {
            AccidentAction::Start => "/api/accidents/start",
            AccidentAction::Stop => "/api/accidents/stop",
        }
    }
}

impl fmt::Display for AccidentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccidentAction::Start => write!(f, "start"),
            AccidentAction::Stop => write!(f, "stop"),
        }
    }
}

/// Accident request failures
#[derive(Debug, Clone, PartialEq)]
pub enum AccidentError {
    /// Request could not be sent or the connection failed
    Request(String),
    /// Server answered with a non-success status
    Rejected { status: u16, body: String },
    /// Success status, but the body is not `{"message": ...}`
    BadBody(String),
}

impl fmt::Display for AccidentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccidentError::Request(msg) => write!(f, "accident request failed: {}", msg),
            AccidentError::Rejected { status, body } => {
                write!(f, "server rejected accident request ({}): {}", status, body.trim())
            }
            AccidentError::BadBody(msg) => write!(f, "unexpected accident response: {}", msg),
        }
    }
}

impl std::error::Error for AccidentError {}

#[derive(Debug, Deserialize)]
struct AccidentResponse {
    message: String,
}

/// HTTP client for the accident endpoints
#[derive(Clone)]
pub struct AccidentClient {
    client: reqwest::Client,
    base_url: String,
}

impl AccidentClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, action: AccidentAction) -> String {
        format!("{}{}", self.base_url, action.path())
    }

    /// Call the endpoint once and return the server's message
    pub async fn send(&self, action: AccidentAction) -> Result<String, AccidentError> {
        let url = self.url_for(action);
        debug!(url = %url, "Sending accident request");

        let response = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AccidentError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(action = %action, status, body = %body.trim(), "Accident request rejected");
            return Err(AccidentError::Rejected { status, body });
        }

        let body: AccidentResponse = response
            .json()
            .await
            .map_err(|e| AccidentError::BadBody(e.to_string()))?;

        info!(action = %action, message = %body.message, "Accident request accepted");
        Ok(body.message)
    }
}

/// Toggle shown in the controls panel.
///
/// The label only flips when the server accepts a request. While a request
/// is in flight further toggles are ignored.
#[derive(Debug, Clone, Default)]
pub struct AccidentToggle {
    running: bool,
    in_flight: Option<AccidentAction>,
}

impl AccidentToggle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(&self) -> &'static str {
        if self.running {
            "Stop accidents"
        } else {
            "Start accidents"
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn in_flight(&self) -> Option<AccidentAction> {
        self.in_flight
    }

    /// Begin a toggle. Returns the action to send, or `None` if one is
    /// already in flight.
    pub fn begin(&mut self) -> Option<AccidentAction> {
        if self.in_flight.is_some() {
            return None;
        }

        let action = if self.running {
            AccidentAction::Stop
        } else {
            AccidentAction::Start
        };
        self.in_flight = Some(action);
        Some(action)
    }

    /// Record the outcome of the in-flight request
    pub fn finish(&mut self, action: AccidentAction, result: &Result<String, AccidentError>) {
        self.in_flight = None;
        if result.is_ok() {
            self.running = action == AccidentAction::Start;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_on_success() {
        let mut toggle = AccidentToggle::new();
        assert_eq!(toggle.label(), "Start accidents");

        let action = toggle.begin().unwrap();
        assert_eq!(action, AccidentAction::Start);
        toggle.finish(action, &Ok("Аварии запущены".to_string()));

        assert!(toggle.is_running());
        assert_eq!(toggle.label(), "Stop accidents");
        assert_eq!(toggle.begin(), Some(AccidentAction::Stop));
    }

    #[test]
    fn test_toggle_keeps_label_on_failure() {
        let mut toggle = AccidentToggle::new();

        let action = toggle.begin().unwrap();
        toggle.finish(
            action,
            &Err(AccidentError::Rejected {
                status: 400,
                body: "Аварии уже запущены".to_string(),
            }),
        );

        assert!(!toggle.is_running());
        assert_eq!(toggle.label(), "Start accidents");
        assert!(toggle.in_flight().is_none());
    }

    #[test]
    fn test_toggle_ignored_while_in_flight() {
        let mut toggle = AccidentToggle::new();

        assert!(toggle.begin().is_some());
        assert!(toggle.begin().is_none());
    }

    #[test]
    fn test_url_for_trims_trailing_slash() {
        let client = AccidentClient::new("http://localhost:8080/");
        assert_eq!(
            client.url_for(AccidentAction::Stop),
            "http://localhost:8080/api/accidents/stop"
        );
    }

    #[test]
    fn test_error_display() {
        let err = AccidentError::Rejected {
            status: 400,
            body: "Аварии не запущены\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "server rejected accident request (400): Аварии не запущены"
        );
    }
}

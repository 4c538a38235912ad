//! Event resolution against the raid-helper API.
//!
//! One event id, one blocking fetch, one parsed signup set. Retries are the
//! caller's business (the pipeline wraps this with backoff).

use std::time::Duration;

use serde::Deserialize;
use serenity::async_trait;

use crate::common::error::{RosterError, RosterResult};

/// Base URL of the raid-helper events API.
const API_BASE: &str = "https://raid-helper.dev/api/v2/events";

/// A raw signup entry as the producing template emitted it.
///
/// All fields are producer-controlled and inconsistently populated: some
/// templates put the role split in `class_name`, some omit `status` entirely.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignUp {
    #[serde(default, alias = "roleName")]
    pub role_name: Option<String>,
    #[serde(default, alias = "className")]
    pub class_name: Option<String>,
    #[serde(default, alias = "specName")]
    pub spec_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A resolved signup event.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupEvent {
    /// Event start as epoch seconds.
    #[serde(alias = "startTime")]
    pub start_time: i64,
    #[serde(default, alias = "signUps")]
    pub sign_ups: Vec<SignUp>,
}

/// The event-fetch capability consumed by the pipeline.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch(&self, event_id: &str) -> RosterResult<SignupEvent>;
}

/// Fetches signup events from the external service.
pub struct EventResolver {
    http: reqwest::Client,
    base_url: String,
}

impl EventResolver {
    /// Build a resolver with a bounded per-request timeout.
    pub fn new(timeout: Duration) -> RosterResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: API_BASE.to_string(),
        })
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }
}

#[async_trait]
impl EventSource for EventResolver {
    /// Fetch and parse one event.
    ///
    /// Any non-success response becomes `EventFetchFailed` with the status
    /// and response body preserved for the log.
    async fn fetch(&self, event_id: &str) -> RosterResult<SignupEvent> {
        let url = format!("{}/{}", self.base_url, event_id);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RosterError::EventFetchFailed {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<SignupEvent>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_payload() {
        let payload = r#"{
            "id": "123456789",
            "startTime": 1714500000,
            "title": "Wednesday Clear",
            "signUps": [
                { "name": "Aria", "className": "Tank", "specName": "Protection", "status": "primary" },
                { "name": "Belen", "className": "Melee", "specName": "Arms" },
                { "name": "Cato", "roleName": "Healers", "className": "Priest", "specName": "Holy" }
            ]
        }"#;

        let event: SignupEvent = serde_json::from_str(payload).unwrap();
        assert_eq!(event.start_time, 1714500000);
        assert_eq!(event.sign_ups.len(), 3);
        assert_eq!(event.sign_ups[0].class_name.as_deref(), Some("Tank"));
        assert_eq!(event.sign_ups[1].status, None);
        assert_eq!(event.sign_ups[2].role_name.as_deref(), Some("Healers"));
    }

    #[test]
    fn test_parse_event_without_signups() {
        let event: SignupEvent = serde_json::from_str(r#"{ "startTime": 5 }"#).unwrap();
        assert!(event.sign_ups.is_empty());
    }

    #[tokio::test]
    async fn test_bad_request_url_is_a_transport_error() {
        // An unsupported scheme fails inside reqwest before any socket is
        // touched, so this exercises the error mapping without the network.
        let resolver = EventResolver::new(Duration::from_secs(1))
            .unwrap()
            .with_base_url("ftp://localhost");

        let err = resolver.fetch("1").await.unwrap_err();
        assert!(matches!(err, RosterError::Http(_)));
    }
}

//! Response body of `GET /health`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentState {
    Ok,
    Error,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub version: String,
    pub checks: ComponentChecks,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentChecks {
    pub database: ComponentCheck,
    pub click_queue: ComponentCheck,
    pub cache: ComponentCheck,
}

impl ComponentChecks {
    pub fn all_ok(&self) -> bool {
        [&self.database, &self.click_queue, &self.cache]
            .iter()
            .all(|check| check.status == ComponentState::Ok)
    }
}

/// Outcome of probing one dependency, with a human-readable detail line.
#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentCheck {
    pub status: ComponentState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentCheck {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: ComponentState::Ok,
            message: Some(message.into()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: ComponentState::Error,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_failed_component_degrades() {
        let checks = ComponentChecks {
            database: ComponentCheck::ok("up"),
            click_queue: ComponentCheck::failed("closed"),
            cache: ComponentCheck::ok("disabled"),
        };
        assert!(!checks.all_ok());

        let json = serde_json::to_value(&checks).unwrap();
        assert_eq!(json["click_queue"]["status"], "error");
        assert_eq!(json["database"]["status"], "ok");
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const EXPECTED_SOURCE: &str = "aws.ec2";
pub const EXPECTED_SCHEMA_VERSION: &str = "0";
pub const EXPECTED_DETAIL_TYPE: &str = "EC2 Instance State-change Notification";
pub const RUNNING_STATE: &str = "running";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateChangeEvent {
    pub source: String,
    pub version: String,
    #[serde(rename = "detail-type")]
    pub detail_type: String,
    pub detail: StateChangeDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateChangeDetail {
    #[serde(rename = "instance-id")]
    pub instance_id: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

pub fn parse_state_change(event: &Value) -> Result<String, ValidationError> {
    let parsed: StateChangeEvent = serde_json::from_value(event.clone()).map_err(|error| {
        ValidationError::new(format!(
            "event does not match the EC2 state-change notification shape: {error}"
        ))
    })?;

    if parsed.source != EXPECTED_SOURCE {
        return Err(ValidationError::new(format!(
            "unexpected event source '{}'",
            parsed.source
        )));
    }

    if parsed.version != EXPECTED_SCHEMA_VERSION {
        return Err(ValidationError::new(format!(
            "unexpected event schema version '{}'",
            parsed.version
        )));
    }

    if parsed.detail_type != EXPECTED_DETAIL_TYPE {
        return Err(ValidationError::new(format!(
            "unexpected detail-type '{}'",
            parsed.detail_type
        )));
    }

    if parsed.detail.state != RUNNING_STATE {
        return Err(ValidationError::new(format!(
            "instance state is '{}', not '{RUNNING_STATE}'",
            parsed.detail.state
        )));
    }

    let instance_id = parsed.detail.instance_id.trim().to_string();
    if instance_id.is_empty() {
        return Err(ValidationError::new("event carries a blank instance id"));
    }

    Ok(instance_id)
}

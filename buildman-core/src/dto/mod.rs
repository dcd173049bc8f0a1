//! DTOs for the request layer
//!
//! The request layer never sees `script_path` or the raw `running` flag; it
//! lists targets, posts a trigger request, and polls running state through the
//! engine's service facade.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::target::{BuildParameter, BuildTarget};

/// Lightweight target summary for listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterDto>,
}

/// Parameter as shipped to and from the request layer.
///
/// `selected_values` is filled in by the caller on a trigger request; it is
/// part of the request contract only and is never persisted in the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDto {
    pub name: String,
    pub description: String,
    pub source_values: Vec<String>,
    #[serde(default)]
    pub selected_values: Vec<String>,
}

/// Request to trigger a build for one target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerRequest {
    pub id: Uuid,
    #[serde(default)]
    pub parameters: Vec<ParameterDto>,
}

/// Returned for an accepted trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerReceipt {
    pub target_id: Uuid,
    /// Minted per accepted run.
    pub job_id: Uuid,
    pub accepted_at: chrono::DateTime<chrono::Utc>,
}

impl From<&BuildParameter> for ParameterDto {
    fn from(parameter: &BuildParameter) -> Self {
        Self {
            name: parameter.name.clone(),
            description: parameter.description.clone(),
            source_values: parameter.source_values.clone(),
            selected_values: Vec::new(),
        }
    }
}

impl From<&BuildTarget> for TargetDto {
    fn from(target: &BuildTarget) -> Self {
        Self {
            id: target.id,
            name: target.name.clone(),
            description: target.description.clone(),
            parameters: target.parameters.iter().map(ParameterDto::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::target::ValueSource;

    fn sample_target() -> BuildTarget {
        BuildTarget {
            id: Uuid::new_v4(),
            name: "Nightly".to_string(),
            description: "Nightly installer".to_string(),
            script_path: "/opt/build/nightly.sh".into(),
            parameters: vec![BuildParameter {
                name: "branch".to_string(),
                description: "Branch to build".to_string(),
                source: ValueSource::List,
                source_values: vec!["main".to_string(), "develop".to_string()],
            }],
            running: false,
        }
    }

    #[test]
    fn test_target_dto_conversion() {
        let target = sample_target();

        let dto = TargetDto::from(&target);
        assert_eq!(dto.id, target.id);
        assert_eq!(dto.name, target.name);
        assert_eq!(dto.parameters.len(), 1);
        assert_eq!(dto.parameters[0].source_values, ["main", "develop"]);
        assert!(dto.parameters[0].selected_values.is_empty());
    }

    #[test]
    fn test_target_dto_hides_script_path() {
        let target = sample_target();

        let json = serde_json::to_value(TargetDto::from(&target)).unwrap();
        assert!(json.get("script_path").is_none());
        assert!(json.get("running").is_none());
    }

    #[test]
    fn test_trigger_request_selected_values_default() {
        let json = format!(r#"{{ "id": "{}" }}"#, Uuid::new_v4());

        let request: TriggerRequest = serde_json::from_str(&json).unwrap();
        assert!(request.parameters.is_empty());
    }
}

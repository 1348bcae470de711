//! Resources of the CARMIN API.
//!
//! Only the fields the client relies upon are required; everything else the
//! server sends is kept in `extra`.

use crate::types::{ExecutionId, PipelineId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata of a remote path, as returned by `?action=properties`
/// and as the elements of `?action=list`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PathEntry {
    pub is_directory: bool,
    pub platform_path: Option<String>,
    pub size: Option<u64>,
    pub last_modification_date: Option<i64>,
    pub mime_type: Option<String>,
    pub execution_id: Option<ExecutionId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Execution status. The client only observes it: executions are created by
/// [crate::CarminClient::init_exec] and forced to `Killed` by
/// [crate::CarminClient::kill_execution].
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub enum ExecutionStatus {
    Initializing,
    Ready,
    Running,
    Finished,
    InitializationFailed,
    ExecutionFailed,
    Unknown,
    Killed,

    /// Status string not defined by CARMIN.
    #[serde(untagged)]
    Other(String),
}

impl ExecutionStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, ExecutionStatus::Running)
    }

    /// Whether the execution cannot change state anymore.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionStatus::Finished
                | ExecutionStatus::InitializationFailed
                | ExecutionStatus::ExecutionFailed
                | ExecutionStatus::Killed
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    pub identifier: ExecutionId,
    pub status: ExecutionStatus,
    pub name: Option<String>,
    pub pipeline_identifier: Option<PipelineId>,
    #[serde(default)]
    pub input_values: Map<String, Value>,
    pub returned_files: Option<Value>,
    pub timeout: Option<u64>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub study_identifier: Option<String>,
    pub error_code: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    pub identifier: PipelineId,
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub can_execute: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST executions`.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewExecution<'a> {
    pub name: &'a str,
    pub pipeline_identifier: &'a PipelineId,
    pub input_values: &'a Map<String, Value>,
}

/// Response of `POST authenticate`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AuthCredentials {
    pub http_header: Option<String>,
    pub http_header_value: String,
}

//! Execution lifecycle: launch, observe, fetch outputs, kill.
//!
//! Polling is up to the caller, e.g. by calling [CarminClient::is_running]
//! until it returns `false`.

use super::{succeeded, CarminClient};
use crate::errors::CarminError;
use crate::models::{Execution, NewExecution};
use crate::types::{ExecutionId, PipelineId};
use log::info;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Deserialize)]
struct CreatedExecution {
    identifier: ExecutionId,
}

impl CarminClient {
    pub fn list_executions(&self) -> Result<Vec<Execution>, CarminError> {
        self.get_json("executions")
    }

    /// Number of executions of the user.
    pub fn count_executions(&self) -> Result<u64, CarminError> {
        let text = self.get_text("executions/count")?;
        text.trim()
            .parse()
            .map_err(|_| CarminError::UnexpectedResponse(format!("not a count: {:?}", text)))
    }

    /// Launch a pipeline. Returns the identifier assigned by VIP.
    pub fn init_exec(
        &self,
        pipeline: &PipelineId,
        name: &str,
        input_values: &Map<String, Value>,
    ) -> Result<ExecutionId, CarminError> {
        let data = NewExecution {
            name,
            pipeline_identifier: pipeline,
            input_values,
        };
        let req = self.request(Method::POST, "executions").json(&data);
        let body = self.execute(req)?;
        let created: CreatedExecution = serde_json::from_slice(&body)?;
        info!("Launched {} as execution {}", pipeline, created.identifier);
        Ok(created.identifier)
    }

    /// Launch a pipeline named `"default"` without inputs.
    pub fn init_exec_default(&self, pipeline: &PipelineId) -> Result<ExecutionId, CarminError> {
        self.init_exec(pipeline, "default", &Map::new())
    }

    pub fn execution_info(&self, id: &ExecutionId) -> Result<Execution, CarminError> {
        self.get_json(&format!("executions/{}", id))
    }

    /// Whether the status of the execution is exactly `Running`.
    pub fn is_running(&self, id: &ExecutionId) -> Result<bool, CarminError> {
        Ok(self.execution_info(id)?.status.is_running())
    }

    pub fn execution_stderr(&self, id: &ExecutionId) -> Result<String, CarminError> {
        self.get_text(&format!("executions/{}/stderr", id))
    }

    pub fn execution_stdout(&self, id: &ExecutionId) -> Result<String, CarminError> {
        self.get_text(&format!("executions/{}/stdout", id))
    }

    /// Result document of a finished execution.
    pub fn execution_results(&self, id: &ExecutionId) -> Result<Value, CarminError> {
        self.get_json(&format!("executions/{}/results", id))
    }

    /// Kill an execution, optionally deleting the files it produced.
    /// Returns `false` if VIP refused.
    pub fn kill_execution(&self, id: &ExecutionId, delete_files: bool) -> Result<bool, CarminError> {
        let mut req = self.request(Method::DELETE, &format!("executions/{}", id));
        if delete_files {
            req = req.query(&[("deleteFiles", "true")]);
        }
        succeeded(self.execute(req))
    }
}

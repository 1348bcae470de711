use super::CarminClient;
use crate::errors::CarminError;
use crate::models::{AuthCredentials, Pipeline};
use crate::types::PipelineId;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

impl CarminClient {
    /// List the pipelines available to the user.
    pub fn list_pipelines(&self) -> Result<Vec<Pipeline>, CarminError> {
        self.get_json("pipelines")
    }

    /// Get the full description of a pipeline, including its parameters.
    pub fn pipeline_definition(&self, id: &PipelineId) -> Result<Value, CarminError> {
        self.get_json(&format!("pipelines/{}", id))
    }

    /// Get the platform properties.
    pub fn platform_info(&self) -> Result<Value, CarminError> {
        self.get_json("platform/")
    }

    /// Exchange account credentials for an API key.
    ///
    /// `username` is the email address of the VIP account. The key is
    /// returned, not stored: pass it to [CarminClient::set_api_key] to use it.
    pub fn api_key_from_credentials(&self, username: &str, password: &str) -> Result<String, CarminError> {
        let req = self
            .request(Method::POST, "authenticate")
            .json(&Credentials { username, password });
        let body = self.execute(req)?;
        let credentials: AuthCredentials = serde_json::from_slice(&body)?;
        Ok(credentials.http_header_value)
    }
}

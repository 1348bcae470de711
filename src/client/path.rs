//! Remote storage operations, on paths such as `/vip/Home/results`.
//!
//! Paths are appended to the `path` endpoint as they are, so they must start
//! with `/`.

use super::{succeeded, swallow, CarminClient};
use crate::errors::CarminError;
use crate::models::PathEntry;
use log::{debug, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Values of the `action` query parameter of `GET path/...`
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum PathAction {
    List,
    Exists,
    Properties,
    Md5,
    Content,
}

impl PathAction {
    fn as_str(&self) -> &'static str {
        match self {
            PathAction::List => "list",
            PathAction::Exists => "exists",
            PathAction::Properties => "properties",
            PathAction::Md5 => "md5",
            PathAction::Content => "content",
        }
    }
}

#[derive(Deserialize)]
struct ExistsResponse {
    exists: bool,
}

impl CarminClient {
    /// Create a directory. Returns `false` if VIP refused.
    pub fn create_dir(&self, path: &str) -> Result<bool, CarminError> {
        let req = self.request(Method::PUT, &path_endpoint(path));
        succeeded(self.execute(req))
    }

    /// Create a directory, appending a number to `path` until the name is
    /// free: `/vip/Home/out`, `/vip/Home/out1`, `/vip/Home/out2`, ...
    ///
    /// `path` should not end with `/`. Returns the path actually used.
    /// Fails if an existence check fails. There is no limit on the number
    /// of names tried.
    pub fn create_dir_smart(&self, path: &str) -> Result<String, CarminError> {
        let mut suffix: u64 = 0;
        let mut candidate = path.to_string();
        while self.exists(&candidate)? {
            suffix += 1;
            candidate = format!("{}{}", path, suffix);
        }
        if !self.create_dir(&candidate)? {
            warn!("Could not create directory {}", candidate);
        }
        Ok(candidate)
    }

    /// List the content of a directory.
    pub fn list_content(&self, path: &str) -> Result<Vec<PathEntry>, CarminError> {
        self.path_action(path, PathAction::List)
    }

    /// List the subdirectories of a directory.
    pub fn list_directories(&self, path: &str) -> Result<Vec<PathEntry>, CarminError> {
        let mut entries = self.list_content(path)?;
        entries.retain(|e| e.is_directory);
        Ok(entries)
    }

    /// List the files of a directory.
    pub fn list_elements(&self, path: &str) -> Result<Vec<PathEntry>, CarminError> {
        let mut entries = self.list_content(path)?;
        entries.retain(|e| !e.is_directory);
        Ok(entries)
    }

    pub fn exists(&self, path: &str) -> Result<bool, CarminError> {
        let res: ExistsResponse = self.path_action(path, PathAction::Exists)?;
        Ok(res.exists)
    }

    pub fn path_properties(&self, path: &str) -> Result<PathEntry, CarminError> {
        self.path_action(path, PathAction::Properties)
    }

    pub fn is_dir(&self, path: &str) -> Result<bool, CarminError> {
        Ok(self.path_properties(path)?.is_directory)
    }

    /// Checksum of a remote file. Not every VIP deployment implements it.
    pub fn md5(&self, path: &str) -> Result<Value, CarminError> {
        self.path_action(path, PathAction::Md5)
    }

    /// Delete a file, or a directory with all of its content.
    pub fn delete_path(&self, path: &str) -> Result<bool, CarminError> {
        let req = self.request(Method::DELETE, &path_endpoint(path));
        succeeded(self.execute(req))
    }

    /// Upload a local file to `remote_path`, e.g. `/vip/Home/image.nii`.
    ///
    /// The file is read into memory and sent in a single request.
    pub fn upload(&self, local_path: impl AsRef<Path>, remote_path: &str) -> Result<bool, CarminError> {
        let data = fs_err::read(local_path.as_ref())?;
        debug!("uploading {} bytes to {}", data.len(), remote_path);
        let req = self
            .request(Method::PUT, &path_endpoint(remote_path))
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(data);
        succeeded(self.execute(req))
    }

    /// Download a remote file to `local_path`. The local file is only
    /// created once VIP has answered successfully.
    pub fn download(&self, remote_path: &str, local_path: impl AsRef<Path>) -> Result<bool, CarminError> {
        let req = self
            .request(Method::GET, &path_endpoint(remote_path))
            .query(&[("action", PathAction::Content.as_str())]);
        match swallow(self.execute(req))? {
            Some(body) => {
                fs_err::write(local_path.as_ref(), &body)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn path_action<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        action: PathAction,
    ) -> Result<T, CarminError> {
        let req = self
            .request(Method::GET, &path_endpoint(path))
            .query(&[("action", action.as_str())]);
        let body = self.execute(req)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn path_endpoint(path: &str) -> String {
    format!("path{}", path)
}

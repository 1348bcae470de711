//! The CARMIN API client: session state and request dispatch.

mod executions;
mod path;
mod pipelines;

use crate::config::ClientConfig;
use crate::constants::{APIKEY_HEADER, UNAUTHORIZED};
use crate::errors::{check, CarminError};
use crate::types::ApiUrl;
use bytes::Bytes;
use log::{debug, info, warn};
use reqwest::blocking::{Client, ClientBuilder, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Certificate, Method};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Blocking client for the CARMIN API of VIP.
///
/// Operations fall into two groups. Reads, listings and execution management
/// fail with [CarminError::Vip] when the server answers with an error
/// envelope. Path mutations (`create_dir`, `delete_path`, `upload`,
/// `download`) and `kill_execution` instead return `Ok(false)`. In both
/// groups, transport and local I/O failures are returned as errors.
///
/// The client does no locking: changing the key or the certificate needs
/// `&mut self`.
#[derive(Debug)]
pub struct CarminClient {
    http: Client,
    url: ApiUrl,
    api_key: String,
    headers: HeaderMap,
    certificate: Option<PathBuf>,
    tls: TlsVerification,
    timeout: Option<Duration>,
}

/// How the TLS certificate of the server is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsVerification {
    /// Against the root certificates of the TLS backend.
    BuiltInRoots,
    /// Against the root certificates of the TLS backend and those of a CA bundle.
    Bundle(PathBuf),
    /// Not at all, because the configured CA bundle is not a file.
    Disabled,
}

impl CarminClient {
    /// Create a client. No request is made.
    pub fn new(config: ClientConfig) -> Result<Self, CarminError> {
        let url = ApiUrl::normalized(config.api_url)?;
        let headers = apikey_header(&config.api_key)?;
        let (http, tls) = build_http(config.certificate_path.as_deref(), config.timeout)?;
        let certificate = config.certificate_path.filter(|p| p.exists());
        Ok(Self {
            http,
            url,
            api_key: config.api_key,
            headers,
            certificate,
            tls,
            timeout: config.timeout,
        })
    }

    /// Get the current API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the REST root.
    pub fn api_url(&self) -> &ApiUrl {
        &self.url
    }

    /// Get the CA bundle in use, if any.
    pub fn certificate_path(&self) -> Option<&Path> {
        self.certificate.as_deref()
    }

    pub fn tls_verification(&self) -> &TlsVerification {
        &self.tls
    }

    /// Replace the API key, after checking it against the server.
    ///
    /// Returns `false` and keeps the current key if VIP does not accept the
    /// candidate. Any other server error is returned as [CarminError::Vip].
    pub fn set_api_key(&mut self, candidate: impl Into<String>) -> Result<bool, CarminError> {
        let candidate = candidate.into();
        let headers = apikey_header(&candidate)?;
        debug!("GET platform (checking candidate API key)");
        let req = self
            .http
            .get(self.endpoint("platform"))
            .headers(headers.clone());
        let body = req.send()?.bytes()?;
        match check(&body) {
            Ok(()) => {
                self.api_key = candidate;
                self.headers = headers;
                info!("API key changed");
                Ok(true)
            }
            Err(CarminError::Vip {
                code: UNAUTHORIZED,
                message,
            }) => {
                debug!("Candidate API key rejected: {}", message);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Use another CA bundle. The path is always stored; returns whether it
    /// is an existing file.
    ///
    /// When it is not a file, certificates are not verified. A file which is
    /// not a usable bundle is only logged: certificates are then checked
    /// against the built-in roots, and requests to servers they do not cover
    /// fail.
    pub fn set_certificate_path(&mut self, path: impl Into<PathBuf>) -> Result<bool, CarminError> {
        let path = path.into();
        let (http, tls) = build_http(Some(&path), self.timeout)?;
        let is_file = path.is_file();
        info!("CA bundle set to {:?} (exists: {})", path, is_file);
        self.http = http;
        self.tls = tls;
        self.certificate = Some(path);
        Ok(is_file)
    }

    // ==================================================
    //                 HELPER METHODS
    // ==================================================

    fn endpoint(&self, endpoint: &str) -> String {
        format!("{}{}", self.url, endpoint)
    }

    /// Start an authenticated request.
    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        debug!("{} {}", method, endpoint);
        self.http
            .request(method, self.endpoint(endpoint))
            .headers(self.headers.clone())
    }

    /// Send a request and return its body, unless it is an error envelope.
    fn execute(&self, req: RequestBuilder) -> Result<Bytes, CarminError> {
        let body = req.send()?.bytes()?;
        check(&body)?;
        Ok(body)
    }

    fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, CarminError> {
        let body = self.execute(self.request(Method::GET, endpoint))?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn get_text(&self, endpoint: &str) -> Result<String, CarminError> {
        let body = self.execute(self.request(Method::GET, endpoint))?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Collapse an error envelope into `None`.
fn swallow(result: Result<Bytes, CarminError>) -> Result<Option<Bytes>, CarminError> {
    match result {
        Ok(body) => Ok(Some(body)),
        Err(e @ CarminError::Vip { .. }) => {
            warn!("{}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Collapse an error envelope into `false`.
fn succeeded(result: Result<Bytes, CarminError>) -> Result<bool, CarminError> {
    Ok(swallow(result)?.is_some())
}

fn apikey_header(api_key: &str) -> Result<HeaderMap, CarminError> {
    let mut value = HeaderValue::from_str(api_key).map_err(CarminError::InvalidApiKey)?;
    value.set_sensitive(true);
    let mut headers = HeaderMap::new();
    headers.insert(APIKEY_HEADER, value);
    Ok(headers)
}

/// Build the HTTP client for the given CA bundle, falling back to the
/// built-in roots when the bundle cannot be used.
fn build_http(
    certificate: Option<&Path>,
    timeout: Option<Duration>,
) -> Result<(Client, TlsVerification), CarminError> {
    let builder = || Client::builder().timeout(timeout);
    match certificate {
        None => Ok((builder().build()?, TlsVerification::BuiltInRoots)),
        Some(path) if !path.is_file() => {
            warn!("CA bundle {:?} not found, TLS certificates will not be verified", path);
            let http = builder().danger_accept_invalid_certs(true).build()?;
            Ok((http, TlsVerification::Disabled))
        }
        Some(path) => match trusting_bundle(builder(), path) {
            Ok(http) => Ok((http, TlsVerification::Bundle(path.to_path_buf()))),
            Err(e) => {
                warn!("Cannot use CA bundle {:?}, using built-in roots only: {}", path, e);
                Ok((builder().build()?, TlsVerification::BuiltInRoots))
            }
        },
    }
}

/// Add every certificate of a PEM bundle. A file without PEM certificates is
/// read as a single DER certificate.
fn trusting_bundle(builder: ClientBuilder, path: &Path) -> Result<Client, CarminError> {
    let bundle = fs_err::read(path)?;
    let certificates = match Certificate::from_pem_bundle(&bundle) {
        Ok(certificates) if !certificates.is_empty() => certificates,
        _ => vec![Certificate::from_der(&bundle)?],
    };
    let builder = certificates
        .into_iter()
        .fold(builder, |b, c| b.add_root_certificate(c));
    Ok(builder.build()?)
}

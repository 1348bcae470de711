//! NewTypes for identifiers and URLs of the CARMIN API.

use crate::errors::InvalidApiUrl;
use aliri_braid::braid;

/// REST root of a CARMIN server, e.g. `https://vip.creatis.insa-lyon.fr/rest/`.
/// Every endpoint is appended to it verbatim.
#[braid(validator, serde)]
pub struct ApiUrl(String);

impl aliri_braid::Validator for ApiUrl {
    type Error = InvalidApiUrl;

    fn validate(s: &str) -> Result<(), Self::Error> {
        if !(s.starts_with("http://") || s.starts_with("https://")) {
            Err(InvalidApiUrl::Protocol(s.to_string()))
        } else if !s.ends_with('/') {
            Err(InvalidApiUrl::TrailingSlash(s.to_string()))
        } else {
            Ok(())
        }
    }
}

impl ApiUrl {
    /// Validate a URL, appending the trailing `/` if it is missing.
    pub fn normalized(raw: impl Into<String>) -> Result<Self, InvalidApiUrl> {
        let mut raw = raw.into();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        ApiUrl::try_from(raw)
    }
}

/// Opaque identifier of an execution, assigned by the server.
#[braid(serde)]
pub struct ExecutionId;

/// Pipeline identifier, e.g. `CQUEST/0.3`
#[braid(serde)]
pub struct PipelineId;

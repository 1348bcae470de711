//! Persisted settings of the `carmin` command, saved with `confy`
//! (e.g. `~/.config/carmin/default-config.ron`).

use carmin::ClientConfig;
use color_eyre::eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_NAME: &str = "carmin";

/// Values remembered between invocations. Unset values fall back to the
/// defaults of [ClientConfig].
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub certificate: Option<PathBuf>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        confy::load(APP_NAME, None).wrap_err("Could not read carmin settings")
    }

    pub fn store(&self) -> Result<()> {
        confy::store(APP_NAME, None, self).wrap_err("Could not save carmin settings")
    }

    /// Let the given values take precedence over the stored ones.
    pub fn overridden_by(self, other: Settings) -> Settings {
        Settings {
            api_url: other.api_url.or(self.api_url),
            api_key: other.api_key.or(self.api_key),
            certificate: other.certificate.or(self.certificate),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(api_url) = &self.api_url {
            config = config.with_api_url(api_url);
        }
        if let Some(api_key) = &self.api_key {
            config = config.with_api_key(api_key);
        }
        if let Some(certificate) = &self.certificate {
            config = config.with_certificate(certificate);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carmin::constants::{DEFAULT_API_KEY, DEFAULT_API_URL};

    #[test]
    fn test_overridden_by() {
        let stored = Settings {
            api_url: Some("http://stored/rest/".to_string()),
            api_key: Some("stored-key".to_string()),
            certificate: None,
        };
        let given = Settings {
            api_url: None,
            api_key: Some("given-key".to_string()),
            certificate: Some(PathBuf::from("/etc/ssl/vip.crt")),
        };
        let actual = stored.overridden_by(given);
        assert_eq!(actual.api_url.as_deref(), Some("http://stored/rest/"));
        assert_eq!(actual.api_key.as_deref(), Some("given-key"));
        assert_eq!(actual.certificate, Some(PathBuf::from("/etc/ssl/vip.crt")));
    }

    #[test]
    fn test_client_config_defaults() {
        let config = Settings::default().client_config();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.api_key, DEFAULT_API_KEY);
    }

    #[test]
    fn test_client_config() {
        let settings = Settings {
            api_url: Some("http://localhost:8080/rest/".to_string()),
            api_key: Some("abc".to_string()),
            certificate: Some(PathBuf::from("vip.crt")),
        };
        let config = settings.client_config();
        assert_eq!(config.api_url, "http://localhost:8080/rest/");
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.certificate_path, Some(PathBuf::from("vip.crt")));
    }
}

/// REST root of the public VIP instance.
pub const DEFAULT_API_URL: &str = "https://vip.creatis.insa-lyon.fr/rest/";

/// Placeholder key, to be replaced by a real one via
/// [crate::CarminClient::set_api_key].
pub const DEFAULT_API_KEY: &str = "TheApiKey";

/// Error code VIP answers with when the API key is not recognized.
pub const UNAUTHORIZED: i64 = 40101;

pub(crate) const APIKEY_HEADER: &str = "apikey";

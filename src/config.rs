// Client configuration

/// Base URL of the property web service; endpoint paths are joined onto it.
pub const DEFAULT_BASE_URL: &str = "http://www.zillow.com/webservice/";

pub const DEFAULT_USER_AGENT: &str = concat!("zillow_client/", env!("CARGO_PKG_VERSION"), " (Rust)");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Sent as the `zws-id` query parameter. Omitted from requests when unset.
    pub api_key: Option<String>,
    pub base_url: String,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

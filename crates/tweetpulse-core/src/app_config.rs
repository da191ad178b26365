use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub twitter_bearer_token: String,
    pub twitter_base_url: String,
    /// Default result bound for a search when the caller does not pass one.
    pub max_results: u32,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Total search attempts allowed while the provider keeps rate-limiting.
    pub rate_limit_max_attempts: u32,
    /// Cooldown used when a 429 carries no reset timestamp.
    pub rate_limit_cooldown_secs: u64,
    /// Upper bound on any single cooldown, including provider-directed ones.
    pub rate_limit_max_cooldown_secs: u64,
    pub classifier_url: String,
    pub classifier_timeout_secs: u64,
    pub classifier_batch_size: usize,
    /// Raw `RAW=LABEL,...` override for the model label map.
    pub classifier_labels: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("twitter_bearer_token", &"[redacted]")
            .field("twitter_base_url", &self.twitter_base_url)
            .field("max_results", &self.max_results)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("rate_limit_max_attempts", &self.rate_limit_max_attempts)
            .field("rate_limit_cooldown_secs", &self.rate_limit_cooldown_secs)
            .field(
                "rate_limit_max_cooldown_secs",
                &self.rate_limit_max_cooldown_secs,
            )
            .field("classifier_url", &self.classifier_url)
            .field("classifier_timeout_secs", &self.classifier_timeout_secs)
            .field("classifier_batch_size", &self.classifier_batch_size)
            .field("classifier_labels", &self.classifier_labels)
            .finish()
    }
}

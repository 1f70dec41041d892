use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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
    pub backend_url: String,
    pub backend_anon_key: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub backend_timeout_secs: u64,
    pub backend_user_agent: String,
    pub session_ttl_secs: u64,
}

impl AppConfig {
    /// Session cookies carry the `Secure` attribute everywhere except local
    /// development, where the service is usually reached over plain HTTP.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        !matches!(self.env, Environment::Development)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("backend_url", &self.backend_url)
            .field("backend_anon_key", &"[redacted]")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("backend_timeout_secs", &self.backend_timeout_secs)
            .field("backend_user_agent", &self.backend_user_agent)
            .field("session_ttl_secs", &self.session_ttl_secs)
            .finish()
    }
}

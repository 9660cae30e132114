/// Default API root offered by every node.
pub const DEFAULT_BASE_URL: &str = "https://api.dyuapi.com";

/// Connection defaults for the command-line harness.
///
/// The node library never reads the environment; only the binary builds
/// one of these and applies it to the node inputs it constructs.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// API root (default: [`DEFAULT_BASE_URL`]).
    pub base_url: String,
    /// Bearer token (default: empty, meaning no auth header).
    pub api_key: String,
}

impl CliConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var         | Default                  |
    /// |-----------------|--------------------------|
    /// | `SORA_BASE_URL` | `https://api.dyuapi.com` |
    /// | `SORA_API_KEY`  | (empty)                  |
    pub fn from_env() -> Self {
        let base_url = std::env::var("SORA_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let api_key = std::env::var("SORA_API_KEY").unwrap_or_default();

        Self { base_url, api_key }
    }
}

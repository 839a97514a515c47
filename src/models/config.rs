//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// Cookie signing key; at least 64 bytes.
    pub secret: String,
    /// HS256 key used to verify bearer tokens.
    pub jwt_secret: String,
    #[serde(default)]
    pub jwt_audience: Option<String>,
    pub replicate: ReplicateConfig,
    pub nextsms: NextSmsConfig,
    pub whatsapp: WhatsAppConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ReplicateConfig {
    /// Requests needing the AI provider fail or fall back when unset.
    #[serde(default)]
    pub api_token: Option<String>,
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub max_poll_attempts: u32,
    pub vision_model: String,
    pub text_model: String,
    pub transcription_model: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NextSmsConfig {
    pub url: String,
    pub default_sender_id: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WhatsAppConfig {
    pub base_url: String,
}

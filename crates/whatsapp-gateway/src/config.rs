//! Configuration for the gateway.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Gateway configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// WhatsApp bridge configuration
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// OTP message configuration
    #[serde(default)]
    pub otp: OtpConfig,

    /// Inbound auto-reply configuration
    #[serde(default)]
    pub auto_reply: AutoReplyConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppConfig {
    /// WhatsApp Web bridge URL
    #[serde(default = "default_bridge_url")]
    pub bridge_url: String,

    /// Country code applied to local numbers
    #[serde(default = "default_country_code")]
    pub default_country_code: String,

    /// Domain suffix of personal chat addresses
    #[serde(default = "default_address_domain")]
    pub address_domain: String,

    /// Poll interval for lifecycle events
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    /// Run the bridge browser without a window
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Comma-separated browser arguments
    #[serde(default = "default_browser_args")]
    pub browser_args: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Global requests per minute
    #[serde(default = "default_global_rpm")]
    pub global_per_minute: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtpConfig {
    /// Text sent by /send-otp
    #[serde(default = "default_otp_message")]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AutoReplyConfig {
    /// Whether auto-reply starts enabled
    #[serde(default)]
    pub enabled: bool,

    /// Reply sent to direct messages while enabled
    #[serde(default = "default_auto_reply_message")]
    pub message: String,

    /// Reply sent when the auto-reply itself fails
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl WhatsAppConfig {
    /// Browser arguments as a list, skipping empty entries.
    pub fn browser_args(&self) -> Vec<String> {
        self.browser_args
            .split(',')
            .map(str::trim)
            .filter(|arg| !arg.is_empty())
            .map(String::from)
            .collect()
    }
}

impl ServerConfig {
    /// Socket address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .listen_addr
            .parse()
            .with_context(|| format!("Invalid listen address {:?}", self.listen_addr))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

// Default implementations
impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            bridge_url: default_bridge_url(),
            default_country_code: default_country_code(),
            address_domain: default_address_domain(),
            poll_interval: default_poll_interval(),
            headless: true,
            browser_args: default_browser_args(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            global_per_minute: default_global_rpm(),
        }
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            message: default_otp_message(),
        }
    }
}

impl Default for AutoReplyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            message: default_auto_reply_message(),
            fallback_message: default_fallback_message(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_bridge_url() -> String {
    "http://whatsapp-bridge:3000".into()
}

fn default_country_code() -> String {
    "62".into()
}

fn default_address_domain() -> String {
    "c.us".into()
}

fn default_poll_interval() -> Duration {
    Duration::from_millis(500)
}

fn default_true() -> bool {
    true
}

fn default_browser_args() -> String {
    "--no-sandbox,--disable-setuid-sandbox".into()
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    3005
}

fn default_global_rpm() -> u32 {
    60
}

fn default_otp_message() -> String {
    "Your OTP code is: 123456".into()
}

fn default_auto_reply_message() -> String {
    "Auto-reply feature is enabled but not fully implemented yet.".into()
}

fn default_fallback_message() -> String {
    "Sorry, something went wrong.".into()
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    // Parsing would turn a country code like "062" into 62.
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_source() {
        let config: Config = config::Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.whatsapp.bridge_url, "http://whatsapp-bridge:3000");
        assert_eq!(config.whatsapp.default_country_code, "62");
        assert_eq!(config.whatsapp.address_domain, "c.us");
        assert_eq!(config.whatsapp.poll_interval, Duration::from_millis(500));
        assert!(config.whatsapp.headless);
        assert_eq!(config.server.port, 3005);
        assert_eq!(config.rate_limit.global_per_minute, 60);
        assert_eq!(config.otp.message, "Your OTP code is: 123456");
        assert!(!config.auto_reply.enabled);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_overrides() {
        let config: Config = config::Config::builder()
            .set_override("whatsapp.default_country_code", "1")
            .unwrap()
            .set_override("whatsapp.poll_interval", "2s")
            .unwrap()
            .set_override("server.port", "8080")
            .unwrap()
            .set_override("auto_reply.enabled", "true")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.whatsapp.default_country_code, "1");
        assert_eq!(config.whatsapp.poll_interval, Duration::from_secs(2));
        assert_eq!(config.server.port, 8080);
        assert!(config.auto_reply.enabled);
    }

    #[test]
    fn test_socket_addr() {
        let server = ServerConfig::default();
        assert_eq!(server.socket_addr().unwrap().to_string(), "0.0.0.0:3005");

        let server = ServerConfig {
            listen_addr: "localhost".into(),
            port: 3005,
        };
        let err = server.socket_addr().unwrap_err();
        assert!(err.to_string().contains("localhost"));
    }

    #[test]
    fn test_browser_args_split() {
        let whatsapp = WhatsAppConfig {
            browser_args: "--no-sandbox, ,--disable-gpu,".into(),
            ..Default::default()
        };
        assert_eq!(whatsapp.browser_args(), vec!["--no-sandbox", "--disable-gpu"]);

        let default = WhatsAppConfig::default();
        assert_eq!(
            default.browser_args(),
            vec!["--no-sandbox", "--disable-setuid-sandbox"]
        );
    }
}

use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub whatsapp: WhatsAppConfig,
    /// true = everything in-process (mock channel); false = cloud channel.
    pub mock_mode: bool,
    /// Base URL of the real backend when not in mock mode.
    pub api_url: String,
    /// Phone number that receives owner-audience notifications.
    pub owner_number: String,
    /// Heartbeat publish interval in seconds. Expected range 8-12.
    pub heartbeat_secs: u64,
    /// Load the demo lead/user data set at startup.
    pub seed_demo_data: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    /// Probability in [0, 1] that a mock send succeeds.
    pub success_rate: f64,
    /// Timeline entries keep at most this many characters of the message.
    pub truncate_len: usize,
}

fn get_str(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn get_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> Self {
        AppConfig {
            server: ServerConfig {
                host: get_str("SERVER_HOST", "127.0.0.1"),
                port: get_parsed("SERVER_PORT", 3001),
            },
            whatsapp: WhatsAppConfig {
                success_rate: get_parsed::<f64>("WHATSAPP_SUCCESS_RATE", 0.9).clamp(0.0, 1.0),
                truncate_len: get_parsed("WHATSAPP_TRUNCATE_LEN", 50),
            },
            mock_mode: get_bool("MOCK_MODE", true),
            api_url: get_str("API_URL", "http://localhost:3001/api/v1"),
            owner_number: get_str("OWNER_NUMBER", "919876543210"),
            heartbeat_secs: get_parsed("HEARTBEAT_SECS", 10),
            seed_demo_data: get_bool("SEED_DEMO_DATA", true),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3001,
            },
            whatsapp: WhatsAppConfig {
                success_rate: 0.9,
                truncate_len: 50,
            },
            mock_mode: true,
            api_url: "http://localhost:3001/api/v1".to_string(),
            owner_number: "919876543210".to_string(),
            heartbeat_secs: 10,
            seed_demo_data: true,
        }
    }
}

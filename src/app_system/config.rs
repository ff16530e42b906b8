use std::env;

const DEFAULT_MAILBOX_CAPACITY: usize = 32;

/// Settings for the payment gateway adapter.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub merchant_code: String,
    pub base_url: String,
    pub secret_key: String,
    pub return_url: String,
}

/// Process-level configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct SystemConfig {
    /// Capacity of every actor mailbox.
    pub mailbox_capacity: usize,
    pub gateway: GatewayConfig,
}

impl SystemConfig {
    /// Loads configuration from the environment (and `.env` if present),
    /// falling back to development defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let mailbox_capacity = env::var("BLOOMLINE_MAILBOX_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAILBOX_CAPACITY);
        let gateway = GatewayConfig {
            merchant_code: env_or("BLOOMLINE_GATEWAY_MERCHANT", "BLOOMDEV"),
            base_url: env_or(
                "BLOOMLINE_GATEWAY_URL",
                "https://sandbox.pay.example.com/checkout",
            ),
            secret_key: env_or("BLOOMLINE_GATEWAY_SECRET", "dev-secret"),
            return_url: env_or(
                "BLOOMLINE_GATEWAY_RETURN_URL",
                "http://localhost:3000/payment/return",
            ),
        };
        Self {
            mailbox_capacity,
            gateway,
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
            gateway: GatewayConfig {
                merchant_code: "BLOOMDEV".to_string(),
                base_url: "https://sandbox.pay.example.com/checkout".to_string(),
                secret_key: "dev-secret".to_string(),
                return_url: "http://localhost:3000/payment/return".to_string(),
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

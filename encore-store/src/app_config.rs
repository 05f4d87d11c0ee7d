use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// Hold window shared by the coordinator, the sweeper and the session
    /// timer. All three read this one value.
    pub seat_hold_seconds: u64,
    pub sweep_interval_seconds: u64,
    /// Maximum seats a single user may hold per event, 0 = unlimited.
    #[serde(default)]
    pub max_seats_per_user: usize,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Environment-specific file, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `ENCORE__SERVER__PORT=9000`
            .add_source(config::Environment::with_prefix("ENCORE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

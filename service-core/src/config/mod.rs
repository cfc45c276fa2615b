use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

/// Plain `PORT` variable honoured by hosting platforms; overrides `APP__PORT`.
pub const PORT_ENV: &str = "PORT";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    5000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .set_override_option("port", std::env::var(PORT_ENV).ok())?
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_port_is_5000() {
        assert_eq!(Config::default().port, 5000);
    }

    #[test]
    fn missing_port_deserializes_to_default() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.port, 5000);
    }
}

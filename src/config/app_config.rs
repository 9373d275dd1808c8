use crate::error::InitProcessError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// ファイアウォールのレートリミット判定に使う直近パケット数
pub const RATE_WINDOW: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub router: RouterConfig,
    pub firewall: FirewallConfig,
    pub presentation: PresentationConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    pub name: String,
    pub client_source_ip: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirewallConfig {
    pub rate_limit: usize,
    pub history_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationConfig {
    pub pacing_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub file: String,
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            router: RouterConfig {
                name: "CoreRouter-01".to_string(),
                client_source_ip: "192.168.0.1".to_string(),
            },
            firewall: FirewallConfig {
                rate_limit: 10,
                history_capacity: 256,
            },
            presentation: PresentationConfig { pacing_ms: 200 },
            log: LogConfig {
                file: "router.log".to_string(),
                level: "info".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// `.env` と環境変数から設定を読み込む。未設定の項目はデモ既定値を使う
    pub fn from_env() -> Result<Self, InitProcessError> {
        // .envが無くてもよい
        dotenv::dotenv().ok();

        let defaults = Self::default();
        let config = Self {
            router: RouterConfig {
                name: std::env::var("ROUTER_NAME").unwrap_or(defaults.router.name),
                client_source_ip: std::env::var("CLIENT_SOURCE_IP")
                    .unwrap_or(defaults.router.client_source_ip),
            },
            firewall: FirewallConfig {
                rate_limit: parse_var("FIREWALL_RATE_LIMIT", defaults.firewall.rate_limit)?,
                history_capacity: parse_var(
                    "FIREWALL_HISTORY_CAPACITY",
                    defaults.firewall.history_capacity,
                )?,
            },
            presentation: PresentationConfig {
                pacing_ms: parse_var("PACING_MS", defaults.presentation.pacing_ms)?,
            },
            log: LogConfig {
                file: std::env::var("LOG_FILE").unwrap_or(defaults.log.file),
                level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log.level),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), InitProcessError> {
        if self.firewall.history_capacity < RATE_WINDOW {
            return Err(InitProcessError::InvalidConfig(format!(
                "FIREWALL_HISTORY_CAPACITY は {} 以上である必要があります: {}",
                RATE_WINDOW, self.firewall.history_capacity
            )));
        }
        if self.router.client_source_ip.trim().is_empty() {
            return Err(InitProcessError::InvalidConfig(
                "CLIENT_SOURCE_IP が空です".to_string(),
            ));
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn for_testing() -> Self {
        let mut config = Self::default();
        config.presentation.pacing_ms = 0;
        config
    }
}

fn parse_var<T>(key: &str, default: T) -> Result<T, InitProcessError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| InitProcessError::EnvVarParseError(format!("{}: {}", key, e))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo_topology() {
        let config = AppConfig::default();
        assert_eq!(config.router.name, "CoreRouter-01");
        assert_eq!(config.router.client_source_ip, "192.168.0.1");
        assert_eq!(config.firewall.rate_limit, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn history_smaller_than_window_is_rejected() {
        let mut config = AppConfig::for_testing();
        config.firewall.history_capacity = RATE_WINDOW - 1;
        assert!(matches!(
            config.validate(),
            Err(InitProcessError::InvalidConfig(_))
        ));
    }

    #[test]
    fn unparsable_variable_is_reported() {
        std::env::set_var("GLASS_TEST_BAD_NUMBER", "ten");
        let result: Result<usize, _> = parse_var("GLASS_TEST_BAD_NUMBER", 10);
        assert!(matches!(result, Err(InitProcessError::EnvVarParseError(_))));

        let fallback: usize = parse_var("GLASS_TEST_UNSET_NUMBER", 7).unwrap();
        assert_eq!(fallback, 7);
    }
}

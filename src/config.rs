use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub validation: ValidationSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 校验阈值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// 金额比较的绝对容差 (美元)
    pub tolerance: f64,
    /// 申诉截止日剩余天数 <= urgent_days 视为紧急
    pub urgent_days: i64,
    pub soon_days: i64,
    /// 同一机构同一 (编码, 日期) 出现次数达到该值时提示
    pub same_provider_min_occurrences: usize,
    /// 重复收费明细中最多列出的机构数
    pub max_listed_providers: usize,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            tolerance: 0.01,
            urgent_days: 14,
            soon_days: 30,
            same_provider_min_occurrences: 3,
            max_listed_providers: 3,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            validation: ValidationSettings::default(),
        }
    }
}

impl AppConfig {
    /// 加载配置: 默认值 -> claims-validator.toml (可选) -> CLAIMS__* 环境变量
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("claims-validator")
    }

    pub fn load_from(file_stem: &str) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .add_source(File::with_name(file_stem).required(false))
            .add_source(
                Environment::with_prefix("CLAIMS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_thresholds() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.validation.tolerance, 0.01);
        assert_eq!(config.validation.urgent_days, 14);
        assert_eq!(config.validation.soon_days, 30);
        assert_eq!(config.validation.same_provider_min_occurrences, 3);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from("no-such-claims-validator-config").unwrap();
        assert_eq!(config.validation, ValidationSettings::default());
        assert!(!config.server.host.is_empty());
    }
}

//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use crate::observability::ObservabilityConfig;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 扫描输入配置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// 可拦截项定义文件（JSON 数组）
    pub definitions_path: Option<PathBuf>,
    /// 外部扫描结果文件（JSON 对象：标识 -> 规则组 -> 规则列表）
    pub scan_results_path: Option<PathBuf>,
}

/// 应用配置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub scanner: ScannerConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. config/default.toml（默认配置）
    /// 2. config/{environment}.toml（环境特定配置）
    /// 3. config/{service_name}.toml（服务特定配置）
    /// 4. 环境变量（BLOCKER 前缀，如 BLOCKER__SCANNER__DEFINITIONS_PATH -> scanner.definitions_path）
    pub fn load(service_name: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("BLOCKER_ENV").unwrap_or_else(|_| "development".to_string());
        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        Self::load_from_dir(service_name, Path::new(&config_dir), &env)
    }

    /// 从指定目录加载配置，环境名由调用方给出
    pub fn load_from_dir(
        service_name: &str,
        config_dir: &Path,
        env: &str,
    ) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", env)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{}.toml", env))).required(false))
            .add_source(
                File::from(config_dir.join(format!("{}.toml", service_name))).required(false),
            )
            // BLOCKER__SCANNER__DEFINITIONS_PATH -> scanner.definitions_path
            .add_source(
                Environment::with_prefix("BLOCKER")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.scanner.definitions_path.is_none());
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_load_from_empty_dir_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let config = AppConfig::load_from_dir("blockable-check", dir.path(), "test").unwrap();

        assert_eq!(config.service_name, "blockable-check");
        assert_eq!(config.environment, "test");
        assert!(config.scanner.scan_results_path.is_none());
    }

    #[test]
    fn test_service_file_overrides_default_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
            [scanner]
            definitions_path = "default-definitions.json"

            [observability]
            log_level = "warn"
            "#,
        )
        .unwrap();
        fs::write(
            dir.path().join("blockable-check.toml"),
            r#"
            [scanner]
            definitions_path = "service-definitions.json"
            "#,
        )
        .unwrap();

        let config = AppConfig::load_from_dir("blockable-check", dir.path(), "test").unwrap();

        assert_eq!(
            config.scanner.definitions_path,
            Some(PathBuf::from("service-definitions.json"))
        );
        assert_eq!(config.observability.log_level, "warn");
        assert_eq!(config.observability.log_format, "pretty");
    }
}

//! 服务配置
//!
//! 支持配置文件与DERMA前缀环境变量两级来源，缺省值覆盖全部字段。

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use derma_core::{DermaError, Result};

/// 应用完整配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 服务器配置
    pub server: ServerConfig,
    /// 网关配置
    pub gateway: GatewayConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听主机
    pub host: String,
    /// 监听端口
    pub port: u16,
}

/// 网关配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// 使用Mock网关
    pub use_mock: bool,
    /// Mock随机种子
    pub mock_seed: u64,
    /// Mock是否模拟延迟
    pub mock_latency: bool,
    /// 后端服务地址
    pub endpoint: String,
    /// 请求超时（秒）
    pub request_timeout_secs: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            gateway: GatewayConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8080 }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            use_mock: true,
            mock_seed: 42,
            mock_latency: true,
            endpoint: "http://localhost:8000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

impl AppConfig {
    /// 从配置文件与环境变量加载
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path));
        }

        let settings = builder
            .add_source(Environment::with_prefix("DERMA").separator("__"))
            .build()
            .map_err(|e| DermaError::Config(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| DermaError::Config(e.to_string()))
    }

    /// 启动前的配置校验
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(DermaError::Config("server port cannot be 0".to_string()));
        }
        if !self.gateway.use_mock && self.gateway.endpoint.trim().is_empty() {
            return Err(DermaError::Config(
                "gateway endpoint is required when mock mode is disabled".to_string(),
            ));
        }
        if self.gateway.request_timeout_secs == 0 {
            return Err(DermaError::Config("gateway request timeout cannot be 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.gateway.use_mock);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.gateway.use_mock = false;
        config.gateway.endpoint = " ".to_string();
        assert!(config.validate().is_err());
    }
}

use crate::error::{AppError, AppResult, ConfigError};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// 传输方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// 一次性 multipart 请求
    Http,
    /// 持久连接 + JSON-RPC 消息关联
    #[serde(alias = "ws")]
    Websocket,
}

impl TransportKind {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(TransportKind::Http),
            "ws" | "websocket" => Ok(TransportKind::Websocket),
            _ => Err(ConfigError::UnknownTransport {
                value: value.to_string(),
            }),
        }
    }
}

impl std::str::FromStr for TransportKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 传输方式
    pub transport: TransportKind,
    /// multipart 接口地址
    pub http_endpoint: String,
    /// WebSocket 接口地址
    pub ws_endpoint: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 提交时是否必须附带文件
    pub require_file: bool,
    /// 报告 PDF 使用的字体文件
    pub font_path: String,
    /// PDF 输出目录
    pub output_dir: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transport: TransportKind::Http,
            http_endpoint: "https://mcp-api-server-yxey.onrender.com/api/process_document"
                .to_string(),
            ws_endpoint: "wss://auto-llm-routing-server.onrender.com/mcp".to_string(),
            request_timeout_secs: 120,
            require_file: true,
            font_path: "fonts/NotoSansKR-Regular.ttf".to_string(),
            output_dir: ".".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载，缺省字段取默认值，随后再套用环境变量
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            })?;
        Ok(config.with_env_overrides())
    }

    fn with_env_overrides(self) -> Self {
        Self {
            transport: std::env::var("TRANSPORT_KIND")
                .ok()
                .and_then(|v| TransportKind::parse(&v).ok())
                .unwrap_or(self.transport),
            http_endpoint: std::env::var("HTTP_ENDPOINT").unwrap_or(self.http_endpoint),
            ws_endpoint: std::env::var("WS_ENDPOINT").unwrap_or(self.ws_endpoint),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.request_timeout_secs),
            require_file: std::env::var("REQUIRE_FILE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.require_file),
            font_path: std::env::var("REPORT_FONT_PATH").unwrap_or(self.font_path),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(self.output_dir),
            verbose_logging: std::env::var("VERBOSE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.verbose_logging),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// 当前传输方式对应的地址
    pub fn endpoint(&self) -> &str {
        match self.transport {
            TransportKind::Http => &self.http_endpoint,
            TransportKind::Websocket => &self.ws_endpoint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_kind_parse() {
        assert_eq!(TransportKind::parse("HTTP").unwrap(), TransportKind::Http);
        assert_eq!(TransportKind::parse("ws").unwrap(), TransportKind::Websocket);
        assert_eq!(
            TransportKind::parse(" websocket ").unwrap(),
            TransportKind::Websocket
        );
        assert!(TransportKind::parse("grpc").is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            transport = "websocket"
            require_file = false
            "#,
        )
        .unwrap();

        assert_eq!(config.transport, TransportKind::Websocket);
        assert!(!config.require_file);
        assert_eq!(config.request_timeout_secs, 120);
        assert_eq!(config.endpoint(), Config::default().ws_endpoint);
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let dir = std::env::temp_dir().join("mcp_report_client_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.toml");
        std::fs::write(&path, "transport = [").unwrap();

        let err = Config::from_toml_file(&path).unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::TomlParseFailed { .. })
        ));
    }
}

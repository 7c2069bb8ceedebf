//! 传输适配器
//!
//! 编排器只依赖 `TransportAdapter`，具体是一次性 HTTP 请求还是
//! 带消息关联的 WebSocket 连接由配置决定。

pub mod http_client;
pub mod ws_client;

use crate::config::{Config, TransportKind};
use crate::models::{TransportRequest, TransportResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub use http_client::HttpTransport;
pub use ws_client::WsTransport;

/// 把一次逻辑请求送到远端
///
/// `invoke` 恰好完成一次，所有通道错误都以 `TransportResult::Failure` 返回。
#[async_trait]
pub trait TransportAdapter: Send + Sync {
    /// 日志里使用的名字
    fn name(&self) -> &'static str;

    async fn invoke(&self, request: TransportRequest) -> TransportResult;
}

/// 按配置创建适配器
pub fn build_transport(config: &Config) -> Arc<dyn TransportAdapter> {
    match config.transport {
        TransportKind::Http => {
            let transport = HttpTransport::new(&config.http_endpoint);
            debug!("🔧 HTTP 传输 -> {}", transport.endpoint());
            Arc::new(transport)
        }
        TransportKind::Websocket => {
            let transport = WsTransport::new(&config.ws_endpoint);
            debug!("🔧 WebSocket 传输 -> {}", transport.endpoint());
            Arc::new(transport)
        }
    }
}

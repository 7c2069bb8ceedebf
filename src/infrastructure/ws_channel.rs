//! WebSocket 通道 - 基础设施层
//!
//! 持有唯一的连接资源，只暴露"收发 JSON 文本"的能力

use futures::{SinkExt, StreamExt};
use serde_json::Value as JsonValue;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

/// WebSocket 通道
///
/// 职责：
/// - 持有唯一的 WebSocketStream
/// - 暴露 send_json() / next_text() / close() 能力
/// - 不认识 JSON-RPC，也不做请求关联
pub struct WsChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsChannel {
    /// 建立连接
    pub async fn connect(url: &str) -> Result<Self, WsError> {
        debug!("正在连接 WebSocket: {}", url);
        let (stream, response) = connect_async(url).await?;
        debug!("WebSocket 已连接 (HTTP {})", response.status());
        Ok(Self { stream })
    }

    /// 发送一条 JSON 文本消息
    pub async fn send_json(&mut self, payload: &JsonValue) -> Result<(), WsError> {
        let text = payload.to_string();
        debug!("发送消息 ({} 字节)", text.len());
        self.stream.send(Message::Text(text)).await
    }

    /// 读取下一条文本消息
    ///
    /// 跳过 ping/pong；对端关闭或流结束时返回 `None`。
    pub async fn next_text(&mut self) -> Option<Result<String, WsError>> {
        while let Some(message) = self.stream.next().await {
            match message {
                Ok(Message::Text(text)) => return Some(Ok(text)),
                Ok(Message::Binary(bytes)) => {
                    return Some(Ok(String::from_utf8_lossy(&bytes).into_owned()))
                }
                Ok(Message::Close(frame)) => {
                    debug!("对端关闭连接: {:?}", frame);
                    return None;
                }
                Ok(_) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }

    /// 关闭连接，已经断开时忽略错误
    pub async fn close(mut self) {
        if let Err(e) = self.stream.close(None).await {
            debug!("关闭 WebSocket 时出错（忽略）: {}", e);
        }
    }
}

//! WebSocket 传输
//!
//! 建立连接、发送一条 JSON-RPC 调用，等到 id 对得上的回复后关闭连接

use crate::clients::TransportAdapter;
use crate::infrastructure::WsChannel;
use crate::models::{TransportRequest, TransportResult};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// WebSocket 传输客户端
pub struct WsTransport {
    endpoint: String,
    next_id: AtomicU64,
}

impl WsTransport {
    /// 创建新的 WebSocket 传输
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 发送调用并等待关联的回复，不负责关闭连接
    async fn exchange(
        channel: &mut WsChannel,
        id: u64,
        request: &TransportRequest,
    ) -> TransportResult {
        let envelope = build_envelope(id, request);
        if let Err(e) = channel.send_json(&envelope).await {
            return TransportResult::network(format!("요청을 보내지 못했습니다. ({})", e));
        }

        loop {
            match channel.next_text().await {
                None => {
                    return TransportResult::network("응답을 받기 전에 연결이 종료되었습니다.");
                }
                Some(Err(e)) => {
                    return TransportResult::network(format!("연결이 중단되었습니다. ({})", e));
                }
                Some(Ok(text)) => match correlate(id, &text) {
                    Some(result) => return result,
                    None => debug!("跳过不相关的消息: {}", text),
                },
            }
        }
    }
}

/// 构建 JSON-RPC 调用
fn build_envelope(id: u64, request: &TransportRequest) -> Value {
    let mut arguments = json!({
        "input": request.text(),
        "tag": request.tag().wire_value(),
    });

    if let Some(file) = request.file() {
        arguments["file"] = json!({
            "name": file.name,
            "mime_type": file.mime,
            "data": BASE64.encode(&file.bytes),
        });
    }

    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/invoke",
        "params": {
            "name": "generate_text",
            "arguments": arguments,
        },
    })
}

fn matches_id(value: Option<&Value>, id: u64) -> bool {
    match value {
        Some(Value::Number(n)) => n.as_u64() == Some(id),
        Some(Value::String(s)) => s == &id.to_string(),
        _ => false,
    }
}

/// 把 `content` 字段拼成报告文本：字符串直接使用，数组取其中的 text 项
fn content_text(content: &Value) -> Option<String> {
    match content {
        Value::String(text) => Some(text.clone()),
        Value::Array(items) => {
            let texts: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("text").and_then(Value::as_str))
                .collect();
            if texts.is_empty() {
                None
            } else {
                Some(texts.join("\n"))
            }
        }
        _ => None,
    }
}

/// 判断一条消息是否是本次调用的回复
///
/// 返回 `None` 表示与本次调用无关，继续等待。
fn correlate(id: u64, text: &str) -> Option<TransportResult> {
    let message: Value = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            warn!("无法解析服务端消息: {}", e);
            return Some(TransportResult::protocol(format!(
                "서버 메시지를 해석할 수 없습니다. ({})",
                e
            )));
        }
    };

    let id_field = message.get("id");
    let is_ours = matches_id(id_field, id)
        // 服务端解析不了请求时回复 id 为 null 的错误
        || (matches!(id_field, Some(Value::Null)) && message.get("error").is_some());
    if !is_ours {
        return None;
    }

    if let Some(error) = message.get("error") {
        let detail = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Some(TransportResult::remote(detail));
    }

    let result = message.get("result");
    let content = result.and_then(|r| r.get("content")).and_then(content_text);
    let is_error = result
        .and_then(|r| r.get("isError"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    Some(match content {
        Some(text) if is_error => TransportResult::remote(text),
        Some(text) if !text.trim().is_empty() => TransportResult::Success(text),
        _ => TransportResult::protocol("MCP 서버 응답 오류 또는 빈 응답 (result.content 없음)"),
    })
}

#[async_trait]
impl TransportAdapter for WsTransport {
    fn name(&self) -> &'static str {
        "websocket"
    }

    async fn invoke(&self, request: TransportRequest) -> TransportResult {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let mut channel = match WsChannel::connect(&self.endpoint).await {
            Ok(channel) => channel,
            Err(e) => {
                warn!("WebSocket 连接失败: {}", e);
                return TransportResult::network(format!(
                    "WebSocket 연결 오류 발생. MCP 서버({})를 확인하세요. ({})",
                    self.endpoint, e
                ));
            }
        };

        let result = Self::exchange(&mut channel, id, &request).await;
        channel.close().await;
        debug!("调用 #{} 完成，连接已关闭", id);
        result
    }
}

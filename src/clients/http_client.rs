//! HTTP 传输
//!
//! 一次 multipart POST，请求本身的完成就是结果

use crate::clients::TransportAdapter;
use crate::models::{SelectedFile, TransportRequest, TransportResult};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

const DEFAULT_REMOTE_ERROR: &str = "MCP 서버 응답 오류";

/// HTTP 传输客户端
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// 创建新的 HTTP 传输
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// 使用自定义 reqwest 客户端
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 构建表单：file（可选）、user_request、target_tag
    fn build_form(request: &TransportRequest) -> Form {
        let mut form = Form::new()
            .text("user_request", request.text().to_string())
            .text("target_tag", request.tag().wire_value());

        if let Some(file) = request.file() {
            form = form.part("file", file_part(file));
        }

        form
    }
}

/// 文件分片；MIME 无法解析时退回默认类型
fn file_part(file: &SelectedFile) -> Part {
    Part::bytes(file.bytes.clone())
        .file_name(file.name.clone())
        .mime_str(&file.mime)
        .unwrap_or_else(|_| Part::bytes(file.bytes.clone()).file_name(file.name.clone()))
}

/// 把状态码和响应体翻译成结果
fn interpret_response(status: StatusCode, body: &str) -> TransportResult {
    let data: Value = match serde_json::from_str(body) {
        Ok(data) => data,
        Err(e) if status.is_success() => {
            return TransportResult::protocol(format!("응답이 JSON 형식이 아닙니다 ({})", e));
        }
        Err(_) => {
            return TransportResult::remote(format!(
                "{} (HTTP {})",
                DEFAULT_REMOTE_ERROR,
                status.as_u16()
            ));
        }
    };

    if status.is_success() {
        return match data.get("final_report").and_then(Value::as_str) {
            Some(report) if !report.trim().is_empty() => {
                TransportResult::Success(report.to_string())
            }
            _ => TransportResult::protocol(
                "분석이 완료되었으나 서버가 보고서 내용(final_report)을 반환하지 않았습니다.",
            ),
        };
    }

    let detail = match data.get("detail") {
        Some(Value::String(detail)) => detail.clone(),
        Some(Value::Null) | None => DEFAULT_REMOTE_ERROR.to_string(),
        Some(other) => other.to_string(),
    };
    TransportResult::remote(format!("{} (HTTP {})", detail, status.as_u16()))
}

#[async_trait]
impl TransportAdapter for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn invoke(&self, request: TransportRequest) -> TransportResult {
        debug!(
            "POST {} (文件: {:?}, 标签: {})",
            self.endpoint,
            request.file().map(|f| f.name.as_str()),
            request.tag()
        );

        let response = match self
            .client
            .post(&self.endpoint)
            .multipart(Self::build_form(&request))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("HTTP 请求失败: {}", e);
                return TransportResult::network(format!(
                    "MCP 서버가 '{}' 주소에서 실행 중인지 확인하세요. ({})",
                    self.endpoint, e
                ));
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("读取响应体失败: {}", e);
                return TransportResult::network(format!(
                    "응답을 받는 중 연결이 끊어졌습니다. ({})",
                    e
                ));
            }
        };

        debug!("HTTP {} 响应 {} 字节", status, body.len());
        let result = interpret_response(status, &body);
        if !result.is_success() {
            warn!("MCP 서버 오류 상세: {}", body);
        }
        result
    }
}

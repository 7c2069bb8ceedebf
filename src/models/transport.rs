//! 传输层的请求 / 结果值

use crate::models::routing_tag::RoutingTag;
use crate::models::session::SelectedFile;
use std::fmt;
use std::sync::Arc;

/// 提交那一刻的请求快照
///
/// 文件内容用 `Arc` 共享，之后用户再改输入不会影响正在进行的调用。
#[derive(Debug, Clone)]
pub struct TransportRequest {
    file: Option<Arc<SelectedFile>>,
    text: String,
    tag: RoutingTag,
}

impl TransportRequest {
    pub fn new(file: Option<Arc<SelectedFile>>, text: impl Into<String>, tag: RoutingTag) -> Self {
        Self {
            file,
            text: text.into(),
            tag,
        }
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tag(&self) -> RoutingTag {
        self.tag
    }
}

/// 失败类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// 本地校验未通过，没有发出请求
    Validation,
    /// 连接失败、中途断开或超时
    Network,
    /// 收到了响应但格式不对
    Protocol,
    /// 服务端明确返回失败
    Remote,
}

impl FailureKind {
    /// 面向用户的类别前缀
    pub fn headline(self) -> &'static str {
        match self {
            FailureKind::Validation => "입력 오류",
            FailureKind::Network => "네트워크 연결 오류",
            FailureKind::Protocol => "응답 형식 오류",
            FailureKind::Remote => "서버 오류",
        }
    }
}

/// 一次调用的结果，恰好产生一次
#[derive(Debug, Clone, PartialEq)]
pub enum TransportResult {
    Success(String),
    Failure { kind: FailureKind, message: String },
}

impl TransportResult {
    pub fn network(message: impl Into<String>) -> Self {
        TransportResult::Failure {
            kind: FailureKind::Network,
            message: message.into(),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        TransportResult::Failure {
            kind: FailureKind::Protocol,
            message: message.into(),
        }
    }

    pub fn remote(message: impl Into<String>) -> Self {
        TransportResult::Failure {
            kind: FailureKind::Remote,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TransportResult::Success(_))
    }
}

/// 会话失败时记录的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReason {
    pub kind: FailureKind,
    pub message: String,
}

impl FailureReason {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Validation, message)
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.headline(), self.message)
    }
}

//! 会话状态
//!
//! 一次用户交互只有一个 `Session`，只有编排器会修改它。报告与失败原因
//! 直接挂在状态变体上，`report` 存在当且仅当 `Completed`，
//! `failure` 存在当且仅当 `Failed`。

use crate::models::layout::ReportMetadata;
use crate::models::routing_tag::RoutingTag;
use crate::models::transport::FailureReason;
use std::fmt;
use std::sync::Arc;

/// 用户选择的文件
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bytes,
            mime: mime.into(),
        }
    }
}

// 文件内容可能很大，日志里只打印长度
impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .field("mime", &self.mime)
            .finish()
    }
}

/// 会话状态机
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Idle,
    Validating,
    Submitting,
    AwaitingResponse,
    Completed { report: String },
    Failed { reason: FailureReason },
}

impl SessionStatus {
    /// 有调用正在进行
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            SessionStatus::Submitting | SessionStatus::AwaitingResponse
        )
    }

    /// 一次提交的最终状态
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionStatus::Completed { .. } | SessionStatus::Failed { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Validating => "validating",
            SessionStatus::Submitting => "submitting",
            SessionStatus::AwaitingResponse => "awaiting-response",
            SessionStatus::Completed { .. } => "completed",
            SessionStatus::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 一次提交的输入
#[derive(Debug, Clone, Default)]
pub struct SubmissionInput {
    pub file: Option<SelectedFile>,
    pub request_text: String,
    pub tag: RoutingTag,
}

impl SubmissionInput {
    pub fn new(
        file: Option<SelectedFile>,
        request_text: impl Into<String>,
        tag: RoutingTag,
    ) -> Self {
        Self {
            file,
            request_text: request_text.into(),
            tag,
        }
    }
}

/// 会话
///
/// 通过 watch 通道发布给展示层，每个值都是只读快照。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub(crate) selected_file: Option<Arc<SelectedFile>>,
    pub(crate) request_text: String,
    pub(crate) routing_tag: RoutingTag,
    pub(crate) status: SessionStatus,
    pub(crate) progress: Option<String>,
}

impl Session {
    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_deref()
    }

    pub fn request_text(&self) -> &str {
        &self.request_text
    }

    pub fn routing_tag(&self) -> RoutingTag {
        self.routing_tag
    }

    /// 请求进行中的提示文字
    pub fn progress(&self) -> Option<&str> {
        self.progress.as_deref()
    }

    pub fn report(&self) -> Option<&str> {
        match &self.status {
            SessionStatus::Completed { report } => Some(report),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match &self.status {
            SessionStatus::Failed { reason } => Some(reason),
            _ => None,
        }
    }

    pub fn export_eligible(&self) -> bool {
        matches!(self.status, SessionStatus::Completed { .. })
    }

    /// 导出时写在首页的元数据
    pub fn metadata(&self) -> ReportMetadata {
        ReportMetadata {
            file_name: self.selected_file.as_ref().map(|f| f.name.clone()),
            routing_tag: self.routing_tag,
        }
    }
}

//! 请求编排器 - 编排层
//!
//! ## 职责
//!
//! 会话状态的唯一修改者：校验输入、驱动传输适配器、发布状态快照。
//!
//! ## 状态机
//!
//! ```text
//! Idle → Validating → Submitting → AwaitingResponse → Completed | Failed
//!            └──────(校验失败)──────────────────────────────→ Failed
//! ```
//!
//! `Completed` / `Failed` 之后可以立即再次提交。调用进行中（含校验）再提交会被忽略，
//! 保证同一时刻最多一个请求在途。

use crate::clients::TransportAdapter;
use crate::config::Config;
use crate::models::{
    FailureKind, FailureReason, SelectedFile, Session, SessionStatus, SubmissionInput,
    TransportRequest, TransportResult,
};
use crate::utils::logging::truncate_text;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// 编排器设置
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorSettings {
    /// 提交时是否必须附带文件
    pub require_file: bool,
    /// 单次调用的超时
    pub request_timeout: Duration,
}

impl OrchestratorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            require_file: config.require_file,
            request_timeout: config.request_timeout(),
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// 一次 `submit` 的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 已处理，附带最终状态
    Accepted(SessionStatus),
    /// 已有请求在途，本次被忽略
    Ignored,
}

enum Begin {
    Ignored,
    Rejected(SessionStatus),
    Started(TransportRequest),
}

/// 请求编排器
pub struct RequestOrchestrator {
    transport: Arc<dyn TransportAdapter>,
    settings: OrchestratorSettings,
    state: watch::Sender<Session>,
}

impl RequestOrchestrator {
    pub fn new(transport: Arc<dyn TransportAdapter>, settings: OrchestratorSettings) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            transport,
            settings,
            state,
        }
    }

    /// 订阅状态快照
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// 当前快照
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// 提交一次请求
    ///
    /// 校验失败时不会发出网络请求，直接进入 `Failed`。
    pub async fn submit(&self, input: SubmissionInput) -> SubmitOutcome {
        let request = match self.begin(input) {
            Begin::Ignored => {
                warn!("⚠️ 已有请求在途，忽略本次提交");
                return SubmitOutcome::Ignored;
            }
            Begin::Rejected(status) => return SubmitOutcome::Accepted(status),
            Begin::Started(request) => request,
        };

        let mut guard = InFlightGuard::new(&self.state);
        self.set_status(SessionStatus::AwaitingResponse);
        info!("📤 正在通过 {} 发送请求...", self.transport.name());

        let result = match tokio::time::timeout(
            self.settings.request_timeout,
            self.transport.invoke(request),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                warn!("请求超时 ({:?})", self.settings.request_timeout);
                TransportResult::network(format!(
                    "{}초 안에 서버 응답이 없습니다.",
                    self.settings.request_timeout.as_secs()
                ))
            }
        };

        guard.disarm();
        SubmitOutcome::Accepted(self.finish(result))
    }

    /// 校验并进入 `Submitting`，返回要发送的请求快照
    fn begin(&self, input: SubmissionInput) -> Begin {
        let mut entered = false;
        self.state.send_if_modified(|session| {
            if is_busy(&session.status) {
                return false;
            }
            // 进入校验时丢弃上一轮的报告或失败原因
            session.status = SessionStatus::Validating;
            session.progress = None;
            entered = true;
            true
        });
        if !entered {
            return Begin::Ignored;
        }

        let require_file = self.settings.require_file;
        let mut begin = Begin::Ignored;
        self.state.send_modify(|session| {
            let SubmissionInput {
                file,
                request_text,
                tag,
            } = input;
            session.selected_file = file.map(Arc::new);
            session.request_text = request_text;
            session.routing_tag = tag;

            if let Err(reason) = validate(session, require_file) {
                info!("❌ 输入校验未通过: {}", reason);
                session.status = SessionStatus::Failed { reason };
                begin = Begin::Rejected(session.status.clone());
                return;
            }

            session.progress = Some(progress_text(session));
            session.status = SessionStatus::Submitting;
            info!(
                "✓ 校验通过 (标签: {}, 请求: {})",
                session.routing_tag,
                truncate_text(&session.request_text, 30)
            );
            begin = Begin::Started(TransportRequest::new(
                session.selected_file.clone(),
                session.request_text.clone(),
                session.routing_tag,
            ));
        });
        begin
    }

    fn set_status(&self, status: SessionStatus) {
        self.state.send_modify(|session| session.status = status);
    }

    /// 根据传输结果进入终态
    fn finish(&self, result: TransportResult) -> SessionStatus {
        let status = match result {
            TransportResult::Success(report) => {
                info!("✅ 分析完成，报告 {} 字", report.chars().count());
                SessionStatus::Completed { report }
            }
            TransportResult::Failure { kind, message } => {
                let reason = FailureReason::new(kind, message);
                error!("❌ 请求失败: {}", reason);
                SessionStatus::Failed { reason }
            }
        };

        self.state.send_modify(|session| {
            session.progress = None;
            session.status = status.clone();
        });
        status
    }
}

fn is_busy(status: &SessionStatus) -> bool {
    status.is_in_flight() || matches!(status, SessionStatus::Validating)
}

fn validate(session: &Session, require_file: bool) -> Result<(), FailureReason> {
    if require_file && session.selected_file.is_none() {
        return Err(FailureReason::validation("파일을 먼저 선택해야 합니다."));
    }
    if session.request_text.trim().is_empty() {
        return Err(FailureReason::validation("요청 내용을 입력해야 합니다."));
    }
    Ok(())
}

fn progress_text(session: &Session) -> String {
    match session.selected_file.as_deref() {
        Some(SelectedFile { name, .. }) => format!(
            "'{}' 파일을 [{}] 태그로 MCP 서버에 요청 전송 중...",
            name, session.routing_tag
        ),
        None => format!("[{}] 태그로 MCP 서버 요청 중...", session.routing_tag),
    }
}

/// `submit` 的 future 在途中被丢弃时把会话落到 `Failed`，否则会一直卡在在途状态
struct InFlightGuard<'a> {
    state: &'a watch::Sender<Session>,
    armed: bool,
}

impl<'a> InFlightGuard<'a> {
    fn new(state: &'a watch::Sender<Session>) -> Self {
        Self { state, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!("请求在途中被取消");
        self.state.send_modify(|session| {
            session.progress = None;
            session.status = SessionStatus::Failed {
                reason: FailureReason::new(FailureKind::Network, "요청이 취소되었습니다."),
            };
        });
    }
}

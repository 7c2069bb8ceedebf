//! 应用生命周期 - 编排层
//!
//! ## 职责
//!
//! 命令行一次运行的完整过程：
//!
//! 1. **初始化**：打印启动信息、按配置创建传输适配器和编排器
//! 2. **提交**：读取文件，交给 `RequestOrchestrator`
//! 3. **观察**：后台任务订阅状态快照并写日志
//! 4. **导出**：会话完成且需要导出时交给 `ExportFlow`
//! 5. **统计**：输出最终结果

use crate::clients::{build_transport, TransportAdapter};
use crate::config::Config;
use crate::models::{load_selected_file, RoutingTag, Session, SubmissionInput};
use crate::orchestrator::request_orchestrator::{
    OrchestratorSettings, RequestOrchestrator, SubmitOutcome,
};
use crate::utils::logging::{log_final_summary, log_startup, log_status_change};
use crate::workflow::ExportFlow;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// 提交结束后等待日志任务记下终态的上限
const STATUS_LOG_GRACE: Duration = Duration::from_secs(1);

/// 一次运行的输入
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub file: Option<PathBuf>,
    pub request_text: String,
    pub tag: RoutingTag,
    pub export: bool,
}

/// 一次运行的结果
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub session: Session,
    pub exported: Option<PathBuf>,
}

impl RunSummary {
    pub fn succeeded(&self) -> bool {
        self.session.export_eligible()
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    orchestrator: RequestOrchestrator,
    export_flow: ExportFlow,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);
        let transport = build_transport(&config);
        Ok(Self::with_transport(config, transport))
    }

    /// 使用指定的传输适配器
    pub fn with_transport(config: Config, transport: Arc<dyn TransportAdapter>) -> Self {
        let orchestrator =
            RequestOrchestrator::new(transport, OrchestratorSettings::from_config(&config));
        let export_flow = ExportFlow::new(&config);
        Self {
            config,
            orchestrator,
            export_flow,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn orchestrator(&self) -> &RequestOrchestrator {
        &self.orchestrator
    }

    pub fn export_flow(&self) -> &ExportFlow {
        &self.export_flow
    }

    /// 运行应用主逻辑
    pub async fn run(&self, request: RunRequest) -> Result<RunSummary> {
        let file = match &request.file {
            Some(path) => Some(
                load_selected_file(path)
                    .await
                    .with_context(|| format!("无法读取输入文件 {}", path.display()))?,
            ),
            None => None,
        };

        let input = SubmissionInput::new(file, request.request_text.clone(), request.tag);
        self.submit_and_watch(input).await;

        let session = self.orchestrator.snapshot();
        print_outcome(&session);

        let exported = if !request.export {
            None
        } else if session.export_eligible() {
            let path = self
                .export_flow
                .export(&session)
                .await
                .context("导出 PDF 失败")?;
            println!("PDF 저장 완료: {}", path.display());
            Some(path)
        } else {
            warn!("⚠️ 会话未完成，跳过导出");
            None
        };

        log_final_summary(&session, exported.as_deref());
        Ok(RunSummary { session, exported })
    }

    /// 提交并等后台日志任务记下终态，返回它最后记录的快照
    async fn submit_and_watch(&self, input: SubmissionInput) -> Option<Session> {
        let mut watcher = self.spawn_status_logger();

        if self.orchestrator.submit(input).await == SubmitOutcome::Ignored {
            warn!("⚠️ 已有请求在途，本次提交被忽略");
            watcher.abort();
            return None;
        }

        match tokio::time::timeout(STATUS_LOG_GRACE, &mut watcher).await {
            Ok(Ok(last)) => last,
            Ok(Err(e)) => {
                warn!("⚠️ 状态日志任务异常结束: {}", e);
                None
            }
            Err(_) => {
                debug!("状态日志任务未在 {:?} 内结束", STATUS_LOG_GRACE);
                watcher.abort();
                None
            }
        }
    }

    /// 后台记录每一次状态变化，记到终态为止
    fn spawn_status_logger(&self) -> JoinHandle<Option<Session>> {
        let mut updates = self.orchestrator.subscribe();
        tokio::spawn(async move {
            let mut last = None;
            while updates.changed().await.is_ok() {
                let session = updates.borrow_and_update().clone();
                log_status_change(&session);
                let terminal = session.status().is_terminal();
                last = Some(session);
                if terminal {
                    return last;
                }
            }
            info!("状态通道已关闭");
            last
        })
    }
}

/// 报告写到 stdout，失败原因写到 stderr
fn print_outcome(session: &Session) {
    if let Some(report) = session.report() {
        println!("{}", report);
    } else if let Some(reason) = session.failure() {
        eprintln!("{}", reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FailureKind, TransportRequest, TransportResult};
    use async_trait::async_trait;

    struct FixedTransport(TransportResult);

    #[async_trait]
    impl TransportAdapter for FixedTransport {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn invoke(&self, _request: TransportRequest) -> TransportResult {
            self.0.clone()
        }
    }

    fn relaxed_config() -> Config {
        Config {
            require_file: false,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_run_without_export_returns_completed_session() {
        let app = App::with_transport(
            relaxed_config(),
            Arc::new(FixedTransport(TransportResult::Success("보고서".into()))),
        );

        let summary = app
            .run(RunRequest {
                request_text: "분석해줘".to_string(),
                ..RunRequest::default()
            })
            .await
            .unwrap();

        assert!(summary.succeeded());
        assert_eq!(summary.session.report(), Some("보고서"));
        assert!(summary.exported.is_none());
    }

    #[tokio::test]
    async fn test_failed_session_skips_export() {
        let app = App::with_transport(
            relaxed_config(),
            Arc::new(FixedTransport(TransportResult::remote("지원하지 않는 형식"))),
        );

        let summary = app
            .run(RunRequest {
                request_text: "분석해줘".to_string(),
                export: true,
                ..RunRequest::default()
            })
            .await
            .unwrap();

        assert!(!summary.succeeded());
        assert_eq!(summary.session.failure().unwrap().kind, FailureKind::Remote);
        assert!(summary.exported.is_none());
    }

    #[tokio::test]
    async fn test_missing_input_file_is_an_error() {
        let app = App::with_transport(
            Config::default(),
            Arc::new(FixedTransport(TransportResult::Success("unused".into()))),
        );

        let result = app
            .run(RunRequest {
                file: Some(PathBuf::from("/definitely/not/here.pdf")),
                request_text: "분석".to_string(),
                ..RunRequest::default()
            })
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_terminal_state_is_logged_before_run_continues() {
        let app = App::with_transport(
            relaxed_config(),
            Arc::new(FixedTransport(TransportResult::Success("보고서".into()))),
        );

        let logged = app
            .submit_and_watch(SubmissionInput::new(None, "분석해줘", RoutingTag::Analysis))
            .await
            .unwrap();

        assert!(logged.status().is_terminal());
        assert_eq!(logged, app.orchestrator().snapshot());
    }

    #[tokio::test]
    async fn test_validation_failure_is_logged_as_terminal() {
        let app = App::with_transport(
            Config::default(),
            Arc::new(FixedTransport(TransportResult::Success("unused".into()))),
        );

        let logged = app
            .submit_and_watch(SubmissionInput::new(None, "분석해줘", RoutingTag::Analysis))
            .await
            .unwrap();

        assert_eq!(logged.failure().unwrap().kind, FailureKind::Validation);
    }
}

//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层持有会话状态并调度下层能力，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `request_orchestrator` - 请求编排器
//! - 会话状态机（Idle → Validating → Submitting → AwaitingResponse → Completed/Failed）
//! - 输入校验、在途保护、超时
//! - 通过 watch 通道发布状态快照
//!
//! ### `app` - 应用生命周期
//! - 初始化传输适配器
//! - 提交、观察、导出
//! - 输出最终统计
//!
//! ## 层次关系
//!
//! ```text
//! app (一次命令行运行)
//!     ↓
//! request_orchestrator (一次提交)        workflow::ExportFlow (一次导出)
//!     ↓                                       ↓
//! clients (传输适配器)                     services (分页 / 渲染 / 文件名)
//!     ↓
//! infrastructure (WsChannel)
//! ```

pub mod app;
pub mod request_orchestrator;

// 重新导出主要类型
pub use app::{App, RunRequest, RunSummary};
pub use request_orchestrator::{OrchestratorSettings, RequestOrchestrator, SubmitOutcome};

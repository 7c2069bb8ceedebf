//! # MCP Report Client
//!
//! 把文件和请求发给远端 MCP 分析服务，接收文本报告，并导出为内嵌韩文字体的 PDF。
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（网络连接），只暴露能力
//! - `WsChannel` - 一条 WebSocket 连接，提供收发 JSON 文本的能力
//!
//! ### ② 传输适配层（Clients）
//! - `clients/` - `TransportAdapter` 接口及两种实现
//! - `HttpTransport` - multipart 请求 / 响应
//! - `WsTransport` - JSON-RPC 消息按 id 关联
//!
//! ### ③ 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，全部是纯函数式能力
//! - `markup` / `text_measure` / `report_paginator` - 规范化、测宽、折行装页
//! - `report_renderer` - 首页标题区 + 正文布局，`PdfSurface` 输出 PDF
//! - `file_name` - 导出文件名
//!
//! ### ④ 流程层（Workflow）
//! - `workflow/` - `ExportFlow`：分页 → 渲染 → 写文件
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/request_orchestrator` - 会话状态机，唯一修改会话的地方
//! - `orchestrator/app` - 一次命令行运行的生命周期
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{build_transport, HttpTransport, TransportAdapter, WsTransport};
pub use config::{Config, TransportKind};
pub use error::{AppError, AppResult};
pub use infrastructure::WsChannel;
pub use models::{
    FailureKind, FailureReason, Page, PaginationGeometry, RenderJob, ReportMetadata, RoutingTag,
    SelectedFile, Session, SessionStatus, SubmissionInput, TransportRequest, TransportResult,
};
pub use orchestrator::{App, RequestOrchestrator, RunRequest, RunSummary, SubmitOutcome};
pub use services::{paginate, DocumentSurface, ReportPaginator, ReportRenderer};
pub use workflow::ExportFlow;

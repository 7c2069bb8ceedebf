//! 报告导出流程 - 流程层
//!
//! 核心职责：定义"导出一份报告"的完整流程
//!
//! 流程顺序：
//! 1. 检查会话是否 `Completed`
//! 2. 读取字体，按字体实际字宽分页（首页预留标题区）
//! 3. 渲染 PDF（内嵌同一份字体）
//! 4. 写入 `output_dir/MCP_분석결과_<文件名>.pdf`

use crate::config::Config;
use crate::error::{AppError, AppResult, ExportError};
use crate::models::{load_font_face, PaginationGeometry, RenderJob, Session};
use crate::services::report_paginator::BODY_FONT_SIZE;
use crate::services::report_renderer::HEADER_SLOTS;
use crate::services::{
    export_file_name, DocumentSurface, FontMeasure, ReportPaginator, ReportRenderer, TextMeasure,
};
use std::path::PathBuf;
use tracing::{debug, info};

/// 报告导出流程
///
/// - 只读会话快照，不修改状态
/// - 不持有网络资源
pub struct ExportFlow {
    paginator: ReportPaginator,
    renderer: ReportRenderer,
    geometry: PaginationGeometry,
    font_path: PathBuf,
    output_dir: PathBuf,
}

impl ExportFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            paginator: ReportPaginator::for_body_text().reserve_first_page(HEADER_SLOTS),
            renderer: ReportRenderer::new(),
            geometry: PaginationGeometry::A4_REPORT,
            font_path: PathBuf::from(&config.font_path),
            output_dir: PathBuf::from(&config.output_dir),
        }
    }

    pub fn with_geometry(mut self, geometry: PaginationGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn geometry(&self) -> &PaginationGeometry {
        &self.geometry
    }

    /// 只有 `Completed` 的会话才能生成渲染任务
    ///
    /// 按格宽估算字宽，不需要字体文件；真正导出 PDF 时用 [`Self::build_job_with`]。
    pub fn build_job(&self, session: &Session) -> AppResult<RenderJob> {
        self.build_job_with(session, &self.paginator)
    }

    /// 用指定的分页器（测量方式）生成渲染任务
    pub fn build_job_with<M: TextMeasure>(
        &self,
        session: &Session,
        paginator: &ReportPaginator<M>,
    ) -> AppResult<RenderJob> {
        let report = session.report().ok_or_else(|| ExportError::NotEligible {
            status: session.status().to_string(),
        })?;

        let pages = paginator.paginate(report, &self.geometry)?;
        debug!("报告分页完成: {} 页", pages.len());

        Ok(RenderJob {
            metadata: session.metadata(),
            geometry: self.geometry,
            pages,
        })
    }

    /// 渲染到任意 surface
    pub fn export_to<S: DocumentSurface>(
        &self,
        session: &Session,
        surface: &mut S,
    ) -> AppResult<RenderJob> {
        let job = self.build_job(session)?;
        self.renderer.render_to(&job, surface)?;
        Ok(job)
    }

    /// 生成 PDF 并写入输出目录，返回文件路径
    pub async fn export(&self, session: &Session) -> AppResult<PathBuf> {
        if !session.export_eligible() {
            return Err(ExportError::NotEligible {
                status: session.status().to_string(),
            }
            .into());
        }

        let font = load_font_face(&self.font_path).await?;
        let paginator = ReportPaginator::new(FontMeasure::new(&font, BODY_FONT_SIZE)?)
            .reserve_first_page(HEADER_SLOTS);
        let job = self.build_job_with(session, &paginator)?;
        let bytes = self.renderer.render(&job, &font)?;

        let file_name = export_file_name(job.metadata.file_name.as_deref());
        let path = self.output_dir.join(file_name);

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| {
                AppError::file_write_failed(self.output_dir.display().to_string(), e)
            })?;
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

        info!(
            "📄 报告已导出: {} ({} 页, {} 字节)",
            path.display(),
            job.pages.len(),
            bytes.len()
        );
        Ok(path)
    }
}

//! 报告渲染 - 业务能力层
//!
//! `ReportRenderer` 只决定"什么文字写在哪一页的哪个位置"，具体落到哪种文档格式
//! 由 `DocumentSurface` 实现。`PdfSurface` 用 printpdf 生成带内嵌字体的 PDF。

use crate::error::{AppResult, RenderError};
use crate::models::{FontFace, PaginationGeometry, RenderJob};
use crate::services::report_paginator::BODY_FONT_SIZE;
use printpdf::{
    Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Rgb,
};
use std::io::Cursor;
use tracing::{debug, warn};

pub const REPORT_TITLE: &str = "MCP 분석 결과 보고서";
pub const TITLE_FONT_SIZE: f32 = 16.0;
/// 标题、两行元数据和一行空白
pub const HEADER_SLOTS: usize = 4;

const TITLE_COLOR: (u8, u8, u8) = (0, 0, 0);
const BODY_COLOR: (u8, u8, u8) = (60, 60, 60);

/// 渲染目标
///
/// 第一页在创建时已经存在。换页会重置文字状态，换页后必须重新设置字体。
pub trait DocumentSurface {
    fn add_page(&mut self);
    fn apply_font(&mut self, size_pt: f32);
    fn set_text_color(&mut self, rgb: (u8, u8, u8));
    /// `y` 从页面顶端量起
    fn write_text(&mut self, text: &str, x: f32, y: f32);
}

/// 报告渲染器
#[derive(Debug, Clone, Default)]
pub struct ReportRenderer;

impl ReportRenderer {
    pub fn new() -> Self {
        Self
    }

    /// 把渲染任务写到任意 surface 上
    pub fn render_to<S: DocumentSurface>(
        &self,
        job: &RenderJob,
        surface: &mut S,
    ) -> Result<(), RenderError> {
        if job.pages.is_empty() {
            return Err(RenderError::EmptyJob);
        }

        let geometry = &job.geometry;
        let x = geometry.margin_left;

        for (index, page) in job.pages.iter().enumerate() {
            if index == 0 {
                self.write_header(job, surface);
            } else {
                surface.add_page();
                surface.apply_font(BODY_FONT_SIZE);
                surface.set_text_color(BODY_COLOR);
            }

            for (offset, line) in page.lines().iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                surface.write_text(line, x, geometry.line_y(page.first_slot() + offset));
            }
        }

        debug!("渲染完成，共 {} 页", job.pages.len());
        Ok(())
    }

    /// 首页：标题 + 文件名 + 路由标签
    fn write_header<S: DocumentSurface>(&self, job: &RenderJob, surface: &mut S) {
        let geometry = &job.geometry;
        let x = geometry.margin_left;

        surface.apply_font(TITLE_FONT_SIZE);
        surface.set_text_color(TITLE_COLOR);
        surface.write_text(REPORT_TITLE, x, geometry.line_y(0));

        surface.apply_font(BODY_FONT_SIZE);
        surface.set_text_color(BODY_COLOR);
        let file_name = job.metadata.file_name.as_deref().unwrap_or("N/A");
        surface.write_text(&format!("파일명: {}", file_name), x, geometry.line_y(1));
        surface.write_text(
            &format!("Controller 태그: {}", job.metadata.routing_tag),
            x,
            geometry.line_y(2),
        );
    }

    /// 渲染成 PDF 字节
    pub fn render(&self, job: &RenderJob, font: &FontFace) -> AppResult<Vec<u8>> {
        let mut surface = PdfSurface::new(REPORT_TITLE, &job.geometry, font)?;
        self.render_to(job, &mut surface)?;
        Ok(surface.finish()?)
    }
}

/// printpdf 实现的 surface
///
/// 字体在创建文档时嵌入一次，之后每页通过 `apply_font` 重新启用。
pub struct PdfSurface {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    page_width: f32,
    page_height: f32,
    font_size: Option<f32>,
}

impl PdfSurface {
    pub fn new(
        title: &str,
        geometry: &PaginationGeometry,
        font: &FontFace,
    ) -> Result<Self, RenderError> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(geometry.page_width),
            Mm(geometry.page_height),
            "Layer 1",
        );

        let font_ref = doc
            .add_external_font(Cursor::new(font.bytes.clone()))
            .map_err(|e| RenderError::FontEmbedFailed {
                font: font.name.clone(),
                message: e.to_string(),
            })?;

        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            font: font_ref,
            page_width: geometry.page_width,
            page_height: geometry.page_height,
            font_size: None,
        })
    }

    pub fn finish(self) -> Result<Vec<u8>, RenderError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| RenderError::SerializeFailed {
                message: e.to_string(),
            })
    }
}

impl DocumentSurface for PdfSurface {
    fn add_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(self.page_width), Mm(self.page_height), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.font_size = None;
    }

    fn apply_font(&mut self, size_pt: f32) {
        self.font_size = Some(size_pt);
    }

    fn set_text_color(&mut self, (r, g, b): (u8, u8, u8)) {
        self.layer.set_fill_color(Color::Rgb(Rgb::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            None,
        )));
    }

    fn write_text(&mut self, text: &str, x: f32, y: f32) {
        let size = self.font_size.unwrap_or_else(|| {
            warn!("换页后未设置字体，使用正文字号");
            BODY_FONT_SIZE
        });
        // PDF 坐标原点在左下角
        self.layer
            .use_text(text, size, Mm(x), Mm(self.page_height - y), &self.font);
    }
}

//! 文本宽度测量

use crate::error::RenderError;
use crate::models::FontFace;
use owned_ttf_parser::{AsFaceRef, GlyphId, OwnedFace};
use unicode_width::UnicodeWidthChar;

/// 1 pt 对应的毫米数
pub const PT_TO_MM: f32 = 25.4 / 72.0;

/// 测量一段文字排版后的宽度，单位与页面几何一致
pub trait TextMeasure {
    fn width(&self, text: &str) -> f32;
}

/// 按东亚宽度计格的测量方式
///
/// 窄字符占 1 格，全角字符（韩文、汉字等）占 2 格；一格为字号的一半。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMeasure {
    cell_width: f32,
}

impl CellMeasure {
    pub fn new(cell_width: f32) -> Self {
        Self { cell_width }
    }

    /// 按字号（pt）换算成毫米格宽
    pub fn for_font_size(size_pt: f32) -> Self {
        Self::new(size_pt * PT_TO_MM * 0.5)
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }
}

impl TextMeasure for CellMeasure {
    fn width(&self, text: &str) -> f32 {
        let cells: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
        cells as f32 * self.cell_width
    }
}

/// 按字体实际字宽（hmtx advance）测量
///
/// 与 PDF 里嵌入的是同一份字体，折出来的行宽就是渲染宽度。
/// 字体里没有的字符按 `.notdef` 的宽度计算，只会偏宽。
pub struct FontMeasure {
    face: OwnedFace,
    mm_per_unit: f32,
}

impl FontMeasure {
    pub fn new(font: &FontFace, size_pt: f32) -> Result<Self, RenderError> {
        let face = OwnedFace::from_vec(font.bytes.clone(), 0).map_err(|e| {
            RenderError::FontEmbedFailed {
                font: font.name.clone(),
                message: e.to_string(),
            }
        })?;

        let units_per_em = face.as_face_ref().units_per_em();
        if units_per_em == 0 {
            return Err(RenderError::FontEmbedFailed {
                font: font.name.clone(),
                message: "units_per_em 为 0".to_string(),
            });
        }

        Ok(Self {
            mm_per_unit: size_pt * PT_TO_MM / f32::from(units_per_em),
            face,
        })
    }

    fn advance(&self, c: char) -> u16 {
        let face = self.face.as_face_ref();
        let glyph = face.glyph_index(c).unwrap_or(GlyphId(0));
        face.glyph_hor_advance(glyph).unwrap_or(0)
    }
}

impl TextMeasure for FontMeasure {
    fn width(&self, text: &str) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(self.advance(c))).sum();
        units as f32 * self.mm_per_unit
    }
}

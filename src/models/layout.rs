//! 分页与渲染用到的数据

use crate::error::GeometryError;
use crate::models::routing_tag::RoutingTag;

/// 页面几何参数（单位：毫米）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaginationGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub line_height: f32,
    pub margin_left: f32,
    pub margin_top: f32,
}

impl PaginationGeometry {
    /// A4 纵向报告
    pub const A4_REPORT: PaginationGeometry = PaginationGeometry {
        page_width: 210.0,
        page_height: 297.0,
        line_height: 6.0,
        margin_left: 15.0,
        margin_top: 20.0,
    };

    pub fn validate(&self) -> Result<(), GeometryError> {
        let fields = [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("line_height", self.line_height),
            ("margin_left", self.margin_left),
            ("margin_top", self.margin_top),
        ];
        if let Some(&(field, value)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(GeometryError::NonFinite { field, value });
        }

        if self.line_height <= 0.0 {
            return Err(GeometryError::NonPositiveLineHeight {
                line_height: self.line_height,
            });
        }
        // 合法几何每页至少一行
        if self.margin_top + self.line_height > self.page_height || self.lines_per_page() == 0 {
            return Err(GeometryError::NoLineFits {
                page_height: self.page_height,
                margin_top: self.margin_top,
                line_height: self.line_height,
            });
        }
        if self.text_width() <= 0.0 {
            return Err(GeometryError::NoTextWidth {
                page_width: self.page_width,
                margin_left: self.margin_left,
            });
        }
        Ok(())
    }

    /// 左右对称留白后的可用行宽
    pub fn text_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin_left
    }

    /// 每页最多能放的行数
    pub fn lines_per_page(&self) -> usize {
        ((self.page_height - self.margin_top) / self.line_height).floor() as usize
    }

    /// 第 `slot` 行的纵向位置（从页面顶端量起）
    pub fn line_y(&self, slot: usize) -> f32 {
        self.margin_top + slot as f32 * self.line_height
    }
}

impl Default for PaginationGeometry {
    fn default() -> Self {
        Self::A4_REPORT
    }
}

/// 一页内容，生成后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    lines: Vec<String>,
    /// 本页正文从第几行开始（首页要留出标题与元数据）
    first_slot: usize,
}

impl Page {
    pub(crate) fn new(lines: Vec<String>, first_slot: usize) -> Self {
        Self { lines, first_slot }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn first_slot(&self) -> usize {
        self.first_slot
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// 首页元数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportMetadata {
    pub file_name: Option<String>,
    pub routing_tag: RoutingTag,
}

/// 一次性渲染任务
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    pub metadata: ReportMetadata,
    pub geometry: PaginationGeometry,
    pub pages: Vec<Page>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_report_geometry() {
        let geometry = PaginationGeometry::A4_REPORT;
        assert!(geometry.validate().is_ok());
        assert_eq!(geometry.text_width(), 180.0);
        assert_eq!(geometry.lines_per_page(), 46);
        assert_eq!(geometry.line_y(2), 32.0);
    }

    #[test]
    fn test_validate_rejects_broken_geometry() {
        let zero_line = PaginationGeometry {
            line_height: 0.0,
            ..PaginationGeometry::A4_REPORT
        };
        assert!(matches!(
            zero_line.validate(),
            Err(GeometryError::NonPositiveLineHeight { .. })
        ));

        let too_short = PaginationGeometry {
            page_height: 24.0,
            ..PaginationGeometry::A4_REPORT
        };
        assert!(matches!(
            too_short.validate(),
            Err(GeometryError::NoLineFits { .. })
        ));

        let too_narrow = PaginationGeometry {
            page_width: 30.0,
            ..PaginationGeometry::A4_REPORT
        };
        assert!(matches!(
            too_narrow.validate(),
            Err(GeometryError::NoTextWidth { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_non_finite_fields() {
        let nan_margin = PaginationGeometry {
            margin_top: f32::NAN,
            ..PaginationGeometry::A4_REPORT
        };
        assert!(matches!(
            nan_margin.validate(),
            Err(GeometryError::NonFinite { field: "margin_top", .. })
        ));

        let infinite_page = PaginationGeometry {
            page_height: f32::INFINITY,
            ..PaginationGeometry::A4_REPORT
        };
        assert!(matches!(
            infinite_page.validate(),
            Err(GeometryError::NonFinite { field: "page_height", .. })
        ));

        let nan_width = PaginationGeometry {
            page_width: f32::NAN,
            ..PaginationGeometry::A4_REPORT
        };
        assert!(nan_width.validate().is_err());

        let infinite_line = PaginationGeometry {
            line_height: f32::NEG_INFINITY,
            ..PaginationGeometry::A4_REPORT
        };
        assert!(infinite_line.validate().is_err());
    }

    #[test]
    fn test_valid_geometry_always_fits_a_line() {
        let tight = PaginationGeometry {
            page_height: 26.0,
            ..PaginationGeometry::A4_REPORT
        };
        assert!(tight.validate().is_ok());
        assert_eq!(tight.lines_per_page(), 1);
    }
}

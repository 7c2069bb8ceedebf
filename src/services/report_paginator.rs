//! 报告分页 - 业务能力层
//!
//! 文本 → 规范化 → 按行宽贪心折行 → 按页高贪心装页。
//! 同样的 (文本, 几何参数) 永远得到同样的结果，任何字符串都至少产生一页。

use crate::error::GeometryError;
use crate::models::{Page, PaginationGeometry};
use crate::services::markup::strip_markup;
use crate::services::text_measure::{CellMeasure, TextMeasure};

/// 正文字号（pt）
pub const BODY_FONT_SIZE: f32 = 11.0;

/// 报告分页器
pub struct ReportPaginator<M = CellMeasure> {
    measure: M,
    /// 首页留给标题和元数据的行数
    reserved_first_page_slots: usize,
}

impl ReportPaginator<CellMeasure> {
    /// 按正文字号测量宽度的分页器
    pub fn for_body_text() -> Self {
        Self::new(CellMeasure::for_font_size(BODY_FONT_SIZE))
    }
}

impl Default for ReportPaginator<CellMeasure> {
    fn default() -> Self {
        Self::for_body_text()
    }
}

impl<M: TextMeasure> ReportPaginator<M> {
    pub fn new(measure: M) -> Self {
        Self {
            measure,
            reserved_first_page_slots: 0,
        }
    }

    /// 首页前 `slots` 行留空
    pub fn reserve_first_page(mut self, slots: usize) -> Self {
        self.reserved_first_page_slots = slots;
        self
    }

    pub fn measure(&self) -> &M {
        &self.measure
    }

    /// 规范化后折行
    ///
    /// 显式换行是硬换行（空行保留为空字符串），单词超过行宽时按字符拆开。
    pub fn wrap(&self, text: &str, max_width: f32) -> Vec<String> {
        let plain = strip_markup(text);
        let mut lines = Vec::new();

        for paragraph in plain.lines() {
            let before = lines.len();
            self.wrap_paragraph(paragraph, max_width, &mut lines);
            if lines.len() == before {
                lines.push(String::new());
            }
        }

        lines
    }

    fn wrap_paragraph(&self, paragraph: &str, max_width: f32, lines: &mut Vec<String>) {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            if self.measure.width(word) > max_width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let mut pieces = self.split_long_word(word, max_width);
                // 最后一段留在当前行，后面的单词还能接上
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
                continue;
            }

            if current.is_empty() {
                current.push_str(word);
                continue;
            }

            let candidate = format!("{} {}", current, word);
            if self.measure.width(&candidate) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    /// 按字符拆分超长单词；单个字符比行宽还宽时独占一行
    fn split_long_word(&self, word: &str, max_width: f32) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut piece = String::new();

        for c in word.chars() {
            piece.push(c);
            if self.measure.width(&piece) > max_width && piece.chars().count() > 1 {
                piece.pop();
                pieces.push(std::mem::take(&mut piece));
                piece.push(c);
            }
        }

        if !piece.is_empty() {
            pieces.push(piece);
        }
        pieces
    }

    /// 折行并装页
    pub fn paginate(
        &self,
        text: &str,
        geometry: &PaginationGeometry,
    ) -> Result<Vec<Page>, GeometryError> {
        geometry.validate()?;

        let lines = self.wrap(text, geometry.text_width());
        let per_page = geometry.lines_per_page();
        if per_page == 0 {
            return Err(GeometryError::NoLineFits {
                page_height: geometry.page_height,
                margin_top: geometry.margin_top,
                line_height: geometry.line_height,
            });
        }

        let mut pages = Vec::new();
        let mut remaining = lines.into_iter().peekable();
        let mut first_slot = self.reserved_first_page_slots.min(per_page);

        loop {
            let capacity = per_page - first_slot;
            let page_lines: Vec<String> = remaining.by_ref().take(capacity).collect();
            pages.push(Page::new(page_lines, first_slot));

            if remaining.peek().is_none() {
                break;
            }
            first_slot = 0;
        }

        Ok(pages)
    }
}

/// 使用正文字号测量的默认分页
pub fn paginate(text: &str, geometry: &PaginationGeometry) -> Result<Vec<Page>, GeometryError> {
    ReportPaginator::for_body_text().paginate(text, geometry)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 每页 8 行、每行 40 个窄字符
    fn small_geometry() -> PaginationGeometry {
        PaginationGeometry {
            page_width: 60.0,
            page_height: 90.0,
            line_height: 10.0,
            margin_left: 10.0,
            margin_top: 10.0,
        }
    }

    fn unit_paginator() -> ReportPaginator<CellMeasure> {
        ReportPaginator::new(CellMeasure::new(1.0))
    }

    #[test]
    fn test_greedy_word_wrap() {
        let lines = unit_paginator().wrap("aaa bbb ccc dddd", 8.0);
        assert_eq!(lines, vec!["aaa bbb", "ccc dddd"]);
    }

    #[test]
    fn test_hard_breaks_and_blank_lines_survive() {
        let lines = unit_paginator().wrap("첫 줄\n\n셋째 줄\n", 40.0);
        assert_eq!(lines, vec!["첫 줄", "", "셋째 줄"]);
    }

    #[test]
    fn test_markup_removed_before_wrapping() {
        let lines = unit_paginator().wrap("### 제목\n**굵게** 보통", 40.0);
        assert_eq!(lines, vec!["제목", "굵게 보통"]);
    }

    #[test]
    fn test_long_word_is_split_by_characters() {
        let lines = unit_paginator().wrap("xx abcdefghij yy", 4.0);
        assert_eq!(lines, vec!["xx", "abcd", "efgh", "ij", "yy"]);

        let joined = unit_paginator().wrap("abcdefghij k", 4.0);
        assert_eq!(joined, vec!["abcd", "efgh", "ij k"]);
    }

    #[test]
    fn test_wide_glyphs_wrap_at_half_the_count() {
        // 40 格宽度只能放 20 个韩文字
        let text = "가".repeat(50);
        let lines = unit_paginator().wrap(&text, 40.0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].chars().count(), 20);
        assert_eq!(lines[2].chars().count(), 10);
    }

    #[test]
    fn test_empty_text_yields_one_empty_page() {
        let pages = unit_paginator().paginate("", &small_geometry()).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
    }

    #[test]
    fn test_scenario_500_chars_eight_lines_per_page() {
        let geometry = small_geometry();
        assert_eq!(geometry.lines_per_page(), 8);
        assert_eq!(geometry.text_width(), 40.0);

        let text = "abcd ".repeat(100);
        assert_eq!(text.len(), 500);

        let paginator = unit_paginator();
        let wrapped = paginator.wrap(&text, geometry.text_width());
        let pages = paginator.paginate(&text, &geometry).unwrap();

        assert_eq!(pages.len(), (wrapped.len() + 7) / 8);
        assert!(pages.iter().all(|p| p.lines().len() <= 8));
        let total: usize = pages.iter().map(|p| p.lines().len()).sum();
        assert_eq!(total, wrapped.len());
    }

    #[test]
    fn test_lines_fit_width_and_pages_fit_height() {
        let geometry = small_geometry();
        let paginator = unit_paginator();
        let samples = [
            "짧은 문장".to_string(),
            "MCP 분석 결과 보고서 ".repeat(40),
            format!("{} 끝", "https://example.com/".repeat(12)),
            "가나다라마바사아자차카타파하 ".repeat(30),
            "\n\n\n".to_string(),
        ];

        for text in samples.iter() {
            let pages = paginator.paginate(text, &geometry).unwrap();
            assert!(!pages.is_empty());
            for page in &pages {
                assert!(page.lines().len() <= geometry.lines_per_page());
                for line in page.lines() {
                    assert!(
                        paginator.measure().width(line) <= geometry.text_width(),
                        "行过宽: {}",
                        line
                    );
                }
            }
        }
    }

    #[test]
    fn test_paginate_is_deterministic() {
        let text = "### 요약\n**결론**: ".to_string() + &"내용 ".repeat(300);
        let geometry = PaginationGeometry::A4_REPORT;

        let first = paginate(&text, &geometry).unwrap();
        let second = paginate(&text, &geometry).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_reserved_slots_shrink_first_page_only() {
        let geometry = small_geometry();
        let paginator = unit_paginator().reserve_first_page(3);
        let text = (1..=12).map(|i| format!("line{}", i)).collect::<Vec<_>>().join("\n");

        let pages = paginator.paginate(&text, &geometry).unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].first_slot(), 3);
        assert_eq!(pages[0].lines().len(), 5);
        assert_eq!(pages[1].first_slot(), 0);
        assert_eq!(pages[1].lines().len(), 7);
    }

    #[test]
    fn test_invalid_geometry_is_rejected() {
        let geometry = PaginationGeometry {
            line_height: -1.0,
            ..small_geometry()
        };
        assert!(matches!(
            paginate("text", &geometry),
            Err(GeometryError::NonPositiveLineHeight { .. })
        ));
    }

    #[test]
    fn test_non_finite_geometry_fails_instead_of_looping() {
        let broken = [
            PaginationGeometry {
                margin_top: f32::NAN,
                ..small_geometry()
            },
            PaginationGeometry {
                page_height: f32::INFINITY,
                ..small_geometry()
            },
            PaginationGeometry {
                line_height: f32::NAN,
                ..small_geometry()
            },
            PaginationGeometry {
                margin_left: f32::NEG_INFINITY,
                ..small_geometry()
            },
        ];

        for geometry in broken.iter() {
            let result = unit_paginator()
                .reserve_first_page(3)
                .paginate("본문 한 줄", geometry);
            assert!(
                matches!(result, Err(GeometryError::NonFinite { .. })),
                "{:?}",
                geometry
            );
        }
    }
}

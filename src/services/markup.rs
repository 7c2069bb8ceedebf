//! 报告文本规范化
//!
//! 只去掉报告格式里用于展示的少量标记：行首的 `#` 标题符号和 `**` 加粗包裹。
//! 不是通用的 markdown 解析。

use regex::Regex;
use std::sync::OnceLock;

fn heading_marker() -> Option<&'static Regex> {
    static HEADING: OnceLock<Option<Regex>> = OnceLock::new();
    HEADING
        .get_or_init(|| Regex::new(r"(?m)^#{1,6}(?:[ \t]+|$)").ok())
        .as_ref()
}

/// 去掉展示用标记，返回纯文本
pub fn strip_markup(text: &str) -> String {
    let without_headings = match heading_marker() {
        Some(re) => re.replace_all(text, ""),
        None => text.into(),
    };
    without_headings.replace("**", "")
}

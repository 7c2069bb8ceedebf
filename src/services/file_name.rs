//! 导出文件名

/// 没有源文件名时使用的名字
pub const DEFAULT_FILE_STEM: &str = "report";
const EXPORT_PREFIX: &str = "MCP_분석결과_";

/// 允许保留的字符：ASCII 字母数字、韩文字母与音节、`_` `.` `-`
fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, '_' | '.' | '-')
        || ('\u{3131}'..='\u{314E}').contains(&c)
        || ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

/// 不在白名单里的字符逐个替换成 `_`
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if is_allowed(c) { c } else { '_' })
        .collect()
}

/// 由源文件名得到 PDF 文件名
pub fn export_file_name(source: Option<&str>) -> String {
    let stem = source
        .map(sanitize_file_name)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_FILE_STEM.to_string());
    format!("{}{}.pdf", EXPORT_PREFIX, stem)
}

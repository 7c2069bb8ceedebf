use thiserror::Error;

/// 应用程序错误类型
///
/// 传输失败不在这里：适配器把所有通道错误翻译成 `TransportResult::Failure`，
/// 由编排器落到会话状态里。
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 分页几何参数错误
    #[error("分页参数错误: {0}")]
    Geometry(#[from] GeometryError),
    /// 渲染错误
    #[error("渲染错误: {0}")]
    Render(#[from] RenderError),
    /// 导出错误
    #[error("导出错误: {0}")]
    Export(#[from] ExportError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件解析失败
    #[error("配置文件 {path} 解析失败: {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 不认识的传输方式
    #[error("未知的传输方式: {value} (可选: http, websocket)")]
    UnknownTransport { value: String },
    /// 不认识的路由标签
    #[error("未知的路由标签: {value}")]
    UnknownRoutingTag { value: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 分页几何参数不满足不变量
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("几何参数 {field} 不是有限数 (当前: {value})")]
    NonFinite { field: &'static str, value: f32 },
    #[error("行高必须大于 0 (当前: {line_height})")]
    NonPositiveLineHeight { line_height: f32 },
    #[error("页面高度 {page_height} 放不下一行 (上边距 {margin_top}, 行高 {line_height})")]
    NoLineFits {
        page_height: f32,
        margin_top: f32,
        line_height: f32,
    },
    #[error("可用行宽必须大于 0 (页宽 {page_width}, 左边距 {margin_left})")]
    NoTextWidth { page_width: f32, margin_left: f32 },
}

/// 渲染错误
#[derive(Debug, Error)]
pub enum RenderError {
    /// 字体无法嵌入
    #[error("字体 {font} 无法嵌入: {message}")]
    FontEmbedFailed { font: String, message: String },
    /// 文档序列化失败
    #[error("文档序列化失败: {message}")]
    SerializeFailed { message: String },
    /// 任务里没有任何页面
    #[error("渲染任务没有页面")]
    EmptyJob,
}

/// 导出错误
#[derive(Debug, Error, PartialEq)]
pub enum ExportError {
    /// 会话未处于完成状态
    #[error("当前会话不可导出 (状态: {status})")]
    NotEligible { status: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

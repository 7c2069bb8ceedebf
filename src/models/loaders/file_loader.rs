use crate::error::{AppError, AppResult};
use crate::models::session::SelectedFile;
use std::path::Path;
use tokio::fs;

/// 从磁盘读取用户选择的文件，MIME 类型按扩展名推断
pub async fn load_selected_file(path: &Path) -> AppResult<SelectedFile> {
    let bytes = fs::read(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let mime = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    tracing::info!("已加载文件: {} ({} 字节, {})", name, bytes.len(), mime);

    Ok(SelectedFile::new(name, bytes, mime))
}

/// 要嵌入报告的字体
#[derive(Clone)]
pub struct FontFace {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// 读取 TTF/OTF 字体文件
pub async fn load_font_face(path: &Path) -> AppResult<FontFace> {
    let bytes = fs::read(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

    let name = path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    tracing::debug!("字体 {} 已加载 ({} 字节)", name, bytes.len());

    Ok(FontFace { name, bytes })
}

pub mod file_name;
pub mod markup;
pub mod report_paginator;
pub mod report_renderer;
pub mod text_measure;

pub use file_name::{export_file_name, sanitize_file_name};
pub use markup::strip_markup;
pub use report_paginator::{paginate, ReportPaginator};
pub use report_renderer::{DocumentSurface, PdfSurface, ReportRenderer};
pub use text_measure::{CellMeasure, FontMeasure, TextMeasure};

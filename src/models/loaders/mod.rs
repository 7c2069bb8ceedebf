pub mod file_loader;

pub use file_loader::{load_font_face, load_selected_file, FontFace};

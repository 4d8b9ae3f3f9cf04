//! Utility modules.

pub mod file;

pub use file::{is_txt_file, read_file_content};

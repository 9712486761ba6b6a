pub mod container;
pub mod fast_path;
pub mod format;

pub mod colorspace;
pub mod source;
pub mod store;

pub mod classify;
pub mod config;
pub mod export;
pub mod recipe;
pub mod spec;

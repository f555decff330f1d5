pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod finder;
pub mod trending;

pub mod api;
pub mod config;
pub mod navigation;
pub mod security;
pub mod storage;

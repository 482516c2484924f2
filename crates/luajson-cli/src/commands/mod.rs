pub mod config;
pub mod export;
pub mod menu;

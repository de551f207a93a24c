pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod games;
pub mod scores;
pub mod session;
pub mod ui;

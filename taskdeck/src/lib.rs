//! `Taskdeck` — terminal-native to-do list library.

pub mod app;
pub mod config;
pub mod remote;
pub mod session;
pub mod store;
pub mod ui;

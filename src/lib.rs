pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod session;
pub mod storage;
pub mod types;
pub mod upload;
pub mod voice;

#[cfg(feature = "ui")]
pub mod theme;
#[cfg(feature = "ui")]
pub mod ui;
#[cfg(feature = "ui")]
pub mod views;

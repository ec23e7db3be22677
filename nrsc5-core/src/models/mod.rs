pub mod config;
pub mod diagnostics;
pub mod error;
pub mod event;
pub mod records;
pub mod registry;
pub mod state;

pub mod event_handler;
pub mod radio_backend;

pub mod event_decoder;

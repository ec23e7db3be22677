pub mod checksum;
pub mod lot_store;
pub mod wav_format;
pub mod wav_writer;

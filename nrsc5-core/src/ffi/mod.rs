//! Raw engine ABI and helpers for reading engine-owned memory.

pub mod chain;
pub mod raw;

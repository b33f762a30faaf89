//! Wire-level types for the case-file archive backend: the response envelope
//! used by every REST endpoint, the records those endpoints carry, and the
//! frame grammar of the streaming import channel.

pub mod envelope;
pub mod frame;
pub mod line_buffer;
pub mod records;

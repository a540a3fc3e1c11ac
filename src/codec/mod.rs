//! Shot codec (pure, stateless)
//!
//! [`transcoder`] maps bytes to and from printable text; [`shot`] defines the
//! packed 32-byte record. Nothing here performs I/O or logs.

pub mod shot;
pub mod transcoder;

pub use shot::{SHOT_RECORD_SIZE, decode, decode_with, encode, pack, unpack};
pub use transcoder::DecodeMode;

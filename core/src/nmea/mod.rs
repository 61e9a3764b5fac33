//! NMEA-0183 sentence validation and field splitting.

pub mod checksum;
pub mod sentence;
pub mod talkers;

pub use checksum::{checksum, checksum_hex};
pub use sentence::Sentence;
pub use talkers::{is_known_format, is_known_talker};

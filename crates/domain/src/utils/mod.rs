//! Pure codecs for the string encodings used on the wire

pub mod duration;
pub mod timestamp;

pub use duration::{format_offset, parse_offset, Offset, PlanDuration};
pub use timestamp::{format_timestamp, parse_timestamp, Timestamp};

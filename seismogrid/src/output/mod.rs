//! Result grid writers.

mod ascii;

pub use ascii::{AsciiGridWriter, DEFAULT_NODATA};

//! Host-side input: turns raw per-cycle payloads into readings the detector
//! can ingest, and streams them from stdin.

pub mod reading;
pub mod stdin;

pub use reading::{extract_reading, extract_value, Reading};
pub use stdin::{spawn_line_feed, spawn_stdin_feed};

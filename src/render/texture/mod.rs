//! Textures

pub mod star_pattern;

pub use star_pattern::{star_pattern, upload_star_pattern, STAR_PATTERN_SIZE};

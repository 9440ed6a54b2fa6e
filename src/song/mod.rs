//! Song identification data
//!
//! - recognizer (Shazam) response decoding
//! - Deezer metadata enrichment

pub mod deezer;
pub mod models;
pub mod shazam;

pub use models::Song;

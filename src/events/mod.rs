//! Events as they come from the push log.
//!  - [entities] holds the raw records and the checked [entities::Event].
//!  - [normalize] decides what happens to records with unusable timestamps.
//!  - [source] reads a bounded, most recent first snapshot of records.

pub mod entities;
pub mod normalize;
pub mod source;

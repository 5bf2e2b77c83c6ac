//! Marksrank Core Library
//!
//! Percentile estimation for exam candidates: difficulty routing by exam date
//! and shift, marks-to-percentile interpolation, and the reference stores the
//! tables are read from.

pub mod config;
pub mod db;
pub mod difficulty;
pub mod error;
pub mod evaluate;
pub mod format;
pub mod interpolate;
pub mod logging;
pub mod pack;
pub mod reference;
pub mod source;

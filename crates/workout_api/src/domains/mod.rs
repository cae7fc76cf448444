//! Pure data-transformation modules, one per operation family.
//!
//! Everything here works on typed rows and an explicit `today` parameter;
//! nothing reads the clock or touches the store.
//!
//! # Modules
//!
//! - [`catalog`]: exercise list formatting
//! - [`history`]: recent + archive merge for one exercise
//! - [`sessions`]: group-by-date session views and recent-session selection
//! - [`stats`]: Monday-anchored week buckets and the muscle/week matrix
//! - [`submit`]: submission expansion into sheet rows

pub mod catalog;
pub mod history;
pub mod sessions;
pub mod stats;
pub mod submit;

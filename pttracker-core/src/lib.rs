pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod tracker;
pub mod validation;

pub use error::TrackerError;
pub use tracker::Tracker;

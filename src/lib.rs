// src/lib.rs

#[macro_use]
pub mod macros;

#[cfg(feature = "cli")]
pub mod cli;
pub mod classify;
pub mod config;
pub mod core;
pub mod error;
pub mod log;
pub mod progress;
pub mod scrape;
pub mod specs;

pub use classify::{ ErrorClassifier, StatusText };
pub use error::{ PortalError, Result };
pub use scrape::Portal;

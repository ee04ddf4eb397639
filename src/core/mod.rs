// src/core/mod.rs

pub mod deadline;
pub mod encoding;
pub mod html;
pub mod net;
pub mod sanitize;

pub use deadline::{ CancelToken, Deadline };
pub use net::{ Session, Transport };

// src/specs/mod.rs
//! # Page specs
//!
//! Everything that knows what a portal page looks like lives here, and
//! nothing else does.
//!
//! ## What lives here
//! - **Menu and forms**: resolving a menu label to its endpoint
//!   (`menu`), pulling Struts hidden fields out of a form and building the
//!   fixed-order body for the next request (`form`).
//! - **Record schemas**: declarative "field *i* is column *i*" or
//!   "caption → field" tables (`schema`) and the concrete ones per page
//!   (`listings`, `detail`).
//! - **Odd pages**: the resource-manager summary (`resource`), the
//!   confirmation / receipt screens of two-phase writes (`confirm`), and the
//!   plain-text control protocol (`control`).
//!
//! ## What does **not** live here
//! - Request ordering, pauses and dedup across a traversal (`scrape`).
//! - Transport, TLS and character encoding (`core`).
//!
//! ## Conventions
//! - Pages are Shift_JIS on the wire but arrive here already decoded.
//! - A missing form, menu entry or required cell is a
//!   `PortalError::Structural` naming the page. Missing *optional* cells
//!   are empty strings.
//! - Specs are testable offline against inline HTML or `tests/fixtures`.
pub mod confirm;
pub mod control;
pub mod detail;
pub mod form;
pub mod listings;
pub mod menu;
pub mod resource;
pub mod schema;

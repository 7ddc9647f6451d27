// src/specs/mod.rs
//! Page-specific extraction specs.
//!
//! Each spec encodes *where the ground truth lives in the HTML* for one
//! report page and *how to extract it robustly*: tolerant case-insensitive
//! tag scanning via `core::html`, entity/whitespace cleanup via
//! `core::sanitize`, and light shaping into small row structs.
//!
//! Specs only extract. Fetching belongs to `core::session`, counting to
//! `stats`, persistence to `store`.
pub mod report;

//! Read-it-later service client.
//!
//! This crate provides:
//! - [`ReaderClient`] — thin HTTP client for the reader service's paginated
//!   `list/` endpoint (following the page cursor until exhausted) and its
//!   `save/` endpoint (publishing a composed document)

mod client;

pub use client::ReaderClient;

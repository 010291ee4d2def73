//! Integration test suite for bunpro-export-core.
//!
//! Runs the real HTTP client and exporter against a local mock of the
//! Bunpro API, then checks the CSV that comes out the other end.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;
mod integration;

//! Detects tests that leave files behind.
//!
//! A snapshot of every path below a root directory is taken before a test runs and
//! again after it finishes. Paths that appeared or disappeared, minus those matched by
//! the configured ignore rules, are reported as litter.

#![allow(clippy::enum_variant_names)]

pub mod application;
pub mod cli;
pub mod config;
pub mod ext;
pub mod report;
pub mod snapshots;
pub mod tests_runner;

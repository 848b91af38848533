//! End-to-end tests of the filter → trigger → export-service pipeline.
//!
//! The export service is the in-process recording implementation; nothing
//! here talks to AWS.

mod common;
mod properties;
mod scenarios;

//! Integration tests
//!
//! Mock HTTP servers stand in for the analyzed site and every outbound
//! collaborator, so the full pipeline runs without network access.

mod analyze_tests;
mod helpers;
mod server_tests;

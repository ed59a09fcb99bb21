//! Build and test records returned by the logkeeper service.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently,
//! so the integration tests catch drift between the two. Field names follow
//! the server's snake_case wire format; missing fields decode to their zero
//! value and unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Metadata for a single build and the tests recorded under it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Build {
    pub id: String,
    pub builder: String,
    #[serde(rename = "buildnum")]
    pub build_num: i64,
    pub task_id: String,
    pub task_execution: i64,
    /// In the order the server returned them.
    pub tests: Vec<Test>,
}

/// Metadata for one test within a build.
///
/// `build_id` refers back to the owning build; the client does not check
/// that it matches the build the test was requested under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Test {
    pub id: String,
    pub name: String,
    pub build_id: String,
    pub task_id: String,
    pub task_execution: i64,
    pub phase: String,
    pub command: String,
}

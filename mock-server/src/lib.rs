use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Build {
    pub id: String,
    pub builder: String,
    pub buildnum: i64,
    pub task_id: String,
    pub task_execution: i64,
    #[serde(default)]
    pub tests: Vec<Test>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Test {
    pub id: String,
    pub name: String,
    pub build_id: String,
    pub task_id: String,
    pub task_execution: i64,
    pub phase: String,
    pub command: String,
}

pub type Db = Arc<HashMap<String, Build>>;

/// Router serving the given builds. Later duplicates of an id win.
pub fn app(builds: Vec<Build>) -> Router {
    let db: Db = Arc::new(builds.into_iter().map(|b| (b.id.clone(), b)).collect());
    Router::new()
        .route("/build/{id}", get(get_build))
        .route("/build/{id}/test/{test_id}", get(get_test))
        .with_state(db)
}

pub async fn run(listener: TcpListener, builds: Vec<Build>) -> Result<(), std::io::Error> {
    axum::serve(listener, app(builds)).await
}

async fn get_build(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Build>, StatusCode> {
    debug!(build_id = %id, "get build");
    db.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn get_test(
    State(db): State<Db>,
    Path((id, test_id)): Path<(String, String)>,
) -> Result<Json<Test>, StatusCode> {
    debug!(build_id = %id, test_id = %test_id, "get test");
    db.get(&id)
        .and_then(|build| build.tests.iter().find(|t| t.id == test_id))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_serializes_with_server_field_names() {
        let build = Build {
            id: "b1".to_string(),
            builder: "linux".to_string(),
            buildnum: 7,
            task_id: "task".to_string(),
            task_execution: 0,
            tests: Vec::new(),
        };
        let json = serde_json::to_value(&build).unwrap();
        assert_eq!(json["id"], "b1");
        assert_eq!(json["buildnum"], 7);
        assert_eq!(json["task_execution"], 0);
        assert!(json["tests"].as_array().unwrap().is_empty());
    }

    #[test]
    fn build_fixture_without_tests_defaults_to_empty() {
        let build: Build = serde_json::from_str(
            r#"{"id":"b","builder":"x","buildnum":1,"task_id":"t","task_execution":0}"#,
        )
        .unwrap();
        assert!(build.tests.is_empty());
    }

    #[test]
    fn test_fixture_rejects_missing_name() {
        let result: Result<Test, _> = serde_json::from_str(
            r#"{"id":"t","build_id":"b","task_id":"t","task_execution":0,"phase":"p","command":"c"}"#,
        );
        assert!(result.is_err());
    }
}

// ============================
// crates/backend-lib/src/rules.rs
// ============================
//! Tenant rules document.
//!
//! The rules are authorization configuration for the external sync engine;
//! this server only loads the document at startup and serves it read-only
//! at an internal path. No rule is evaluated here.
use std::path::Path;
use std::sync::Arc;

use axum::extract::{Path as UrlPath, State};
use axum::Json;
use serde_json::Value;
use thiserror::Error;

use crate::AppState;

/// Failures while loading the rules document
#[derive(Error, Debug)]
pub enum RulesError {
    #[error("cannot read rules file {path}: {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },

    #[error("rules file {path} is not valid JSON: {source}")]
    Malformed {
        path: String,
        source: serde_json::Error,
    },
}

/// Read and parse the rules document. Callers treat failure as fatal:
/// the server must not come up without its tenant rules.
pub fn load_rules(path: &Path) -> Result<Value, RulesError> {
    let raw = std::fs::read_to_string(path).map_err(|source| RulesError::Unreadable {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| RulesError::Malformed {
        path: path.display().to_string(),
        source,
    })
}

/// `GET /internal/project/{db_name}/rules`
pub async fn serve_rules<S: Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    UrlPath(db_name): UrlPath<String>,
) -> Json<Value> {
    if db_name != state.settings.db_name {
        tracing::debug!(%db_name, "rules requested for a project this process does not serve");
    }

    Json(serde_json::json!({ "rules": &*state.rules }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_rules() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"users": {{".read": true, ".write": "auth.uid != null"}}}}"#).unwrap();

        let rules = load_rules(file.path()).unwrap();
        assert_eq!(rules["users"][".read"], true);
    }

    #[test]
    fn test_missing_rules_file_fails() {
        let err = load_rules(Path::new("/definitely/not/here/rules.json")).unwrap_err();
        assert!(matches!(err, RulesError::Unreadable { .. }));
    }

    #[test]
    fn test_malformed_rules_file_fails() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ nope").unwrap();

        let err = load_rules(file.path()).unwrap_err();
        assert!(matches!(err, RulesError::Malformed { .. }));
    }
}

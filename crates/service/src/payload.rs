//! Strict-payload helpers for partial updates.
//!
//! Some update endpoints accept only a fixed set of fields; any other key
//! fails the whole request with a per-field message instead of being
//! silently dropped.

use serde_json::{Map, Value};

use crate::errors::ServiceError;

pub fn ensure_only_fields(payload: &Map<String, Value>, allowed: &[&str]) -> Result<(), ServiceError> {
    let rejected: Vec<String> = payload
        .keys()
        .filter(|k| !allowed.contains(&k.as_str()))
        .map(|k| format!("cannot update the field '{}'", k))
        .collect();
    if rejected.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::Validation(rejected.join("; ")))
    }
}

//! Configuration validation

use crate::schema::{RawAlias, RawConfig};
use punch_api::MULTI_TARGET_DELIMITER;
use std::collections::HashSet;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Alias '{name}': {message}")]
    AliasError { name: String, message: String },

    #[error("Duplicate alias name: {0}")]
    DuplicateAlias(String),

    #[error("Session config error: {0}")]
    SessionError(String),
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(ns) = &config.session.alias_namespace
        && ns.trim().is_empty()
    {
        errors.push(ValidationError::SessionError(
            "alias_namespace cannot be empty".into(),
        ));
    }

    if let Some(account) = &config.session.account
        && account.trim().is_empty()
    {
        errors.push(ValidationError::SessionError("account cannot be empty".into()));
    }

    let mut seen = HashSet::new();
    for alias in &config.aliases {
        if !seen.insert(alias.name.trim()) {
            errors.push(ValidationError::DuplicateAlias(alias.name.clone()));
        }
        errors.extend(validate_alias(alias));
    }

    errors
}

fn validate_alias(alias: &RawAlias) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let error = |message: String| ValidationError::AliasError {
        name: alias.name.clone(),
        message,
    };

    if alias.name.trim().is_empty() {
        errors.push(error("name cannot be empty".into()));
    }

    if alias.targets.is_empty() {
        errors.push(error("at least one target is required".into()));
    }

    for target in &alias.targets {
        if target.trim().is_empty() {
            errors.push(error("targets cannot be empty".into()));
        } else if target.contains(MULTI_TARGET_DELIMITER) {
            errors.push(error(format!(
                "target '{}' contains the reserved delimiter '{}'",
                target, MULTI_TARGET_DELIMITER
            )));
        }
    }

    errors
}

// ABOUTME: RFC 1123 validation for cluster namespaces and object names.
// ABOUTME: Rejects malformed names before any request reaches the API server.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

const LABEL_MAX: usize = 63;
const SUBDOMAIN_MAX: usize = 253;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("name cannot be empty")]
    Empty,

    #[error("name exceeds maximum length of {0} characters")]
    TooLong(usize),

    #[error("name must start and end with an alphanumeric character")]
    BadEdge,

    #[error("name must be lowercase")]
    NotLowercase,

    #[error("invalid character in name: '{0}'")]
    InvalidChar(char),
}

fn validate(value: &str, max: usize, allow_dot: bool) -> Result<(), NameError> {
    if value.is_empty() {
        return Err(NameError::Empty);
    }

    if value.len() > max {
        return Err(NameError::TooLong(max));
    }

    for c in value.chars() {
        if c.is_ascii_uppercase() {
            return Err(NameError::NotLowercase);
        }
        let allowed =
            c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || (allow_dot && c == '.');
        if !allowed {
            return Err(NameError::InvalidChar(c));
        }
    }

    let edge_ok = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphanumeric());
    if !edge_ok(value.chars().next()) || !edge_ok(value.chars().last()) {
        return Err(NameError::BadEdge);
    }

    Ok(())
}

/// A cluster namespace (RFC 1123 label).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(value: &str) -> Result<Self, NameError> {
        validate(value, LABEL_MAX, false)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A namespaced object name such as a deployment or service (RFC 1123 subdomain).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ObjectName(String);

impl ObjectName {
    pub fn new(value: &str) -> Result<Self, NameError> {
        validate(value, SUBDOMAIN_MAX, true)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

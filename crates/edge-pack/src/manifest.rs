//! Dependency manifest parsing.
//!
//! The manifest is a `requirements.txt`-style text file: one package per
//! line, optionally with a version constraint, `#` comments and blank lines
//! ignored. Only the entry list matters here; resolution itself is the
//! external resolver's job.

use std::path::Path;

use crate::PackagingError;

const CONSTRAINT_OPS: [&str; 6] = ["==", ">=", "<=", "~=", ">", "<"];

/// One declared dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    /// Constraint as written, e.g. `==1.2.3`, if any.
    pub constraint: Option<String>,
}

/// Parse manifest text into requirements.
pub fn parse(content: &str) -> Vec<Requirement> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                return None;
            }
            for op in CONSTRAINT_OPS {
                if let Some(idx) = line.find(op) {
                    return Some(Requirement {
                        name: line[..idx].trim().to_string(),
                        constraint: Some(line[idx..].trim().to_string()),
                    });
                }
            }
            Some(Requirement { name: line.to_string(), constraint: None })
        })
        .collect()
}

/// Read and parse a manifest file.
pub fn from_file(path: &Path) -> Result<Vec<Requirement>, PackagingError> {
    if !path.is_file() {
        return Err(PackagingError::ManifestNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| PackagingError::ManifestUnreadable(path.display().to_string(), e))?;
    Ok(parse(&content))
}

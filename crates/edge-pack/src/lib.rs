//! edge-pack — build a deployable code artifact from a source tree.
//!
//! Pipeline:
//! 1. Parse the dependency manifest (if the stack declares one)
//! 2. Copy the source tree into a fresh staging workspace
//! 3. Materialize dependencies alongside the source via the external
//!    resolver (`pip install -r <manifest> -t <staging>`)
//! 4. Persist the staged tree to `<source>/dist/bundle`, digest it, and
//!    return the [`CodeArtifact`]
//!
//! The staging workspace is a [`tempfile::TempDir`], so partial output from
//! a failed or aborted build never escapes; only a fully built tree is
//! persisted.

use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, info};

use edge_core::CodeArtifact;

pub mod manifest;

/// Artifact build failure. Fatal; composition aborts.
#[derive(Debug, Error)]
pub enum PackagingError {
    #[error("source directory not found: {0}")]
    SourceNotFound(String),

    #[error("dependency manifest not found: {0}")]
    ManifestNotFound(String),

    #[error("failed to read dependency manifest {0}: {1}")]
    ManifestUnreadable(String, #[source] std::io::Error),

    #[error(
        "dependency resolver not found; install pip or set EDGESTACK_PIP_PATH"
    )]
    ResolverNotFound,

    #[error("dependency resolution failed (exit code {code}):\n{stderr}")]
    ResolverFailed { code: i32, stderr: String },

    #[error("staging failed: {0}")]
    Staging(#[from] std::io::Error),
}

/// Name of the directory (under the source's parent) where bundles land.
const DIST_DIR: &str = "dist";
const BUNDLE_DIR: &str = "bundle";

/// Build a code artifact from `source_dir` and an optional dependency
/// manifest (path relative to `source_dir`).
///
/// An absent or empty manifest skips the resolver entirely: the artifact is
/// then the source tree verbatim.
pub fn pack(source_dir: &Path, manifest_rel: Option<&str>) -> Result<CodeArtifact, PackagingError> {
    if !source_dir.is_dir() {
        return Err(PackagingError::SourceNotFound(source_dir.display().to_string()));
    }

    let requirements = match manifest_rel {
        Some(rel) => manifest::from_file(&source_dir.join(rel))?,
        None => Vec::new(),
    };

    // Workspace dies with this handle on every exit path.
    let staging = tempfile::tempdir()?;
    copy_tree(source_dir, staging.path())?;
    debug!("staged source tree at {}", staging.path().display());

    if requirements.is_empty() {
        debug!("empty dependency manifest, skipping resolver");
    } else {
        let manifest_path = staging.path().join(manifest_rel.unwrap_or_default());
        install_dependencies(&manifest_path, staging.path(), requirements.len())?;
    }

    let bundle_dir = persist_bundle(staging.path(), source_dir)?;
    let (size_bytes, sha256) = digest_tree(&bundle_dir)?;

    info!(
        "packaged {} ({} bytes, sha256 {})",
        bundle_dir.display(),
        size_bytes,
        sha256
    );

    Ok(CodeArtifact {
        path: bundle_dir.display().to_string(),
        size_bytes,
        sha256,
    })
}

/// Locate the dependency resolver binary.
///
/// Search order:
/// 1. `$EDGESTACK_PIP_PATH` environment variable
/// 2. `pip3`, then `pip`, on `$PATH`
fn find_resolver() -> Result<PathBuf, PackagingError> {
    if let Ok(path) = std::env::var("EDGESTACK_PIP_PATH") {
        let resolver = PathBuf::from(&path);
        if resolver.is_file() {
            debug!("found resolver at {} (from EDGESTACK_PIP_PATH)", resolver.display());
            return Ok(resolver);
        }
    }

    for candidate in ["pip3", "pip"] {
        if let Ok(output) = Command::new("which").arg(candidate).output() {
            if output.status.success() {
                let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path.is_empty() {
                    debug!("found resolver at {path} (system PATH)");
                    return Ok(PathBuf::from(path));
                }
            }
        }
    }

    Err(PackagingError::ResolverNotFound)
}

/// Materialize dependencies into the staging tree. Blocking; this is the
/// only long-running step in a pack run.
fn install_dependencies(
    manifest_path: &Path,
    staging: &Path,
    count: usize,
) -> Result<(), PackagingError> {
    let resolver = find_resolver()?;

    info!("materializing {count} dependencies into staging");
    let mut cmd = Command::new(&resolver);
    cmd.arg("install")
        .arg("-r")
        .arg(manifest_path)
        .arg("-t")
        .arg(staging)
        .current_dir(staging);

    debug!("running: {cmd:?}");
    let output = cmd.output()?;

    if !output.status.success() {
        return Err(PackagingError::ResolverFailed {
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }
    Ok(())
}

/// Copy `from` into `to`, skipping any previous `dist/` output.
fn copy_tree(from: &Path, to: &Path) -> Result<(), PackagingError> {
    for entry in walkdir::WalkDir::new(from)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| e.file_name() != DIST_DIR)
    {
        let entry = entry.map_err(std::io::Error::other)?;
        let rel = entry
            .path()
            .strip_prefix(from)
            .map_err(std::io::Error::other)?;
        let dest = to.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
        }
    }
    Ok(())
}

/// Replace `<source>/dist/bundle` with the staged tree.
fn persist_bundle(staging: &Path, source_dir: &Path) -> Result<PathBuf, PackagingError> {
    let bundle_dir = source_dir.join(DIST_DIR).join(BUNDLE_DIR);
    if bundle_dir.exists() {
        fs::remove_dir_all(&bundle_dir)?;
    }
    fs::create_dir_all(&bundle_dir)?;
    copy_tree(staging, &bundle_dir)?;
    Ok(bundle_dir)
}

/// Total size and sha256 over the tree, files visited in sorted path order
/// so identical inputs give identical digests.
fn digest_tree(root: &Path) -> Result<(u64, String), PackagingError> {
    let mut hasher = Sha256::new();
    let mut size_bytes = 0u64;

    for entry in walkdir::WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = entry.map_err(std::io::Error::other)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .map_err(std::io::Error::other)?;
        hasher.update(rel.to_string_lossy().as_bytes());
        let bytes = fs::read(entry.path())?;
        size_bytes += bytes.len() as u64;
        hasher.update(&bytes);
    }

    Ok((size_bytes, hex::encode(hasher.finalize())))
}

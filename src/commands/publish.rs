//! Publish authored posts with git

use anyhow::{bail, Context, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::Blog;

/// Remote pushed to when none is given
pub const DEFAULT_REMOTE: &str = "origin";

/// What publishing did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Published {
    /// The paths had nothing new to commit
    Unchanged,
    /// A commit was created and pushed
    Pushed,
}

/// Stage, commit and push `paths` from the site's repository
pub fn run(blog: &Blog, paths: &[PathBuf], message: &str, remote: &str) -> Result<Published> {
    publish(&blog.base_dir, paths, message, remote)
}

/// Stage `paths`, commit them alone and push the current branch
pub fn publish(
    repo: &Path,
    paths: &[PathBuf],
    message: &str,
    remote: &str,
) -> Result<Published> {
    if paths.is_empty() {
        bail!("No paths to publish");
    }

    git(repo, &with_paths(&["add"], paths))?;

    let status = git(repo, &with_paths(&["status", "--porcelain"], paths))?;
    if status.is_empty() {
        tracing::info!("Nothing to commit for {:?}", paths);
        return Ok(Published::Unchanged);
    }

    let mut commit = vec![OsStr::new("commit"), OsStr::new("-m"), OsStr::new(message)];
    commit.extend(with_paths(&[], paths));
    git(repo, &commit)?;

    git(repo, &[OsStr::new("push"), OsStr::new(remote), OsStr::new("HEAD")])?;
    tracing::info!("Pushed {:?} to {}", paths, remote);

    Ok(Published::Pushed)
}

/// `head -- paths..`
fn with_paths<'a>(head: &[&'static str], paths: &'a [PathBuf]) -> Vec<&'a OsStr> {
    head.iter()
        .copied()
        .map(OsStr::new)
        .chain(std::iter::once(OsStr::new("--")))
        .chain(paths.iter().map(|p| p.as_os_str()))
        .collect()
}

/// Run git in `repo`; returns trimmed stdout
fn git(repo: &Path, args: &[&OsStr]) -> Result<String> {
    let output = Command::new("git")
        .current_dir(repo)
        .args(args)
        .output()
        .context("Failed to run git")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let detail = if stderr.trim().is_empty() { stdout } else { stderr };
        bail!(
            "git {} failed: {}",
            args.first().map(|a| a.to_string_lossy()).unwrap_or_default(),
            detail.trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

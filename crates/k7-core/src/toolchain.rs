//! Wrappers around the external `go` and `git` tools.
//!
//! These run after materialization, inside the freshly generated project:
//! `go mod init`, `go get` for the selected variants' modules, `go mod tidy`,
//! `gofmt`, and finally the git policy. Each wrapper fails with
//! [`K7Error::ToolFailed`] carrying the tool's stderr.

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::process::Command;

use crate::error::{K7Error, Result};

pub const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";

/// What to do with git once the project is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitPolicy {
    /// Initialize a repository and commit all generated files.
    Commit,
    /// Initialize a repository and stage the files without committing.
    Stage,
    /// Leave git alone.
    #[default]
    Skip,
}

impl GitPolicy {
    pub const ALL: &'static [Self] = &[Self::Commit, Self::Stage, Self::Skip];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Commit => "commit",
            Self::Stage => "stage",
            Self::Skip => "skip",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Commit => "Initialize a new git repository and commit all the changes",
            Self::Stage => "Initialize a new git repository but only stage the changes",
            Self::Skip => "Proceed without initializing a git repository",
        }
    }

    /// Whether this policy runs git at all.
    pub fn uses_git(&self) -> bool {
        !matches!(self, Self::Skip)
    }
}

impl FromStr for GitPolicy {
    type Err = K7Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| K7Error::UnknownGitPolicy(s.to_string()))
    }
}

impl fmt::Display for GitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Information about a missing prerequisite tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrerequisiteError {
    pub tool_name: String,
    pub install_instructions: String,
}

/// Tools needed to finish a project after its files are written.
pub fn required_tools(git: GitPolicy) -> Vec<(&'static str, &'static str)> {
    let mut tools = vec![
        ("go", "https://go.dev/doc/install"),
        ("gofmt", "ships with the Go toolchain: https://go.dev/doc/install"),
    ];
    if git.uses_git() {
        tools.push(("git", "https://git-scm.com/downloads"));
    }
    tools
}

/// Check that every tool is on `PATH`.
pub fn check_prerequisites(
    tools: &[(&str, &str)],
) -> std::result::Result<(), Vec<PrerequisiteError>> {
    let missing: Vec<PrerequisiteError> = tools
        .iter()
        .filter(|(name, _)| which::which(name).is_err())
        .map(|(name, install)| PrerequisiteError {
            tool_name: (*name).to_string(),
            install_instructions: (*install).to_string(),
        })
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

/// Run `program args...` in `dir`, returning stdout.
async fn run(program: &str, args: &[&str], dir: &Path) -> Result<String> {
    run_with_env(program, args, dir, &[]).await
}

/// [`run`] with extra environment variables set for the child.
async fn run_with_env(
    program: &str,
    args: &[&str],
    dir: &Path,
    envs: &[(&str, &OsStr)],
) -> Result<String> {
    tracing::debug!("{program} {}", args.join(" "));

    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .envs(envs.iter().copied())
        .output()
        .await
        .map_err(|e| K7Error::ToolFailed {
            tool: program.to_string(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(K7Error::ToolFailed {
            tool: format!("{program} {}", args.join(" ")),
            message: stderr.trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

pub async fn go_mod_init(dir: &Path, module_path: &str) -> Result<()> {
    run("go", &["mod", "init", module_path], dir).await?;
    Ok(())
}

/// `go get` every package in one invocation. No-op for an empty list.
pub async fn go_get(dir: &Path, packages: &[&str]) -> Result<()> {
    if packages.is_empty() {
        return Ok(());
    }
    let mut args = vec!["get"];
    args.extend_from_slice(packages);
    run("go", &args, dir).await?;
    Ok(())
}

pub async fn go_mod_tidy(dir: &Path) -> Result<()> {
    run("go", &["mod", "tidy"], dir).await?;
    Ok(())
}

pub async fn go_fmt(dir: &Path) -> Result<()> {
    run("gofmt", &["-s", "-w", "."], dir).await?;
    Ok(())
}

/// Git config keys a commit needs.
pub const GIT_IDENTITY_KEYS: &[&str] = &["user.name", "user.email"];

/// Whether `git config <key>` has a non-empty value, as seen from `dir`.
pub async fn git_config_set(dir: &Path, key: &str) -> bool {
    git_config_set_with_env(dir, key, &[]).await
}

async fn git_config_set_with_env(dir: &Path, key: &str, envs: &[(&str, &OsStr)]) -> bool {
    match run_with_env("git", &["config", "--get", key], dir, envs).await {
        Ok(value) => !value.trim().is_empty(),
        Err(_) => false,
    }
}

/// Fail with [`K7Error::GitIdentityMissing`] naming the first unset identity key.
pub async fn check_git_identity(dir: &Path) -> Result<()> {
    check_git_identity_with_env(dir, &[]).await
}

async fn check_git_identity_with_env(dir: &Path, envs: &[(&str, &OsStr)]) -> Result<()> {
    for key in GIT_IDENTITY_KEYS {
        if !git_config_set_with_env(dir, key, envs).await {
            return Err(K7Error::GitIdentityMissing {
                key: (*key).to_string(),
            });
        }
    }
    Ok(())
}

pub async fn git_init(dir: &Path) -> Result<()> {
    run("git", &["init"], dir).await?;
    Ok(())
}

pub async fn git_add_all(dir: &Path) -> Result<()> {
    run("git", &["add", "."], dir).await?;
    Ok(())
}

pub async fn git_commit(dir: &Path, message: &str) -> Result<()> {
    run("git", &["commit", "-m", message], dir).await?;
    Ok(())
}

/// Apply `policy` to the project at `dir`.
///
/// Commit and stage both need `user.name` and `user.email`; the check runs
/// before the repository is created so a failure leaves no `.git` behind.
pub async fn apply_git_policy(dir: &Path, policy: GitPolicy) -> Result<()> {
    if !policy.uses_git() {
        return Ok(());
    }
    check_git_identity(dir).await?;

    git_init(dir).await?;
    git_add_all(dir).await?;
    if policy == GitPolicy::Commit {
        git_commit(dir, INITIAL_COMMIT_MESSAGE).await?;
    }
    Ok(())
}

//! Home directory resolution.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Resolve the server home directory to an absolute path.
///
/// - `None` (or blank) => `<user home>/<default_subdir>`
/// - `~` / `~/x` => expanded against the user home
/// - relative => joined onto the current working directory
///
/// With `create`, the directory is created if missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let resolved = match configured.as_deref().map(str::trim) {
        None | Some("") => user_home()?.join(default_subdir),
        Some(raw) => expand(raw)?,
    };

    if create {
        std::fs::create_dir_all(&resolved)
            .with_context(|| format!("cannot create home_dir {}", resolved.display()))?;
    }
    Ok(resolved)
}

fn expand(raw: &str) -> Result<PathBuf> {
    let path = if raw == "~" {
        user_home()?
    } else if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        user_home()?.join(rest)
    } else {
        PathBuf::from(raw)
    };

    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().context("cannot read current directory")?;
    Ok(cwd.join(path))
}

fn user_home() -> Result<PathBuf> {
    match dirs::home_dir() {
        Some(p) if p.is_absolute() => Ok(p),
        Some(p) => bail!("user home directory is not absolute: {}", p.display()),
        None => bail!("cannot determine user home directory"),
    }
}

/// Resolve `file` against `base` unless it is already absolute.
pub fn resolve_under(base: &Path, file: &str) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

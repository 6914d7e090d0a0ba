use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueHint};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Plot the contents of spectrum files created by GGG",
    long_about = None
)]
pub struct Cli {
    /// Directory where a standalone html plot of each opened spectrum is
    /// saved, defaults to the current working directory
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub save_path: Option<PathBuf>,
}

impl Cli {
    pub fn save_path(&self) -> Result<PathBuf> {
        match &self.save_path {
            Some(path) => Ok(path.clone()),
            None => std::env::current_dir().context("resolving current directory"),
        }
    }
}

/// Folder of spectra shipped with the viewer.
pub fn default_spectra_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("spectra")
}

/// File names in `dir`, sorted. Subdirectories and hidden files are skipped.
pub fn list_spectra(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with('.') {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// The folder to list spectra from. A `requested` path that is not an
/// existing directory falls back to `default`.
///
/// Returns the folder and whether it is a user-supplied one.
pub fn resolve_spectra_dir(requested: &str, default: &Path) -> (PathBuf, bool) {
    let requested = requested.trim();
    if requested.is_empty() {
        return (default.to_path_buf(), false);
    }
    let path = PathBuf::from(requested);
    if path.is_dir() {
        let custom = path != default;
        (path, custom)
    } else {
        log::warn!(
            "{} is not an existing directory, reverting to the default spectrum folder",
            path.display()
        );
        (default.to_path_buf(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ggg_spectra_{tag}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn listing_is_sorted_files_only() {
        let dir = scratch_dir("listing");
        std::fs::write(dir.join("b.spt"), "").unwrap();
        std::fs::write(dir.join("a.spt"), "").unwrap();
        std::fs::write(dir.join(".hidden"), "").unwrap();
        std::fs::create_dir(dir.join("sub")).unwrap();

        let names = list_spectra(&dir).unwrap();
        std::fs::remove_dir_all(&dir).ok();
        assert_eq!(names, vec!["a.spt", "b.spt"]);
    }

    #[test]
    fn missing_directory_falls_back_to_default() {
        let default = scratch_dir("default");
        let (dir, custom) = resolve_spectra_dir("/definitely/not/here", &default);
        assert_eq!(dir, default);
        assert!(!custom);
        std::fs::remove_dir_all(&default).ok();
    }

    #[test]
    fn existing_directory_is_custom() {
        let default = scratch_dir("default2");
        let other = scratch_dir("other");
        let (dir, custom) = resolve_spectra_dir(other.to_str().unwrap(), &default);
        assert_eq!(dir, other);
        assert!(custom);
        std::fs::remove_dir_all(&default).ok();
        std::fs::remove_dir_all(&other).ok();
    }

    #[test]
    fn listing_missing_directory_is_an_error() {
        assert!(list_spectra(Path::new("/definitely/not/here")).is_err());
    }

    #[test]
    fn save_path_flag() {
        let cli = Cli::parse_from(["ggg-spectra", "--save-path", "/tmp/plots"]);
        assert_eq!(cli.save_path().unwrap(), PathBuf::from("/tmp/plots"));
        let cli = Cli::parse_from(["ggg-spectra"]);
        assert_eq!(cli.save_path().unwrap(), std::env::current_dir().unwrap());
    }
}

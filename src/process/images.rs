// src/process/images.rs
use glob::{glob, Pattern};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

use crate::error::{ProcessError, Result};

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tiff"];

/// Lists the image files of a product directory.
pub trait ImageSource {
    /// `Ok(None)` when `dir` is not an existing directory. Listed paths are
    /// absolute, with no `.` or `..` components.
    fn list_images(&self, dir: &Path) -> Result<Option<Vec<PathBuf>>>;
}

/// Reads image listings from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageSource;

impl ImageSource for FsImageSource {
    fn list_images(&self, dir: &Path) -> Result<Option<Vec<PathBuf>>> {
        if !dir.is_dir() {
            return Ok(None);
        }
        let dir = fs::canonicalize(dir)?;
        let pattern = format!("{}/*", Pattern::escape(&dir.to_string_lossy()));
        let mut files: Vec<PathBuf> = glob(&pattern)?
            .filter_map(|entry| entry.ok())
            .filter(|p| p.is_file() && has_image_extension(p))
            .collect();
        files.sort();
        debug!(dir = %dir.display(), count = files.len(), "listed images");
        Ok(Some(files))
    }
}

pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| e.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Parse the images base URL; it must be able to take path segments.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        return Err(ProcessError::Config(format!(
            "images base URL '{}' cannot take a path",
            raw
        )));
    }
    Ok(url)
}

/// Append every component of `path` to `base` as a percent-encoded path
/// segment. Both `/` and `\` separate components.
///
/// `.` and `..` are resolved against the local path first, so the URL names
/// the same file; a `..` with nothing left to climb out of is an error.
pub fn image_url(base: &Url, path: &Path) -> Result<String> {
    let local = path.to_string_lossy();
    let mut components: Vec<&str> = Vec::new();
    for part in local.split(['/', '\\']) {
        match part {
            "" | "." => {}
            ".." => {
                if components.pop().is_none() {
                    return Err(ProcessError::ImagePath(local.to_string()));
                }
            }
            _ => components.push(part),
        }
    }

    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty();
        segments.extend(components);
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn lists_only_image_files_sorted() -> anyhow::Result<()> {
        let dir = tempdir()?;
        for name in ["b.JPG", "a.png", "notes.txt", "c.tiff"] {
            fs::write(dir.path().join(name), b"x")?;
        }
        fs::create_dir(dir.path().join("sub.png"))?;

        let files = FsImageSource
            .list_images(dir.path())?
            .expect("directory exists");
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.png", "b.JPG", "c.tiff"]);
        Ok(())
    }

    #[test]
    fn missing_directory_is_none() -> anyhow::Result<()> {
        let dir = tempdir()?;
        assert!(FsImageSource
            .list_images(&dir.path().join("nope"))?
            .is_none());
        Ok(())
    }

    #[test]
    fn image_url_encodes_path_segments() {
        let base = parse_base_url("https://example.com/photos/").unwrap();
        assert_eq!(
            image_url(&base, Path::new("/data/red silk/a#1.png")).unwrap(),
            "https://example.com/photos/data/red%20silk/a%231.png"
        );
    }

    #[test]
    fn image_url_resolves_dot_segments() {
        let base = parse_base_url("https://h/photos").unwrap();
        assert_eq!(
            image_url(&base, Path::new("data/red/../shared/./a b.png")).unwrap(),
            "https://h/photos/data/shared/a%20b.png"
        );
        assert!(matches!(
            image_url(&base, Path::new("../shared/./a b.png")),
            Err(ProcessError::ImagePath(_))
        ));
    }

    #[test]
    fn relative_directory_lists_canonical_paths() -> anyhow::Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("photos/red"))?;
        fs::create_dir_all(dir.path().join("photos/blue"))?;
        fs::write(dir.path().join("photos/red/a.png"), b"x")?;

        let roundabout = dir.path().join("photos/blue/../red/.");
        let files = FsImageSource
            .list_images(&roundabout)?
            .expect("directory exists");
        let expected = fs::canonicalize(dir.path().join("photos/red/a.png"))?;
        assert_eq!(files, vec![expected]);
        assert!(files[0].is_absolute());
        Ok(())
    }

    #[test]
    fn rejects_non_hierarchical_base() {
        assert!(parse_base_url("mailto:someone@example.com").is_err());
        assert!(parse_base_url("not a url").is_err());
    }
}

//! Template store: loads and caches the sprite library from a directory.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::io::owned_from_dynamic_image;
use crate::template::Template;
use crate::trace::{trace_event, trace_warn};
use crate::util::{SpriteScanError, SpriteScanResult};
use std::path::{Path, PathBuf};

/// File extensions accepted as sprite templates. GIF decodes to its
/// first frame.
const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

/// A template file that failed to load, with the reason it was skipped.
#[derive(Debug)]
pub struct SkippedFile {
    /// Path of the offending file.
    pub path: PathBuf,
    /// Human-readable decode or validation failure.
    pub reason: String,
}

/// Loaded sprite templates, read-only after construction.
///
/// The store may be shared across concurrent detection calls without
/// locking. Template names come from file stems and are not required to
/// be unique; callers must not treat the name as a key.
pub struct TemplateStore {
    templates: Vec<Template>,
    skipped: Vec<SkippedFile>,
}

impl TemplateStore {
    /// Loads every supported image file in `dir` as a template.
    ///
    /// Fails with `TemplateDir` only when the directory itself cannot be
    /// listed. Individual files that fail to decode (or are flat and
    /// therefore unmatched) are recorded in [`skipped`](Self::skipped)
    /// and never abort the rest of the load. Entries load in file-name
    /// order so the template sequence is deterministic.
    pub fn load(dir: impl AsRef<Path>) -> SpriteScanResult<Self> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|err| SpriteScanError::TemplateDir {
            path: dir.to_path_buf(),
            reason: err.to_string(),
        })?;

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| SpriteScanError::TemplateDir {
                path: dir.to_path_buf(),
                reason: err.to_string(),
            })?;
            let path = entry.path();
            if has_supported_extension(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut templates = Vec::new();
        let mut skipped = Vec::new();
        for path in paths {
            match load_one(&path) {
                Ok(template) => templates.push(template),
                Err(err) => {
                    trace_warn!("template_load_failed", file = path_label(&path));
                    skipped.push(SkippedFile {
                        path,
                        reason: err.to_string(),
                    });
                }
            }
        }

        trace_event!(
            "templates_loaded",
            loaded = templates.len(),
            skipped = skipped.len()
        );
        Ok(Self { templates, skipped })
    }

    /// Wraps already-constructed templates, e.g. synthetic ones in tests.
    pub fn from_templates(templates: Vec<Template>) -> Self {
        Self {
            templates,
            skipped: Vec::new(),
        }
    }

    /// Returns the loaded templates in load order.
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Returns the files that failed to load, with reasons.
    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    /// Returns the number of loaded templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns true when no template loaded.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn load_one(path: &Path) -> SpriteScanResult<Template> {
    let img = image::open(path).map_err(|err| SpriteScanError::Decode {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let gray = owned_from_dynamic_image(&img)?;
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (width, height) = (gray.width(), gray.height());
    Template::from_gray(name, gray.data().to_vec(), width, height)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.iter().any(|&known| known == ext)
        })
        .unwrap_or(false)
}

#[cfg(feature = "tracing")]
fn path_label(path: &Path) -> &str {
    path.file_name().and_then(|name| name.to_str()).unwrap_or("?")
}

#[cfg(not(feature = "tracing"))]
fn path_label(_path: &Path) -> &str {
    ""
}

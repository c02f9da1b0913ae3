//! Image resolver trait and the content-directory implementation.
//!
//! The [`ImageResolver`] trait is the seam between page props and image
//! files: templates never touch pixels, they receive [`ImageDescriptor`]s.
//!
//! The production implementation is [`ContentImageResolver`]. It reads the
//! source dimensions, copies the file into `<output>/static/` under a
//! content-hashed name, and describes it. It does not resample or re-encode.

use crate::types::{ImageDescriptor, ImageLayout};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read image {0}: {1}")]
    Decode(PathBuf, image::ImageError),
    #[error("Image path escapes the content directory: {0}")]
    OutsideContent(String),
}

/// Requested rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMode {
    /// Responsive, capped at `max_width` CSS pixels.
    Fluid { max_width: u32 },
    /// Constant pixel size.
    Fixed { width: u32, height: u32 },
}

/// A declarative image request: content-relative path plus target mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub path: String,
    pub mode: ImageMode,
}

impl ImageRequest {
    pub fn new(path: &str, mode: ImageMode) -> Self {
        Self {
            path: path.to_string(),
            mode,
        }
    }
}

/// Turns image requests into renderable descriptors.
pub trait ImageResolver: Sync {
    fn resolve(&self, request: &ImageRequest) -> Result<ImageDescriptor, ImageError>;
}

/// Directory under the output root that resolved images are copied into.
pub const STATIC_DIR: &str = "static";

/// Resolves images found under the content root.
pub struct ContentImageResolver {
    content_root: PathBuf,
    output_dir: PathBuf,
    /// Public URL of [`STATIC_DIR`], e.g. `/static`.
    public_base: String,
}

impl ContentImageResolver {
    pub fn new(content_root: &Path, output_dir: &Path, public_base: &str) -> Self {
        Self {
            content_root: content_root.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }

    /// Map a content path (`/img/a.jpg` or `img/a.jpg`) to a file under the root.
    fn source_path(&self, path: &str) -> Result<PathBuf, ImageError> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(ImageError::OutsideContent(path.to_string()));
        }
        Ok(self.content_root.join(relative))
    }
}

impl ImageResolver for ContentImageResolver {
    fn resolve(&self, request: &ImageRequest) -> Result<ImageDescriptor, ImageError> {
        let source = self.source_path(&request.path)?;
        let (src_width, src_height) = image::image_dimensions(&source)
            .map_err(|e| ImageError::Decode(source.clone(), e))?;

        let bytes = fs::read(&source)?;
        let file_name = hashed_file_name(&source, &bytes);
        let static_dir = self.output_dir.join(STATIC_DIR);
        let dest = static_dir.join(&file_name);
        if !dest.exists() {
            fs::create_dir_all(&static_dir)?;
            fs::write(&dest, &bytes)?;
            tracing::debug!(source = %source.display(), dest = %dest.display(), "copied image");
        }

        let src = format!("{}/{}", self.public_base, file_name);
        Ok(describe(&src, src_width, src_height, request.mode))
    }
}

/// `<stem>-<first 8 hex of sha256>.<ext>`
fn hashed_file_name(source: &Path, bytes: &[u8]) -> String {
    let digest = format!("{:x}", Sha256::digest(bytes));
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    match source.extension() {
        Some(ext) => format!(
            "{stem}-{}.{}",
            &digest[..8],
            ext.to_string_lossy().to_lowercase()
        ),
        None => format!("{stem}-{}", &digest[..8]),
    }
}

/// Build a descriptor for a source of the given size.
pub(crate) fn describe(src: &str, width: u32, height: u32, mode: ImageMode) -> ImageDescriptor {
    let aspect_ratio = if height == 0 {
        1.0
    } else {
        width as f64 / height as f64
    };
    match mode {
        ImageMode::Fluid { max_width } => {
            let display_width = width.min(max_width);
            let display_height = (display_width as f64 / aspect_ratio).round() as u32;
            ImageDescriptor {
                src: src.to_string(),
                srcset: format!("{src} {width}w"),
                width: display_width,
                height: display_height,
                aspect_ratio,
                layout: ImageLayout::Fluid,
            }
        }
        ImageMode::Fixed { width: w, height: h } => ImageDescriptor {
            src: src.to_string(),
            srcset: format!("{src} 1x"),
            width: w,
            height: h,
            aspect_ratio,
            layout: ImageLayout::Fixed,
        },
    }
}

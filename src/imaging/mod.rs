//! Image resolution.
//!
//! | Piece | Role |
//! |---|---|
//! | [`ImageResolver`] | Trait: request → [`ImageDescriptor`](crate::types::ImageDescriptor) |
//! | [`ContentImageResolver`] | Reads dimensions with `image`, copies a content-hashed file |
//! | [`resolve_ref`] | Decides once whether an [`ImageRef`] becomes processed |

pub mod resolver;

pub use resolver::{
    ContentImageResolver, ImageError, ImageMode, ImageRequest, ImageResolver, STATIC_DIR,
};

use crate::types::ImageRef;

/// Whether a raw reference points at something outside the content tree.
pub fn is_remote(path: &str) -> bool {
    path.starts_with("http://")
        || path.starts_with("https://")
        || path.starts_with("//")
        || path.starts_with("data:")
}

/// Resolve a reference into a processed descriptor where possible.
///
/// Remote URLs, empty paths, and already-processed references pass through
/// unchanged. A local path that fails to resolve is logged and kept raw so
/// the page still renders.
pub fn resolve_ref(resolver: &dyn ImageResolver, image: &ImageRef, mode: ImageMode) -> ImageRef {
    match image {
        ImageRef::Processed(_) => image.clone(),
        ImageRef::RawPath(path) if path.is_empty() || is_remote(path) => image.clone(),
        ImageRef::RawPath(path) => {
            match resolver.resolve(&ImageRequest::new(path, mode)) {
                Ok(descriptor) => ImageRef::Processed(descriptor),
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "image left unresolved");
                    image.clone()
                }
            }
        }
    }
}

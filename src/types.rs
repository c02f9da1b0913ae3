//! Shared types used across the scan, resolve, and generate stages.

use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` (an empty CMS field) like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// An image as referenced by page content.
///
/// Frontmatter holds plain strings, which deserialize as [`ImageRef::RawPath`].
/// The resolve stage swaps local files for [`ImageRef::Processed`]; remote URLs
/// and unresolvable paths stay raw. Renderers match on the variant instead of
/// probing for fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    RawPath(String),
    Processed(ImageDescriptor),
}

impl ImageRef {
    /// The URL to put in `src`: the descriptor's path, or the raw string unchanged.
    pub fn src(&self) -> &str {
        match self {
            ImageRef::RawPath(path) => path,
            ImageRef::Processed(descriptor) => &descriptor.src,
        }
    }

    pub fn descriptor(&self) -> Option<&ImageDescriptor> {
        match self {
            ImageRef::RawPath(_) => None,
            ImageRef::Processed(descriptor) => Some(descriptor),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.src().is_empty()
    }
}

impl Default for ImageRef {
    fn default() -> Self {
        ImageRef::RawPath(String::new())
    }
}

impl From<&str> for ImageRef {
    fn from(path: &str) -> Self {
        ImageRef::RawPath(path.to_string())
    }
}

/// How a resolved image is meant to be laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageLayout {
    /// Scales with its container up to the resolved width.
    Fluid,
    /// Rendered at a constant pixel size.
    Fixed,
}

/// A ready-to-render image produced by an [`ImageResolver`](crate::imaging::ImageResolver).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    /// URL of the file in the output site.
    pub src: String,
    /// `srcset` candidates, e.g. `"/static/a-1f2e3d4c.jpg 1600w"`.
    pub srcset: String,
    pub width: u32,
    pub height: u32,
    /// width / height of the source image.
    pub aspect_ratio: f64,
    pub layout: ImageLayout,
}

/// One tile in a card gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: ImageRef,
}

/// An outbound link listed on the home page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub href: String,
}

/// Primary navigation entry, built from numbered page files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    pub slug: String,
    /// Label used when the catalog has no `nav-menu-items.<slug>` entry.
    pub fallback_label: String,
    pub order: u32,
}

impl NavItem {
    pub fn label_key(&self) -> String {
        format!("nav-menu-items.{}", self.slug)
    }
}

//! Shared test utilities for the hanare-site test suite.
//!
//! Provides fixture setup and lookup helpers over scan-phase data
//! (`Manifest`, `SourcePage`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path()).unwrap();
//!
//! let bread = find_page(&manifest, "bread");
//! assert_eq!(bread.variants.len(), 2);
//! assert_eq!(nav_slugs(&manifest), vec!["bread", "rooms"]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::imaging::resolver::tests::write_test_png;
use crate::scan::{Manifest, SourcePage};

// =========================================================================
// Fixture setup
// =========================================================================

/// Images referenced by the fixture pages and config, with their sizes.
const FIXTURE_IMAGES: &[(&str, u32, u32)] = &[
    ("img/hero.png", 64, 32),
    ("img/main.png", 48, 32),
    ("img/logo.png", 20, 20),
    ("img/melon.png", 30, 20),
    ("img/curry.png", 30, 20),
    ("img/room.png", 40, 30),
    ("img/sign.png", 40, 30),
    ("img/owner.png", 30, 40),
];

/// Copy `fixtures/content/` to a temp directory, write the fixture images,
/// and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    for (path, width, height) in FIXTURE_IMAGES {
        write_test_png(&tmp.path().join(path), *width, *height);
    }
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Manifest lookups: panic with a clear message on miss
// =========================================================================

/// Find a page by slug. Panics if not found.
pub fn find_page<'a>(manifest: &'a Manifest, slug: &str) -> &'a SourcePage {
    manifest
        .pages
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| {
            let slugs = page_slugs(manifest);
            panic!("page '{slug}' not found. Available: {slugs:?}")
        })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All page slugs in manifest order.
pub fn page_slugs(manifest: &Manifest) -> Vec<&str> {
    manifest.pages.iter().map(|p| p.slug.as_str()).collect()
}

/// Navigation slugs in menu order.
pub fn nav_slugs(manifest: &Manifest) -> Vec<&str> {
    manifest
        .navigation
        .iter()
        .map(|n| n.slug.as_str())
        .collect()
}

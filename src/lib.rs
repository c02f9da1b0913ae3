//! # Hanare Site
//!
//! Static site generator for a small bakery and inn. Markdown pages with YAML
//! frontmatter, translation catalogs and a `config.toml` become plain HTML,
//! rendered once per locale and once per viewport profile.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Scan      content/  →  Manifest    (config + catalogs + pages, dumped as manifest.json)
//! 2. Resolve   Manifest  →  page props  (frontmatter → typed props, images resolved)
//! 3. Generate  props     →  dist/       (Layout × locale × viewport profile)
//! ```
//!
//! Rendering is a pure function of its inputs. Every component takes a
//! [`render::RenderContext`] carrying the config, the locale's
//! [`i18n::I18n`], the [`viewport::Viewport`] being rendered and a
//! [`render::Clock`]; there is no global state.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: reads config, catalogs and pages into a [`scan::Manifest`] |
//! | [`resolve`] | Stage 2: frontmatter → template props, local images → descriptors |
//! | [`generate`] | Stage 3: renders every page to `dist/`, copies assets |
//! | [`render`] | Layout, header, footer and page templates (Maud) |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS variables |
//! | [`i18n`] | Per-locale translation catalogs with default-locale fallback |
//! | [`viewport`] | Width-only media query evaluation |
//! | [`imaging`] | Image resolver: dimensions, content-hashed copies |
//! | [`types`] | Shared data types (`ImageRef`, `CardEntry`, `NavItem`) |
//! | [`naming`] | `NNN-slug.locale.md` filename convention parser |
//! | [`output`] | CLI output formatting for each stage |
//!
//! # Viewport Profiles
//!
//! Layout changes structure at 991px: a full-screen menu below it, a fixed
//! header above. A static page cannot re-render on resize, so each page is
//! built at the desktop width and again at the mobile width under `m/`. The
//! desktop page links its mobile twin with a media-qualified alternate link.

pub mod config;
pub mod generate;
pub mod i18n;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod render;
pub mod resolve;
pub mod scan;
pub mod types;
pub mod viewport;

#[cfg(test)]
pub(crate) mod test_helpers;

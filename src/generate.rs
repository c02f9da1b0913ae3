//! HTML site generation.
//!
//! Stage 3 of the build. Takes the scan manifest, resolves page props (stage
//! 2, see [`crate::resolve`]) and writes one HTML file per locale, page and
//! viewport profile.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                 # Home, default locale, desktop
//! ├── bread/index.html           # Cards page
//! ├── en/
//! │   ├── index.html
//! │   └── bread/index.html
//! ├── m/                         # Mobile variants, same tree
//! │   ├── index.html
//! │   └── en/bread/index.html
//! ├── static/
//! │   └── melon-1f2e3d4c.png     # Content-hashed images
//! └── img/                       # Copied verbatim from content/assets/
//!     └── favicon-16x16.png
//! ```
//!
//! Every page is rendered twice when `render.mobile_variant` is on: once at
//! the desktop width and once at the mobile width. The desktop page links the
//! mobile one with `<link rel="alternate" media=...>`.
//!
//! ## CSS
//!
//! `static/style.css` is embedded at compile time and inlined into every page
//! after the colour variables generated from `[colors]`.

use crate::config::{self, SiteConfig};
use crate::imaging::{ContentImageResolver, STATIC_DIR};
use crate::render::cards_page::{CardsPageProps, cards_page_template, page_meta};
use crate::render::index_page::{IndexPageProps, index_page_template};
use crate::render::layout::{PageMeta, layout};
use crate::render::{Clock, Profile, RenderContext, Route, markdown_to_html};
use crate::resolve::{self, PageProps, ResolvedPage};
use crate::scan::{ASSETS_DIR, Frontmatter, Manifest, PageSource};
use crate::types::ImageRef;
use crate::viewport::{Breakpoints, Viewport};
use maud::Markup;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");

/// One written HTML file.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPage {
    pub slug: String,
    pub locale: String,
    pub profile: Profile,
    pub template: &'static str,
    pub href: String,
    /// Path relative to the output directory.
    pub output_path: String,
}

#[derive(Debug, Default)]
pub struct GenerateReport {
    pub pages: Vec<GeneratedPage>,
    pub assets_copied: usize,
}

/// Generate the site from a `manifest.json` written by the scan stage.
pub fn generate(
    manifest_path: &Path,
    source_dir: &Path,
    output_dir: &Path,
    clock: &dyn Clock,
) -> Result<GenerateReport, GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let manifest: Manifest = serde_json::from_str(&manifest_content)?;
    generate_site(&manifest, source_dir, output_dir, clock)
}

pub fn generate_site(
    manifest: &Manifest,
    source_dir: &Path,
    output_dir: &Path,
    clock: &dyn Clock,
) -> Result<GenerateReport, GenerateError> {
    let config = &manifest.config;
    fs::create_dir_all(output_dir)?;

    let assets_copied = copy_assets(&source_dir.join(ASSETS_DIR), output_dir)?;

    let resolver =
        ContentImageResolver::new(source_dir, output_dir, &config.site.with_prefix(STATIC_DIR));
    let site = resolve::resolve_site(manifest, &resolver);

    let stylesheet = site_stylesheet(config);
    let breakpoints = Breakpoints::from_config(&config.breakpoints);
    let profiles = Profile::enabled(config);
    let jobs: Vec<(&ResolvedPage, Profile)> = site
        .pages
        .iter()
        .flat_map(|page| profiles.iter().map(move |profile| (page, *profile)))
        .collect();

    let pages = jobs
        .par_iter()
        .map(|(page, profile)| {
            let ctx = RenderContext {
                config,
                i18n: manifest.translations.for_locale(&page.locale),
                viewport: Viewport::new(profile.width(config)),
                breakpoints,
                clock,
                route: page_route(page, *profile),
                navigation: &manifest.navigation,
                logo: &site.logo,
                stylesheet: &stylesheet,
            };
            let html = render_page(&ctx, &page.props);

            let relative = ctx.route.output_file(config);
            let path = output_dir.join(&relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, html.into_string())?;
            tracing::debug!(path = %relative.display(), width = ctx.viewport.width, "wrote page");

            Ok::<_, GenerateError>(GeneratedPage {
                slug: page.slug.clone(),
                locale: page.locale.clone(),
                profile: *profile,
                template: page.props.template_name(),
                href: ctx.route.href(config),
                output_path: relative.to_string_lossy().to_string(),
            })
        })
        .collect::<Result<Vec<_>, GenerateError>>()?;

    Ok(GenerateReport {
        pages,
        assets_copied,
    })
}

/// Colour variables followed by the embedded base stylesheet.
pub fn site_stylesheet(config: &SiteConfig) -> String {
    format!(
        "{}\n\n{}",
        config::generate_color_css(&config.colors),
        CSS_STATIC
    )
}

fn page_route(page: &ResolvedPage, profile: Profile) -> Route {
    let slug = (!page.is_index).then_some(page.slug.as_str());
    Route::new(&page.locale, slug, profile)
}

/// Render a page's template inside the layout.
pub fn render_page(ctx: &RenderContext, props: &PageProps) -> Markup {
    match props {
        PageProps::Index(props) => layout(ctx, &PageMeta::default(), index_page_template(ctx, props)),
        PageProps::Cards(props) => {
            layout(ctx, &page_meta(ctx, &props.slug), cards_page_template(ctx, props))
        }
    }
}

/// Render one content file the way the CMS preview does: the markdown body
/// is rendered now and images are used as written, without resolution.
pub fn preview_page(
    manifest: &Manifest,
    source: &PageSource,
    slug: &str,
    locale: &str,
    width: u32,
    clock: &dyn Clock,
) -> Markup {
    let config = &manifest.config;
    let props = match &source.frontmatter {
        Frontmatter::IndexPage(fm) => PageProps::Index(IndexPageProps {
            markdown_body: source.markdown.clone(),
            is_cms: true,
            main_background_image: fm.main_background_image.clone(),
            main_image: fm.main_image.clone(),
            related_links: fm.related_links.clone(),
            owner_image: ImageRef::from(config.images.owner.as_str()),
            sign_image: ImageRef::from(config.images.sign.as_str()),
        }),
        Frontmatter::CardsPage(fm) => PageProps::Cards(CardsPageProps {
            slug: slug.to_string(),
            content: markdown_to_html(&source.markdown),
            main_image: fm.main_image.clone(),
            main_image_active: fm.main_image_active,
            cards: fm.cards.clone(),
        }),
    };
    let is_index = matches!(props, PageProps::Index(_));

    let breakpoints = Breakpoints::from_config(&config.breakpoints);
    let viewport = Viewport::new(width);
    let profile = if viewport.matches(&breakpoints.mobile) && config.render.mobile_variant {
        Profile::Mobile
    } else {
        Profile::Desktop
    };
    let logo = ImageRef::from(config.images.logo.as_str());
    let stylesheet = site_stylesheet(config);
    let ctx = RenderContext {
        config,
        i18n: manifest.translations.for_locale(locale),
        viewport,
        breakpoints,
        clock,
        route: Route::new(locale, (!is_index).then_some(slug), profile),
        navigation: &manifest.navigation,
        logo: &logo,
        stylesheet: &stylesheet,
    };
    render_page(&ctx, &props)
}

/// Copy `content/assets/` into the output root. Returns the number of files.
fn copy_assets(src: &Path, dst: &Path) -> Result<usize, GenerateError> {
    if !src.is_dir() {
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::FixedClock;
    use crate::scan::{read_page_source, scan};
    use crate::test_helpers::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn clock() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap())
    }

    fn build() -> (TempDir, TempDir, GenerateReport) {
        let content = setup_fixtures();
        let output = TempDir::new().unwrap();
        let manifest = scan(content.path()).unwrap();
        let report = generate_site(&manifest, content.path(), output.path(), &clock()).unwrap();
        (content, output, report)
    }

    fn read(output: &TempDir, relative: &str) -> String {
        fs::read_to_string(output.path().join(relative))
            .unwrap_or_else(|e| panic!("{relative}: {e}"))
    }

    #[test]
    fn writes_every_locale_page_and_profile() {
        let (_content, output, report) = build();
        // 4 pages × 2 locales × 2 profiles
        assert_eq!(report.pages.len(), 16);
        for relative in [
            "index.html",
            "bread/index.html",
            "rooms/index.html",
            "wip-notes/index.html",
            "en/index.html",
            "en/bread/index.html",
            "m/index.html",
            "m/en/bread/index.html",
        ] {
            assert!(output.path().join(relative).exists(), "{relative}");
        }
    }

    #[test]
    fn desktop_and_mobile_variants_differ_structurally() {
        let (_content, output, _) = build();
        let desktop = read(&output, "bread/index.html");
        let mobile = read(&output, "m/bread/index.html");
        assert!(desktop.contains(r#"class="AppHeader""#));
        assert!(!desktop.contains(r#"class="FullscreenMenu""#));
        assert!(mobile.contains(r#"class="FullscreenMenu""#));
        assert!(!mobile.contains(r#"class="AppHeader""#));
        assert!(mobile.contains("cards-single"));
        assert!(desktop.contains("card-grid"));
    }

    #[test]
    fn images_are_copied_with_hashed_names() {
        let (_content, output, _) = build();
        let html = read(&output, "bread/index.html");
        let start = html.find(r#"src="/static/melon-"#).expect("resolved card image") + 5;
        let end = start + html[start..].find('"').unwrap();
        let src = &html[start..end];
        assert!(output.path().join(src.trim_start_matches('/')).exists());
    }

    #[test]
    fn inactive_hero_not_rendered() {
        let (_content, output, _) = build();
        let bread = read(&output, "bread/index.html");
        assert!(!bread.contains(r#"class="cards-hero""#));
        let rooms = read(&output, "rooms/index.html");
        assert!(rooms.contains(r#"class="cards-hero""#));
    }

    #[test]
    fn footer_year_from_injected_clock() {
        let (_content, output, _) = build();
        assert!(read(&output, "index.html").contains("© 2030 "));
    }

    #[test]
    fn stylesheet_includes_color_variables() {
        let (_content, output, _) = build();
        let html = read(&output, "index.html");
        assert!(html.contains("--color-accent:"));
        assert!(html.contains(".FullscreenMenu"));
    }

    #[test]
    fn assets_copied_to_output_root() {
        let (_content, output, report) = build();
        assert_eq!(report.assets_copied, 1);
        assert!(output.path().join("img/manifest.json").exists());
    }

    #[test]
    fn english_pages_use_override_content() {
        let (_content, output, _) = build();
        let ja = read(&output, "bread/index.html");
        let en = read(&output, "en/bread/index.html");
        assert!(ja.contains("メロンパン"));
        assert!(en.contains("Melon bread"));
        assert!(en.contains(r#"<html lang="en">"#));
    }

    #[test]
    fn mobile_variant_can_be_disabled() {
        let content = setup_fixtures();
        let output = TempDir::new().unwrap();
        let mut manifest = scan(content.path()).unwrap();
        manifest.config.render.mobile_variant = false;
        let report = generate_site(&manifest, content.path(), output.path(), &clock()).unwrap();
        assert_eq!(report.pages.len(), 8);
        assert!(!output.path().join("m").exists());
    }

    #[test]
    fn generate_reads_manifest_json() {
        let content = setup_fixtures();
        let output = TempDir::new().unwrap();
        let manifest = scan(content.path()).unwrap();
        let manifest_path = content.path().join("manifest.json");
        fs::write(&manifest_path, serde_json::to_string(&manifest).unwrap()).unwrap();

        let report = generate(&manifest_path, content.path(), output.path(), &clock()).unwrap();
        assert_eq!(report.pages.len(), 16);
    }

    #[test]
    fn preview_renders_raw_markdown() {
        let content = setup_fixtures();
        let manifest = scan(content.path()).unwrap();
        let source =
            read_page_source(content.path(), &content.path().join("pages/index.md")).unwrap();
        let html = preview_page(&manifest, &source, "index", "ja", 375, &clock()).into_string();
        assert!(html.contains(r#"class="FullscreenMenu""#));
        assert!(html.contains("<strong>"));
        assert!(html.contains(r#"rel="canonical""#));
    }

    #[test]
    fn preview_keeps_images_raw() {
        let content = setup_fixtures();
        let manifest = scan(content.path()).unwrap();
        let source =
            read_page_source(content.path(), &content.path().join("pages/010-bread.md")).unwrap();
        let html = preview_page(&manifest, &source, "bread", "ja", 1280, &clock()).into_string();
        assert!(html.contains(r#"src="/img/melon.png""#));
        assert!(html.contains(r#"class="AppHeader""#));
    }
}

//! Props resolution.
//!
//! Stage 2 of the build. Projects each page variant's frontmatter into the
//! props its template takes, and swaps local image paths for descriptors
//! from an [`ImageResolver`]. This is the only place `ImageRef::RawPath`
//! becomes `ImageRef::Processed`.
//!
//! Images are only requested when something will render them: an inactive
//! cards-page hero is never sent to the resolver.

use crate::config::ImagesConfig;
use crate::imaging::{ImageMode, ImageResolver, resolve_ref};
use crate::render::cards_page::CardsPageProps;
use crate::render::index_page::IndexPageProps;
use crate::scan::{CardsFrontmatter, Frontmatter, IndexFrontmatter, Manifest, PageSource};
use crate::types::{CardEntry, ImageRef};

/// Props for one page template.
#[derive(Debug, Clone, PartialEq)]
pub enum PageProps {
    Index(IndexPageProps),
    Cards(CardsPageProps),
}

impl PageProps {
    pub fn template_name(&self) -> &'static str {
        match self {
            PageProps::Index(_) => "index-page",
            PageProps::Cards(_) => "cards-page",
        }
    }
}

/// One page in one locale, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPage {
    pub slug: String,
    pub locale: String,
    pub is_index: bool,
    pub props: PageProps,
}

/// Everything the generate stage renders.
#[derive(Debug, Clone)]
pub struct ResolvedSite {
    pub logo: ImageRef,
    pub pages: Vec<ResolvedPage>,
}

impl ResolvedSite {
    pub fn page(&self, slug: &str, locale: &str) -> Option<&ResolvedPage> {
        self.pages
            .iter()
            .find(|p| p.slug == slug && p.locale == locale)
    }
}

/// Resolve every page for every configured locale.
pub fn resolve_site(manifest: &Manifest, resolver: &dyn ImageResolver) -> ResolvedSite {
    let images = &manifest.config.images;
    let logo = resolve_ref(
        resolver,
        &ImageRef::from(images.logo.as_str()),
        ImageMode::Fluid {
            max_width: images.card_max_width,
        },
    );

    let mut pages = Vec::new();
    for locale in &manifest.config.i18n.locales {
        for page in &manifest.pages {
            let source = page.variant(locale);
            tracing::debug!(slug = %page.slug, locale = %locale, source = %source.source_path, "resolving page");
            pages.push(ResolvedPage {
                slug: page.slug.clone(),
                locale: locale.clone(),
                is_index: page.is_index(),
                props: page_props(&page.slug, source, resolver, images),
            });
        }
    }

    ResolvedSite { logo, pages }
}

pub fn page_props(
    slug: &str,
    source: &PageSource,
    resolver: &dyn ImageResolver,
    images: &ImagesConfig,
) -> PageProps {
    match &source.frontmatter {
        Frontmatter::IndexPage(fm) => {
            PageProps::Index(index_props(&source.html, fm, resolver, images))
        }
        Frontmatter::CardsPage(fm) => {
            PageProps::Cards(cards_props(slug, &source.html, fm, resolver, images))
        }
    }
}

pub fn index_props(
    html: &str,
    fm: &IndexFrontmatter,
    resolver: &dyn ImageResolver,
    images: &ImagesConfig,
) -> IndexPageProps {
    let hero = ImageMode::Fluid {
        max_width: images.hero_max_width,
    };
    let portrait = ImageMode::Fixed {
        width: images.portrait_size,
        height: images.portrait_size,
    };
    IndexPageProps {
        markdown_body: html.to_string(),
        is_cms: false,
        main_background_image: resolve_ref(resolver, &fm.main_background_image, hero),
        main_image: resolve_ref(resolver, &fm.main_image, hero),
        related_links: fm.related_links.clone(),
        owner_image: resolve_ref(resolver, &ImageRef::from(images.owner.as_str()), portrait),
        sign_image: resolve_ref(resolver, &ImageRef::from(images.sign.as_str()), portrait),
    }
}

pub fn cards_props(
    slug: &str,
    html: &str,
    fm: &CardsFrontmatter,
    resolver: &dyn ImageResolver,
    images: &ImagesConfig,
) -> CardsPageProps {
    let main_image = if fm.main_image_active {
        resolve_ref(
            resolver,
            &fm.main_image,
            ImageMode::Fluid {
                max_width: images.hero_max_width,
            },
        )
    } else {
        fm.main_image.clone()
    };
    let card_mode = ImageMode::Fluid {
        max_width: images.card_max_width,
    };
    let cards = fm
        .cards
        .iter()
        .map(|card| CardEntry {
            image: resolve_ref(resolver, &card.image, card_mode),
            ..card.clone()
        })
        .collect();

    CardsPageProps {
        slug: slug.to_string(),
        content: html.to_string(),
        main_image,
        main_image_active: fm.main_image_active,
        cards,
    }
}

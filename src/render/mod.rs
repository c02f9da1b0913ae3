//! HTML rendering with [maud](https://maud.lambda.xyz/).
//!
//! Every component is a plain function from a [`RenderContext`] (plus its own
//! props) to [`Markup`]. There is no global state: locale, viewport, clock and
//! the current route all travel in the context.
//!
//! | Module | Renders |
//! |---|---|
//! | [`layout`] | Document shell, head metadata, mobile or desktop template |
//! | [`header`] | Fixed desktop header, nav items, locale switcher, social links |
//! | [`footer`] | Contact segment and site footer |
//! | [`index_page`] | Home page |
//! | [`cards_page`] | Card gallery pages |
//!
//! ## Routes
//!
//! A page is addressed by locale, slug and viewport [`Profile`]:
//!
//! ```text
//! /                 ja, index, desktop
//! /bread/           ja, bread, desktop
//! /en/bread/        en, bread, desktop
//! /m/en/bread/      en, bread, mobile
//! ```

pub mod cards_page;
pub mod footer;
pub mod header;
pub mod index_page;
pub mod layout;

pub use footer::{Clock, FixedClock, SystemClock};

use crate::config::SiteConfig;
use crate::i18n::I18n;
use crate::types::{ImageDescriptor, ImageLayout, ImageRef, NavItem};
use crate::viewport::{Breakpoints, MediaQuery, Viewport};
use maud::{Markup, PreEscaped, html};
use pulldown_cmark::{Options, Parser, html as md_html};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Render a markdown document to HTML.
pub fn markdown_to_html(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let mut out = String::new();
    md_html::push_html(&mut out, Parser::new_ext(source, options));
    out
}

/// A page body. With `is_cms` the body is raw markdown and is rendered now;
/// otherwise it is HTML produced at scan time. Either way it is trusted.
pub fn markdown_body(body: &str, is_cms: bool) -> Markup {
    if is_cms {
        PreEscaped(markdown_to_html(body))
    } else {
        PreEscaped(body.to_string())
    }
}

/// `img` for an [`ImageRef`]. Empty references render nothing.
pub fn image(image: &ImageRef, alt: &str, class: Option<&str>) -> Markup {
    if let Some(d) = image.descriptor() {
        return html! {
            img class=[class] src=(d.src) srcset=(d.srcset) width=(d.width) height=(d.height)
                style=(image_style(d)) alt=(alt) loading="lazy";
        };
    }
    let path = image.src();
    html! {
        @if !path.is_empty() {
            img class=[class] src=(path) alt=(alt) loading="lazy";
        }
    }
}

/// Reserve layout space before the file loads.
fn image_style(d: &ImageDescriptor) -> String {
    match d.layout {
        ImageLayout::Fluid => format!("aspect-ratio: {:.4};", d.aspect_ratio),
        ImageLayout::Fixed => format!(
            "width: {}px; height: {}px; object-fit: cover;",
            d.width, d.height
        ),
    }
}

/// Which viewport a page variant is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Desktop,
    Mobile,
}

impl Profile {
    pub fn width(self, config: &SiteConfig) -> u32 {
        match self {
            Profile::Desktop => config.render.desktop_width,
            Profile::Mobile => config.render.mobile_width,
        }
    }

    /// Profiles the build renders.
    pub fn enabled(config: &SiteConfig) -> Vec<Profile> {
        if config.render.mobile_variant {
            vec![Profile::Desktop, Profile::Mobile]
        } else {
            vec![Profile::Desktop]
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Profile::Desktop => "desktop",
            Profile::Mobile => "mobile",
        }
    }
}

/// Address of one generated page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub locale: String,
    /// `None` for the home page.
    pub slug: Option<String>,
    pub profile: Profile,
}

impl Route {
    pub fn new(locale: &str, slug: Option<&str>, profile: Profile) -> Self {
        Self {
            locale: locale.to_string(),
            slug: slug.map(str::to_string),
            profile,
        }
    }

    /// Directory under the output root, with a trailing slash. Empty for `/`.
    pub fn relative_dir(&self, config: &SiteConfig) -> String {
        let mut segments: Vec<&str> = Vec::new();
        if self.profile == Profile::Mobile {
            segments.push(&config.render.mobile_prefix);
        }
        if self.locale != config.i18n.default_locale {
            segments.push(&self.locale);
        }
        if let Some(slug) = &self.slug {
            segments.push(slug);
        }
        segments.iter().map(|s| format!("{s}/")).collect()
    }

    /// Site-relative URL, including the path prefix.
    pub fn href(&self, config: &SiteConfig) -> String {
        config.site.with_prefix(&self.relative_dir(config))
    }

    /// File to write, relative to the output root.
    pub fn output_file(&self, config: &SiteConfig) -> PathBuf {
        PathBuf::from(self.relative_dir(config)).join("index.html")
    }

    pub fn with_locale(&self, locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            ..self.clone()
        }
    }

    pub fn with_slug(&self, slug: Option<&str>) -> Self {
        Self {
            slug: slug.map(str::to_string),
            ..self.clone()
        }
    }

    pub fn with_profile(&self, profile: Profile) -> Self {
        Self {
            profile,
            ..self.clone()
        }
    }
}

/// Everything a component may read while rendering one page.
pub struct RenderContext<'a> {
    pub config: &'a SiteConfig,
    pub i18n: I18n<'a>,
    pub viewport: Viewport,
    pub breakpoints: Breakpoints,
    pub clock: &'a dyn Clock,
    pub route: Route,
    pub navigation: &'a [NavItem],
    /// Site logo, resolved once per build.
    pub logo: &'a ImageRef,
    /// Full stylesheet inlined into every page.
    pub stylesheet: &'a str,
}

impl RenderContext<'_> {
    pub fn matches(&self, query: &MediaQuery) -> bool {
        self.viewport.matches(query)
    }

    pub fn is_mobile(&self) -> bool {
        self.matches(&self.breakpoints.mobile)
    }

    /// Link to another page in the current locale and profile.
    pub fn page_href(&self, slug: Option<&str>) -> String {
        self.route.with_slug(slug).href(self.config)
    }

    /// URL of a file shipped with the site.
    pub fn asset(&self, path: &str) -> String {
        self.config.site.with_prefix(path)
    }

    /// Prefix a site-relative URL with the configured origin.
    pub fn absolute_url(&self, href: &str) -> String {
        if href.contains("://") {
            return href.to_string();
        }
        format!("{}{}", self.config.site.url.trim_end_matches('/'), href)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::i18n::{Catalog, Translations};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    const JA: &str = r#"
[site]
title = "パンとお宿 はなれ"
description = "答志島のパン屋"
phone = "0599-00-0000"
address = "三重県鳥羽市答志町"

[nav-menu-items]
home = "ホーム"
bread = "パン"

[pages.home]
link-label = "はなれ"

[pages.bread]
title = "パンのご紹介"
description = "毎朝焼き上げています"

[headings]
contact-us = "お問い合わせ"
latest-news = "最新情報"
services = "サービス"
directions = "アクセス"
links = "リンク"

[topics.contact-us]
message = "お気軽にお電話ください"
"#;

    const EN: &str = r#"
[site]
title = "Hanare"
lead = "Fresh bread on [Toshi Island](https://example.org/toshi)\nbaked every morning"

[nav-menu-items]
home = "Home"

[headings]
contact-us = "Contact us"
"#;

    /// Owned inputs for building contexts in component tests.
    pub struct Fixture {
        pub config: SiteConfig,
        pub translations: Translations,
        pub navigation: Vec<NavItem>,
        pub clock: FixedClock,
        pub logo: ImageRef,
    }

    impl Fixture {
        pub fn new() -> Self {
            let mut config = SiteConfig::default();
            config.site.phone = "0599-00-0000".to_string();
            config.site.phone_value = "+81599000000".to_string();
            config.site.gmap = "https://maps.example.org/hanare".to_string();
            config.site.url = "https://hanare.example.org".to_string();

            let mut catalogs = BTreeMap::new();
            catalogs.insert("ja".to_string(), Catalog::from_toml_str("ja", JA).unwrap());
            catalogs.insert("en".to_string(), Catalog::from_toml_str("en", EN).unwrap());

            Self {
                config,
                translations: Translations {
                    default_locale: "ja".to_string(),
                    catalogs,
                },
                navigation: vec![
                    NavItem {
                        slug: "bread".to_string(),
                        fallback_label: "bread".to_string(),
                        order: 10,
                    },
                    NavItem {
                        slug: "rooms".to_string(),
                        fallback_label: "rooms".to_string(),
                        order: 20,
                    },
                ],
                clock: FixedClock(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()),
                logo: ImageRef::from("/img/logo.png"),
            }
        }

        /// Default-locale home page at `width`.
        pub fn ctx(&self, width: u32) -> RenderContext<'_> {
            self.ctx_at(width, "ja", None)
        }

        pub fn ctx_at<'s>(&'s self, width: u32, locale: &'s str, slug: Option<&str>) -> RenderContext<'s> {
            let profile = if width <= self.config.render.mobile_width {
                Profile::Mobile
            } else {
                Profile::Desktop
            };
            RenderContext {
                config: &self.config,
                i18n: self.translations.for_locale(locale),
                viewport: Viewport::new(width),
                breakpoints: Breakpoints::from_config(&self.config.breakpoints),
                clock: &self.clock,
                route: Route::new(locale, slug, profile),
                navigation: &self.navigation,
                logo: &self.logo,
                stylesheet: "",
            }
        }
    }
}

//! Page shell: head metadata, then either the mobile panel or the desktop
//! header around the page content, then the footer.

use super::footer::app_footer;
use super::header::{app_header, locale_switcher, nav_menu_items, social_buttons};
use super::{Profile, RenderContext};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const APPLE_ICON_SIZES: &[u32] = &[57, 60, 72, 76, 114, 120, 144, 152, 180];
const FAVICON_SIZES: &[u32] = &[32, 96, 16];

/// Per-page overrides for the document head.
#[derive(Debug, Clone, Default)]
pub struct PageMeta {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Wrap page content in the site layout.
pub fn layout(ctx: &RenderContext, meta: &PageMeta, content: Markup) -> Markup {
    let is_mobile = ctx.is_mobile();
    html! {
        (DOCTYPE)
        html lang=(ctx.i18n.locale()) {
            head { (base_head(ctx, meta)) }
            body id="top" {
                @if is_mobile {
                    (mobile_template(ctx, content))
                } @else {
                    (desktop_template(ctx, content))
                }
                (app_footer(ctx))
            }
        }
    }
}

fn base_head(ctx: &RenderContext, meta: &PageMeta) -> Markup {
    let site = &ctx.config.site;
    let site_title = ctx.i18n.t_or("site.title", &site.title);
    let title = meta.title.clone().unwrap_or_else(|| site_title.clone());
    let description = meta
        .description
        .clone()
        .unwrap_or_else(|| ctx.i18n.t_or("site.description", &site.description));
    let href = ctx.route.href(ctx.config);
    let desktop_href = ctx.route.with_profile(Profile::Desktop).href(ctx.config);

    html! {
        meta charset="utf-8";
        meta name="viewport" content="width=device-width, initial-scale=1";
        title { (title) }
        meta name="description" content=(description);

        @for size in APPLE_ICON_SIZES {
            link rel="apple-touch-icon" sizes={ (size) "x" (size) }
                href=(ctx.asset(&format!("img/apple-icon-{size}x{size}.png")));
        }
        link rel="icon" type="image/png" sizes="192x192" href=(ctx.asset("img/android-icon-192x192.png"));
        @for size in FAVICON_SIZES {
            link rel="icon" type="image/png" sizes={ (size) "x" (size) }
                href=(ctx.asset(&format!("img/favicon-{size}x{size}.png")));
        }
        link rel="manifest" href=(ctx.asset("img/manifest.json"));
        meta name="theme-color" content=(site.theme_color);

        meta property="og:type" content="business.business";
        meta property="og:title" content=(title);
        meta property="og:url" content=(ctx.absolute_url(&href));
        meta property="og:image" content=(ctx.absolute_url(&ctx.asset(&site.og_image)));

        @match ctx.route.profile {
            Profile::Desktop => {
                @if ctx.config.render.mobile_variant {
                    link rel="alternate" media=(ctx.breakpoints.mobile.to_string())
                        href=(ctx.absolute_url(&ctx.route.with_profile(Profile::Mobile).href(ctx.config)));
                }
            }
            Profile::Mobile => {
                link rel="canonical" href=(ctx.absolute_url(&desktop_href));
            }
        }
        @for locale in &ctx.config.i18n.locales {
            link rel="alternate" hreflang=(locale)
                href=(ctx.absolute_url(&ctx.route.with_profile(Profile::Desktop).with_locale(locale).href(ctx.config)));
        }

        style { (PreEscaped(ctx.stylesheet)) }
    }
}

/// Full-screen menu toggled by a checkbox, followed directly by the content.
///
/// The toggle always renders unchecked and opts out of form restoration, so
/// the panel starts closed on every page load.
fn mobile_template(ctx: &RenderContext, content: Markup) -> Markup {
    html! {
        label.FullscreenMenu {
            input.menu-toggle type="checkbox" autocomplete="off"
                aria-label=(ctx.i18n.t_or("nav-menu.toggle", "Menu"));
            span.hamburgerButton {
                span.hamburgerIcon {}
            }
            nav.menuItems {
                ul.menu-vertical {
                    li { a href=(ctx.page_href(None)) { (ctx.i18n.t("nav-menu-items.home")) } }
                    (nav_menu_items(ctx))
                    li { (locale_switcher(ctx)) }
                    li { (social_buttons(ctx)) }
                    li.contact-item {
                        h4 { (ctx.i18n.t("headings.contact-us")) }
                        a.button.call-button.circular href=(ctx.config.site.tel_href())
                            aria-label=(ctx.i18n.t("headings.contact-us")) {
                            span.icon-phone aria-hidden="true" { "☎" }
                        }
                    }
                }
            }
        }
        (content)
    }
}

fn desktop_template(ctx: &RenderContext, content: Markup) -> Markup {
    html! {
        div.desktop-page {
            (app_header(ctx))
            div.spacer {}
            (content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::Fixture;

    fn page(fixture: &Fixture, width: u32) -> String {
        let ctx = fixture.ctx(width);
        layout(&ctx, &PageMeta::default(), html! { main { "本文" } }).into_string()
    }

    #[test]
    fn mobile_widths_render_panel_without_header() {
        let fixture = Fixture::new();
        for width in [320, 599, 991] {
            let html = page(&fixture, width);
            assert!(html.contains(r#"class="FullscreenMenu""#), "width {width}");
            assert!(!html.contains(r#"class="AppHeader""#), "width {width}");
            assert!(!html.contains(r#"class="spacer""#), "width {width}");
        }
    }

    #[test]
    fn desktop_widths_render_header_without_panel() {
        let fixture = Fixture::new();
        for width in [992, 1280, 1920] {
            let html = page(&fixture, width);
            assert!(html.contains(r#"class="AppHeader""#), "width {width}");
            assert!(html.contains(r#"class="spacer""#), "width {width}");
            assert!(!html.contains(r#"class="FullscreenMenu""#), "width {width}");
        }
    }

    #[test]
    fn content_and_footer_on_every_width() {
        let fixture = Fixture::new();
        for width in [320, 1280] {
            let html = page(&fixture, width);
            assert!(html.contains("<main>本文</main>"));
            assert!(html.contains(r#"class="site-footer""#));
            let content_at = html.find("<main>").unwrap();
            let footer_at = html.find("contact-segment").unwrap();
            assert!(content_at < footer_at);
        }
    }

    #[test]
    fn mobile_toggle_starts_unchecked() {
        let fixture = Fixture::new();
        let html = page(&fixture, 375);
        assert!(html.contains(r#"type="checkbox" autocomplete="off""#));
        assert!(!html.contains("checked"));
    }

    #[test]
    fn mobile_panel_has_home_contact_and_call() {
        let fixture = Fixture::new();
        let html = page(&fixture, 375);
        assert!(html.contains(">ホーム</a>"));
        assert!(html.contains("<h4>お問い合わせ</h4>"));
        assert!(html.contains(r#"href="tel:+81599000000""#));
    }

    #[test]
    fn head_metadata_always_present() {
        let fixture = Fixture::new();
        for width in [375, 1280] {
            let html = page(&fixture, width);
            assert!(html.contains("<title>パンとお宿 はなれ</title>"));
            assert!(html.contains(r#"<meta name="description" content="答志島のパン屋">"#));
            assert!(html.contains(r#"property="og:type" content="business.business""#));
            assert!(html.contains(r#"sizes="180x180" href="/img/apple-icon-180x180.png""#));
            assert!(html.contains(r#"href="/img/favicon-16x16.png""#));
            assert!(html.contains(r#"rel="manifest" href="/img/manifest.json""#));
            assert!(html.contains(r#"content="https://hanare.example.org/img/og-image.jpg""#));
        }
    }

    #[test]
    fn page_meta_overrides_title() {
        let fixture = Fixture::new();
        let meta = PageMeta {
            title: Some("パンのご紹介".to_string()),
            description: None,
        };
        let html = layout(&fixture.ctx(1280), &meta, html! {}).into_string();
        assert!(html.contains("<title>パンのご紹介</title>"));
        assert!(html.contains(r#"content="答志島のパン屋""#));
    }

    #[test]
    fn desktop_advertises_mobile_variant() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx_at(1280, "en", Some("bread"));
        let html = layout(&ctx, &PageMeta::default(), html! {}).into_string();
        assert!(html.contains(
            r#"<link rel="alternate" media="(max-width: 991px)" href="https://hanare.example.org/m/en/bread/">"#
        ));
        assert!(!html.contains(r#"rel="canonical""#));
    }

    #[test]
    fn mobile_variant_points_canonical_at_desktop() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx_at(375, "en", Some("bread"));
        let html = layout(&ctx, &PageMeta::default(), html! {}).into_string();
        assert!(html.contains(r#"<link rel="canonical" href="https://hanare.example.org/en/bread/">"#));
    }

    #[test]
    fn hreflang_alternates_for_every_locale() {
        let fixture = Fixture::new();
        let html = page(&fixture, 1280);
        assert!(html.contains(r#"hreflang="ja" href="https://hanare.example.org/""#));
        assert!(html.contains(r#"hreflang="en" href="https://hanare.example.org/en/""#));
    }

    #[test]
    fn document_language_follows_locale() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx_at(1280, "en", None);
        let html = layout(&ctx, &PageMeta::default(), html! {}).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<html lang="en">"#));
    }

    #[test]
    fn missing_metadata_renders_empty_values() {
        let mut fixture = Fixture::new();
        fixture.translations.catalogs.clear();
        let html = page(&fixture, 1280);
        assert!(html.contains("<title></title>"));
        assert!(html.contains(r#"<meta name="description" content="">"#));
    }
}

//! Home page.

use super::{RenderContext, image, markdown_body};
use crate::types::{ImageRef, LinkEntry};
use maud::{Markup, html};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

/// Props for [`index_page_template`], resolved from `index-page` frontmatter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexPageProps {
    /// Pre-rendered HTML, or raw markdown when `is_cms` is set.
    pub markdown_body: String,
    pub is_cms: bool,
    pub main_background_image: ImageRef,
    pub main_image: ImageRef,
    pub related_links: Vec<LinkEntry>,
    /// Fixed-size owner portrait beside the lead text.
    pub owner_image: ImageRef,
    /// Fixed-size shop sign photo in the directions section.
    pub sign_image: ImageRef,
}

pub fn index_page_template(ctx: &RenderContext, props: &IndexPageProps) -> Markup {
    let background = props.main_background_image.src();
    let is_mobile = ctx.is_mobile();
    let show_sidebar = ctx.matches(&ctx.breakpoints.desktop_sidebar);
    let site_title = ctx.i18n.t_or("site.title", &ctx.config.site.title);

    html! {
        (app_hero(ctx, background, is_mobile, &site_title))
        div.container.index-columns {
            div.index-main {
                div.message.message-yellow.message-big {
                    div.markdown-body { (markdown_body(&props.markdown_body, props.is_cms)) }
                    @if is_mobile {
                        a.button.primary.latest-news href=(latest_news_href(ctx)) {
                            (ctx.i18n.t("headings.latest-news"))
                            span.icon-angle-right aria-hidden="true" { "›" }
                        }
                    }
                }
                div.segment.lead-text {
                    @if !props.owner_image.is_empty() {
                        div.portrait.owner-image { (image(&props.owner_image, &site_title, None)) }
                    }
                    (lead_text(ctx))
                }
                @if !props.main_image.is_empty() {
                    div.main-image { (image(&props.main_image, &site_title, None)) }
                }
                @if let Some(video) = &ctx.config.index.intro_video {
                    div.intro-video {
                        iframe src=(video) title=(ctx.i18n.t_or("headings.intro-video", &site_title))
                            loading="lazy" allowfullscreen {}
                    }
                }
                section.segment.services {
                    h2 { (ctx.i18n.t("headings.services")) }
                    ul.service-list {
                        @for service in &ctx.config.index.services {
                            li { (ctx.i18n.t(&format!("services.{service}"))) }
                        }
                    }
                }
                (separator(background))
                section.segment.directions {
                    h2 { (ctx.i18n.t("headings.directions")) }
                    @if !props.sign_image.is_empty() {
                        div.portrait.sign-image { (image(&props.sign_image, &site_title, None)) }
                    }
                    @if let Some(directions) = ctx.i18n.t_rich("topics.directions") {
                        p { (directions) }
                    }
                    @if !ctx.config.site.gmap.is_empty() {
                        a.map-link href=(ctx.config.site.gmap) target="_blank" rel="noopener" {
                            (ctx.i18n.t_or("site.address", &ctx.config.site.address))
                        }
                    }
                }
                (separator(background))
                @if !props.related_links.is_empty() {
                    section.segment.related-links {
                        h2 { (ctx.i18n.t("headings.links")) }
                        ul {
                            @for link in &props.related_links {
                                li { a href=(link.href) rel="noopener" { (link.title) } }
                            }
                        }
                    }
                }
            }
            aside {
                @if show_sidebar {
                    @if let Some(page) = &ctx.config.index.facebook_page {
                        div.timeline-sidebar { (facebook_timeline(page, &site_title)) }
                    }
                }
            }
        }
    }
}

/// Background image with the logo centred on it.
fn app_hero(ctx: &RenderContext, background: &str, is_mobile: bool, alt: &str) -> Markup {
    let (height, logo_width) = if is_mobile { (300, 200) } else { (400, 300) };
    html! {
        div.hero style=(background_style(background, &format!("height: {height}px"))) {
            div.hero-logo style=(format!("width: {logo_width}px")) {
                (image(ctx.logo, alt, Some("logo")))
            }
        }
    }
}

/// Configured target, else the `timeline` page in the current tree.
fn latest_news_href(ctx: &RenderContext) -> String {
    match &ctx.config.index.latest_news_href {
        Some(href) => href.clone(),
        None => ctx.page_href(Some("timeline")),
    }
}

fn separator(background: &str) -> Markup {
    html! {
        div.separator style=(background_style(background, "height: 16px")) {}
    }
}

fn background_style(background: &str, extra: &str) -> String {
    if background.is_empty() {
        return format!("{extra};");
    }
    format!("background-image: url(\"{background}\"); {extra};")
}

/// `site.lead` as rich text, or the plain site description.
fn lead_text(ctx: &RenderContext) -> Markup {
    match ctx.i18n.t_rich("site.lead") {
        Some(lead) => lead,
        None => html! { (ctx.i18n.t_or("site.description", &ctx.config.site.description)) },
    }
}

fn facebook_timeline(page: &str, title: &str) -> Markup {
    let src = format!(
        "https://www.facebook.com/plugins/page.php?href={}&tabs=timeline&width=340&height=800&small_header=true&adapt_container_width=true",
        utf8_percent_encode(page, NON_ALPHANUMERIC)
    );
    html! {
        iframe.facebook-timeline src=(src) title=(title) width="340" height="800"
            loading="lazy" scrolling="no" frameborder="0" {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::Fixture;
    use crate::types::{ImageDescriptor, ImageLayout};

    fn props() -> IndexPageProps {
        IndexPageProps {
            markdown_body: "<p>ようこそ</p>".to_string(),
            is_cms: false,
            main_background_image: ImageRef::from("/static/hero-0badc0de.jpg"),
            main_image: ImageRef::from("/static/main-12345678.jpg"),
            related_links: vec![],
            owner_image: ImageRef::default(),
            sign_image: ImageRef::default(),
        }
    }

    #[test]
    fn related_links_section_omitted_when_empty() {
        let fixture = Fixture::new();
        let html = index_page_template(&fixture.ctx(1280), &props()).into_string();
        assert!(!html.contains("related-links"));
        assert!(!html.contains("<h2>リンク</h2>"));
    }

    #[test]
    fn one_related_link_renders_one_item() {
        let fixture = Fixture::new();
        let mut props = props();
        props.related_links.push(LinkEntry {
            title: "鳥羽市観光協会".to_string(),
            href: "https://toba.example.org".to_string(),
        });
        let html = index_page_template(&fixture.ctx(1280), &props).into_string();
        assert!(html.contains("<h2>リンク</h2>"));
        assert!(html.contains(r#"<a href="https://toba.example.org" rel="noopener">鳥羽市観光協会</a>"#));
        let section = &html[html.find("related-links").unwrap()..];
        assert_eq!(section.matches("<li>").count(), 1);
    }

    #[test]
    fn hero_size_follows_breakpoint() {
        let fixture = Fixture::new();
        let mobile = index_page_template(&fixture.ctx(991), &props()).into_string();
        let desktop = index_page_template(&fixture.ctx(992), &props()).into_string();
        assert!(mobile.contains("height: 300px"));
        assert!(mobile.contains("width: 200px"));
        assert!(desktop.contains("height: 400px"));
        assert!(desktop.contains("width: 300px"));
        assert!(desktop.contains(r#"background-image: url(&quot;/static/hero-0badc0de.jpg&quot;)"#));
    }

    #[test]
    fn body_is_injected_unescaped() {
        let fixture = Fixture::new();
        let html = index_page_template(&fixture.ctx(1280), &props()).into_string();
        assert!(html.contains(r#"<div class="markdown-body"><p>ようこそ</p></div>"#));
    }

    #[test]
    fn cms_body_renders_markdown() {
        let fixture = Fixture::new();
        let props = IndexPageProps {
            markdown_body: "焼きたて **パン**".to_string(),
            is_cms: true,
            ..props()
        };
        let html = index_page_template(&fixture.ctx(1280), &props).into_string();
        assert!(html.contains("<strong>パン</strong>"));
    }

    #[test]
    fn latest_news_button_only_on_mobile() {
        let fixture = Fixture::new();
        assert!(fixture.config.index.facebook_page.is_none());
        let mobile = index_page_template(&fixture.ctx(375), &props()).into_string();
        let desktop = index_page_template(&fixture.ctx(1280), &props()).into_string();
        assert!(mobile.contains("最新情報"));
        assert!(!desktop.contains("latest-news"));
    }

    #[test]
    fn latest_news_defaults_to_timeline_page() {
        let fixture = Fixture::new();
        let ja = index_page_template(&fixture.ctx(375), &props()).into_string();
        let en = index_page_template(&fixture.ctx_at(375, "en", None), &props()).into_string();
        assert!(ja.contains(r#"class="button primary latest-news" href="/m/timeline/""#));
        assert!(en.contains(r#"href="/m/en/timeline/""#));
    }

    #[test]
    fn latest_news_href_is_configurable() {
        let mut fixture = Fixture::new();
        fixture.config.index.latest_news_href = Some("https://www.facebook.com/hanare".to_string());
        let html = index_page_template(&fixture.ctx(375), &props()).into_string();
        assert!(html.contains(r#"class="button primary latest-news" href="https://www.facebook.com/hanare""#));
    }

    #[test]
    fn fixed_portraits_render_when_set() {
        let fixture = Fixture::new();
        let fixed = |src: &str| {
            ImageRef::Processed(ImageDescriptor {
                src: src.to_string(),
                srcset: format!("{src} 1x"),
                width: 300,
                height: 300,
                aspect_ratio: 1.5,
                layout: ImageLayout::Fixed,
            })
        };
        let props = IndexPageProps {
            owner_image: fixed("/static/owner-1a2b3c4d.jpg"),
            sign_image: fixed("/static/sign-1a2b3c4d.jpg"),
            ..props()
        };
        let html = index_page_template(&fixture.ctx(1280), &props).into_string();
        let lead = &html[html.find("lead-text").unwrap()..html.find("services").unwrap()];
        assert!(lead.contains(r#"src="/static/owner-1a2b3c4d.jpg""#));
        let directions = &html[html.find("directions").unwrap()..];
        assert!(directions.contains(r#"src="/static/sign-1a2b3c4d.jpg""#));
        assert!(html.contains("width: 300px; height: 300px"));
    }

    #[test]
    fn portraits_omitted_when_empty() {
        let fixture = Fixture::new();
        let html = index_page_template(&fixture.ctx(1280), &props()).into_string();
        assert!(!html.contains("owner-image"));
        assert!(!html.contains("sign-image"));
    }

    #[test]
    fn timeline_sidebar_only_on_wide_viewports() {
        let mut fixture = Fixture::new();
        fixture.config.index.facebook_page = Some("https://www.facebook.com/hanare".to_string());
        let wide = index_page_template(&fixture.ctx(992), &props()).into_string();
        let narrow = index_page_template(&fixture.ctx(991), &props()).into_string();
        assert!(wide.contains("timeline-sidebar"));
        assert!(wide.contains("href=https%3A%2F%2Fwww%2Efacebook%2Ecom%2Fhanare"));
        assert!(!narrow.contains("timeline-sidebar"));
    }

    #[test]
    fn lead_text_prefers_rich_entry() {
        let fixture = Fixture::new();
        let en = index_page_template(&fixture.ctx_at(1280, "en", None), &props()).into_string();
        assert!(en.contains(r#"<a href="https://example.org/toshi">Toshi Island</a>"#));
        assert!(en.contains("<br />"));

        let ja = index_page_template(&fixture.ctx(1280), &props()).into_string();
        assert!(ja.contains(r#"<div class="segment lead-text">答志島のパン屋</div>"#));
    }

    #[test]
    fn services_are_translated() {
        let fixture = Fixture::new();
        let html = index_page_template(&fixture.ctx(1280), &props()).into_string();
        assert!(html.contains("<h2>サービス</h2>"));
        assert!(html.contains("<li>services.bakery</li>"));
    }

    #[test]
    fn empty_props_render_without_images() {
        let fixture = Fixture::new();
        let html = index_page_template(&fixture.ctx(1280), &IndexPageProps::default()).into_string();
        assert!(!html.contains("main-image"));
        assert!(!html.contains("background-image"));
        assert!(html.contains(r#"<div class="markdown-body"></div>"#));
    }
}

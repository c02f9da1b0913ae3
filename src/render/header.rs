//! Navigation pieces shared by the desktop header and the mobile panel.

use super::RenderContext;
use maud::{Markup, html};

/// Fixed top bar used by the desktop template.
pub fn app_header(ctx: &RenderContext) -> Markup {
    html! {
        header.AppHeader {
            div.container {
                nav.menu-horizontal {
                    a.menu-item.home-link href=(ctx.page_href(None)) {
                        (ctx.i18n.t("pages.home.link-label"))
                    }
                    ul.nav-items { (nav_menu_items(ctx)) }
                    div.menu-right {
                        div.menu-item { (locale_switcher(ctx)) }
                        div.menu-item { (social_buttons(ctx)) }
                    }
                }
            }
        }
    }
}

/// One `li` per navigation entry, labelled from `nav-menu-items.<slug>`.
pub fn nav_menu_items(ctx: &RenderContext) -> Markup {
    let current = ctx.route.slug.as_deref();
    html! {
        @for item in ctx.navigation {
            @let is_current = current == Some(item.slug.as_str());
            li class=[is_current.then_some("current")] {
                a href=(ctx.page_href(Some(&item.slug))) {
                    (ctx.i18n.t_or(&item.label_key(), &item.fallback_label))
                }
            }
        }
    }
}

/// Links to the current page in every configured locale.
pub fn locale_switcher(ctx: &RenderContext) -> Markup {
    let locales = &ctx.config.i18n.locales;
    html! {
        @if locales.len() > 1 {
            ul.locale-switcher {
                @for locale in locales {
                    @let is_current = locale == ctx.i18n.locale();
                    li class=[is_current.then_some("current")] {
                        a href=(ctx.route.with_locale(locale).href(ctx.config)) hreflang=(locale) lang=(locale) {
                            (ctx.i18n.t_or(&format!("languages.{locale}"), locale))
                        }
                    }
                }
            }
        }
    }
}

pub fn social_buttons(ctx: &RenderContext) -> Markup {
    html! {
        @if !ctx.config.social.is_empty() {
            ul.social-buttons {
                @for link in &ctx.config.social {
                    li {
                        a.social-button href=(link.href) target="_blank" rel="noopener" aria-label=(link.name) {
                            (link.name)
                        }
                    }
                }
            }
        }
    }
}

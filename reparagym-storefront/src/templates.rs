use askama::Template;

use crate::content::{
    Category, CtaAction, Feature, FooterGroup, NavItem, TrustStat, CATEGORIES, CTA_ACTIONS,
    FEATURES, FOOTER_GROUPS, LEGAL_LINKS, NAV_ITEMS, TRUST_STATS,
};
use crate::site::{PageMeta, SiteConfig, SITE_NAME};
use crate::views::CatalogView;

/// Chrome shared by every page: head metadata, header, footer.
#[derive(Clone)]
pub struct LayoutView {
    pub meta: PageMeta,
    pub site_name: &'static str,
    pub nav: &'static [NavItem],
    pub footer_groups: &'static [FooterGroup],
    pub legal_links: &'static [NavItem],
    pub phone: String,
    pub phone_href: String,
    pub email: String,
    pub whatsapp_number: String,
    pub year: i32,
}

impl LayoutView {
    pub fn new(site: &SiteConfig, meta: PageMeta) -> Self {
        Self {
            meta,
            site_name: SITE_NAME,
            nav: NAV_ITEMS,
            footer_groups: FOOTER_GROUPS,
            legal_links: LEGAL_LINKS,
            phone: site.phone.clone(),
            phone_href: site.phone_href(),
            email: site.email.clone(),
            whatsapp_number: site.whatsapp_number.clone(),
            year: site.year,
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: LayoutView,
    pub categories: &'static [Category],
    pub features: &'static [Feature],
    pub stats: &'static [TrustStat],
    pub actions: &'static [CtaAction],
}

impl HomeTemplate {
    pub fn new(site: &SiteConfig) -> Self {
        Self {
            layout: LayoutView::new(site, PageMeta::new(site, "/")),
            categories: CATEGORIES,
            features: FEATURES,
            stats: TRUST_STATS,
            actions: CTA_ACTIONS,
        }
    }
}

#[derive(Template)]
#[template(path = "catalog.html")]
pub struct CatalogTemplate {
    pub layout: LayoutView,
    pub category: Category,
    pub view: CatalogView,
}

impl CatalogTemplate {
    pub fn new(site: &SiteConfig, category: &Category, view: CatalogView) -> Self {
        let meta = PageMeta::new(site, &category.href())
            .with_page_title(category.name)
            .with_description(format!(
                "{}: {}. Refacciones para gimnasio con envío a todo México.",
                category.name, category.description
            ));
        Self {
            layout: LayoutView::new(site, meta),
            category: *category,
            view,
        }
    }
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub layout: LayoutView,
}

impl NotFoundTemplate {
    pub fn new(site: &SiteConfig) -> Self {
        let meta = PageMeta::new(site, "/404")
            .with_page_title("Página no encontrada")
            .noindex();
        Self {
            layout: LayoutView::new(site, meta),
        }
    }
}

//! Reparagym Storefront - Server-Rendered Pages
//!
//! Pure functions from fixed content and catalog state to HTML. Templates
//! live in `templates/` and are compiled in by askama; nothing here
//! performs I/O.

pub mod content;
pub mod site;
pub mod templates;
pub mod views;
pub mod whatsapp;

use askama::Template;

pub use content::{Category, CATEGORIES};
pub use site::{PageMeta, SiteConfig};
pub use templates::{CatalogTemplate, HomeTemplate, NotFoundTemplate};
pub use views::{CatalogView, ProductCard};
pub use whatsapp::whatsapp_link;

pub type RenderResult = Result<String, askama::Error>;

/// Landing page: hero, featured categories, selling points, contact actions.
pub fn render_home(site: &SiteConfig) -> RenderResult {
    HomeTemplate::new(site).render()
}

/// Product listing for one category.
pub fn render_catalog(site: &SiteConfig, category: &Category, view: &CatalogView) -> RenderResult {
    CatalogTemplate::new(site, category, view.clone()).render()
}

pub fn render_not_found(site: &SiteConfig) -> RenderResult {
    NotFoundTemplate::new(site).render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reparagym_client::{Product, ProductPage};
    use reparagym_core::{FetchError, Fingerprint, QueryError};

    fn site() -> SiteConfig {
        SiteConfig::default()
            .with_base_url("https://reparagymstore.com")
            .with_year(2026)
    }

    fn page() -> ProductPage {
        ProductPage {
            products: vec![Product {
                id: "prod_01".into(),
                title: "Polea de aluminio <90mm>".into(),
                handle: "polea-90".into(),
                subtitle: Some("Con balero".into()),
                description: None,
                thumbnail: Some("https://cdn.reparagymstore.com/polea.jpg".into()),
                variants: vec![],
            }],
            count: 1,
            offset: 0,
            limit: 12,
        }
    }

    #[test]
    fn test_home_page_sections() {
        let html = render_home(&site()).unwrap();
        assert!(html.contains("<title>ReparagymStore - Refacciones para Gimnasio en México</title>"));
        assert!(html.contains("href=\"https://reparagymstore.com/\""));
        assert!(html.contains("es_MX"));
        for category in CATEGORIES {
            assert!(html.contains(category.name));
            assert!(html.contains(&category.href()));
        }
        assert!(html.contains("Garantía Extendida"));
        assert!(html.contains("5,000+"));
        assert!(html.contains("Llamar Ahora"));
        assert!(html.contains("&copy; 2026 ReparagymStore"));
        assert!(html.contains("soporte@reparagymstore.com"));
    }

    #[test]
    fn test_catalog_escapes_product_text() {
        let cardio = Category::find("cardio").unwrap();
        let html = render_catalog(&site(), cardio, &CatalogView::loaded(&page())).unwrap();
        assert!(html.contains("Equipo Cardiovascular | ReparagymStore"));
        assert!(html.contains("Polea de aluminio &#60;90mm&#62;") || html.contains("Polea de aluminio &lt;90mm&gt;"));
        assert!(html.contains("Precio a consultar"));
        assert!(!html.contains("role=\"alert\""));
    }

    #[test]
    fn test_catalog_error_notice() {
        let fuerza = Category::find("fuerza").unwrap();
        let error = QueryError::FetchFailed {
            fingerprint: Fingerprint::from("cat:fuerza"),
            attempts: 4,
            source: FetchError::status(503, "down"),
        };
        let html = render_catalog(&site(), fuerza, &CatalogView::failed(&error)).unwrap();
        assert!(html.contains("role=\"alert\""));
        assert!(html.contains("no está disponible"));
    }

    #[test]
    fn test_not_found_is_noindex() {
        let html = render_not_found(&site()).unwrap();
        assert!(html.contains("noindex, nofollow"));
        assert!(html.contains("Página no encontrada"));
    }
}

//! Site-wide settings and page metadata.

use serde::Serialize;

use crate::whatsapp::{whatsapp_link, DEFAULT_MESSAGE};

pub const SITE_NAME: &str = "ReparagymStore";
pub const DEFAULT_TITLE: &str = "ReparagymStore - Refacciones para Gimnasio en México";
pub const DEFAULT_DESCRIPTION: &str = "La tienda más confiable de refacciones para equipo de gimnasio en México. Entrega rápida, partes auténticas, soporte técnico en español.";
pub const LOCALE: &str = "es_MX";

/// Settings shared by every rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteConfig {
    /// Public origin used for canonical URLs, without trailing slash.
    pub base_url: String,
    pub phone: String,
    pub whatsapp_number: String,
    pub email: String,
    /// Year printed in the footer copyright line.
    pub year: i32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            phone: "55 1234 5678".to_string(),
            whatsapp_number: "55 9876 5432".to_string(),
            email: "soporte@reparagymstore.com".to_string(),
            year: 2025,
        }
    }
}

impl SiteConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_whatsapp_number(mut self, number: impl Into<String>) -> Self {
        self.whatsapp_number = number.into();
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// Chat link with the default greeting.
    pub fn whatsapp_href(&self) -> String {
        whatsapp_link(&self.whatsapp_number, DEFAULT_MESSAGE)
    }

    /// `tel:` link for the support phone.
    pub fn phone_href(&self) -> String {
        let digits: String = self.phone.chars().filter(char::is_ascii_digit).collect();
        format!("tel:+52{digits}")
    }

    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// `<head>` metadata of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub locale: &'static str,
    pub og_image: String,
    pub indexable: bool,
}

impl PageMeta {
    pub fn new(site: &SiteConfig, path: &str) -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            canonical: site.absolute_url(path),
            locale: LOCALE,
            og_image: site.absolute_url("/og-image.jpg"),
            indexable: true,
        }
    }

    /// Title of the form `<page> | ReparagymStore`.
    pub fn with_page_title(mut self, page: &str) -> Self {
        self.title = format!("{page} | {SITE_NAME}");
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn noindex(mut self) -> Self {
        self.indexable = false;
        self
    }

    pub fn robots(&self) -> &'static str {
        if self.indexable {
            "index, follow"
        } else {
            "noindex, nofollow"
        }
    }
}

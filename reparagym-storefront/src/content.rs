//! Fixed storefront content: navigation, categories, selling points.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FooterGroup {
    pub title: &'static str,
    pub links: &'static [NavItem],
}

/// A featured product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    /// URL segment under `/productos/` and category filter for the store API.
    pub handle: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Approximate number of parts, shown on the category card.
    pub product_count: u32,
    pub color_class: &'static str,
}

impl Category {
    pub fn href(&self) -> String {
        format!("/productos/{}", self.handle)
    }

    /// Look up a featured category by its URL handle.
    pub fn find(handle: &str) -> Option<&'static Category> {
        CATEGORIES.iter().find(|category| category.handle == handle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
    pub highlight: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrustStat {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CtaAction {
    pub label: &'static str,
    pub description: &'static str,
    pub href: &'static str,
}

// ============================================================================
// NAVIGATION
// ============================================================================

pub const NAV_ITEMS: &[NavItem] = &[
    NavItem { label: "Productos", href: "/productos" },
    NavItem { label: "Marcas", href: "/marcas" },
    NavItem { label: "Soporte", href: "/soporte" },
    NavItem { label: "Contacto", href: "/contacto" },
];

pub const FOOTER_GROUPS: &[FooterGroup] = &[
    FooterGroup {
        title: "Productos",
        links: &[
            NavItem { label: "Cardio", href: "/productos/cardio" },
            NavItem { label: "Fuerza", href: "/productos/fuerza" },
            NavItem { label: "Electrónicos", href: "/productos/electronicos" },
            NavItem { label: "Cables y Herrajes", href: "/productos/cables" },
        ],
    },
    FooterGroup {
        title: "Empresa",
        links: &[
            NavItem { label: "Sobre Nosotros", href: "/sobre" },
            NavItem { label: "Soporte", href: "/soporte" },
            NavItem { label: "Contacto", href: "/contacto" },
            NavItem { label: "Aviso de Privacidad", href: "/politicas/privacidad" },
        ],
    },
    FooterGroup {
        title: "Ayuda",
        links: &[
            NavItem { label: "Envíos y Entregas", href: "/envios" },
            NavItem { label: "Devoluciones", href: "/devoluciones" },
            NavItem { label: "Garantía", href: "/garantia" },
            NavItem { label: "Preguntas Frecuentes", href: "/faq" },
        ],
    },
];

pub const LEGAL_LINKS: &[NavItem] = &[
    NavItem { label: "Términos", href: "/politicas/terminos" },
    NavItem { label: "Privacidad", href: "/politicas/privacidad" },
    NavItem { label: "Cookies", href: "/politicas/cookies" },
];

// ============================================================================
// HOME PAGE SECTIONS
// ============================================================================

pub const CATEGORIES: &[Category] = &[
    Category {
        handle: "cardio",
        name: "Equipo Cardiovascular",
        description: "Bandas, motores, consolas",
        product_count: 150,
        color_class: "bg-blue-500",
    },
    Category {
        handle: "fuerza",
        name: "Equipo de Fuerza",
        description: "Poleas, cables, pesas",
        product_count: 200,
        color_class: "bg-red-500",
    },
    Category {
        handle: "electronicos",
        name: "Electrónicos",
        description: "Tableros, sensores, controles",
        product_count: 75,
        color_class: "bg-green-500",
    },
    Category {
        handle: "cables",
        name: "Cables y Herrajes",
        description: "Cables, conectores, tornillos",
        product_count: 300,
        color_class: "bg-purple-500",
    },
];

pub const FEATURES: &[Feature] = &[
    Feature {
        title: "Entrega Rápida",
        description: "Recibe tus refacciones en todo México sin largas esperas.",
        highlight: "3-7 días",
    },
    Feature {
        title: "Partes Auténticas",
        description: "Refacciones originales y compatibles verificadas por técnicos.",
        highlight: "100% Genuinas",
    },
    Feature {
        title: "Soporte en Español",
        description: "Asesoría técnica para encontrar la pieza correcta.",
        highlight: "24/7 Disponible",
    },
    Feature {
        title: "Envío Gratis",
        description: "En pedidos mayores al monto mínimo.",
        highlight: "+$1,500 MXN",
    },
    Feature {
        title: "Garantía Extendida",
        description: "Cobertura en todas nuestras refacciones.",
        highlight: "12 Meses",
    },
    Feature {
        title: "Experiencia Comprobada",
        description: "Gimnasios de todo el país confían en nosotros.",
        highlight: "+500 Clientes",
    },
];

pub const TRUST_STATS: &[TrustStat] = &[
    TrustStat { value: "500+", label: "Gimnasios Atendidos" },
    TrustStat { value: "98%", label: "Satisfacción Cliente" },
    TrustStat { value: "5,000+", label: "Productos en Stock" },
    TrustStat { value: "24/7", label: "Soporte Técnico" },
];

pub const CTA_ACTIONS: &[CtaAction] = &[
    CtaAction {
        label: "Explorar Catálogo",
        description: "Busca entre miles de refacciones",
        href: "/productos",
    },
    CtaAction {
        label: "WhatsApp",
        description: "Ordena y cotiza por chat",
        href: "/whatsapp",
    },
    CtaAction {
        label: "Llamar Ahora",
        description: "Habla con un especialista",
        href: "/contacto",
    },
];

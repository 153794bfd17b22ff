//! Fixed vocabularies for extracted events.
//!
//! The model is told these lists verbatim, but its output is never trusted:
//! the validator re-checks every enumerated field against the same lists.

use serde::{Deserialize, Serialize};

/// Event category. Exactly one per event, required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "marketing-digital")]
    MarketingDigital,
    #[serde(rename = "vendas")]
    Vendas,
    #[serde(rename = "growth")]
    Growth,
    #[serde(rename = "branding-e-criatividade")]
    BrandingECriatividade,
    #[serde(rename = "tecnologia-e-inovacao")]
    TecnologiaEInovacao,
    #[serde(rename = "empreendedorismo")]
    Empreendedorismo,
    #[serde(rename = "comunicacao-e-midia")]
    ComunicacaoEMidia,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::MarketingDigital,
        Category::Vendas,
        Category::Growth,
        Category::BrandingECriatividade,
        Category::TecnologiaEInovacao,
        Category::Empreendedorismo,
        Category::ComunicacaoEMidia,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::MarketingDigital => "marketing-digital",
            Category::Vendas => "vendas",
            Category::Growth => "growth",
            Category::BrandingECriatividade => "branding-e-criatividade",
            Category::TecnologiaEInovacao => "tecnologia-e-inovacao",
            Category::Empreendedorismo => "empreendedorismo",
            Category::ComunicacaoEMidia => "comunicacao-e-midia",
        }
    }

    /// Exact slug match; anything else is rejected by the validator.
    pub fn parse(s: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

/// Delivery format. Defaults to `PRESENCIAL` when absent or unrecognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventFormat {
    #[serde(rename = "PRESENCIAL")]
    Presencial,
    #[serde(rename = "ONLINE")]
    Online,
    #[serde(rename = "HIBRIDO")]
    Hibrido,
}

impl EventFormat {
    pub const ALL: [EventFormat; 3] = [
        EventFormat::Presencial,
        EventFormat::Online,
        EventFormat::Hibrido,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventFormat::Presencial => "PRESENCIAL",
            EventFormat::Online => "ONLINE",
            EventFormat::Hibrido => "HIBRIDO",
        }
    }

    pub fn parse(s: &str) -> Option<EventFormat> {
        EventFormat::ALL.iter().copied().find(|f| f.as_str() == s)
    }
}

/// Pricing model for paid events. Null whenever `is_free` is true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceType {
    #[serde(rename = "a_partir_de")]
    APartirDe,
    #[serde(rename = "unico")]
    Unico,
    #[serde(rename = "nao_informado")]
    NaoInformado,
}

impl PriceType {
    pub const ALL: [PriceType; 3] = [
        PriceType::APartirDe,
        PriceType::Unico,
        PriceType::NaoInformado,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceType::APartirDe => "a_partir_de",
            PriceType::Unico => "unico",
            PriceType::NaoInformado => "nao_informado",
        }
    }

    pub fn parse(s: &str) -> Option<PriceType> {
        PriceType::ALL.iter().copied().find(|p| p.as_str() == s)
    }
}

/// Topic vocabulary. Events carry a subset; unknown slugs from the model
/// are dropped, never rejected.
pub const TOPICS: [&str; 18] = [
    "seo",
    "midia-paga",
    "social-media",
    "marketing-de-conteudo",
    "email-marketing",
    "inbound-marketing",
    "branding",
    "growth-hacking",
    "analytics-e-dados",
    "inteligencia-artificial",
    "ecommerce",
    "crm",
    "influencer-marketing",
    "ux-e-design",
    "vendas-b2b",
    "midia-programatica",
    "pr-e-comunicacao",
    "martech",
];

pub fn is_known_topic(slug: &str) -> bool {
    TOPICS.contains(&slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        for cat in Category::ALL {
            assert_eq!(Category::parse(cat.as_str()), Some(cat));
        }
        assert_eq!(Category::parse("gastronomia"), None);
        assert_eq!(Category::parse("Marketing-Digital"), None);
    }

    #[test]
    fn test_format_roundtrip() {
        for fmt in EventFormat::ALL {
            assert_eq!(EventFormat::parse(fmt.as_str()), Some(fmt));
        }
        assert_eq!(EventFormat::parse("presencial"), None);
    }

    #[test]
    fn test_price_type_roundtrip() {
        for pt in PriceType::ALL {
            assert_eq!(PriceType::parse(pt.as_str()), Some(pt));
        }
        assert_eq!(PriceType::parse("gratis"), None);
    }

    #[test]
    fn test_serde_uses_slugs() {
        let json = serde_json::to_string(&Category::MarketingDigital).unwrap();
        assert_eq!(json, "\"marketing-digital\"");
        let json = serde_json::to_string(&EventFormat::Hibrido).unwrap();
        assert_eq!(json, "\"HIBRIDO\"");
        let json = serde_json::to_string(&PriceType::APartirDe).unwrap();
        assert_eq!(json, "\"a_partir_de\"");
    }

    #[test]
    fn test_known_topics() {
        assert!(is_known_topic("seo"));
        assert!(!is_known_topic("astrologia"));
    }
}

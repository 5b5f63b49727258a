//! Selection vocabulary: languages and document types.
//!
//! Both enums are closed on purpose. The translation service only understands
//! the wire codes listed here, so an open string type would just defer the
//! failure to the server. Each value carries two spellings:
//!
//! * `code()`: the exact string sent in the multipart form field. This is
//!   the wire contract and must not be localised.
//! * `label()`: the Portuguese display name shown to the user.
//!
//! `FromStr` accepts codes case-insensitively plus short aliases (`pt-br`,
//! `it`, ...) so CLI flags stay typeable. Serde serialises to the wire code,
//! keeping `--json` output and the HTTP form in agreement.

use crate::error::TraduzoError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A translation language.
///
/// | Code | Label | Aliases |
/// |------|-------|---------|
/// | `Portuguese BR` | Português BR | `pt-br` |
/// | `Portuguese PT` | Português PT | `pt-pt` |
/// | `Spanish` | Espanhol | `es` |
/// | `Italian` | Italiano | `it` |
/// | `German` | Alemão | `de` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    PortugueseBr,
    PortuguesePt,
    Spanish,
    Italian,
    German,
}

impl Language {
    /// Every supported language, in display order.
    pub const ALL: [Language; 5] = [
        Language::PortugueseBr,
        Language::PortuguesePt,
        Language::Spanish,
        Language::Italian,
        Language::German,
    ];

    /// Wire code sent in the `sourceLanguage`/`targetLanguage` form fields.
    pub fn code(&self) -> &'static str {
        match self {
            Language::PortugueseBr => "Portuguese BR",
            Language::PortuguesePt => "Portuguese PT",
            Language::Spanish => "Spanish",
            Language::Italian => "Italian",
            Language::German => "German",
        }
    }

    /// User-facing display name.
    pub fn label(&self) -> &'static str {
        match self {
            Language::PortugueseBr => "Português BR",
            Language::PortuguesePt => "Português PT",
            Language::Spanish => "Espanhol",
            Language::Italian => "Italiano",
            Language::German => "Alemão",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = TraduzoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "portuguese br" | "português br" | "portugues br" | "pt-br" | "pt_br" | "ptbr" => {
                Ok(Language::PortugueseBr)
            }
            "portuguese pt" | "português pt" | "portugues pt" | "pt-pt" | "pt_pt" | "ptpt" => {
                Ok(Language::PortuguesePt)
            }
            "spanish" | "espanhol" | "español" | "es" => Ok(Language::Spanish),
            "italian" | "italiano" | "it" => Ok(Language::Italian),
            "german" | "alemão" | "alemao" | "de" => Ok(Language::German),
            _ => Err(TraduzoError::UnknownLanguage {
                input: s.to_string(),
            }),
        }
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// A civil-registry certificate type.
///
/// The wire codes are the Portuguese document names; the earlier Italian
/// codes (`nascita`, `matrimonio`) are still accepted as parse aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    /// Certidão de Nascimento (birth certificate).
    Nascimento,
    /// Certidão de Óbito (death certificate).
    Obito,
    /// Certidão de Casamento (marriage certificate).
    Casamento,
}

impl DocumentType {
    /// Every supported document type, in display order.
    pub const ALL: [DocumentType; 3] = [
        DocumentType::Nascimento,
        DocumentType::Obito,
        DocumentType::Casamento,
    ];

    /// Wire code sent in the `documentType` form field.
    pub fn code(&self) -> &'static str {
        match self {
            DocumentType::Nascimento => "Nascimento",
            DocumentType::Obito => "Obito",
            DocumentType::Casamento => "Casamento",
        }
    }

    /// User-facing display name.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Nascimento => "Certidão de Nascimento",
            DocumentType::Obito => "Certidão de Óbito",
            DocumentType::Casamento => "Certidão de Casamento",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DocumentType {
    type Err = TraduzoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nascimento" | "nascita" => Ok(DocumentType::Nascimento),
            "obito" | "óbito" => Ok(DocumentType::Obito),
            "casamento" | "matrimonio" => Ok(DocumentType::Casamento),
            _ => Err(TraduzoError::UnknownDocumentType {
                input: s.to_string(),
            }),
        }
    }
}

impl Serialize for DocumentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for DocumentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_codes_round_trip_through_from_str() {
        for lang in Language::ALL {
            let parsed: Language = lang.code().parse().expect("code must parse");
            assert_eq!(parsed, lang);
        }
    }

    #[test]
    fn language_aliases() {
        assert_eq!("pt-br".parse::<Language>().unwrap(), Language::PortugueseBr);
        assert_eq!("PT-BR".parse::<Language>().unwrap(), Language::PortugueseBr);
        assert_eq!("it".parse::<Language>().unwrap(), Language::Italian);
        assert_eq!("Italiano".parse::<Language>().unwrap(), Language::Italian);
        assert_eq!("alemao".parse::<Language>().unwrap(), Language::German);
        assert!("klingon".parse::<Language>().is_err());
    }

    #[test]
    fn language_display_is_wire_code() {
        assert_eq!(Language::PortugueseBr.to_string(), "Portuguese BR");
        assert_eq!(Language::Italian.to_string(), "Italian");
    }

    #[test]
    fn language_labels() {
        assert_eq!(Language::PortugueseBr.label(), "Português BR");
        assert_eq!(Language::Italian.label(), "Italiano");
        assert_eq!(Language::German.label(), "Alemão");
    }

    #[test]
    fn document_type_codes_round_trip() {
        for dt in DocumentType::ALL {
            let parsed: DocumentType = dt.code().parse().expect("code must parse");
            assert_eq!(parsed, dt);
        }
    }

    #[test]
    fn document_type_accepts_legacy_italian_codes() {
        assert_eq!(
            "nascita".parse::<DocumentType>().unwrap(),
            DocumentType::Nascimento
        );
        assert_eq!(
            "matrimonio".parse::<DocumentType>().unwrap(),
            DocumentType::Casamento
        );
        assert_eq!("óbito".parse::<DocumentType>().unwrap(), DocumentType::Obito);
        assert!("escritura".parse::<DocumentType>().is_err());
    }

    #[test]
    fn document_type_labels() {
        assert_eq!(DocumentType::Nascimento.label(), "Certidão de Nascimento");
        assert_eq!(DocumentType::Obito.label(), "Certidão de Óbito");
        assert_eq!(DocumentType::Casamento.label(), "Certidão de Casamento");
    }

    #[test]
    fn serde_uses_wire_codes() {
        let json = serde_json::to_string(&Language::PortugueseBr).unwrap();
        assert_eq!(json, "\"Portuguese BR\"");
        let back: Language = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Language::PortugueseBr);

        let json = serde_json::to_string(&DocumentType::Obito).unwrap();
        assert_eq!(json, "\"Obito\"");
        let back: DocumentType = serde_json::from_str("\"nascita\"").unwrap();
        assert_eq!(back, DocumentType::Nascimento);
    }
}

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Ticket sales platforms the site knows how to present.
///
/// Wire values are matched case-insensitively. Anything unrecognised keeps its
/// first-seen spelling in [`Platform::Other`] for display, but compares and
/// hashes case-insensitively like the known names do.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Biletix,
    Bubilet,
    Passo,
    Biletinial,
    Mobilet,
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformStyle {
    pub label: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

const FALLBACK_STYLE: PlatformStyle = PlatformStyle {
    label: "Diğer",
    color: "#6b7280",
    icon: "ticket",
};

impl Platform {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "biletix" => Self::Biletix,
            "bubilet" => Self::Bubilet,
            "passo" => Self::Passo,
            "biletinial" => Self::Biletinial,
            "mobilet" => Self::Mobilet,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Biletix => "Biletix",
            Self::Bubilet => "Bubilet",
            Self::Passo => "Passo",
            Self::Biletinial => "Biletinial",
            Self::Mobilet => "Mobilet",
            Self::Other(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    pub fn style(&self) -> PlatformStyle {
        match self {
            Self::Biletix => PlatformStyle {
                label: "Biletix",
                color: "#e4002b",
                icon: "biletix",
            },
            Self::Bubilet => PlatformStyle {
                label: "Bubilet",
                color: "#7c3aed",
                icon: "bubilet",
            },
            Self::Passo => PlatformStyle {
                label: "Passo",
                color: "#00a651",
                icon: "passo",
            },
            Self::Biletinial => PlatformStyle {
                label: "Biletinial",
                color: "#f59e0b",
                icon: "biletinial",
            },
            Self::Mobilet => PlatformStyle {
                label: "Mobilet",
                color: "#0ea5e9",
                icon: "mobilet",
            },
            Self::Other(_) => FALLBACK_STYLE,
        }
    }
}

impl PartialEq for Platform {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Other(a), Self::Other(b)) => a.to_lowercase() == b.to_lowercase(),
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }
}

impl Eq for Platform {}

impl Hash for Platform {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        if let Self::Other(name) = self {
            name.to_lowercase().hash(state);
        }
    }
}

impl From<String> for Platform {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for Platform {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.name().to_string()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

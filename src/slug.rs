use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALNUM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));
// numeric, 24-hex object id, or uuid
static TRAILING_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"-([0-9]+|[0-9a-f]{24}|[0-9a-f]{8}(?:-[0-9a-f]{4}){3}-[0-9a-f]{12})$")
        .expect("valid slug id regex")
});

const EVENT_PREFIX: &str = "etkinlik";
const ARTIST_PREFIX: &str = "sanatci";
const VENUE_PREFIX: &str = "mekan";
const CITY_PREFIX: &str = "sehir";

/// Pages the site can route to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Event { slug: String, id: Option<String> },
    Artist { slug: String },
    Venue { slug: String },
    City { city: String },
    NotFound,
}

pub fn slugify(text: &str) -> String {
    let mut transliterated = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            'ç' | 'Ç' => transliterated.push('c'),
            'ğ' | 'Ğ' => transliterated.push('g'),
            'ı' | 'I' | 'İ' => transliterated.push('i'),
            'ö' | 'Ö' => transliterated.push('o'),
            'ş' | 'Ş' => transliterated.push('s'),
            'ü' | 'Ü' => transliterated.push('u'),
            'â' | 'Â' => transliterated.push('a'),
            'î' | 'Î' => transliterated.push('i'),
            'û' | 'Û' => transliterated.push('u'),
            other => transliterated.extend(other.to_lowercase()),
        }
    }
    NON_ALNUM_RE
        .replace_all(&transliterated, "-")
        .trim_matches('-')
        .to_string()
}

pub fn event_slug(name: &str, id: &str) -> String {
    let base = slugify(name);
    if base.is_empty() {
        id.to_string()
    } else {
        format!("{base}-{id}")
    }
}

pub fn event_path(name: &str, id: &str) -> String {
    format!("/{EVENT_PREFIX}/{}", event_slug(name, id))
}

/// Extracts the event id from the tail of an event slug.
pub fn parse_event_slug(slug: &str) -> Option<String> {
    let slug = slug.trim().trim_matches('/');
    if slug.is_empty() {
        return None;
    }
    if slug.chars().all(|c| c.is_ascii_digit()) {
        return Some(slug.to_string());
    }
    TRAILING_ID_RE
        .captures(slug)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Home,
            [EVENT_PREFIX, slug] => Self::Event {
                slug: slug.to_string(),
                id: parse_event_slug(slug),
            },
            [ARTIST_PREFIX, slug] => Self::Artist {
                slug: slug.to_string(),
            },
            [VENUE_PREFIX, slug] => Self::Venue {
                slug: slug.to_string(),
            },
            [CITY_PREFIX, city] => Self::City {
                city: slugify(city),
            },
            _ => Self::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Event { slug, .. } => format!("/{EVENT_PREFIX}/{slug}"),
            Self::Artist { slug } => format!("/{ARTIST_PREFIX}/{slug}"),
            Self::Venue { slug } => format!("/{VENUE_PREFIX}/{slug}"),
            Self::City { city } => format!("/{CITY_PREFIX}/{city}"),
            Self::NotFound => "/404".to_string(),
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::platform::Platform;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub date: Option<String>, // raw timestamp, parsed by `dates::parse_timestamp`
    #[serde(default, deserialize_with = "null_as_default")]
    pub ticket_options: Vec<TicketOption>,
    pub artist: Option<Artist>,
    pub venue: Option<Venue>,
    pub min_price: Option<f64>,
    pub slug: Option<String>,
    pub city: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub slug: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub city: Option<String>,
}

/// One product sold by one platform for an event.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TicketOption {
    pub platform: Platform,
    pub platform_title: Option<String>,
    pub event_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_vip: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_dinner_included: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prices: Vec<Price>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sessions: Vec<Session>,
}

impl TicketOption {
    pub fn new(platform: impl Into<Platform>) -> Self {
        Self {
            platform: platform.into(),
            platform_title: None,
            event_url: None,
            is_vip: false,
            is_dinner_included: false,
            prices: Vec::new(),
            sessions: Vec::new(),
        }
    }

    /// Display title of the product, falling back to the platform name.
    pub fn title(&self) -> String {
        non_empty(self.platform_title.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| self.platform.name().to_string())
    }

    pub fn first_price(&self) -> Option<&Price> {
        self.prices.first()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub url: Option<String>,
    pub affiliate_url: Option<String>,
}

impl Price {
    pub fn new(price: f64) -> Self {
        Self {
            price: Some(price),
            ..Self::default()
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Missing or null dates deserialize as `None`; grouping skips them.
    #[serde(default)]
    pub session_date: Option<String>,
    pub venue_name: Option<String>,
    pub min_price: Option<f64>,
    pub performance_url: Option<String>,
    #[serde(default = "default_available", deserialize_with = "null_as_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

fn null_as_available<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Option::<bool>::deserialize(deserializer).map(|flag| flag.unwrap_or(true))
}

impl Session {
    pub fn at(session_date: impl Into<String>) -> Self {
        Self {
            session_date: Some(session_date.into()),
            venue_name: None,
            min_price: None,
            performance_url: None,
            is_available: true,
        }
    }
}

/// A platform entry inside one grouped showing.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlatformOffer {
    pub platform: Platform,
    pub title: String,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub url: Option<String>,
}

/// All platform offers for one exact showing timestamp.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupedSession {
    pub session_date: DateTime<Utc>,
    pub venue_name: Option<String>,
    pub platforms: Vec<PlatformOffer>,
}

/// One page of the event listing endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventPage {
    #[serde(default)]
    pub items: Vec<EventDetail>,
    #[serde(default)]
    pub total: usize,
    #[serde(default = "first_page")]
    pub page: usize,
    #[serde(default)]
    pub per_page: usize,
}

fn first_page() -> usize {
    1
}

// The backend sends ids as either JSON strings or integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Number(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

fn opt_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<RawId>::deserialize(deserializer).map(|raw| raw.map(String::from))
}

// The backend sends `null` for empty lists and unset flags.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

//! View-models for the event detail page.

use serde::Serialize;

use crate::dates;
use crate::models::{EventDetail, GroupedSession, PlatformOffer};
use crate::platform::PlatformStyle;
use crate::sessions::{cheapest_offer, page_min_price, SessionGrouper};
use crate::slug;

const NO_PRICE: &str = "Fiyat yok";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OfferView {
    pub platform: String,
    pub title: String,
    pub price_label: String,
    pub url: Option<String>,
    pub style: PlatformStyle,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ShowingRow {
    pub date_label: String,
    pub time_label: String,
    pub venue: Option<String>,
    pub cheapest: Option<OfferView>,
    pub offers: Vec<OfferView>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EventSummary {
    pub name: String,
    pub path: String,
    pub venue: Option<String>,
    pub min_price: Option<f64>,
    pub min_price_label: String,
    pub rows: Vec<ShowingRow>,
}

pub fn event_rows(event: &EventDetail) -> Vec<ShowingRow> {
    let grouped = SessionGrouper::for_event(event).group(&event.ticket_options);
    grouped.iter().map(showing_row).collect()
}

pub fn event_summary(event: &EventDetail) -> EventSummary {
    let grouped = SessionGrouper::for_event(event).group(&event.ticket_options);
    let min_price = page_min_price(event, &grouped);
    let path = match event.slug.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(existing) => format!("/etkinlik/{existing}"),
        None => slug::event_path(&event.name, &event.id),
    };

    EventSummary {
        name: event.name.clone(),
        path,
        venue: event.venue.as_ref().map(|v| v.name.clone()),
        min_price,
        min_price_label: price_label(min_price, None),
        rows: grouped.iter().map(showing_row).collect(),
    }
}

pub fn showing_row(group: &GroupedSession) -> ShowingRow {
    ShowingRow {
        date_label: dates::date_label(&group.session_date),
        time_label: dates::time_label(&group.session_date),
        venue: group.venue_name.clone(),
        cheapest: cheapest_offer(group).map(offer_view),
        offers: group.platforms.iter().map(offer_view).collect(),
    }
}

fn offer_view(offer: &PlatformOffer) -> OfferView {
    OfferView {
        platform: offer.platform.name().to_string(),
        title: offer.title.clone(),
        price_label: price_label(offer.price, offer.currency.as_deref()),
        url: offer.url.clone(),
        style: offer.platform.style(),
    }
}

/// `1.250 ₺`, `99,90 ₺`; other currencies keep their code.
pub fn price_label(price: Option<f64>, currency: Option<&str>) -> String {
    let Some(price) = price.filter(|p| p.is_finite()) else {
        return NO_PRICE.to_string();
    };
    let amount = turkish_amount(price);
    match currency.map(str::trim).filter(|c| !c.is_empty()) {
        None => format!("{amount} ₺"),
        Some(code) if code.eq_ignore_ascii_case("TRY") || code.eq_ignore_ascii_case("TL") => {
            format!("{amount} ₺")
        }
        Some(code) => format!("{amount} {}", code.to_uppercase()),
    }
}

fn turkish_amount(price: f64) -> String {
    // Fixed-point text keeps every finite value exact in the whole part.
    let fixed = format!("{:.2}", price.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let negative = price.is_sign_negative() && fixed.bytes().any(|b| matches!(b, b'1'..=b'9'));
    let sign = if negative { "-" } else { "" };
    if fraction == "00" {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped},{fraction}")
    }
}

//! Groups raw ticket options into per-showing offers.
//!
//! Every session of every ticket option lands in a bucket keyed by its exact
//! timestamp. Inside a bucket there is at most one offer per
//! `(platform, title)` pair; duplicates keep the strictly lower price. Options
//! without sessions fall back to the event date and their first price entry.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::dates::parse_timestamp;
use crate::models::{non_empty, EventDetail, GroupedSession, PlatformOffer, TicketOption};

/// Where offers without a price go when a bucket is sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnpricedPlacement {
    /// Unpriced offers follow every priced one.
    #[default]
    Last,
    /// Unpriced offers sort as if their price were zero.
    First,
}

#[derive(Debug, Clone)]
pub struct SessionGrouper {
    event_date: Option<DateTime<Utc>>,
    raw_event_date: Option<String>,
    unpriced: UnpricedPlacement,
}

struct Candidate<'a> {
    option: &'a TicketOption,
    price: Option<f64>,
    url: Option<String>,
}

impl SessionGrouper {
    pub fn new(event_date: Option<&str>) -> Self {
        Self {
            event_date: event_date.and_then(parse_timestamp),
            raw_event_date: event_date.map(str::to_string),
            unpriced: UnpricedPlacement::default(),
        }
    }

    pub fn for_event(event: &EventDetail) -> Self {
        Self::new(event.date.as_deref())
    }

    pub fn unpriced(mut self, placement: UnpricedPlacement) -> Self {
        self.unpriced = placement;
        self
    }

    pub fn group(&self, options: &[TicketOption]) -> Vec<GroupedSession> {
        let mut buckets: BTreeMap<DateTime<Utc>, GroupedSession> = BTreeMap::new();

        for option in options {
            let first = option.first_price();

            if !option.sessions.is_empty() {
                for session in &option.sessions {
                    let Some(key) = session.session_date.as_deref().and_then(parse_timestamp)
                    else {
                        warn!(
                            platform = %option.platform,
                            session_date = ?session.session_date,
                            "skipping session with missing or unparsable date"
                        );
                        continue;
                    };

                    let price = session.min_price.or_else(|| first.and_then(|p| p.price));
                    let url = non_empty(session.performance_url.as_deref())
                        .or_else(|| first.and_then(|p| non_empty(p.affiliate_url.as_deref())))
                        .or_else(|| first.and_then(|p| non_empty(p.url.as_deref())))
                        .or_else(|| non_empty(option.event_url.as_deref()))
                        .map(str::to_string);

                    let bucket = buckets.entry(key).or_insert_with(|| GroupedSession {
                        session_date: key,
                        venue_name: None,
                        platforms: Vec::new(),
                    });
                    if bucket.venue_name.is_none() {
                        bucket.venue_name =
                            non_empty(session.venue_name.as_deref()).map(str::to_string);
                    }
                    merge(bucket, Candidate { option, price, url });
                }
            } else if let Some(first) = first {
                let Some(key) = self.event_date else {
                    warn!(
                        platform = %option.platform,
                        event_date = ?self.raw_event_date,
                        "skipping sessionless option without a usable event date"
                    );
                    continue;
                };

                let url = non_empty(first.affiliate_url.as_deref())
                    .or_else(|| non_empty(first.url.as_deref()))
                    .or_else(|| non_empty(option.event_url.as_deref()))
                    .map(str::to_string);

                let bucket = buckets.entry(key).or_insert_with(|| GroupedSession {
                    session_date: key,
                    venue_name: None,
                    platforms: Vec::new(),
                });
                merge(
                    bucket,
                    Candidate {
                        option,
                        price: first.price,
                        url,
                    },
                );
            }
        }

        let mut grouped: Vec<GroupedSession> = buckets.into_values().collect();
        for group in &mut grouped {
            let placement = self.unpriced;
            group
                .platforms
                .sort_by(|a, b| compare_prices(a.price, b.price, placement));
        }

        debug!(
            options = options.len(),
            showings = grouped.len(),
            "grouped ticket options"
        );
        grouped
    }
}

/// Groups with the default settings.
pub fn group_sessions(options: &[TicketOption], event_date: Option<&str>) -> Vec<GroupedSession> {
    SessionGrouper::new(event_date).group(options)
}

fn merge(bucket: &mut GroupedSession, candidate: Candidate<'_>) {
    let Candidate { option, price, url } = candidate;
    let title = option.title();
    let currency = option.first_price().and_then(|p| p.currency.clone());

    let existing = bucket
        .platforms
        .iter_mut()
        .find(|entry| entry.platform == option.platform && entry.title == title);

    match existing {
        Some(entry) => {
            if let (Some(new), Some(old)) = (price, entry.price) {
                if new < old {
                    entry.price = Some(new);
                    entry.url = url;
                    entry.currency = currency;
                }
            }
        }
        None => bucket.platforms.push(PlatformOffer {
            platform: option.platform.clone(),
            title,
            price,
            currency,
            url,
        }),
    }
}

fn compare_prices(a: Option<f64>, b: Option<f64>, placement: UnpricedPlacement) -> Ordering {
    match placement {
        UnpricedPlacement::First => a.unwrap_or(0.0).total_cmp(&b.unwrap_or(0.0)),
        UnpricedPlacement::Last => match (a, b) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

/// The offer with the lowest defined price; ties go to the earlier entry.
pub fn cheapest_offer(group: &GroupedSession) -> Option<&PlatformOffer> {
    let mut best: Option<(&PlatformOffer, f64)> = None;
    for offer in &group.platforms {
        let Some(price) = offer.price else { continue };
        match best {
            Some((_, current)) if price >= current => {}
            _ => best = Some((offer, price)),
        }
    }
    best.map(|(offer, _)| offer)
}

/// Cheapest price for the whole page. The backend's own `minPrice` wins when
/// present; otherwise the cheapest offer across all showings.
pub fn page_min_price(event: &EventDetail, grouped: &[GroupedSession]) -> Option<f64> {
    if let Some(min) = event.min_price {
        return Some(min);
    }
    grouped
        .iter()
        .filter_map(cheapest_offer)
        .filter_map(|offer| offer.price)
        .min_by(|a, b| a.total_cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Price, Session};
    use crate::platform::Platform;

    fn option(platform: &str, title: Option<&str>) -> TicketOption {
        let mut option = TicketOption::new(platform);
        option.platform_title = title.map(str::to_string);
        option
    }

    fn priced_session(date: &str, price: f64) -> Session {
        Session {
            min_price: Some(price),
            ..Session::at(date)
        }
    }

    #[test]
    fn session_price_falls_back_to_first_price_entry() {
        let mut opt = option("Passo", None);
        opt.prices.push(Price::new(75.0));
        opt.sessions.push(Session::at("2025-06-01T20:00"));

        let grouped = group_sessions(&[opt], None);
        assert_eq!(grouped[0].platforms[0].price, Some(75.0));
        assert_eq!(grouped[0].platforms[0].title, "Passo");
    }

    #[test]
    fn url_priority_prefers_performance_then_affiliate_then_url_then_event() {
        let mut opt = option("Biletix", None);
        opt.event_url = Some("https://event".into());
        opt.prices.push(Price {
            price: Some(10.0),
            currency: Some("TRY".into()),
            url: Some("https://price".into()),
            affiliate_url: Some("https://affiliate".into()),
        });
        opt.sessions.push(Session {
            performance_url: Some("https://performance".into()),
            ..Session::at("2025-06-01T20:00")
        });
        opt.sessions.push(Session::at("2025-06-02T20:00"));

        let grouped = group_sessions(&[opt.clone()], None);
        assert_eq!(grouped[0].platforms[0].url.as_deref(), Some("https://performance"));
        assert_eq!(grouped[1].platforms[0].url.as_deref(), Some("https://affiliate"));

        opt.prices[0].affiliate_url = Some(String::new());
        let grouped = group_sessions(&[opt.clone()], None);
        assert_eq!(grouped[1].platforms[0].url.as_deref(), Some("https://price"));

        opt.prices.clear();
        let grouped = group_sessions(&[opt], None);
        assert_eq!(grouped[1].platforms[0].url.as_deref(), Some("https://event"));
        assert_eq!(grouped[1].platforms[0].price, None);
    }

    #[test]
    fn sessionless_option_uses_event_date_and_affiliate_url() {
        let mut opt = option("Bubilet", None);
        opt.event_url = Some("https://event".into());
        opt.prices.push(Price {
            price: Some(80.0),
            affiliate_url: Some("https://aff".into()),
            ..Price::default()
        });

        let grouped = group_sessions(&[opt], Some("2025-07-01"));
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].session_date, parse_timestamp("2025-07-01").unwrap());
        assert_eq!(grouped[0].platforms[0].url.as_deref(), Some("https://aff"));
    }

    #[test]
    fn option_without_sessions_or_prices_contributes_nothing() {
        let grouped = group_sessions(&[option("Mobilet", None)], Some("2025-07-01"));
        assert!(grouped.is_empty());
    }

    #[test]
    fn sessionless_option_without_event_date_is_skipped() {
        let mut opt = option("Bubilet", None);
        opt.prices.push(Price::new(80.0));
        assert!(group_sessions(&[opt.clone()], None).is_empty());
        assert!(group_sessions(&[opt], Some("not a date")).is_empty());
    }

    #[test]
    fn unparsable_session_is_skipped_but_siblings_survive() {
        let mut opt = option("Biletix", None);
        opt.sessions.push(priced_session("??", 10.0));
        opt.sessions.push(priced_session("2025-06-01T20:00", 20.0));

        let grouped = group_sessions(&[opt], None);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].platforms[0].price, Some(20.0));
    }

    #[test]
    fn unknown_platform_spellings_merge() {
        let mut upper = option("Kendi Sitesi", Some("Konser"));
        upper.sessions.push(priced_session("2025-06-01T20:00", 90.0));
        let mut lower = option("kendi sitesi", Some("Konser"));
        lower.sessions.push(priced_session("2025-06-01T20:00", 70.0));

        let grouped = group_sessions(&[upper, lower], None);
        assert_eq!(grouped[0].platforms.len(), 1);
        let offer = &grouped[0].platforms[0];
        assert_eq!(offer.platform.name(), "Kendi Sitesi");
        assert_eq!(offer.price, Some(70.0));
    }

    #[test]
    fn dateless_session_is_skipped_but_siblings_survive() {
        let mut opt = option("Biletix", None);
        opt.sessions.push(Session {
            session_date: None,
            ..priced_session("2025-06-01T20:00", 10.0)
        });
        opt.sessions.push(priced_session("2025-06-01T20:00", 20.0));

        let grouped = group_sessions(&[opt], Some("2025-06-01"));
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].platforms.len(), 1);
        assert_eq!(grouped[0].platforms[0].price, Some(20.0));
    }

    #[test]
    fn venue_comes_from_first_session_for_the_date() {
        let mut a = option("Biletix", None);
        a.sessions.push(Session {
            venue_name: Some("Zorlu PSM".into()),
            ..priced_session("2025-06-01T20:00", 10.0)
        });
        let mut b = option("Bubilet", None);
        b.sessions.push(Session {
            venue_name: Some("Volkswagen Arena".into()),
            ..priced_session("2025-06-01T20:00", 12.0)
        });

        let grouped = group_sessions(&[a, b], None);
        assert_eq!(grouped[0].venue_name.as_deref(), Some("Zorlu PSM"));
    }

    #[test]
    fn higher_or_equal_duplicate_does_not_overwrite() {
        let mut a = option("Biletix", Some("Konser"));
        a.sessions.push(Session {
            performance_url: Some("https://a".into()),
            ..priced_session("2025-06-01T20:00", 100.0)
        });
        let mut b = a.clone();
        b.sessions[0].min_price = Some(100.0);
        b.sessions[0].performance_url = Some("https://b".into());

        let grouped = group_sessions(&[a, b], None);
        assert_eq!(grouped[0].platforms.len(), 1);
        assert_eq!(grouped[0].platforms[0].url.as_deref(), Some("https://a"));
    }

    #[test]
    fn absent_price_never_replaces_present_one() {
        let mut a = option("Biletix", None);
        a.sessions.push(priced_session("2025-06-01T20:00", 100.0));
        let mut b = option("Biletix", None);
        b.sessions.push(Session::at("2025-06-01T20:00"));

        let grouped = group_sessions(&[a.clone(), b.clone()], None);
        assert_eq!(grouped[0].platforms[0].price, Some(100.0));

        // An unpriced entry seen first is only replaced by an explicitly lower price.
        let grouped = group_sessions(&[b, a], None);
        assert_eq!(grouped[0].platforms.len(), 1);
        assert_eq!(grouped[0].platforms[0].price, None);
    }

    #[test]
    fn unpriced_placement_controls_sort() {
        let mut priced = option("Biletix", None);
        priced.sessions.push(priced_session("2025-06-01T20:00", 50.0));
        let mut unpriced = option("Passo", None);
        unpriced.sessions.push(Session::at("2025-06-01T20:00"));
        let options = [priced, unpriced];

        let last = SessionGrouper::new(None).group(&options);
        assert_eq!(last[0].platforms[0].platform, Platform::Biletix);
        assert_eq!(last[0].platforms[1].platform, Platform::Passo);

        let first = SessionGrouper::new(None)
            .unpriced(UnpricedPlacement::First)
            .group(&options);
        assert_eq!(first[0].platforms[0].platform, Platform::Passo);
    }

    #[test]
    fn cheapest_offer_skips_unpriced_and_keeps_first_on_tie() {
        let group = GroupedSession {
            session_date: parse_timestamp("2025-06-01T20:00").unwrap(),
            venue_name: None,
            platforms: vec![
                PlatformOffer {
                    platform: Platform::Passo,
                    title: "Passo".into(),
                    price: None,
                    currency: None,
                    url: None,
                },
                PlatformOffer {
                    platform: Platform::Bubilet,
                    title: "Bubilet".into(),
                    price: Some(90.0),
                    currency: None,
                    url: None,
                },
                PlatformOffer {
                    platform: Platform::Biletix,
                    title: "Biletix".into(),
                    price: Some(90.0),
                    currency: None,
                    url: None,
                },
            ],
        };

        let cheapest = cheapest_offer(&group).unwrap();
        assert_eq!(cheapest.platform, Platform::Bubilet);
    }

    #[test]
    fn cheapest_offer_is_none_without_prices() {
        let group = GroupedSession {
            session_date: Utc::now(),
            venue_name: None,
            platforms: Vec::new(),
        };
        assert!(cheapest_offer(&group).is_none());
    }

    #[test]
    fn page_min_price_prefers_backend_value() {
        let mut a = option("Biletix", None);
        a.sessions.push(priced_session("2025-06-01T20:00", 150.0));
        let mut b = option("Bubilet", None);
        b.sessions.push(priced_session("2025-06-02T20:00", 120.0));

        let mut event = EventDetail {
            ticket_options: vec![a, b],
            ..EventDetail::default()
        };
        let grouped = SessionGrouper::for_event(&event).group(&event.ticket_options);
        assert_eq!(page_min_price(&event, &grouped), Some(120.0));

        event.min_price = Some(200.0);
        assert_eq!(page_min_price(&event, &grouped), Some(200.0));
    }
}

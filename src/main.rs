use anyhow::{anyhow, bail, Context, Result};
use tracing::info;

use ticket_scout_lib::{
    render, slug, telemetry, ApiClient, ApiConfig, ContextStore, LoadState, Loader,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ApiConfig::from_env().context("invalid configuration")?;
    telemetry::init(&config.log_level);

    let target = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: ticket-scout <event-id | event-slug>"))?;

    let context = ContextStore::load_default();
    let ui = context.read().context("reading ui context")?;
    let city = context.city_or(&config.default_city)?;
    info!(city = %city, admin = ui.is_admin(), "starting");

    let client = ApiClient::new(&config)
        .context("building api client")?
        .with_bearer(ui.admin_token);

    let loader = Loader::new();
    if target.chars().all(|c| c.is_ascii_digit()) {
        loader.run(client.event_detail(&target)).await;
    } else {
        let event_slug = target.trim_start_matches("/etkinlik/");
        if slug::parse_event_slug(event_slug).is_none() {
            bail!("no event id in {target:?}");
        }
        loader.run(client.event_by_slug(event_slug)).await;
    }

    let event = match loader.state() {
        LoadState::Success(event) => event,
        LoadState::Failed(message) => bail!("loading event failed: {message}"),
        LoadState::Idle | LoadState::Loading => bail!("event load did not complete"),
    };

    let summary = render::event_summary(&event);
    println!("{}  {}", summary.name, summary.path);
    if let Some(venue) = &summary.venue {
        println!("{venue}");
    }
    for row in &summary.rows {
        let venue = row.venue.as_deref().unwrap_or("-");
        let cheapest = row
            .cheapest
            .as_ref()
            .map(|offer| format!("{} {}", offer.platform, offer.price_label))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{} {}  {venue}  en ucuz: {cheapest}  ({} teklif)",
            row.date_label,
            row.time_label,
            row.offers.len()
        );
    }
    println!("En düşük fiyat: {}", summary.min_price_label);

    Ok(())
}

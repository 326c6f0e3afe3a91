pub mod api;
pub mod config;
pub mod context;
pub mod dates;
pub mod loader;
pub mod models;
pub mod pagination;
pub mod platform;
pub mod render;
pub mod sessions;
pub mod slug;
pub mod telemetry;
mod utils;

pub use api::{ApiClient, ApiError};
pub use config::{ApiConfig, ConfigError};
pub use context::{ContextError, ContextStore, UiContext};
pub use loader::{LoadState, Loader};
pub use models::{EventDetail, GroupedSession, PlatformOffer, Price, Session, TicketOption};
pub use platform::{Platform, PlatformStyle};
pub use sessions::{
    cheapest_offer, group_sessions, page_min_price, SessionGrouper, UnpricedPlacement,
};

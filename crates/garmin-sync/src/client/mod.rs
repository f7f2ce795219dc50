//! Garmin Connect API access: token loading and the authenticated client.

mod api;
mod tokens;

pub use api::{ApiClient, GarminApi};
pub use tokens::OAuth2Token;

//! Provider registry module.
//!
//! - `gateway` - credential-checked routing of requests to providers
//! - `normalize` - static `(provider, endpoint) -> adapter` dispatch

mod gateway;
mod normalize;

pub use gateway::{DataGateway, GatewayConfig, ProviderGateway};
pub use normalize::{adapter_for, normalize, normalize_from, AdapterKind};

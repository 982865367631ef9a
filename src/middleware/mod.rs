pub mod basic_auth;
pub mod gates;
pub mod geo_restrict;

pub use basic_auth::require_credentials;
pub use gates::{Gate, GateChain, GateError};
pub use geo_restrict::{require_country, GeoGate};

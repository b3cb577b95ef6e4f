//! BuyMyHouse: house listings and mortgage offers.

pub mod config;
pub mod error;
pub mod listings;
pub mod mortgage;
pub mod telemetry;

//! Data models shared by the fetch and animation services

pub mod chart;

pub use chart::{PriceHistory, PricePoint};

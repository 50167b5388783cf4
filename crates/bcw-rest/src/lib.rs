//! Client for the hosted backend's REST gateway (`/rest/v1/{table}`).

pub mod client;
pub mod error;
pub mod filter;

pub use client::RestClient;
pub use error::RestError;
pub use filter::Filter;

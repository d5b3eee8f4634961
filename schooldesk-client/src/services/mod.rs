//! Service seams between the grid and the network.

pub mod api;

pub use api::{ApiService, UpdateMethod};

pub mod cache;
pub mod cli;
pub mod fetch;
pub mod fetcher;
pub mod model;

mod api;
mod config;

pub use api::{Modfetch, ModfetchBuilder};
pub use fetch::Discovery;

pub mod asset_fetcher;
pub mod bootstrap;

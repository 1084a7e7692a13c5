pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod router;
pub mod service;
pub mod views;

pub use config::{AppColor, Config};
pub use error::DirectoryError;

#[cfg(test)]
mod test_support;

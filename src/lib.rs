pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod models;
pub mod session;
pub mod store;
pub mod view;

pub use config::Config;
pub use db::Database;
pub use error::{ImportError, StoreError};
pub use session::Session;

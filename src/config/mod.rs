//! Config loading.

mod load;
mod schema;

pub use load::{apply_env_overrides, config_path, load};
pub use schema::{CONFIG_FILE, Config, ConfigError};

//! Utility modules

pub mod error;
pub mod resp;

pub use error::{
    CommandError, ConfigError, ConnectionError, DiscoveryError, InventoryError, ScriptError,
};
pub use resp::{RespDecoder, RespEncoder, RespValue};

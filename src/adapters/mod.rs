//! Adapters connecting the scheduling core to the outside world.

pub mod http;
pub mod memory;
pub mod sqlite;

//! Background Tasks Module
//!
//! Contains the recurring sweep task that removes expired cache items.

mod sweep;

pub use sweep::spawn_sweep_task;

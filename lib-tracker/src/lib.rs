#![cfg_attr(not(test), no_std)]

//! Hardware independent core of the head tracker: keeps the running configuration in sync with
//! the persistent store and the host, watches the IMU connection and turns raw DMP quaternions
//! into the corrected orientation stream. Everything that touches hardware sits behind the
//! traits in [`hal`].

pub mod hal;
pub use hal::*;

pub mod error;
pub use error::*;

pub mod settings;
pub use settings::*;

pub mod store;
pub use store::*;

pub mod imu;
pub use imu::*;

pub mod orientation;
pub use orientation::*;

pub mod ticker;
pub use ticker::*;

pub mod session;
pub use session::*;

pub mod tracker;
pub use tracker::*;

#[cfg(test)]
mod tests;

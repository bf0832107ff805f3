#![cfg_attr(not(test), no_std)]

pub mod fixed_point;
pub use fixed_point::*;

pub mod quaternion;
pub use quaternion::*;

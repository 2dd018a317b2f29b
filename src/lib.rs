#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod dht22;
pub mod error;
pub mod logic;
pub mod model;
pub mod traits;

#[cfg(feature = "esp32s3")]
pub mod hardware;

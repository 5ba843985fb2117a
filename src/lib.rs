#![cfg_attr(not(test), no_std)]

mod error;

pub mod commands;
pub mod config;
pub mod conversion;
pub mod device;
pub mod drdy;
pub mod interface;
mod log;
pub mod params;
pub mod record;
pub mod registers;
pub mod verify;

pub use crate::config::{Config, VerifyPolicy};
pub use crate::device::{Ads1220, DeviceState, InitReport};
pub use crate::drdy::{DrdyProgress, DrdyTiming};
pub use crate::error::{Error, Result};
pub use crate::record::{Clock, Reading, SampleRecord, Timestamp};
pub use crate::registers::RegisterProfile;

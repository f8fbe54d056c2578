//! Control logic for a bicycle dynamo headlight with battery backup.
//!
//! The crate turns one [`SensorSnapshot`] per control cycle into:
//!
//! - an [`ErrorLevel`] from an ordered list of threshold rules ([`evaluator`]),
//! - a brightness level split over two inverted LED channels ([`brightness`]),
//! - an alarm output held for a minimum audible time ([`alarm`]),
//! - a three lamp status indicator with a shared blink phase ([`indicator`]).
//!
//! Hardware is reached only through the capability traits in [`io`], and time
//! through [`io::Clock`], so everything here runs on the host in tests.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod alarm;
pub mod averaging;
pub mod brightness;
pub mod config;
pub mod controller;
pub mod evaluator;
pub mod indicator;
pub mod io;
pub mod scaling;
pub mod snapshot;
pub mod status;

pub use config::{ConfigError, ControllerConfig};
pub use controller::{Controller, CycleOutput};
pub use evaluator::ErrorLevel;
pub use snapshot::SensorSnapshot;

//! Core library for the regional weather widget.
//!
//! This crate defines:
//! - The fixed set of locations the provider understands
//! - The provider client and its error taxonomy
//! - Presentation lookups (condition icons, light/dark styles)
//! - The fetch-and-render cycle that owns the displayed state
//!
//! It is used by `weather-cli`, but any front end that implements
//! [`DisplaySink`] can drive it.

pub mod config;
pub mod cycle;
pub mod display;
pub mod error;
pub mod location;
pub mod model;
pub mod presentation;
pub mod provider;

pub use config::Config;
pub use cycle::{FetchCycle, Trigger};
pub use display::{DisplaySink, DisplayState, DisplayUpdate};
pub use error::{ConfigError, FetchError, FetchErrorKind};
pub use location::{Location, Region};
pub use model::WeatherSnapshot;
pub use presentation::{AssetId, StyleConfig, Theme, icon_for, style_for};
pub use provider::{WeatherProvider, provider_from_config};

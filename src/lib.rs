//! obwody_rs
//!
//! Choropleth styling and interaction state for maps of Polish election
//! results. District tallies arrive as vector-tile features; this crate derives
//! the style rules a MapLibre-compatible renderer paints them with, and keeps
//! the renderer's hover/click feature state in step with the page. Pairs with
//! the `obwody` CLI.
//!
//! ### Features
//! - Stepped fill-color expressions from candidate gradients
//! - Per-winner and tie/other fill layers, or a single-candidate view
//! - Hover/click state machine over a pluggable feature-state store
//! - Legend (SVG), popup and detail-panel read models
//! - Base style augmentation with election and basemap sources
//!
//! ### Example
//! ```
//! use obwody_rs::{MapSession, MemoryFeatureStore, Registry, Settings};
//! use obwody_rs::models::District;
//! use serde_json::json;
//!
//! let registry = Registry::builtin();
//! let mut map = MapSession::new(&registry, Settings::default());
//! assert_eq!(map.layers()?.fills.len(), 4); // three winners + tie
//!
//! let mut renderer = MemoryFeatureStore::new();
//! let district = District::from_feature(&json!({"id": 1, "properties": {"nawrocki": 10}})).unwrap();
//! map.apply(
//!     &obwody_rs::MapEvent::Click { feature: district },
//!     &mut renderer,
//! )?;
//! assert!(map.interaction().detail().is_some());
//! # Ok::<(), obwody_rs::MapError>(())
//! ```

pub mod api;
pub mod color;
pub mod config;
pub mod error;
pub mod interaction;
pub mod layers;
pub mod models;
pub mod present;
pub mod results;
pub mod scale;
pub mod selection;
pub mod session;
pub mod storage;
pub mod style_doc;
pub mod styles;
pub mod viz;

pub use config::{Registry, Settings};
pub use error::MapError;
pub use interaction::{FeatureStateStore, Interaction, MemoryFeatureStore};
pub use models::{CandidateFilter, District, FeatureId};
pub use session::{MapEvent, MapSession};

//! Candidate/election registry and runtime settings.
//!
//! The registry is two read-only tables (candidates and elections) built once at
//! startup, either from the built-in configuration or from a JSON file:
//!
//! ```json
//! {
//!   "candidates": [
//!     { "id": "nawrocki", "name": "Karol Nawrocki", "color": "#0D47A1",
//!       "scale": ["#64B5F6", "#0D47A1"] },
//!     { "id": "braun", "name": "Grzegorz Braun" }
//!   ],
//!   "elections": [
//!     { "id": "pres_2025_1", "name": "Prezydent 2025 (I tura)",
//!       "candidates": ["nawrocki", "braun"], "winners": ["nawrocki"],
//!       "source_layer": "pres_2025_1" }
//!   ]
//! }
//! ```
//!
//! A candidate may give either a full `gradient` or a two-color `scale` that is
//! expanded to [`GRADIENT_COLORS`] swatches.

use crate::color::{GRADIENT_COLORS, is_hex_color, scale_colors, tie_gradient};
use crate::error::{MapError, MapResult};
use crate::models::{Candidate, Election};
use ahash::{AHashMap, AHashSet};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_TILE_SERVER_URL: &str = "OBWODY_TILE_SERVER_URL";
pub const ENV_MAPTILER_TOKEN: &str = "OBWODY_MAPTILER_TOKEN";
pub const ENV_BASE_STYLE_URL: &str = "OBWODY_BASE_STYLE_URL";

const DEFAULT_TILE_SERVER_URL: &str = "http://localhost:3000";
const DEFAULT_BASE_STYLE_URL: &str = "https://api.maptiler.com/maps/dataviz-light/style.json";

/// Candidate entry as written in a registry file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub gradient: Option<Vec<String>>,
    /// Light and dark end of the gradient, expanded on load.
    #[serde(default)]
    pub scale: Option<[String; 2]>,
    #[serde(default)]
    pub max_gradient: Option<f64>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryFile {
    pub candidates: Vec<CandidateConfig>,
    pub elections: Vec<Election>,
}

/// Read-only lookup tables for candidates and elections.
#[derive(Debug, Clone)]
pub struct Registry {
    candidates: AHashMap<String, Candidate>,
    elections: Vec<Election>,
    tie_gradient: Vec<String>,
}

fn scaled(from: &str, to: &str) -> Option<[String; 2]> {
    Some([from.to_string(), to.to_string()])
}

fn plain(id: &str, name: &str) -> CandidateConfig {
    CandidateConfig {
        id: id.into(),
        name: name.into(),
        color: None,
        gradient: None,
        scale: None,
        max_gradient: None,
        avatar_url: None,
    }
}

fn colored(id: &str, name: &str, color: &str, light: &str) -> CandidateConfig {
    CandidateConfig {
        color: Some(color.into()),
        scale: scaled(light, color),
        ..plain(id, name)
    }
}

impl Registry {
    /// Configuration of the 2025 presidential election, first round.
    pub fn builtin() -> Self {
        let candidates = vec![
            plain("bartosiewicz", "Artur Bartosiewicz"),
            plain("biejat", "Magdalena Biejat"),
            plain("braun", "Grzegorz Braun"),
            plain("holownia", "Szymon Hołownia"),
            plain("jakubiak", "Marek Jakubiak"),
            plain("maciak", "Maciej Maciak"),
            colored("mentzen", "Sławomir Mentzen", "#1A237E", "#7986CB"),
            colored("nawrocki", "Karol Nawrocki", "#0D47A1", "#64B5F6"),
            plain("senyszyn", "Joanna Senyszyn"),
            plain("stanowski", "Krzysztof Stanowski"),
            colored("trzaskowski", "Rafał Trzaskowski", "#BF360C", "#FF8A65"),
            plain("woch", "Marek Woch"),
            plain("zandberg", "Adrian Zandberg"),
        ];
        let to_vec = |ids: &[&str]| ids.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let elections = vec![Election {
            id: "pres_2025_1".into(),
            name: "Prezydent 2025 (I tura)".into(),
            candidates: to_vec(&[
                "trzaskowski",
                "nawrocki",
                "mentzen",
                "braun",
                "holownia",
                "zandberg",
                "biejat",
                "stanowski",
                "senyszyn",
                "jakubiak",
                "bartosiewicz",
                "maciak",
                "woch",
            ]),
            winners: to_vec(&["trzaskowski", "nawrocki", "mentzen"]),
            source_layer: "pres_2025_1".into(),
            tileset_id: Some("01984855-b44c-75a1-8463-876f2a7f32b3".into()),
        }];
        // The built-in tables are constants covered by tests.
        Self::from_file(RegistryFile { candidates, elections }).expect("built-in registry is valid")
    }

    pub fn from_json_str(s: &str) -> MapResult<Self> {
        let file: RegistryFile =
            serde_json::from_str(s).map_err(|e| MapError::InvalidRegistry(e.to_string()))?;
        Self::from_file(file)
    }

    /// Read and validate a registry JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading registry {}", path.display()))?;
        let reg = Self::from_json_str(&text)
            .with_context(|| format!("parsing registry {}", path.display()))?;
        log::debug!("loaded registry from {}", path.display());
        Ok(reg)
    }

    /// Explicit path if given, else the per-user config file if it exists, else built-in.
    pub fn load_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(p) = explicit {
            return Self::load(p);
        }
        match default_registry_path() {
            Some(p) if p.exists() => Self::load(p),
            _ => Ok(Self::builtin()),
        }
    }

    pub fn from_file(file: RegistryFile) -> MapResult<Self> {
        let mut candidates = AHashMap::new();
        for cfg in file.candidates {
            let candidate = expand_candidate(cfg)?;
            if candidates.contains_key(&candidate.id) {
                return Err(MapError::InvalidRegistry(format!(
                    "duplicate candidate id {}",
                    candidate.id
                )));
            }
            candidates.insert(candidate.id.clone(), candidate);
        }

        if file.elections.is_empty() {
            return Err(MapError::InvalidRegistry("no elections configured".into()));
        }
        let mut seen = AHashSet::new();
        for e in &file.elections {
            if !seen.insert(e.id.as_str()) {
                return Err(MapError::InvalidRegistry(format!("duplicate election id {}", e.id)));
            }
            if e.candidates.is_empty() {
                return Err(MapError::InvalidRegistry(format!("election {} has no candidates", e.id)));
            }
            if let Some(c) = e.candidates.iter().find(|c| !candidates.contains_key(*c)) {
                return Err(MapError::InvalidRegistry(format!(
                    "election {} references unknown candidate {}",
                    e.id, c
                )));
            }
            if let Some(w) = e.winners.iter().find(|w| !e.has_candidate(w)) {
                return Err(MapError::InvalidRegistry(format!(
                    "winner {} is not a candidate in election {}",
                    w, e.id
                )));
            }
        }

        Ok(Self {
            candidates,
            elections: file.elections,
            tie_gradient: tie_gradient(),
        })
    }

    pub fn candidate(&self, id: &str) -> Option<&Candidate> {
        self.candidates.get(id)
    }

    pub fn election(&self, id: &str) -> MapResult<&Election> {
        self.elections
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| MapError::UnknownElection(id.to_string()))
    }

    /// Elections in configuration order.
    pub fn elections(&self) -> &[Election] {
        &self.elections
    }

    pub fn default_election(&self) -> &Election {
        &self.elections[0]
    }

    pub fn tie_gradient(&self) -> &[String] {
        &self.tie_gradient
    }

    /// Candidates offered by the candidate picker: those with a gradient, in ballot order.
    pub fn selectable_candidates(&self, election: &Election) -> Vec<&Candidate> {
        election
            .candidates
            .iter()
            .filter_map(|id| self.candidate(id))
            .filter(|c| c.has_gradient())
            .collect()
    }
}

fn expand_candidate(cfg: CandidateConfig) -> MapResult<Candidate> {
    if let Some(c) = &cfg.color {
        check_color(c)?;
    }
    let gradient = match (cfg.gradient, cfg.scale) {
        (Some(g), _) => {
            if g.len() != GRADIENT_COLORS {
                return Err(MapError::InvalidRegistry(format!(
                    "candidate {} gradient has {} colors, expected {}",
                    cfg.id,
                    g.len(),
                    GRADIENT_COLORS
                )));
            }
            for c in &g {
                check_color(c)?;
            }
            Some(g)
        }
        (None, Some([from, to])) => Some(scale_colors(&from, &to, GRADIENT_COLORS)?),
        (None, None) => None,
    };
    if let Some(m) = cfg.max_gradient {
        if !(m > 0.0 && m <= 100.0) {
            return Err(MapError::InvalidRegistry(format!(
                "candidate {} max_gradient {} outside (0, 100]",
                cfg.id, m
            )));
        }
    }
    Ok(Candidate {
        id: cfg.id,
        name: cfg.name,
        color: cfg.color,
        gradient,
        max_gradient: cfg.max_gradient,
        avatar_url: cfg.avatar_url,
    })
}

fn check_color(c: &str) -> MapResult<()> {
    if is_hex_color(c) {
        Ok(())
    } else {
        Err(MapError::InvalidColor(c.to_string()))
    }
}

/// `<config dir>/obwody/registry.json`, if the platform has a config dir.
pub fn default_registry_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("obwody").join("registry.json"))
}

/// Palette entries the map layers borrow from the page theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub text_primary: String,
    pub background_paper: String,
    pub background_default: String,
    pub secondary: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text_primary: "rgba(0, 0, 0, 0.87)".into(),
            background_paper: "#FFFFFF".into(),
            background_default: "#E0E0E0".into(),
            secondary: "#424242".into(),
        }
    }
}

/// Initial camera position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
}

impl Default for MapView {
    fn default() -> Self {
        // Warsaw city centre
        Self {
            latitude: 52.2319581,
            longitude: 21.0067249,
            zoom: 15.0,
        }
    }
}

/// Runtime settings for style composition.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Base URL of the election tile server; sources are `<url>/<election id>`.
    pub tile_server_url: String,
    /// Key for basemap tiles and the base style; basemap overlays are omitted without it.
    pub maptiler_token: Option<String>,
    pub base_style_url: String,
    /// Fill opacity of districts that are neither hovered nor clicked.
    pub map_opacity: f64,
    pub initial_view: MapView,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tile_server_url: DEFAULT_TILE_SERVER_URL.into(),
            maptiler_token: None,
            base_style_url: DEFAULT_BASE_STYLE_URL.into(),
            map_opacity: 0.8,
            initial_view: MapView::default(),
            theme: Theme::default(),
        }
    }
}

impl Settings {
    /// Defaults overridden by `OBWODY_*` environment variables.
    pub fn from_env() -> Self {
        let var = |k: &str| std::env::var(k).ok().filter(|v| !v.trim().is_empty());
        let mut s = Self::default();
        if let Some(url) = var(ENV_TILE_SERVER_URL) {
            s.tile_server_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = var(ENV_BASE_STYLE_URL) {
            s.base_style_url = url;
        }
        s.maptiler_token = var(ENV_MAPTILER_TOKEN);
        s
    }
}

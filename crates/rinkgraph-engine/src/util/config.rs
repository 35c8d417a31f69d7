use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub type Rgb = [f32; 3];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub max_nodes: usize,
    pub max_roster_per_team: usize,
    pub fill_to_capacity: bool,
    pub trail_length: usize,
    pub base_size: f32,
    pub degree_size: f32,
    pub home_color: Rgb,
    pub away_color: Rgb,
    pub filler_color: Rgb,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_nodes: 1000,
            max_roster_per_team: 64,
            fill_to_capacity: true,
            trail_length: 20,
            base_size: 1.0,
            degree_size: 0.12,
            home_color: [0.35, 0.6, 1.0],
            away_color: [1.0, 0.45, 0.35],
            filler_color: [0.32, 0.35, 0.42],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub game_radius: f32,
    pub game_height_offset: f32,
    pub theme_spread: f32,
    pub team_offset: f32,
    pub period_spacing: f32,
    pub jitter: f32,
    pub initial_scatter: f32,
    /// Half extent of the cube fillers spawn in.
    pub filler_extent: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            game_radius: 60.0,
            game_height_offset: 6.0,
            theme_spread: 1.0,
            team_offset: 4.0,
            period_spacing: 3.0,
            jitter: 3.0,
            initial_scatter: 12.0,
            filler_extent: 72.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub attraction: f32,
    pub dead_zone: f32,
    pub min_separation: f32,
    pub repulsion: f32,
    pub min_distance: f32,
    pub bound: f32,
    pub boundary_strength: f32,
    pub spring_strength: f32,
    pub damping: f32,
    pub max_time_scale: f32,
    pub energy_base: f32,
    pub speed_gain: f32,
    pub connection_gain: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            attraction: 0.01,
            dead_zone: 0.5,
            min_separation: 2.0,
            repulsion: 0.05,
            min_distance: 0.1,
            bound: 90.0,
            boundary_strength: 0.05,
            spring_strength: 0.0015,
            damping: 0.8,
            max_time_scale: 3.0,
            energy_base: 0.1,
            speed_gain: 2.0,
            connection_gain: 0.12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub max_distance: f32,
    pub min_alpha: f32,
    pub visibility_threshold: f32,
    pub same_team_color: Rgb,
    pub cross_team_color: Rgb,
    pub max_segments: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            max_distance: 35.0,
            min_alpha: 0.15,
            visibility_threshold: 0.05,
            same_team_color: [0.85, 0.9, 1.0],
            cross_team_color: [1.0, 0.6, 0.2],
            max_segments: 8192,
        }
    }
}

impl ConnectionConfig {
    /// Alpha of a link at `distance`, or `None` when it is out of visual range.
    pub fn alpha_at(&self, distance: f32) -> Option<f32> {
        if !distance.is_finite() || distance >= self.max_distance {
            return None;
        }
        let raw = 1.0 - distance / self.max_distance.max(f32::EPSILON);
        if raw < self.visibility_threshold {
            return None;
        }
        Some(raw.clamp(self.min_alpha, 1.0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub initial_radius: f32,
    pub initial_theta: f32,
    pub initial_phi: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_polar: f32,
    pub max_polar: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub inertia_decay: f32,
    pub click_slop: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 2000.0,
            initial_radius: 160.0,
            initial_theta: 0.0,
            initial_phi: 1.1,
            min_radius: 10.0,
            max_radius: 600.0,
            min_polar: 0.05,
            max_polar: std::f32::consts::PI - 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            inertia_decay: 0.9,
            click_slop: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickingConfig {
    pub pick_radius: f32,
    pub hover_enabled: bool,
}

impl Default for PickingConfig {
    fn default() -> Self {
        Self {
            pick_radius: 1.5,
            hover_enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub max_labels: usize,
    pub min_degree: usize,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            max_labels: 48,
            min_degree: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub ingest: IngestConfig,
    pub layout: LayoutConfig,
    pub physics: PhysicsConfig,
    pub connections: ConnectionConfig,
    pub camera: CameraConfig,
    pub picking: PickingConfig,
    pub labels: LabelConfig,
}

fn config_file_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "rinkgraph")?;
    Some(proj.config_dir().join("engine.toml"))
}

pub fn load_or_default() -> EngineConfig {
    let Some(path) = config_file_path() else {
        return EngineConfig::default();
    };
    load_or_default_from_path(&path)
}

pub fn load_or_default_from_path(path: &Path) -> EngineConfig {
    let Ok(contents) = fs::read_to_string(path) else {
        return EngineConfig::default();
    };
    toml::from_str(&contents).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), %err, "invalid engine config, using defaults");
        EngineConfig::default()
    })
}

pub fn save(cfg: &EngineConfig) -> anyhow::Result<()> {
    let Some(path) = config_file_path() else {
        return Err(anyhow::anyhow!("no config directory available"));
    };
    save_to_path(cfg, &path)
}

pub fn save_to_path(cfg: &EngineConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    let data = toml::to_string_pretty(cfg).context("failed to serialize engine config")?;
    fs::write(path, data)
        .with_context(|| format!("failed to write engine config {}", path.display()))?;
    Ok(())
}

//! Scene manifest loading and scene-graph construction.
//!
//! The manifest is a small JSON file naming the three texture assets and the
//! foreground motion parameters. Validation is strict on load so the builder
//! and render paths can assume well-formed values without defensive branching.
//! When the manifest is missing or invalid the demo falls back to compiled-in
//! defaults and keeps running.

use glam::Vec3;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Side length of the square background plane, in world units.
pub const BACKGROUND_SIZE: f32 = 10.0;
/// Side length of the square foreground plane, in world units.
pub const FOREGROUND_SIZE: f32 = 1.0;
/// How far the foreground sits in front of the background along the camera
/// axis. Keeps the two planes out of z-fighting range and guarantees the
/// stacking order under depth testing.
pub const FOREGROUND_DEPTH_OFFSET: f32 = 0.1;
pub const FOREGROUND_OPACITY: f32 = 0.8;

#[derive(Debug, Deserialize, Clone)]
pub struct SceneManifest {
    pub version: String,
    pub textures: TexturePaths,
    /// Foreground plane opacity, in `0.0..=1.0`.
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default)]
    pub motion: MotionSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TexturePaths {
    pub paper: String,
    pub watercolor: String,
    pub alpha: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MotionSettings {
    #[serde(default = "default_scale_target")]
    pub scale_target: f32,
    #[serde(default = "default_rotation_target")]
    pub rotation_target: f32,
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default = "default_stagger_delay")]
    pub stagger_delay: f64,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            scale_target: default_scale_target(),
            rotation_target: default_rotation_target(),
            duration: default_duration(),
            stagger_delay: default_stagger_delay(),
        }
    }
}

impl Default for SceneManifest {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            textures: TexturePaths {
                paper: "assets/textures/paper.png".to_string(),
                watercolor: "assets/textures/watercolor.png".to_string(),
                alpha: "assets/textures/alpha.png".to_string(),
            },
            opacity: default_opacity(),
            motion: MotionSettings::default(),
        }
    }
}

impl SceneManifest {
    /// Load the manifest, falling back to defaults when it is absent or
    /// malformed. The demo keeps running either way.
    pub fn load_or_default(path: &Path) -> Self {
        match load_manifest_from_path(path) {
            Ok(manifest) => manifest,
            Err(err) => {
                log::warn!("Using built-in scene defaults: {err}");
                Self::default()
            }
        }
    }
}

pub fn load_manifest_from_path(path: &Path) -> Result<SceneManifest, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read scene manifest {}: {e}", path.display()))?;
    let manifest: SceneManifest = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse scene manifest {}: {e}", path.display()))?;
    validate_manifest(&manifest)?;
    Ok(manifest)
}

fn validate_manifest(manifest: &SceneManifest) -> Result<(), String> {
    if manifest.version != "0.1" {
        return Err(format!(
            "Manifest validation failed: unsupported version '{}'",
            manifest.version
        ));
    }
    for (name, path) in [
        ("paper", &manifest.textures.paper),
        ("watercolor", &manifest.textures.watercolor),
        ("alpha", &manifest.textures.alpha),
    ] {
        if path.is_empty() {
            return Err(format!(
                "Manifest validation failed: texture '{name}' has an empty path"
            ));
        }
    }
    if !(0.0..=1.0).contains(&manifest.opacity) {
        return Err(format!(
            "Manifest validation failed: opacity {} is outside 0.0..=1.0",
            manifest.opacity
        ));
    }
    let motion = &manifest.motion;
    if !(motion.duration > 0.0) {
        return Err(format!(
            "Manifest validation failed: motion duration {} must be positive",
            motion.duration
        ));
    }
    if motion.stagger_delay < 0.0 {
        return Err(format!(
            "Manifest validation failed: stagger delay {} must not be negative",
            motion.stagger_delay
        ));
    }
    if !(motion.scale_target > 0.0) || !motion.rotation_target.is_finite() {
        return Err(
            "Manifest validation failed: motion targets must be positive/finite".to_string(),
        );
    }
    Ok(())
}

const fn default_opacity() -> f32 {
    FOREGROUND_OPACITY
}

const fn default_scale_target() -> f32 {
    1.1
}

const fn default_rotation_target() -> f32 {
    0.05
}

const fn default_duration() -> f64 {
    3.0
}

const fn default_stagger_delay() -> f64 {
    2.0
}

/// Which of the demo's three assets a material slot refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetSlot {
    Paper,
    Watercolor,
    Alpha,
}

#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Material {
    pub color: AssetSlot,
    pub alpha_mask: Option<AssetSlot>,
    pub transparent: bool,
    pub opacity: f32,
}

/// A flat rectangular surface in the scene.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub width: f32,
    pub height: f32,
    pub transform: Transform,
    pub material: Material,
}

pub struct DemoScene {
    /// Background first, foreground second. Stacking does not depend on this
    /// order; the foreground's depth offset does the work.
    pub nodes: Vec<SceneNode>,
}

impl DemoScene {
    pub const BACKGROUND: usize = 0;
    pub const FOREGROUND: usize = 1;

    pub fn background(&self) -> &SceneNode {
        &self.nodes[Self::BACKGROUND]
    }

    pub fn foreground(&self) -> &SceneNode {
        &self.nodes[Self::FOREGROUND]
    }

    pub fn foreground_mut(&mut self) -> &mut SceneNode {
        &mut self.nodes[Self::FOREGROUND]
    }
}

/// Construct the two-plane scene from a validated manifest. Texture slots
/// refer to loader assets; the nodes are complete and renderable before any
/// asset finishes decoding.
pub fn build_scene(manifest: &SceneManifest) -> DemoScene {
    let background = SceneNode {
        width: BACKGROUND_SIZE,
        height: BACKGROUND_SIZE,
        transform: Transform::identity(),
        material: Material {
            color: AssetSlot::Paper,
            alpha_mask: None,
            transparent: false,
            opacity: 1.0,
        },
    };

    let mut foreground_transform = Transform::identity();
    foreground_transform.position.z = FOREGROUND_DEPTH_OFFSET;
    let foreground = SceneNode {
        width: FOREGROUND_SIZE,
        height: FOREGROUND_SIZE,
        transform: foreground_transform,
        material: Material {
            color: AssetSlot::Watercolor,
            alpha_mask: Some(AssetSlot::Alpha),
            transparent: true,
            opacity: manifest.opacity,
        },
    };

    DemoScene {
        nodes: vec![background, foreground],
    }
}

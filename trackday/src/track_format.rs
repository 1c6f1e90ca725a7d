use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TrackFile {
    #[serde(default)]
    pub metadata: TrackMetadata,
    pub boundary_posts: Vec<[f32; 2]>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TrackMetadata {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default = "default_post_radius")]
    pub post_radius: f32,
    #[serde(default = "default_start_position")]
    pub start_position: [f32; 2],
    #[serde(default)]
    pub start_heading: f32,
}

impl Default for TrackMetadata {
    fn default() -> Self {
        Self {
            name: default_name(),
            author: String::new(),
            post_radius: default_post_radius(),
            start_position: default_start_position(),
            start_heading: 0.0,
        }
    }
}

fn default_name() -> String {
    "Untitled".to_string()
}

fn default_post_radius() -> f32 {
    16.0
}

fn default_start_position() -> [f32; 2] {
    [400.0, 450.0]
}

impl TrackFile {
    /// Load a track from a TOML file.
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        toml::from_str(&text).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
    }

    /// The built-in rectangular loop with cut corners that ships as
    /// `assets/track1.toml`. One post position appears twice.
    pub fn classic_loop() -> Self {
        Self {
            metadata: TrackMetadata {
                name: "Classic Loop".to_string(),
                ..TrackMetadata::default()
            },
            boundary_posts: vec![
                [100.0, 50.0],
                [200.0, 50.0],
                [300.0, 50.0],
                [400.0, 50.0],
                [500.0, 50.0],
                [600.0, 50.0],
                [700.0, 50.0],
                [750.0, 100.0],
                [750.0, 200.0],
                [750.0, 300.0],
                [750.0, 400.0],
                [750.0, 500.0],
                [700.0, 550.0],
                [600.0, 550.0],
                [500.0, 550.0],
                [400.0, 550.0],
                [300.0, 550.0],
                [200.0, 550.0],
                [100.0, 550.0],
                [50.0, 500.0],
                [100.0, 550.0],
                [50.0, 400.0],
                [50.0, 300.0],
                [50.0, 200.0],
                [50.0, 100.0],
            ],
        }
    }

    /// Get boundary posts as Vec2 (world coordinates, no transform needed).
    pub fn boundary_posts_vec2(&self) -> Vec<Vec2> {
        self.boundary_posts
            .iter()
            .map(|&[x, y]| Vec2::new(x, y))
            .collect()
    }
}

//! Application settings types and persistence
//!
//! Settings live in a JSON file next to the binary (`d20roller.json` by
//! default). Every field is optional in the file; missing fields keep their
//! defaults.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use bevy::log::info;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::errors::SettingsError;

/// Serializable ARGB color, components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorSetting {
    #[serde(default = "default_alpha")]
    pub a: f32,
    #[serde(default)]
    pub r: f32,
    #[serde(default)]
    pub g: f32,
    #[serde(default)]
    pub b: f32,
}

fn default_alpha() -> f32 {
    1.0
}

impl Default for ColorSetting {
    fn default() -> Self {
        Self::BLACK
    }
}

impl ColorSetting {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { a: 1.0, r, g, b }
    }

    pub const fn argb(a: f32, r: f32, g: f32, b: f32) -> Self {
        Self { a, r, g, b }
    }

    pub fn to_color(&self) -> Color {
        Color::srgba(self.r, self.g, self.b, self.a)
    }

    /// 8-bit RGB channels, alpha dropped.
    pub fn to_rgb8(&self) -> [u8; 3] {
        [self.r, self.g, self.b].map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// Parse from various string formats:
    /// - "#22FF44" or "#CC22FF44" (hex, RGB or ARGB)
    /// - "A:1.0 R:0.5 G:0.3 B:0.2"
    /// - "1.0,0.5,0.3,0.2" (ARGB order) or "0.5,0.3,0.2" (RGB order)
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Some(hex) = input.strip_prefix('#') {
            Self::parse_hex(hex)
        } else if input.contains(':') {
            Self::parse_labeled(input)
        } else if input.contains(',') {
            Self::parse_csv(input)
        } else {
            None
        }
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| -> Option<f32> {
            let byte = u8::from_str_radix(hex.get(i..i + 2)?, 16).ok()?;
            Some(byte as f32 / 255.0)
        };
        match hex.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::argb(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    fn parse_labeled(input: &str) -> Option<Self> {
        let mut color = Self::BLACK;
        for part in input.split_whitespace() {
            let Some((label, value)) = part.split_once(':') else {
                continue;
            };
            let value: f32 = value.trim_end_matches(',').parse().ok()?;
            let value = value.clamp(0.0, 1.0);
            match label.to_ascii_uppercase().as_str() {
                "A" => color.a = value,
                "R" => color.r = value,
                "G" => color.g = value,
                "B" => color.b = value,
                _ => {}
            }
        }
        Some(color)
    }

    fn parse_csv(input: &str) -> Option<Self> {
        let values = input
            .split(',')
            .map(|part| part.trim().parse::<f32>().map(|v| v.clamp(0.0, 1.0)))
            .collect::<Result<Vec<_>, _>>()
            .ok()?;
        match values[..] {
            [a, r, g, b] => Some(Self::argb(a, r, g, b)),
            [r, g, b] => Some(Self::rgb(r, g, b)),
            _ => None,
        }
    }

    /// `#AARRGGBB`
    pub fn to_hex(&self) -> String {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
        format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            byte(self.a),
            byte(self.r),
            byte(self.g),
            byte(self.b)
        )
    }
}

/// Viewer settings.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollerSettings {
    /// Circumradius of the die before bevelling.
    pub die_radius: f32,
    /// How far the corners are pulled in toward the center.
    pub bevel: f32,
    /// Camera position; the camera always looks at the die at the origin.
    pub camera_position: [f32; 3],
    pub background_color: ColorSetting,
    /// Tint multiplied over the smoke texture.
    pub die_color: ColorSetting,
    pub smoke_color: ColorSetting,
    pub highlight_color: ColorSetting,
    pub wireframe_color: ColorSetting,
    /// Side length in pixels of the procedural smoke texture.
    pub texture_size: u32,
    /// Fixed seed for reproducible rolls.
    pub seed: Option<u64>,
}

impl Default for RollerSettings {
    fn default() -> Self {
        Self {
            die_radius: 1.0,
            bevel: 0.03,
            camera_position: [4.0, 4.0, 4.0],
            background_color: ColorSetting::BLACK,
            die_color: ColorSetting::argb(0.9, 1.0, 1.0, 1.0),
            smoke_color: ColorSetting::rgb(34.0 / 255.0, 1.0, 68.0 / 255.0),
            highlight_color: ColorSetting::rgb(34.0 / 255.0, 1.0, 68.0 / 255.0),
            wireframe_color: ColorSetting::argb(0.7, 0.0, 0.0, 0.0),
            texture_size: 128,
            seed: None,
        }
    }
}

impl RollerSettings {
    pub const DEFAULT_PATH: &'static str = "d20roller.json";
    const MIN_TEXTURE_SIZE: u32 = 16;
    const MAX_TEXTURE_SIZE: u32 = 1024;

    /// Load settings from a JSON file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("No settings file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let settings = serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn camera_position(&self) -> Vec3 {
        Vec3::from_array(self.camera_position)
    }

    pub fn texture_size(&self) -> u32 {
        self.texture_size
            .clamp(Self::MIN_TEXTURE_SIZE, Self::MAX_TEXTURE_SIZE)
    }
}

//! Watch face configuration.
//!
//! A static table of layout offsets and colours keyed by face shape, plus
//! the data-sync path/keys and timing bounds. Nothing here changes at
//! runtime; the simulator may load an override document at startup.

use core::time::Duration;

use embedded_graphics::pixelcolor::Rgb888;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::mode::FaceShape;

/// Core face configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceConfig {
    /// Where weather items live on the data-sync channel.
    pub sync: SyncConfig,
    /// Bound on the channel handshake before an icon fetch (milliseconds).
    pub connect_timeout_ms: u32,
    /// Interactive repaint cadence (milliseconds).
    pub update_interval_ms: u32,
    pub colors: ColorScheme,
    pub layout: LayoutTable,
}

/// Path and keys of the weather data item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    pub path: String,
    pub high_key: String,
    pub low_key: String,
    pub icon_key: String,
}

/// Colours as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub background: u32,
    pub time_text: u32,
    pub date_text: u32,
    pub temperature_text: u32,
}

/// Layout offsets per face shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutTable {
    pub round: ShapeLayout,
    pub square: ShapeLayout,
}

/// Offsets and text sizes for one face shape (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeLayout {
    pub x_offset: i32,
    pub y_offset: i32,
    pub y_offset_date: i32,
    pub y_offset_temperature: i32,
    /// Time text size; the date uses `text_size - date_size_cutoff`.
    pub text_size: u32,
    pub date_size_cutoff: u32,
    pub temperature_text_size: u32,
    /// Extra vertical inset applied on round screens.
    pub round_offset: i32,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            sync: SyncConfig {
                path: "/weather".into(),
                high_key: "high".into(),
                low_key: "low".into(),
                icon_key: "icon".into(),
            },
            connect_timeout_ms: 10_000,
            update_interval_ms: 1_000,
            colors: ColorScheme {
                background: 0x03A9F4,
                time_text: 0xFFFFFF,
                date_text: 0xB3E5FC,
                temperature_text: 0xFFFFFF,
            },
            layout: LayoutTable {
                round: ShapeLayout {
                    x_offset: 25,
                    y_offset: 90,
                    y_offset_date: 130,
                    y_offset_temperature: 180,
                    text_size: 45,
                    date_size_cutoff: 18,
                    temperature_text_size: 35,
                    round_offset: 20,
                },
                square: ShapeLayout {
                    x_offset: 15,
                    y_offset: 90,
                    y_offset_date: 130,
                    y_offset_temperature: 180,
                    text_size: 40,
                    date_size_cutoff: 15,
                    temperature_text_size: 30,
                    round_offset: 0,
                },
            },
        }
    }
}

impl FaceConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            log::warn!("Config parse error: {}", e);
            ConfigError::Parse
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would produce an unusable face.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sync.path.starts_with('/') {
            return Err(ConfigError::ValidationFailed("sync.path must start with '/'"));
        }
        let keys = [&self.sync.high_key, &self.sync.low_key, &self.sync.icon_key];
        if keys.iter().any(|k| k.is_empty()) {
            return Err(ConfigError::ValidationFailed("sync keys must be non-empty"));
        }
        if keys[0] == keys[1] || keys[0] == keys[2] || keys[1] == keys[2] {
            return Err(ConfigError::ValidationFailed("sync keys must be distinct"));
        }
        if self.connect_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("connect_timeout_ms must be > 0"));
        }
        if !(1..=60_000).contains(&self.update_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "update_interval_ms must be within 1..=60000",
            ));
        }
        for layout in [&self.layout.round, &self.layout.square] {
            if layout.x_offset < 0 || layout.round_offset < 0 {
                return Err(ConfigError::ValidationFailed("layout offsets must be >= 0"));
            }
            if layout.text_size <= layout.date_size_cutoff {
                return Err(ConfigError::ValidationFailed(
                    "text_size must exceed date_size_cutoff",
                ));
            }
            if layout.temperature_text_size == 0 {
                return Err(ConfigError::ValidationFailed(
                    "temperature_text_size must be > 0",
                ));
            }
        }
        Ok(())
    }

    pub fn layout_for(&self, shape: FaceShape) -> &ShapeLayout {
        match shape {
            FaceShape::Round => &self.layout.round,
            FaceShape::Square => &self.layout.square,
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.connect_timeout_ms))
    }
}

/// Convert `0xRRGGBB` into a drawing colour.
pub const fn rgb(hex: u32) -> Rgb888 {
    Rgb888::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

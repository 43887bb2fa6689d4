//! Data-sync items from the paired phone.
//!
//! The phone publishes a key-value [`DataMap`] under a path; the face only
//! cares about the weather path, from which it extracts the high/low
//! temperature strings and an opaque icon [`AssetRef`]. Items travel as
//! postcard-encoded [`DataEvent`]s on the simulated channel.

use std::collections::BTreeMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::SyncConfig;
use crate::error::PayloadError;

/// Opaque reference to a binary asset held by the sync channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef(String);

impl AssetRef {
    pub fn new(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for AssetRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl core::fmt::Display for AssetRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One value in a data map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataValue {
    String(String),
    Int(i64),
    Float(f64),
    Asset(AssetRef),
}

pub type DataMap = BTreeMap<String, DataValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataEventKind {
    Changed,
    Deleted,
}

/// A change notification for one data item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEvent {
    pub kind: DataEventKind,
    pub path: String,
    pub map: DataMap,
}

impl DataEvent {
    pub fn changed(path: impl Into<String>, map: DataMap) -> Self {
        Self {
            kind: DataEventKind::Changed,
            path: path.into(),
            map,
        }
    }

    /// Serialize for the wire.
    pub fn encode(&self) -> Result<Vec<u8>, PayloadError> {
        postcard::to_allocvec(self).map_err(|e| {
            warn!("DataEvent encode failed: {:?}", e);
            PayloadError::Encode
        })
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, PayloadError> {
        postcard::from_bytes(bytes).map_err(|e| {
            debug!("DataEvent decode failed: {:?}", e);
            PayloadError::Malformed
        })
    }
}

/// Weather fields extracted from a data item. Absent fields stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherPayload {
    pub high: Option<String>,
    pub low: Option<String>,
    pub icon: Option<AssetRef>,
}

impl WeatherPayload {
    /// Pull the weather keys out of `map`. Values of the wrong type are
    /// treated as absent.
    pub fn from_map(map: &DataMap, sync: &SyncConfig) -> Self {
        let string = |key: &str| match map.get(key) {
            Some(DataValue::String(s)) => Some(s.clone()),
            Some(other) => {
                warn!("Payload: key '{}' has unexpected value {:?}", key, other);
                None
            }
            None => None,
        };
        let icon = match map.get(&sync.icon_key) {
            Some(DataValue::Asset(asset)) => Some(asset.clone()),
            Some(other) => {
                warn!("Payload: icon is not an asset: {:?}", other);
                None
            }
            None => None,
        };
        Self {
            high: string(sync.high_key.as_str()),
            low: string(sync.low_key.as_str()),
            icon,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.high.is_none() && self.low.is_none() && self.icon.is_none()
    }

    /// Build the data map the phone would publish (simulator and tests).
    pub fn to_map(&self, sync: &SyncConfig) -> DataMap {
        let mut map = DataMap::new();
        if let Some(h) = &self.high {
            map.insert(sync.high_key.clone(), DataValue::String(h.clone()));
        }
        if let Some(l) = &self.low {
            map.insert(sync.low_key.clone(), DataValue::String(l.clone()));
        }
        if let Some(icon) = &self.icon {
            map.insert(sync.icon_key.clone(), DataValue::Asset(icon.clone()));
        }
        map
    }
}

/// Extract a weather payload if `event` is a change on the weather path.
pub fn extract_weather(event: &DataEvent, sync: &SyncConfig) -> Option<WeatherPayload> {
    if event.kind != DataEventKind::Changed {
        debug!("Payload: skipping {:?} on {}", event.kind, event.path);
        return None;
    }
    if event.path != sync.path {
        debug!("Payload: ignoring foreign path {}", event.path);
        return None;
    }
    Some(WeatherPayload::from_map(&event.map, sync))
}

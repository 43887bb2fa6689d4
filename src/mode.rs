//! Display, visibility and face-shape states reported by the host.

use serde::{Deserialize, Serialize};

/// Whether the face is fully interactive or in the low-power ambient mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayMode {
    #[default]
    Interactive,
    Ambient,
}

impl DisplayMode {
    pub fn from_ambient(ambient: bool) -> Self {
        if ambient { Self::Ambient } else { Self::Interactive }
    }

    pub fn is_ambient(self) -> bool {
        self == Self::Ambient
    }
}

/// Host-reported visibility of the face surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    Visible,
    #[default]
    Hidden,
}

impl Visibility {
    pub fn from_visible(visible: bool) -> Self {
        if visible { Self::Visible } else { Self::Hidden }
    }

    pub fn is_visible(self) -> bool {
        self == Self::Visible
    }
}

/// Physical screen shape, fixed for the lifetime of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceShape {
    Round,
    #[default]
    Square,
}

impl FaceShape {
    pub fn from_round(is_round: bool) -> Self {
        if is_round { Self::Round } else { Self::Square }
    }
}

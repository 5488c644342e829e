//! Binary feature maps over grid locations

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, envs::FourRoomsEnv, types::Xy};

/// Maps a location to the indices of its active binary features.
pub trait FeatureMap {
    /// Total number of features.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn features(&self, xy: Xy) -> Vec<usize>;
}

/// One feature per valid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotFeatures {
    /// Sorted valid cells
    cells: Vec<Xy>,
}

impl OneHotFeatures {
    pub fn new(env: &FourRoomsEnv) -> Self {
        let mut cells = env.valid_cells();
        cells.sort();
        Self { cells }
    }
}

impl FeatureMap for OneHotFeatures {
    fn len(&self) -> usize {
        self.cells.len()
    }

    fn features(&self, xy: Xy) -> Vec<usize> {
        self.cells
            .binary_search(&xy)
            .map(|i| vec![i])
            .unwrap_or_default()
    }
}

/// Agent-space features: the displacement to a target cell, clamped to
/// `radius` on each axis and one-hot encoded, plus an always-on bias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplacementFeatures {
    target: Xy,
    radius: i32,
}

impl DisplacementFeatures {
    pub fn new(target: Xy, radius: i32) -> Self {
        Self {
            target,
            radius: radius.max(0),
        }
    }

    pub fn target(&self) -> Xy {
        self.target
    }

    fn side(&self) -> usize {
        (2 * self.radius + 1) as usize
    }
}

impl FeatureMap for DisplacementFeatures {
    fn len(&self) -> usize {
        self.side() * self.side() + 1
    }

    fn features(&self, xy: Xy) -> Vec<usize> {
        let r = self.radius;
        let dx = (self.target.x - xy.x).clamp(-r, r) + r;
        let dy = (self.target.y - xy.y).clamp(-r, r) + r;
        let cell = dx as usize * self.side() + dy as usize;
        vec![cell, self.len() - 1]
    }
}

/// Which feature map to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureKind {
    OneHot,
    Displacement,
}

impl FeatureKind {
    const NAMES: &'static str = "onehot, displacement";

    /// Build the feature map for learning towards `target`.
    pub fn build(self, env: &FourRoomsEnv, target: Xy) -> Features {
        match self {
            FeatureKind::OneHot => Features::OneHot(OneHotFeatures::new(env)),
            FeatureKind::Displacement => {
                Features::Displacement(DisplacementFeatures::new(target, env.size() as i32 / 2))
            }
        }
    }
}

impl FromStr for FeatureKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "onehot" | "one-hot" | "tabular" => Ok(FeatureKind::OneHot),
            "displacement" | "portable" => Ok(FeatureKind::Displacement),
            _ => Err(Error::ParseFeatureSet {
                input: s.to_string(),
                expected: Self::NAMES.to_string(),
            }),
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureKind::OneHot => f.write_str("onehot"),
            FeatureKind::Displacement => f.write_str("displacement"),
        }
    }
}

/// A concrete feature map that can be stored with learned weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Features {
    OneHot(OneHotFeatures),
    Displacement(DisplacementFeatures),
}

impl FeatureMap for Features {
    fn len(&self) -> usize {
        match self {
            Features::OneHot(f) => f.len(),
            Features::Displacement(f) => f.len(),
        }
    }

    fn features(&self, xy: Xy) -> Vec<usize> {
        match self {
            Features::OneHot(f) => f.features(xy),
            Features::Displacement(f) => f.features(xy),
        }
    }
}

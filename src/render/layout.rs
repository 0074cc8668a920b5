//! Named layout strategies and their tuned parameters
//!
//! Each strategy carries fixed configuration constants; nothing here is
//! computed. Switching the active strategy re-runs it with animation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The available layout strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    /// Spacious force-directed layout, the default
    #[default]
    Force,
    /// Denser force-directed variant with randomized placement
    ForceCompact,
    /// Top-down layered tree layout
    Hierarchical,
    /// Rings around the best-connected node
    Concentric,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 4] = [
        LayoutKind::Force,
        LayoutKind::ForceCompact,
        LayoutKind::Hierarchical,
        LayoutKind::Concentric,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LayoutKind::Force => "force",
            LayoutKind::ForceCompact => "force-compact",
            LayoutKind::Hierarchical => "hierarchical",
            LayoutKind::Concentric => "concentric",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        LayoutKind::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// The tuned parameters for this strategy
    pub fn params(&self) -> LayoutParams {
        match self {
            LayoutKind::Force => LayoutParams {
                repulsion: 160.0,
                spring: 0.04,
                ideal_edge_length: 200.0,
                gravity: 0.10,
                node_separation: 20.0,
                animation_ms: 500,
                randomize: false,
            },
            LayoutKind::ForceCompact => LayoutParams {
                repulsion: 110.0,
                spring: 0.08,
                ideal_edge_length: 100.0,
                gravity: 0.25,
                node_separation: 10.0,
                animation_ms: 400,
                randomize: true,
            },
            LayoutKind::Hierarchical => LayoutParams {
                repulsion: 0.0,
                spring: 0.0,
                ideal_edge_length: 70.0,
                gravity: 0.0,
                node_separation: 130.0,
                animation_ms: 500,
                randomize: false,
            },
            LayoutKind::Concentric => LayoutParams {
                repulsion: 0.0,
                spring: 0.0,
                ideal_edge_length: 90.0,
                gravity: 0.0,
                node_separation: 10.0,
                animation_ms: 300,
                randomize: false,
            },
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Configuration constants for one layout strategy. For the force
/// variants the first four drive the simulation; for the deterministic
/// strategies `ideal_edge_length` is the layer/ring gap and
/// `node_separation` the in-layer spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub repulsion: f32,
    pub spring: f32,
    pub ideal_edge_length: f32,
    pub gravity: f32,
    pub node_separation: f32,
    pub animation_ms: u32,
    pub randomize: bool,
}

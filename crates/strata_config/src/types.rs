//! Configuration types deserialized from `strata.toml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default resource units per unit of module edge length.
pub const DEFAULT_RESOURCE_PER_LEN: i64 = 10_000;

/// Default resource units consumed by one pin.
pub const DEFAULT_PIN_RESOURCE: i64 = 1;

/// The top-level configuration parsed from `strata.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StrataConfig {
    /// Settings applied to every circuit.
    #[serde(default)]
    pub floorplan: FloorplanSettings,
    /// Per-circuit overrides keyed by circuit name.
    #[serde(default)]
    pub circuits: BTreeMap<String, CircuitOverride>,
}

/// Settings for one floorplan solve.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FloorplanSettings {
    /// Resource units a module edge offers per unit of its length.
    pub resource_per_len: i64,
    /// Resource units a single pin consumes on the side it is assigned to.
    pub pin_resource: i64,
    /// Which vertical ordering edges the sweep line emits.
    pub edge_policy: EdgePolicy,
    /// Objective weights.
    pub weights: ObjectiveWeights,
}

impl Default for FloorplanSettings {
    fn default() -> Self {
        Self {
            resource_per_len: DEFAULT_RESOURCE_PER_LEN,
            pin_resource: DEFAULT_PIN_RESOURCE,
            edge_policy: EdgePolicy::default(),
            weights: ObjectiveWeights::default(),
        }
    }
}

/// Edge-set policy for the vertical constraint graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Emit an edge for every pair of horizontally overlapping modules (default).
    #[default]
    AllOverlaps,
    /// Drop every edge already implied by a longer chain of edges.
    TransitiveReduction,
}

/// Weights of the linear objective.
///
/// The defaults rank total height over resource overflow over pin-pair
/// crossings, with a small compaction term below all three.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObjectiveWeights {
    /// Weight of the floorplan's total height.
    pub height: f64,
    /// Weight of one pin's worth of resource overflow.
    pub resource: f64,
    /// Weight of one same-net pin pair split across sides.
    pub crossing: f64,
    /// Weight of the sum of module lower-y positions.
    pub compaction: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            height: 1000.0,
            resource: 10.0,
            crossing: 1.0,
            compaction: 0.001,
        }
    }
}

/// Per-circuit overrides. Absent fields inherit the global [`FloorplanSettings`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CircuitOverride {
    /// Overrides [`FloorplanSettings::resource_per_len`].
    pub resource_per_len: Option<i64>,
    /// Overrides [`FloorplanSettings::pin_resource`].
    pub pin_resource: Option<i64>,
    /// Overrides [`FloorplanSettings::edge_policy`].
    pub edge_policy: Option<EdgePolicy>,
    /// Overrides individual objective weights.
    #[serde(default)]
    pub weights: WeightOverride,
}

/// Individually overridable objective weights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct WeightOverride {
    /// Overrides [`ObjectiveWeights::height`].
    pub height: Option<f64>,
    /// Overrides [`ObjectiveWeights::resource`].
    pub resource: Option<f64>,
    /// Overrides [`ObjectiveWeights::crossing`].
    pub crossing: Option<f64>,
    /// Overrides [`ObjectiveWeights::compaction`].
    pub compaction: Option<f64>,
}

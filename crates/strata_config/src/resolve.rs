//! Circuit resolution: merging global and circuit-specific settings.

use crate::types::{CircuitOverride, FloorplanSettings, ObjectiveWeights, StrataConfig};

/// Resolves the settings for a named circuit.
///
/// Global settings form the base and the circuit's override, if any, is laid
/// on top field by field. A circuit without an override gets the global
/// settings unchanged.
pub fn resolve_circuit(config: &StrataConfig, circuit_name: &str) -> FloorplanSettings {
    match config.circuits.get(circuit_name) {
        Some(overlay) => apply_override(&config.floorplan, overlay),
        None => config.floorplan.clone(),
    }
}

/// Applies one override block on top of a base settings block.
pub(crate) fn apply_override(
    base: &FloorplanSettings,
    overlay: &CircuitOverride,
) -> FloorplanSettings {
    let w = &overlay.weights;
    FloorplanSettings {
        resource_per_len: overlay.resource_per_len.unwrap_or(base.resource_per_len),
        pin_resource: overlay.pin_resource.unwrap_or(base.pin_resource),
        edge_policy: overlay.edge_policy.unwrap_or(base.edge_policy),
        weights: ObjectiveWeights {
            height: w.height.unwrap_or(base.weights.height),
            resource: w.resource.unwrap_or(base.weights.resource),
            crossing: w.crossing.unwrap_or(base.weights.crossing),
            compaction: w.compaction.unwrap_or(base.weights.compaction),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;
    use crate::types::EdgePolicy;

    #[test]
    fn unknown_circuit_gets_global_settings() {
        let toml = r#"
[floorplan]
resource_per_len = 4000
"#;
        let config = load_config_from_str(toml).unwrap();
        let resolved = resolve_circuit(&config, "not_listed");
        assert_eq!(resolved, config.floorplan);
    }

    #[test]
    fn override_merges_field_by_field() {
        let toml = r#"
[floorplan]
resource_per_len = 4000
pin_resource = 3

[floorplan.weights]
crossing = 2.0

[circuits.ldo]
pin_resource = 5
edge_policy = "transitive_reduction"

[circuits.ldo.weights]
resource = 50.0
"#;
        let config = load_config_from_str(toml).unwrap();
        let resolved = resolve_circuit(&config, "ldo");

        // Inherited from the global section
        assert_eq!(resolved.resource_per_len, 4000);
        assert_eq!(resolved.weights.crossing, 2.0);
        // Overridden by the circuit section
        assert_eq!(resolved.pin_resource, 5);
        assert_eq!(resolved.edge_policy, EdgePolicy::TransitiveReduction);
        assert_eq!(resolved.weights.resource, 50.0);
    }
}

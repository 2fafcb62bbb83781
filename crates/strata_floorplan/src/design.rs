//! Boundary to the design database.
//!
//! The floorplanner reads circuits through the narrow [`DesignSource`] trait
//! and writes solved pin sides and module heights back through
//! [`DesignSink`]. [`Design`] is an in-memory, serde-serializable
//! implementation of both, used by the CLI and by tests.

use crate::error::FloorplanError;
use crate::geom::Rect;
use crate::problem::PinSide;
use crate::result::{FloorplanResult, PinRecord};
use serde::{Deserialize, Serialize};

/// A module of a circuit as stored in the design database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDef {
    /// Instance name, unique within the circuit.
    pub name: String,
    /// Layout footprint with its fixed horizontal placement.
    pub bbox: Rect,
    /// Height planned by the floorplanner, once applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_height: Option<i64>,
    /// Lower y planned by the floorplanner, once applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_y_lo: Option<i64>,
}

/// A module pin as stored in the design database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinDef {
    /// Pin name, unique within its module.
    pub name: String,
    /// Index of the owning module in the circuit's module list.
    pub module: u32,
    /// Pin footprint in the circuit's layout coordinates.
    pub bbox: Rect,
    /// Whether the pin needs a left/right side assignment.
    #[serde(default = "default_assignable")]
    pub assignable: bool,
    /// Side chosen by the floorplanner, once applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<PinSide>,
}

fn default_assignable() -> bool {
    true
}

/// A net as stored in the design database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetDef {
    /// Net name.
    pub name: String,
    /// Indices into the circuit's pin list.
    pub pins: Vec<u32>,
}

/// One circuit of the design: the modules to stack and their connectivity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitDef {
    /// Circuit name.
    pub name: String,
    /// Modules of the circuit.
    #[serde(default)]
    pub modules: Vec<ModuleDef>,
    /// Pins of all modules.
    #[serde(default)]
    pub pins: Vec<PinDef>,
    /// Nets connecting the pins.
    #[serde(default)]
    pub nets: Vec<NetDef>,
}

/// Read-only view of a design database.
pub trait DesignSource {
    /// Number of circuits.
    fn circuit_count(&self) -> usize;
    /// Name of a circuit, or `None` if the index is out of range.
    fn circuit_name(&self, circuit: usize) -> Option<&str>;
    /// Modules of a circuit. Empty for unknown circuits.
    fn modules(&self, circuit: usize) -> &[ModuleDef];
    /// Pins of a circuit. Empty for unknown circuits.
    fn pins(&self, circuit: usize) -> &[PinDef];
    /// Nets of a circuit. Empty for unknown circuits.
    fn nets(&self, circuit: usize) -> &[NetDef];

    /// Finds a circuit index by name.
    fn find_circuit(&self, name: &str) -> Option<usize> {
        (0..self.circuit_count()).find(|&c| self.circuit_name(c) == Some(name))
    }
}

/// Write access used to store a solved floorplan back into the design.
///
/// Each setter returns `false` if the named object does not exist.
pub trait DesignSink {
    /// Records the side of a module pin.
    fn set_pin_side(&mut self, circuit: usize, module: &str, pin: &str, side: PinSide) -> bool;
    /// Records the planned height of a module.
    fn set_module_height(&mut self, circuit: usize, module: &str, height: i64) -> bool;
    /// Records the planned lower y of a module.
    fn set_module_y_lo(&mut self, circuit: usize, module: &str, y_lo: i64) -> bool;
}

/// An in-memory design database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Design {
    /// All circuits.
    pub circuits: Vec<CircuitDef>,
}

impl Design {
    /// Creates an empty design.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a circuit and returns its index.
    pub fn add_circuit(&mut self, circuit: CircuitDef) -> usize {
        self.circuits.push(circuit);
        self.circuits.len() - 1
    }

    fn module_mut(&mut self, circuit: usize, module: &str) -> Option<&mut ModuleDef> {
        self.circuits
            .get_mut(circuit)?
            .modules
            .iter_mut()
            .find(|m| m.name == module)
    }
}

impl DesignSource for Design {
    fn circuit_count(&self) -> usize {
        self.circuits.len()
    }

    fn circuit_name(&self, circuit: usize) -> Option<&str> {
        self.circuits.get(circuit).map(|c| c.name.as_str())
    }

    fn modules(&self, circuit: usize) -> &[ModuleDef] {
        self.circuits
            .get(circuit)
            .map(|c| c.modules.as_slice())
            .unwrap_or_default()
    }

    fn pins(&self, circuit: usize) -> &[PinDef] {
        self.circuits
            .get(circuit)
            .map(|c| c.pins.as_slice())
            .unwrap_or_default()
    }

    fn nets(&self, circuit: usize) -> &[NetDef] {
        self.circuits
            .get(circuit)
            .map(|c| c.nets.as_slice())
            .unwrap_or_default()
    }
}

impl DesignSink for Design {
    fn set_pin_side(&mut self, circuit: usize, module: &str, pin: &str, side: PinSide) -> bool {
        let Some(ckt) = self.circuits.get_mut(circuit) else {
            return false;
        };
        let Some(module_idx) = ckt.modules.iter().position(|m| m.name == module) else {
            return false;
        };
        match ckt
            .pins
            .iter_mut()
            .find(|p| p.module as usize == module_idx && p.name == pin)
        {
            Some(p) => {
                p.side = Some(side);
                true
            }
            None => false,
        }
    }

    fn set_module_height(&mut self, circuit: usize, module: &str, height: i64) -> bool {
        match self.module_mut(circuit, module) {
            Some(m) => {
                m.planned_height = Some(height);
                true
            }
            None => false,
        }
    }

    fn set_module_y_lo(&mut self, circuit: usize, module: &str, y_lo: i64) -> bool {
        match self.module_mut(circuit, module) {
            Some(m) => {
                m.planned_y_lo = Some(y_lo);
                true
            }
            None => false,
        }
    }
}

/// Writes a solved floorplan back into the design for one circuit.
///
/// Fails with [`FloorplanError::EmptyResult`] if `result` was never
/// populated, and checks that every module and pin named by the result
/// exists in the target circuit before anything is written, so a failed
/// apply leaves the design untouched.
pub fn apply_fp_solution<D>(
    result: &FloorplanResult,
    design: &mut D,
    circuit: usize,
) -> Result<(), FloorplanError>
where
    D: DesignSource + DesignSink,
{
    let Some(result_circuit) = result.circuit() else {
        return Err(FloorplanError::EmptyResult);
    };
    let design_circuit = design
        .circuit_name(circuit)
        .ok_or(FloorplanError::UnknownCircuit(circuit))?;
    if design_circuit != result_circuit {
        return Err(FloorplanError::CircuitMismatch {
            result: result_circuit.to_string(),
            design: design_circuit.to_string(),
        });
    }

    verify_targets(result, &*design, circuit)?;

    for record in result.modules() {
        design.set_module_height(circuit, &record.name, record.height);
        design.set_module_y_lo(circuit, &record.name, record.y_lo);
    }
    for pin in result.pins() {
        if pin.side == PinSide::Undefined {
            continue;
        }
        let module = module_of(result, pin, design.circuit_name(circuit))?;
        design.set_pin_side(circuit, module, &pin.name, pin.side);
    }
    Ok(())
}

/// Name of the module owning `pin`, checked against the result's modules.
fn module_of<'a>(
    result: &'a FloorplanResult,
    pin: &PinRecord,
    circuit: Option<&str>,
) -> Result<&'a str, FloorplanError> {
    result
        .module_record(pin.module)
        .map(|m| m.name.as_str())
        .ok_or_else(|| FloorplanError::UnknownDesignObject {
            what: "module",
            name: format!("#{} (owner of pin {})", pin.module.index(), pin.name),
            circuit: circuit.unwrap_or_default().to_string(),
        })
}

fn verify_targets<D: DesignSource>(
    result: &FloorplanResult,
    design: &D,
    circuit: usize,
) -> Result<(), FloorplanError> {
    let circuit_name = design.circuit_name(circuit).unwrap_or_default().to_string();
    let modules = design.modules(circuit);
    let module_index = |name: &str| modules.iter().position(|m| m.name == name);

    for record in result.modules() {
        if module_index(&record.name).is_none() {
            return Err(FloorplanError::UnknownDesignObject {
                what: "module",
                name: record.name.clone(),
                circuit: circuit_name,
            });
        }
    }
    for pin in result.pins() {
        if pin.side == PinSide::Undefined {
            continue;
        }
        let module_name = module_of(result, pin, Some(&circuit_name))?;
        let found = module_index(module_name).is_some_and(|idx| {
            design
                .pins(circuit)
                .iter()
                .any(|p| p.module as usize == idx && p.name == pin.name)
        });
        if !found {
            return Err(FloorplanError::UnknownDesignObject {
                what: "pin",
                name: pin.name.clone(),
                circuit: circuit_name,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_design() -> Design {
        let mut design = Design::new();
        design.add_circuit(CircuitDef {
            name: "top".into(),
            modules: vec![ModuleDef {
                name: "ota".into(),
                bbox: Rect::new(0, 0, 10, 4),
                planned_height: None,
                planned_y_lo: None,
            }],
            pins: vec![PinDef {
                name: "VOUT".into(),
                module: 0,
                bbox: Rect::new(9, 1, 10, 2),
                assignable: true,
                side: None,
            }],
            nets: vec![],
        });
        design
    }

    #[test]
    fn source_accessors() {
        let design = small_design();
        assert_eq!(design.circuit_count(), 1);
        assert_eq!(design.circuit_name(0), Some("top"));
        assert_eq!(design.circuit_name(1), None);
        assert_eq!(design.modules(0).len(), 1);
        assert!(design.modules(5).is_empty());
        assert_eq!(design.find_circuit("top"), Some(0));
        assert_eq!(design.find_circuit("nope"), None);
    }

    #[test]
    fn sink_setters_report_missing_objects() {
        let mut design = small_design();
        assert!(design.set_pin_side(0, "ota", "VOUT", PinSide::Right));
        assert_eq!(design.circuits[0].pins[0].side, Some(PinSide::Right));
        assert!(!design.set_pin_side(0, "ota", "VINP", PinSide::Left));
        assert!(!design.set_pin_side(0, "bias", "VOUT", PinSide::Left));
        assert!(design.set_module_height(0, "ota", 6));
        assert_eq!(design.circuits[0].modules[0].planned_height, Some(6));
        assert!(!design.set_module_y_lo(3, "ota", 0));
    }

    #[test]
    fn apply_empty_result_is_detectable_failure() {
        let mut design = small_design();
        let before = design.clone();
        let err = apply_fp_solution(&FloorplanResult::default(), &mut design, 0).unwrap_err();
        assert!(matches!(err, FloorplanError::EmptyResult));
        assert_eq!(design, before);
    }

    #[test]
    fn apply_rejects_pin_owned_by_missing_module() {
        let json = r#"{
            "circuit": "top",
            "modules": [{"name": "ota", "height": 4, "y_lo": 0}],
            "pins": [{
                "module": 7,
                "name": "VOUT",
                "side": "right",
                "external_bbox": {"x_lo": 0, "y_lo": 0, "x_hi": 0, "y_hi": 0}
            }],
            "total_height": 4,
            "objective": 4000.0
        }"#;
        let result: FloorplanResult = serde_json::from_str(json).unwrap();
        let mut design = small_design();
        let before = design.clone();
        let err = apply_fp_solution(&result, &mut design, 0).unwrap_err();
        assert!(
            matches!(err, FloorplanError::UnknownDesignObject { what: "module", .. }),
            "got {err:?}"
        );
        assert_eq!(design, before);
    }

    #[test]
    fn assignable_defaults_to_true_in_json() {
        let json = r#"{"name":"A","module":0,"bbox":{"x_lo":0,"y_lo":0,"x_hi":1,"y_hi":1}}"#;
        let pin: PinDef = serde_json::from_str(json).unwrap();
        assert!(pin.assignable);
        assert!(pin.side.is_none());
    }
}

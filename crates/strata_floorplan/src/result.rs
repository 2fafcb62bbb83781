//! The solved floorplan.
//!
//! A [`FloorplanResult`] starts empty and is filled exactly once by
//! [`IlpFloorplan::write_out`](crate::ilp::IlpFloorplan::write_out). After
//! that it is read-only. Lookup misses return the sentinel values design
//! databases expect (`-1`, [`Rect::INVALID`]); the `Option` accessors are the
//! typed equivalents.

use crate::error::FloorplanError;
use crate::geom::Rect;
use crate::ids::ModuleId;
use crate::problem::PinSide;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Solved placement of one module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
    /// Module name.
    pub name: String,
    /// Solved height.
    pub height: i64,
    /// Solved lower y.
    pub y_lo: i64,
}

/// Solved side of one classified pin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinRecord {
    /// Owning module, an index into [`FloorplanResult::modules`].
    pub module: ModuleId,
    /// Pin name.
    pub name: String,
    /// Chosen side.
    pub side: PinSide,
    /// Box of the other pins on the pin's net at their solved locations.
    pub external_bbox: Rect,
}

/// Read-only result of a floorplan solve.
///
/// The lookup indices are not serialized. Deserializing rebuilds them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "ResultData")]
pub struct FloorplanResult {
    circuit: Option<String>,
    modules: Vec<ModuleRecord>,
    pins: Vec<PinRecord>,
    total_height: i64,
    objective: f64,
    /// Auxiliary index: module name to position (rebuilt on deserialization).
    #[serde(skip)]
    module_by_name: HashMap<String, ModuleId>,
    /// Auxiliary index: (module, pin name) to position in `pins`.
    #[serde(skip)]
    pin_by_key: HashMap<(ModuleId, String), usize>,
    /// Auxiliary index: bare pin name to its lowest position in `pins`.
    #[serde(skip)]
    pin_by_name: HashMap<String, usize>,
}

/// Serialized fields of a [`FloorplanResult`], without its indices.
#[derive(Deserialize)]
struct ResultData {
    circuit: Option<String>,
    modules: Vec<ModuleRecord>,
    pins: Vec<PinRecord>,
    total_height: i64,
    objective: f64,
}

impl From<ResultData> for FloorplanResult {
    fn from(data: ResultData) -> Self {
        let mut result = FloorplanResult {
            circuit: data.circuit,
            modules: data.modules,
            pins: data.pins,
            total_height: data.total_height,
            objective: data.objective,
            ..FloorplanResult::default()
        };
        result.rebuild_indices();
        result
    }
}

impl FloorplanResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills the result. Fails if it is already populated.
    pub(crate) fn populate(
        &mut self,
        circuit: String,
        modules: Vec<ModuleRecord>,
        pins: Vec<PinRecord>,
        total_height: i64,
        objective: f64,
    ) -> Result<(), FloorplanError> {
        if self.is_populated() {
            return Err(FloorplanError::ResultAlreadyWritten);
        }
        *self = FloorplanResult {
            circuit: Some(circuit),
            modules,
            pins,
            total_height,
            objective,
            ..FloorplanResult::default()
        };
        self.rebuild_indices();
        Ok(())
    }

    fn rebuild_indices(&mut self) {
        self.module_by_name.clear();
        for (i, module) in self.modules.iter().enumerate() {
            self.module_by_name
                .insert(module.name.clone(), ModuleId::from_index(i));
        }
        self.pin_by_key.clear();
        self.pin_by_name.clear();
        for (i, pin) in self.pins.iter().enumerate() {
            self.pin_by_key.insert((pin.module, pin.name.clone()), i);
            self.pin_by_name.entry(pin.name.clone()).or_insert(i);
        }
    }

    /// Returns `true` once a solve has been written into this result.
    pub fn is_populated(&self) -> bool {
        self.circuit.is_some()
    }

    /// Circuit the result was solved for, or `None` if empty.
    pub fn circuit(&self) -> Option<&str> {
        self.circuit.as_deref()
    }

    /// All module records, in module order.
    pub fn modules(&self) -> &[ModuleRecord] {
        &self.modules
    }

    /// All pin records, in pin order.
    pub fn pins(&self) -> &[PinRecord] {
        &self.pins
    }

    /// Module record with the given handle, or `None` if out of range.
    pub fn module_record(&self, id: ModuleId) -> Option<&ModuleRecord> {
        self.modules.get(id.index())
    }

    /// Total height of the stacked floorplan.
    pub fn total_height(&self) -> i64 {
        self.total_height
    }

    /// Objective value of the solve.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    fn module_entry(&self, module: &str) -> Option<&ModuleRecord> {
        let id = self.module_by_name.get(module)?;
        Some(&self.modules[id.index()])
    }

    fn pin_entry(&self, module: &str, pin: &str) -> Option<&PinRecord> {
        let id = *self.module_by_name.get(module)?;
        let i = *self.pin_by_key.get(&(id, pin.to_string()))?;
        Some(&self.pins[i])
    }

    /// Side of a pin, or `None` if the pin has no solved side.
    pub fn pin_side(&self, module: &str, pin: &str) -> Option<PinSide> {
        self.pin_entry(module, pin).map(|p| p.side)
    }

    /// Side of a pin encoded as 0 (left), 1 (right) or -1 (unknown pin).
    pub fn pin_assign_sol(&self, module: &str, pin: &str) -> i32 {
        self.pin_side(module, pin).map_or(-1, PinSide::as_sol)
    }

    /// Solved height of a module.
    pub fn module_height(&self, module: &str) -> Option<i64> {
        self.module_entry(module).map(|m| m.height)
    }

    /// Solved height of a module, or -1 for an unknown module.
    pub fn target_module_height(&self, module: &str) -> i64 {
        self.module_height(module).unwrap_or(-1)
    }

    /// Solved lower y of a module.
    pub fn module_y_lo(&self, module: &str) -> Option<i64> {
        self.module_entry(module).map(|m| m.y_lo)
    }

    /// External net box of a pin selected by module and name.
    pub fn pin_external_bbox(&self, module: &str, pin: &str) -> Option<Rect> {
        self.pin_entry(module, pin).map(|p| p.external_bbox)
    }

    /// External net box of a pin looked up by bare name.
    ///
    /// When several modules have a pin of this name, the first one in pin
    /// order is used. Returns [`Rect::INVALID`] for unknown pins and for pins
    /// without other classified pins on their net.
    pub fn external_net_bbox(&self, pin: &str) -> Rect {
        self.pin_by_name
            .get(pin)
            .map_or(Rect::INVALID, |&i| self.pins[i].external_bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FloorplanResult {
        let mut result = FloorplanResult::new();
        result
            .populate(
                "top".into(),
                vec![
                    ModuleRecord {
                        name: "ota".into(),
                        height: 4,
                        y_lo: 0,
                    },
                    ModuleRecord {
                        name: "bias".into(),
                        height: 2,
                        y_lo: 4,
                    },
                ],
                vec![
                    PinRecord {
                        module: ModuleId::from_raw(0),
                        name: "IB".into(),
                        side: PinSide::Right,
                        external_bbox: Rect::new(3, 5, 3, 6),
                    },
                    PinRecord {
                        module: ModuleId::from_raw(1),
                        name: "IB".into(),
                        side: PinSide::Left,
                        external_bbox: Rect::new(10, 1, 10, 2),
                    },
                ],
                6,
                6000.0,
            )
            .unwrap();
        result
    }

    #[test]
    fn empty_result_sentinels() {
        let result = FloorplanResult::new();
        assert!(!result.is_populated());
        assert_eq!(result.circuit(), None);
        assert_eq!(result.pin_assign_sol("ota", "IB"), -1);
        assert_eq!(result.target_module_height("ota"), -1);
        assert_eq!(result.external_net_bbox("IB"), Rect::INVALID);
    }

    #[test]
    fn lookups() {
        let result = sample();
        assert_eq!(result.circuit(), Some("top"));
        assert_eq!(result.pin_assign_sol("ota", "IB"), 1);
        assert_eq!(result.pin_assign_sol("bias", "IB"), 0);
        assert_eq!(result.pin_assign_sol("bias", "VDD"), -1);
        assert_eq!(result.pin_side("nope", "IB"), None);
        assert_eq!(result.target_module_height("bias"), 2);
        assert_eq!(result.module_y_lo("bias"), Some(4));
        assert_eq!(result.total_height(), 6);
    }

    #[test]
    fn bare_name_lookup_uses_first_pin() {
        let result = sample();
        assert_eq!(result.external_net_bbox("IB"), Rect::new(3, 5, 3, 6));
        assert_eq!(
            result.pin_external_bbox("bias", "IB"),
            Some(Rect::new(10, 1, 10, 2))
        );
        assert_eq!(result.external_net_bbox("VOUT"), Rect::INVALID);
    }

    #[test]
    fn write_once() {
        let mut result = sample();
        let err = result
            .populate("other".into(), vec![], vec![], 0, 0.0)
            .unwrap_err();
        assert!(matches!(err, FloorplanError::ResultAlreadyWritten));
        assert_eq!(result.circuit(), Some("top"));
        assert_eq!(result.modules().len(), 2);
    }

    #[test]
    fn serde_roundtrip_rebuilds_indices() {
        let result = sample();
        let json = serde_json::to_string(&result).unwrap();
        let restored: FloorplanResult = serde_json::from_str(&json).unwrap();
        assert!(restored.is_populated());
        assert_eq!(restored.target_module_height("ota"), 4);
        assert_eq!(restored.pin_assign_sol("ota", "IB"), 1);
        assert_eq!(restored.pin_assign_sol("bias", "IB"), 0);
        assert_eq!(restored.external_net_bbox("IB"), Rect::new(3, 5, 3, 6));
    }

    #[test]
    fn indices_are_not_serialized() {
        let json = serde_json::to_value(sample()).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 5, "unexpected serialized fields: {keys:?}");
        assert!(json.get("module_by_name").is_none());
    }

    #[test]
    fn module_record_out_of_range_is_none() {
        let result = sample();
        assert_eq!(result.module_record(ModuleId::from_raw(1)).map(|m| m.height), Some(2));
        assert!(result.module_record(ModuleId::from_raw(9)).is_none());
    }
}

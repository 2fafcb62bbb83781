//! The floorplan problem model.
//!
//! A [`FloorplanProblem`] is built once from a [`DesignSource`] circuit and a
//! list of [`SymmetryPair`]s. It owns the module boxes, the classified pin
//! table and the nets, plus the name→handle tables used by every later
//! stage. Once built it is only read.

use crate::design::DesignSource;
use crate::diagnostics;
use crate::error::FloorplanError;
use crate::geom::Rect;
use crate::ids::{ModuleId, NetId, PinId};
use crate::symmetry::{PinRef, SymmetryPair};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use strata_common::{Ident, Interner};
use strata_config::DEFAULT_RESOURCE_PER_LEN;
use strata_diagnostics::DiagnosticSink;

/// Role of a pin in the side-assignment ILP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PinKind {
    /// Free choice of side, one ILP variable.
    Asymmetric,
    /// Owns the variable shared with its mirrored partner.
    SymmetricPrimary {
        /// The mirrored partner.
        secondary: PinId,
    },
    /// Side is the complement of its primary's variable.
    SymmetricSecondary {
        /// The pin owning the variable.
        primary: PinId,
    },
    /// Excluded from side assignment: the pin gets no ILP variable, is not
    /// counted against module capacity, and is not a member of any problem
    /// net.
    Other,
}

impl PinKind {
    /// Returns `true` unless the pin is [`PinKind::Other`].
    pub fn is_assignable(self) -> bool {
        !matches!(self, PinKind::Other)
    }
}

/// Side of a module a pin is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinSide {
    /// Left edge, encoded as 0.
    Left,
    /// Right edge, encoded as 1.
    Right,
    /// No side decided.
    Undefined,
}

impl PinSide {
    /// The two real sides, in slack-variable order.
    pub const BOTH: [PinSide; 2] = [PinSide::Left, PinSide::Right];

    /// Integer encoding: 0 left, 1 right, -1 undefined.
    pub fn as_sol(self) -> i32 {
        match self {
            PinSide::Left => 0,
            PinSide::Right => 1,
            PinSide::Undefined => -1,
        }
    }

    /// Returns the opposite side. `Undefined` stays `Undefined`.
    pub fn mirrored(self) -> PinSide {
        match self {
            PinSide::Left => PinSide::Right,
            PinSide::Right => PinSide::Left,
            PinSide::Undefined => PinSide::Undefined,
        }
    }

    /// Decodes a solved 0/1 assignment value.
    pub(crate) fn from_value(value: f64) -> PinSide {
        if value > 0.5 {
            PinSide::Right
        } else {
            PinSide::Left
        }
    }
}

impl fmt::Display for PinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinSide::Left => write!(f, "left"),
            PinSide::Right => write!(f, "right"),
            PinSide::Undefined => write!(f, "undefined"),
        }
    }
}

/// A module to be stacked.
#[derive(Debug, Clone)]
pub struct FpModule {
    /// Handle of this module.
    pub id: ModuleId,
    /// Interned instance name.
    pub name: Ident,
    /// Original layout footprint.
    pub bbox: Rect,
}

impl FpModule {
    /// Vertical extent of the module.
    pub fn height(&self) -> i64 {
        self.bbox.height()
    }
}

/// A classified pin.
#[derive(Debug, Clone)]
pub struct FpPin {
    /// Handle of this pin.
    pub id: PinId,
    /// Interned pin name.
    pub name: Ident,
    /// Owning module.
    pub module: ModuleId,
    /// Role in the ILP.
    pub kind: PinKind,
    /// Position in the asymmetric or symmetric variable set. Secondaries
    /// share their primary's slot; `Other` pins have none.
    pub slot: Option<usize>,
    /// Footprint in the original layout.
    pub bbox: Rect,
}

/// A net restricted to its assignable pins.
#[derive(Debug, Clone)]
pub struct FpNet {
    /// Handle of this net.
    pub id: NetId,
    /// Interned net name.
    pub name: Ident,
    /// Member pins in design order. The position of a pin in this list is
    /// the index used by the crossing-variable layout.
    pub pins: Vec<PinId>,
}

/// The top-level floorplanning problem for one circuit.
#[derive(Debug)]
pub struct FloorplanProblem {
    circuit: String,
    interner: Interner,
    modules: Vec<FpModule>,
    pins: Vec<FpPin>,
    nets: Vec<FpNet>,
    module_pins: Vec<Vec<PinId>>,
    module_by_name: HashMap<Ident, ModuleId>,
    pin_by_name: HashMap<(ModuleId, Ident), PinId>,
    resource_per_len: i64,
    num_asym_pins: usize,
    num_sym_pri_pins: usize,
    num_sym_sec_pins: usize,
}

impl FloorplanProblem {
    /// Builds the problem for circuit `circuit` of `design`.
    ///
    /// Classifies pins with `symmetry`: both pins of a pair become
    /// primary/secondary, other assignable pins become asymmetric, and
    /// non-assignable pins become [`PinKind::Other`]. Every structural
    /// inconsistency is returned as an error before any ILP work; recoverable
    /// oddities are reported to `sink`.
    pub fn build(
        design: &dyn DesignSource,
        circuit: usize,
        symmetry: &[SymmetryPair],
        sink: &DiagnosticSink,
    ) -> Result<Self, FloorplanError> {
        let circuit_name = design
            .circuit_name(circuit)
            .ok_or(FloorplanError::UnknownCircuit(circuit))?
            .to_string();

        let mut problem = FloorplanProblem {
            circuit: circuit_name,
            interner: Interner::new(),
            modules: Vec::new(),
            pins: Vec::new(),
            nets: Vec::new(),
            module_pins: Vec::new(),
            module_by_name: HashMap::new(),
            pin_by_name: HashMap::new(),
            resource_per_len: DEFAULT_RESOURCE_PER_LEN,
            num_asym_pins: 0,
            num_sym_pri_pins: 0,
            num_sym_sec_pins: 0,
        };

        problem.add_modules(design, circuit)?;
        let assignable = problem.add_pins(design, circuit, sink)?;
        problem.classify_pins(&assignable, symmetry, sink)?;
        problem.add_nets(design, circuit, sink)?;

        tracing::debug!(
            circuit = %problem.circuit,
            modules = problem.modules.len(),
            asym = problem.num_asym_pins,
            sym_pri = problem.num_sym_pri_pins,
            sym_sec = problem.num_sym_sec_pins,
            nets = problem.nets.len(),
            "floorplan problem built"
        );
        Ok(problem)
    }

    fn add_modules(&mut self, design: &dyn DesignSource, circuit: usize) -> Result<(), FloorplanError> {
        for (i, def) in design.modules(circuit).iter().enumerate() {
            if !def.bbox.is_valid() {
                return Err(FloorplanError::InvertedBox {
                    what: "module",
                    name: def.name.clone(),
                });
            }
            let name = self.interner.get_or_intern(&def.name);
            let id = ModuleId::from_index(i);
            if self.module_by_name.insert(name, id).is_some() {
                return Err(FloorplanError::DuplicateModule(def.name.clone()));
            }
            self.modules.push(FpModule {
                id,
                name,
                bbox: def.bbox,
            });
            self.module_pins.push(Vec::new());
        }
        Ok(())
    }

    /// Adds every pin as `Other` and returns which ones need a side.
    fn add_pins(
        &mut self,
        design: &dyn DesignSource,
        circuit: usize,
        sink: &DiagnosticSink,
    ) -> Result<Vec<bool>, FloorplanError> {
        let defs = design.pins(circuit);
        let mut first_owner: HashMap<Ident, ModuleId> = HashMap::new();
        let mut assignable = Vec::with_capacity(defs.len());

        for (i, def) in defs.iter().enumerate() {
            if def.module as usize >= self.modules.len() {
                return Err(FloorplanError::InvalidModuleRef {
                    pin: def.name.clone(),
                    module: def.module,
                    count: self.modules.len(),
                });
            }
            if !def.bbox.is_valid() {
                return Err(FloorplanError::InvertedBox {
                    what: "pin",
                    name: def.name.clone(),
                });
            }
            let module = ModuleId::from_raw(def.module);
            let name = self.interner.get_or_intern(&def.name);
            let id = PinId::from_index(i);
            if self.pin_by_name.insert((module, name), id).is_some() {
                return Err(FloorplanError::DuplicatePin {
                    module: self.module_name(module).to_string(),
                    pin: def.name.clone(),
                });
            }
            match first_owner.get(&name) {
                Some(&owner) if owner != module => sink.emit(diagnostics::warn_pin_name_reused(
                    &def.name,
                    self.module_name(owner),
                    self.module_name(module),
                )),
                Some(_) => {}
                None => {
                    first_owner.insert(name, module);
                }
            }

            self.pins.push(FpPin {
                id,
                name,
                module,
                kind: PinKind::Other,
                slot: None,
                bbox: def.bbox,
            });
            assignable.push(def.assignable);
        }
        Ok(assignable)
    }

    fn classify_pins(
        &mut self,
        assignable: &[bool],
        symmetry: &[SymmetryPair],
        sink: &DiagnosticSink,
    ) -> Result<(), FloorplanError> {
        for (pin, &needs_side) in self.pins.iter_mut().zip(assignable) {
            if needs_side {
                pin.kind = PinKind::Asymmetric;
            }
        }

        let mut paired: HashSet<PinId> = HashSet::new();
        for pair in symmetry {
            let (Some(primary), Some(secondary)) =
                (self.resolve_ref(&pair.primary), self.resolve_ref(&pair.secondary))
            else {
                let missing = if self.resolve_ref(&pair.primary).is_none() {
                    &pair.primary
                } else {
                    &pair.secondary
                };
                sink.emit(diagnostics::warn_symmetry_pin_missing(&missing.to_string()));
                continue;
            };
            if primary == secondary {
                return Err(FloorplanError::SelfSymmetricPair(pair.primary.to_string()));
            }
            for (id, pin_ref) in [(primary, &pair.primary), (secondary, &pair.secondary)] {
                if !paired.insert(id) {
                    return Err(FloorplanError::DuplicateSymmetryPin(pin_ref.to_string()));
                }
            }
            let not_assignable = [(primary, &pair.primary), (secondary, &pair.secondary)]
                .into_iter()
                .find(|(id, _)| !assignable[id.index()]);
            if let Some((_, pin_ref)) = not_assignable {
                sink.emit(diagnostics::warn_symmetry_pin_not_assignable(
                    &pin_ref.to_string(),
                ));
                continue;
            }
            self.pins[primary.index()].kind = PinKind::SymmetricPrimary { secondary };
            self.pins[secondary.index()].kind = PinKind::SymmetricSecondary { primary };
        }

        for i in 0..self.pins.len() {
            let slot = match self.pins[i].kind {
                PinKind::Asymmetric => {
                    self.num_asym_pins += 1;
                    Some(self.num_asym_pins - 1)
                }
                PinKind::SymmetricPrimary { .. } => {
                    self.num_sym_pri_pins += 1;
                    Some(self.num_sym_pri_pins - 1)
                }
                PinKind::SymmetricSecondary { .. } => {
                    self.num_sym_sec_pins += 1;
                    None
                }
                PinKind::Other => None,
            };
            self.pins[i].slot = slot;
            if self.pins[i].kind.is_assignable() {
                let module = self.pins[i].module;
                self.module_pins[module.index()].push(PinId::from_index(i));
            }
        }
        for i in 0..self.pins.len() {
            if let PinKind::SymmetricSecondary { primary } = self.pins[i].kind {
                self.pins[i].slot = self.pins[primary.index()].slot;
            }
        }
        Ok(())
    }

    fn add_nets(
        &mut self,
        design: &dyn DesignSource,
        circuit: usize,
        sink: &DiagnosticSink,
    ) -> Result<(), FloorplanError> {
        let mut owner_net: HashMap<PinId, usize> = HashMap::new();
        let defs = design.nets(circuit);

        for (i, def) in defs.iter().enumerate() {
            let mut pins = Vec::with_capacity(def.pins.len());
            for &raw in &def.pins {
                if raw as usize >= self.pins.len() {
                    return Err(FloorplanError::InvalidPinRef {
                        net: def.name.clone(),
                        pin: raw,
                        count: self.pins.len(),
                    });
                }
                let pin = PinId::from_raw(raw);
                if let Some(&first) = owner_net.get(&pin) {
                    return Err(FloorplanError::PinOnTwoNets {
                        pin: self.pin_name(pin).to_string(),
                        first: defs[first].name.clone(),
                        second: def.name.clone(),
                    });
                }
                owner_net.insert(pin, i);
                if self.pins[pin.index()].kind.is_assignable() {
                    pins.push(pin);
                }
            }
            if pins.len() < 2 {
                sink.emit(diagnostics::note_degenerate_net(&def.name, pins.len()));
            }
            let name = self.interner.get_or_intern(&def.name);
            self.nets.push(FpNet {
                id: NetId::from_index(i),
                name,
                pins,
            });
        }
        Ok(())
    }

    fn resolve_ref(&self, pin_ref: &PinRef) -> Option<PinId> {
        let module = self.lookup_module(&pin_ref.module)?;
        self.lookup_pin(module, &pin_ref.pin)
    }

    /// Sets the number of resource units a unit of module edge length offers.
    pub fn set_pin_resource_len(&mut self, value: i64) -> Result<(), FloorplanError> {
        if value <= 0 {
            return Err(FloorplanError::InvalidResourceLen(value));
        }
        self.resource_per_len = value;
        Ok(())
    }

    /// Resource units per unit of edge length.
    pub fn resource_per_len(&self) -> i64 {
        self.resource_per_len
    }

    /// Name of the circuit this problem was built from.
    pub fn circuit(&self) -> &str {
        &self.circuit
    }

    /// All modules, indexed by [`ModuleId`].
    pub fn modules(&self) -> &[FpModule] {
        &self.modules
    }

    /// All pins, indexed by [`PinId`], including `Other` pins.
    pub fn pins(&self) -> &[FpPin] {
        &self.pins
    }

    /// All nets, indexed by [`NetId`].
    pub fn nets(&self) -> &[FpNet] {
        &self.nets
    }

    /// Returns the module with the given handle.
    pub fn module(&self, id: ModuleId) -> &FpModule {
        &self.modules[id.index()]
    }

    /// Returns the pin with the given handle.
    pub fn pin(&self, id: PinId) -> &FpPin {
        &self.pins[id.index()]
    }

    /// Returns the net with the given handle.
    pub fn net(&self, id: NetId) -> &FpNet {
        &self.nets[id.index()]
    }

    /// Assignable pins of a module, in pin order.
    pub fn module_pins(&self, id: ModuleId) -> &[PinId] {
        &self.module_pins[id.index()]
    }

    /// Name of a module.
    pub fn module_name(&self, id: ModuleId) -> &str {
        self.interner.resolve(self.modules[id.index()].name)
    }

    /// Name of a pin.
    pub fn pin_name(&self, id: PinId) -> &str {
        self.interner.resolve(self.pins[id.index()].name)
    }

    /// Name of a net.
    pub fn net_name(&self, id: NetId) -> &str {
        self.interner.resolve(self.nets[id.index()].name)
    }

    /// Finds a module by name.
    pub fn lookup_module(&self, name: &str) -> Option<ModuleId> {
        let ident = self.interner.get(name)?;
        self.module_by_name.get(&ident).copied()
    }

    /// Finds a pin by its module and name.
    pub fn lookup_pin(&self, module: ModuleId, name: &str) -> Option<PinId> {
        let ident = self.interner.get(name)?;
        self.pin_by_name.get(&(module, ident)).copied()
    }

    /// Number of asymmetric pins.
    pub fn num_asym_pins(&self) -> usize {
        self.num_asym_pins
    }

    /// Number of symmetric primary pins.
    pub fn num_sym_pri_pins(&self) -> usize {
        self.num_sym_pri_pins
    }

    /// Number of symmetric secondary pins.
    pub fn num_sym_sec_pins(&self) -> usize {
        self.num_sym_sec_pins
    }

    /// Number of pins that receive a side.
    pub fn num_assignable_pins(&self) -> usize {
        self.num_asym_pins + self.num_sym_pri_pins + self.num_sym_sec_pins
    }
}

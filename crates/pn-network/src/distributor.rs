//! Energy distributors: electrical busses and fuel lines.

use crate::error::{NetworkError, NetworkResult};
use crate::source::{BatteryModule, FuelTank};
use crate::split::SplitPolicy;
use pn_assembly::{EnergyDraw, PropulsorAssembly};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, warn};

/// Voltage an electrical bus presents to its propulsors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusVoltage {
    Fixed(f64),
    /// Open-circuit voltage of the first module at its present charge.
    FromSource,
}

/// What a distributor draws from.
#[derive(Debug, Clone)]
pub enum EnergyStore {
    Batteries {
        modules: Vec<BatteryModule>,
        voltage: BusVoltage,
    },
    Fuel {
        tanks: Vec<FuelTank>,
    },
}

impl EnergyStore {
    fn source_count(&self) -> usize {
        match self {
            EnergyStore::Batteries { modules, .. } => modules.len(),
            EnergyStore::Fuel { tanks } => tanks.len(),
        }
    }
}

/// Draw of one propulsor against its allotment.
#[derive(Debug, Clone, PartialEq)]
pub struct PropulsorDraw {
    pub tag: String,
    pub draw: EnergyDraw,
    /// Power (W) on a bus, fuel flow (kg/s) on a fuel line.
    pub allotment: f64,
    pub over_allotted: bool,
}

/// Every active propulsor's draw at one control point.
#[derive(Debug, Clone, PartialEq)]
pub struct Tally {
    pub distributor: String,
    pub control_point: usize,
    pub total: EnergyDraw,
    pub propulsors: Vec<PropulsorDraw>,
}

/// What a commit did to the sources.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitReport {
    pub distributor: String,
    pub control_point: usize,
    pub energy_removed_j: f64,
    pub fuel_removed_kg: f64,
    /// Sources empty after this commit.
    pub depleted: Vec<String>,
    /// The sources could not cover the full demand.
    pub shortfall: bool,
}

/// A bus or fuel line feeding a set of propulsors.
#[derive(Debug, Clone)]
pub struct EnergyDistributor {
    tag: String,
    store: EnergyStore,
    propulsors: Vec<PropulsorAssembly>,
    propulsor_split: SplitPolicy,
    source_split: SplitPolicy,
    committed: BTreeSet<usize>,
}

impl EnergyDistributor {
    pub fn new(
        tag: impl Into<String>,
        store: EnergyStore,
        propulsors: Vec<PropulsorAssembly>,
        propulsor_split: SplitPolicy,
        source_split: SplitPolicy,
    ) -> NetworkResult<Self> {
        let tag = tag.into();
        let cfg = |what: String| NetworkError::configuration(&tag, what);

        if store.source_count() == 0 {
            return Err(cfg("distributor needs at least one energy source".into()));
        }
        match &store {
            EnergyStore::Batteries { modules, voltage } => {
                for m in modules {
                    m.validate().map_err(cfg)?;
                }
                if let BusVoltage::Fixed(v) = voltage {
                    if !v.is_finite() || *v <= 0.0 {
                        return Err(cfg("fixed bus voltage must be positive".into()));
                    }
                }
                if let Some(p) = propulsors.iter().find(|p| !p.variant().is_electric()) {
                    return Err(cfg(format!(
                        "{} '{}' cannot run from an electrical bus",
                        p.variant().name(),
                        p.tag()
                    )));
                }
            }
            EnergyStore::Fuel { tanks } => {
                for t in tanks {
                    t.validate().map_err(cfg)?;
                }
                if let Some(p) = propulsors.iter().find(|p| p.variant().is_electric()) {
                    return Err(cfg(format!(
                        "{} '{}' cannot run from a fuel line",
                        p.variant().name(),
                        p.tag()
                    )));
                }
            }
        }

        let mut seen = HashSet::new();
        for p in &propulsors {
            if !seen.insert(p.tag()) {
                return Err(cfg(format!("duplicate propulsor tag '{}'", p.tag())));
            }
        }
        propulsor_split.validate(propulsors.len()).map_err(cfg)?;
        source_split.validate(store.source_count()).map_err(cfg)?;

        Ok(Self {
            tag,
            store,
            propulsors,
            propulsor_split,
            source_split,
            committed: BTreeSet::new(),
        })
    }

    /// Electrical bus with equal splits.
    pub fn electrical_bus(
        tag: impl Into<String>,
        modules: Vec<BatteryModule>,
        voltage: BusVoltage,
        propulsors: Vec<PropulsorAssembly>,
    ) -> NetworkResult<Self> {
        Self::new(
            tag,
            EnergyStore::Batteries { modules, voltage },
            propulsors,
            SplitPolicy::Equal,
            SplitPolicy::Equal,
        )
    }

    /// Fuel line with equal splits.
    pub fn fuel_line(
        tag: impl Into<String>,
        tanks: Vec<FuelTank>,
        propulsors: Vec<PropulsorAssembly>,
    ) -> NetworkResult<Self> {
        Self::new(
            tag,
            EnergyStore::Fuel { tanks },
            propulsors,
            SplitPolicy::Equal,
            SplitPolicy::Equal,
        )
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn store(&self) -> &EnergyStore {
        &self.store
    }

    pub fn propulsors(&self) -> &[PropulsorAssembly] {
        &self.propulsors
    }

    pub(crate) fn propulsors_mut(&mut self) -> &mut [PropulsorAssembly] {
        &mut self.propulsors
    }

    pub fn is_electrical(&self) -> bool {
        matches!(self.store, EnergyStore::Batteries { .. })
    }

    pub fn bus_voltage(&self) -> Option<f64> {
        match &self.store {
            EnergyStore::Batteries {
                voltage: BusVoltage::Fixed(v),
                ..
            } => Some(*v),
            EnergyStore::Batteries {
                modules,
                voltage: BusVoltage::FromSource,
            } => modules.first().map(BatteryModule::open_circuit_voltage),
            EnergyStore::Fuel { .. } => None,
        }
    }

    /// Deliverable power (W) on a bus or fuel flow (kg/s) on a fuel line.
    pub fn available_supply(&self) -> f64 {
        match &self.store {
            EnergyStore::Batteries { modules, .. } => modules
                .iter()
                .filter(|m| !m.is_depleted())
                .map(|m| m.max_power_w)
                .sum(),
            EnergyStore::Fuel { tanks } => tanks
                .iter()
                .filter(|t| !t.is_depleted())
                .map(|t| t.max_flow_kgps)
                .sum(),
        }
    }

    /// Forget commits of the previous segment.
    pub fn begin_segment(&mut self) {
        self.committed.clear();
    }

    pub fn is_committed(&self, control_point: usize) -> bool {
        self.committed.contains(&control_point)
    }

    /// Collect every active propulsor's draw at `control_point`.
    ///
    /// Fails unless all active propulsors have a stored result for the point.
    pub fn tally(&self, control_point: usize) -> NetworkResult<Tally> {
        let active: Vec<bool> = self.propulsors.iter().map(|p| p.is_active()).collect();
        let shares = self.propulsor_split.shares(&active);
        let supply = self.available_supply();
        let electrical = self.is_electrical();

        let mut total = EnergyDraw::default();
        let mut draws = Vec::new();
        for (p, share) in self.propulsors.iter().zip(shares) {
            if !p.is_active() {
                continue;
            }
            let result = p.result_at(control_point).ok_or_else(|| {
                NetworkError::TallyIncomplete {
                    distributor: self.tag.clone(),
                    assembly: p.tag().to_string(),
                    control_point,
                }
            })?;
            let draw = result.core.draw;
            total.electrical_power_w += draw.electrical_power_w;
            total.current_a += draw.current_a;
            total.fuel_rate_kgps += draw.fuel_rate_kgps;

            let allotment = share * supply;
            let demand = if electrical {
                draw.electrical_power_w
            } else {
                draw.fuel_rate_kgps
            };
            let over_allotted = demand > allotment;
            if over_allotted {
                warn!(
                    distributor = %self.tag,
                    assembly = %p.tag(),
                    demand,
                    allotment,
                    "propulsor draw exceeds its allotment"
                );
            }
            draws.push(PropulsorDraw {
                tag: p.tag().to_string(),
                draw,
                allotment,
                over_allotted,
            });
        }

        Ok(Tally {
            distributor: self.tag.clone(),
            control_point,
            total,
            propulsors: draws,
        })
    }

    /// Apply a tally to the sources over `dt_s`. Exactly once per point.
    pub fn commit(&mut self, tally: &Tally, dt_s: f64) -> NetworkResult<CommitReport> {
        if tally.distributor != self.tag {
            return Err(NetworkError::InvalidArg {
                what: "tally belongs to another distributor",
            });
        }
        if !dt_s.is_finite() || dt_s < 0.0 {
            return Err(NetworkError::InvalidArg {
                what: "time step must be non-negative",
            });
        }
        if self.committed.contains(&tally.control_point) {
            return Err(NetworkError::AlreadyCommitted {
                distributor: self.tag.clone(),
                control_point: tally.control_point,
            });
        }

        let shares = self
            .source_split
            .shares(&vec![true; self.store.source_count()]);
        let mut report = CommitReport {
            distributor: self.tag.clone(),
            control_point: tally.control_point,
            energy_removed_j: 0.0,
            fuel_removed_kg: 0.0,
            depleted: Vec::new(),
            shortfall: false,
        };

        match &mut self.store {
            EnergyStore::Batteries { modules, .. } => {
                let power = tally.total.electrical_power_w;
                let current = tally.total.current_a;
                for (m, share) in modules.iter_mut().zip(shares) {
                    let demand = m.energy_demand(share * power, share * current, dt_s);
                    let removed = m.discharge(share * power, share * current, dt_s);
                    report.energy_removed_j += removed;
                    report.shortfall |= removed < demand;
                    if m.is_depleted() {
                        report.depleted.push(m.name.clone());
                    }
                }
            }
            EnergyStore::Fuel { tanks } => {
                let mass = tally.total.fuel_rate_kgps * dt_s;
                for (t, share) in tanks.iter_mut().zip(shares) {
                    let removed = t.burn(share * mass);
                    report.fuel_removed_kg += removed;
                    report.shortfall |= removed < share * mass;
                    if t.is_depleted() {
                        report.depleted.push(t.name.clone());
                    }
                }
            }
        }

        if report.shortfall {
            warn!(
                distributor = %self.tag,
                control_point = tally.control_point,
                "energy sources could not cover demand"
            );
        }
        self.committed.insert(tally.control_point);
        debug!(
            distributor = %self.tag,
            control_point = tally.control_point,
            energy_j = report.energy_removed_j,
            fuel_kg = report.fuel_removed_kg,
            "energy committed"
        );
        Ok(report)
    }
}

//! Builders that fail fast on missing stages.

use crate::assembly::PropulsorAssembly;
use crate::electric::ElectricRotorSlots;
use crate::error::{AssemblyError, AssemblyResult};
use crate::gas_turbine::{GasTurbineDesign, TurbofanSlots, TurbojetSlots};
use crate::piston::InternalCombustionPropellerSlots;
use crate::variant::PropulsorVariant;
use nalgebra::Vector3;
use pn_stages::{
    Combustor, CompressionNozzle, Compressor, ExpansionNozzle, Fan, InternalCombustionEngine,
    Motor, Ram, Rotor, SpeedController, Turbine,
};

/// Where an assembly sits on the vehicle and how it is flagged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub origin: Vector3<f64>,
    /// Direction of positive thrust; normalised on construction.
    pub thrust_axis: Vector3<f64>,
    /// Structurally identical to other members of its distributor.
    pub identical: bool,
    pub active: bool,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            origin: Vector3::zeros(),
            thrust_axis: Vector3::x(),
            identical: false,
            active: true,
        }
    }
}

/// Turns filled slots into a variant, naming the first missing stage.
pub trait VariantSlots {
    fn finish(self, tag: &str) -> AssemblyResult<PropulsorVariant>;
}

pub(crate) fn require<T>(slot: Option<T>, tag: &str, stage: &str) -> AssemblyResult<T> {
    slot.ok_or_else(|| AssemblyError::configuration(tag, format!("missing stage '{stage}'")))
}

/// Assembly builder parameterised by the variant's stage slots.
#[derive(Debug)]
pub struct AssemblyBuilder<S> {
    tag: String,
    placement: Placement,
    slots: S,
}

impl<S: VariantSlots> AssemblyBuilder<S> {
    pub fn with_slots(tag: impl Into<String>, slots: S) -> Self {
        Self {
            tag: tag.into(),
            placement: Placement::default(),
            slots,
        }
    }

    pub fn origin(mut self, origin: Vector3<f64>) -> Self {
        self.placement.origin = origin;
        self
    }

    pub fn thrust_axis(mut self, axis: Vector3<f64>) -> Self {
        self.placement.thrust_axis = axis;
        self
    }

    pub fn identical(mut self, identical: bool) -> Self {
        self.placement.identical = identical;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.placement.active = active;
        self
    }

    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn build(self) -> AssemblyResult<PropulsorAssembly> {
        let variant = self.slots.finish(&self.tag)?;
        PropulsorAssembly::new(self.tag, self.placement, variant)
    }
}

impl AssemblyBuilder<TurbofanSlots> {
    pub fn ram(mut self, stage: Ram) -> Self {
        self.slots.ram = Some(stage);
        self
    }

    pub fn inlet(mut self, stage: CompressionNozzle) -> Self {
        self.slots.inlet = Some(stage);
        self
    }

    pub fn fan(mut self, stage: Fan) -> Self {
        self.slots.fan = Some(stage);
        self
    }

    pub fn low_pressure_compressor(mut self, stage: Compressor) -> Self {
        self.slots.low_pressure_compressor = Some(stage);
        self
    }

    pub fn high_pressure_compressor(mut self, stage: Compressor) -> Self {
        self.slots.high_pressure_compressor = Some(stage);
        self
    }

    pub fn combustor(mut self, stage: Combustor) -> Self {
        self.slots.combustor = Some(stage);
        self
    }

    pub fn high_pressure_turbine(mut self, stage: Turbine) -> Self {
        self.slots.high_pressure_turbine = Some(stage);
        self
    }

    pub fn low_pressure_turbine(mut self, stage: Turbine) -> Self {
        self.slots.low_pressure_turbine = Some(stage);
        self
    }

    pub fn core_nozzle(mut self, stage: ExpansionNozzle) -> Self {
        self.slots.core_nozzle = Some(stage);
        self
    }

    pub fn fan_nozzle(mut self, stage: ExpansionNozzle) -> Self {
        self.slots.fan_nozzle = Some(stage);
        self
    }

    pub fn bypass_ratio(mut self, bypass_ratio: f64) -> Self {
        self.slots.bypass_ratio = Some(bypass_ratio);
        self
    }

    pub fn design(mut self, design: GasTurbineDesign) -> Self {
        self.slots.design = Some(design);
        self
    }
}

impl AssemblyBuilder<TurbojetSlots> {
    pub fn ram(mut self, stage: Ram) -> Self {
        self.slots.ram = Some(stage);
        self
    }

    pub fn inlet(mut self, stage: CompressionNozzle) -> Self {
        self.slots.inlet = Some(stage);
        self
    }

    pub fn low_pressure_compressor(mut self, stage: Compressor) -> Self {
        self.slots.low_pressure_compressor = Some(stage);
        self
    }

    pub fn high_pressure_compressor(mut self, stage: Compressor) -> Self {
        self.slots.high_pressure_compressor = Some(stage);
        self
    }

    pub fn combustor(mut self, stage: Combustor) -> Self {
        self.slots.combustor = Some(stage);
        self
    }

    pub fn high_pressure_turbine(mut self, stage: Turbine) -> Self {
        self.slots.high_pressure_turbine = Some(stage);
        self
    }

    pub fn low_pressure_turbine(mut self, stage: Turbine) -> Self {
        self.slots.low_pressure_turbine = Some(stage);
        self
    }

    pub fn core_nozzle(mut self, stage: ExpansionNozzle) -> Self {
        self.slots.core_nozzle = Some(stage);
        self
    }

    pub fn design(mut self, design: GasTurbineDesign) -> Self {
        self.slots.design = Some(design);
        self
    }
}

impl AssemblyBuilder<ElectricRotorSlots> {
    pub fn esc(mut self, stage: SpeedController) -> Self {
        self.slots.esc = Some(stage);
        self
    }

    pub fn motor(mut self, stage: Motor) -> Self {
        self.slots.motor = Some(stage);
        self
    }

    pub fn rotor(mut self, stage: Rotor) -> Self {
        self.slots.rotor = Some(stage);
        self
    }

    pub fn initial_power_coefficient(mut self, cp: f64) -> Self {
        self.slots.initial_power_coefficient = Some(cp);
        self
    }
}

impl AssemblyBuilder<InternalCombustionPropellerSlots> {
    pub fn engine(mut self, stage: InternalCombustionEngine) -> Self {
        self.slots.engine = Some(stage);
        self
    }

    pub fn propeller(mut self, stage: Rotor) -> Self {
        self.slots.propeller = Some(stage);
        self
    }
}

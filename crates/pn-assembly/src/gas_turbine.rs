//! Twin-spool gas-turbine variants: separate-flow turbofan and turbojet.

use crate::builder::{VariantSlots, require};
use crate::conditions::OperatingConditions;
use crate::error::{AssemblyError, AssemblyResult, InAssembly};
use crate::result::{EnergyDraw, PerformanceCore, Trace};
use crate::variant::{Evaluation, PropulsorVariant, check_stage};
use nalgebra::Vector3;
use pn_core::units::constants::{P_REF_PA, T_REF_K};
use pn_flow::{FlowState, Freestream};
use pn_stages::error::InStage;
use pn_stages::{
    Combustor, CompressionNozzle, Compressor, ConversionStage, ExpansionNozzle, Fan, Ram,
    ShaftLoad, StageEnv, StageOutput, Turbine,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shaft power extracted from the low-pressure spool.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShaftOfftake {
    pub power_w: f64,
}

/// Sizing shared by both gas-turbine variants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GasTurbineDesign {
    /// Core mass flow at reference conditions (kg/s).
    pub design_mass_flow_kgps: f64,
    #[serde(default)]
    pub offtake: Option<ShaftOfftake>,
}

impl GasTurbineDesign {
    fn validate(&self, tag: &str) -> AssemblyResult<()> {
        if !self.design_mass_flow_kgps.is_finite() || self.design_mass_flow_kgps <= 0.0 {
            return Err(AssemblyError::configuration(
                tag,
                "design mass flow must be positive",
            ));
        }
        if let Some(offtake) = self.offtake {
            if !offtake.power_w.is_finite() || offtake.power_w < 0.0 {
                return Err(AssemblyError::configuration(
                    tag,
                    "shaft off-take power cannot be negative",
                ));
            }
        }
        Ok(())
    }

    /// Throttled core mass flow for the flow state at the compressor face.
    ///
    /// `ṁ = throttle · ṁ_design · (Pt/P_ref) / sqrt(Tt/T_ref)`
    fn core_mass_flow(&self, face: &FlowState, throttle: f64) -> f64 {
        let pt = face.total_pressure().value;
        let tt = face.total_temperature().value;
        throttle * self.design_mass_flow_kgps * (pt / P_REF_PA) / (tt / T_REF_K).sqrt()
    }

    /// Specific off-take work per kg of core flow.
    fn offtake_work(&self, core_mass_flow: f64) -> f64 {
        match self.offtake {
            Some(offtake) if core_mass_flow > 0.0 => offtake.power_w / core_mass_flow,
            _ => 0.0,
        }
    }
}

/// Separate-flow twin-spool turbofan.
///
/// ```text
/// ram → inlet → fan ─┬→ LPC → HPC → combustor → HPT → LPT → core nozzle
///                    └→ fan nozzle
/// ```
///
/// The fan and LPC sit on the low spool, the HPC on the high spool.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Turbofan {
    pub ram: Ram,
    pub inlet: CompressionNozzle,
    pub fan: Fan,
    pub low_pressure_compressor: Compressor,
    pub high_pressure_compressor: Compressor,
    pub combustor: Combustor,
    pub high_pressure_turbine: Turbine,
    pub low_pressure_turbine: Turbine,
    pub core_nozzle: ExpansionNozzle,
    pub fan_nozzle: ExpansionNozzle,
    pub bypass_ratio: f64,
    pub design: GasTurbineDesign,
}

/// Twin-spool turbojet.
///
/// ```text
/// ram → inlet → LPC → HPC → combustor → HPT → LPT → core nozzle
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Turbojet {
    pub ram: Ram,
    pub inlet: CompressionNozzle,
    pub low_pressure_compressor: Compressor,
    pub high_pressure_compressor: Compressor,
    pub combustor: Combustor,
    pub high_pressure_turbine: Turbine,
    pub low_pressure_turbine: Turbine,
    pub core_nozzle: ExpansionNozzle,
    pub design: GasTurbineDesign,
}

/// Runs one stage and records it in the trace.
pub(crate) fn step(
    tag: &str,
    trace: &mut Trace,
    stage: &dyn ConversionStage,
    inlet: &FlowState,
    env: &StageEnv<'_>,
) -> AssemblyResult<StageOutput> {
    let out = stage.evaluate(inlet, env).in_assembly(tag)?;
    trace.push(stage, &out);
    Ok(out)
}

/// Gross thrust per kg of nozzle flow, including the pressure term for an
/// under-expanded (choked) exit.
fn nozzle_specific_thrust(out: &StageOutput, fs: &Freestream) -> f64 {
    let u = out.side.exit_velocity_mps;
    let p_exit = out.state.static_pressure().value;
    let mass_flux = out.side.exit_density_kg_m3 * u;
    if mass_flux > 0.0 {
        u + (p_exit - fs.pressure_pa) / mass_flux
    } else {
        u
    }
}

/// Hot section shared by both variants: HPC → combustor → HPT → LPT → nozzle.
struct CoreSection<'a> {
    hpc: &'a Compressor,
    combustor: &'a Combustor,
    hpt: &'a Turbine,
    lpt: &'a Turbine,
    nozzle: &'a ExpansionNozzle,
}

struct CoreExit {
    nozzle: StageOutput,
    fuel_to_air: f64,
}

impl CoreSection<'_> {
    /// `low_spool_load` carries the LPT demand (per kg of core flow) without
    /// the fuel-to-air ratio, which is only known once the combustor has run.
    fn run(
        &self,
        tag: &str,
        trace: &mut Trace,
        lpc_exit: &FlowState,
        env: &StageEnv<'_>,
        low_spool_load: ShaftLoad,
    ) -> AssemblyResult<CoreExit> {
        let hpc = step(tag, trace, self.hpc, lpc_exit, env)?;
        let burner = step(tag, trace, self.combustor, &hpc.state, env)?;
        let f = burner.side.fuel_to_air;

        let hp_load = ShaftLoad {
            compressor_work: hpc.side.specific_work,
            fuel_to_air: f,
            ..ShaftLoad::default()
        };
        let hpt = step(tag, trace, self.hpt, &burner.state, &env.with_shaft_load(hp_load))?;

        let lp_load = ShaftLoad {
            fuel_to_air: f,
            ..low_spool_load
        };
        let lpt = step(tag, trace, self.lpt, &hpt.state, &env.with_shaft_load(lp_load))?;
        let nozzle = step(tag, trace, self.nozzle, &lpt.state, env)?;

        Ok(CoreExit {
            nozzle,
            fuel_to_air: f,
        })
    }
}

fn gas_turbine_core(
    thrust_n: f64,
    fs: &Freestream,
    fuel_rate: f64,
    trace: Trace,
    mut outputs: BTreeMap<String, f64>,
    axis: &Vector3<f64>,
) -> PerformanceCore {
    if thrust_n > 0.0 {
        outputs.insert("tsfc_kg_per_ns".to_string(), fuel_rate / thrust_n);
    }
    PerformanceCore {
        thrust: axis * thrust_n,
        power_w: thrust_n * fs.velocity_mps,
        draw: EnergyDraw::fuel(fuel_rate),
        trace: trace.into_records(),
        outputs,
    }
}

impl Turbofan {
    pub(crate) fn validate(&self, tag: &str) -> AssemblyResult<()> {
        check_stage(tag, &self.ram)?;
        check_stage(tag, &self.inlet)?;
        check_stage(tag, &self.fan)?;
        check_stage(tag, &self.low_pressure_compressor)?;
        check_stage(tag, &self.high_pressure_compressor)?;
        check_stage(tag, &self.combustor)?;
        check_stage(tag, &self.high_pressure_turbine)?;
        check_stage(tag, &self.low_pressure_turbine)?;
        check_stage(tag, &self.core_nozzle)?;
        check_stage(tag, &self.fan_nozzle)?;
        if !self.bypass_ratio.is_finite() || self.bypass_ratio < 0.0 {
            return Err(AssemblyError::configuration(
                tag,
                "bypass ratio cannot be negative",
            ));
        }
        self.design.validate(tag)
    }

    pub(crate) fn evaluate(
        &self,
        tag: &str,
        axis: &Vector3<f64>,
        cond: &OperatingConditions,
    ) -> AssemblyResult<Evaluation> {
        let fs = &cond.freestream;
        let env = cond.stage_env();
        let mut trace = Trace::default();
        let start = FlowState::from_freestream(fs)
            .in_stage("freestream")
            .in_assembly(tag)?;

        let ram = step(tag, &mut trace, &self.ram, &start, &env)?;
        let inlet = step(tag, &mut trace, &self.inlet, &ram.state, &env)?;
        let mdot_core = self.design.core_mass_flow(&inlet.state, cond.throttle);

        let fan = step(tag, &mut trace, &self.fan, &inlet.state, &env)?;
        let fan_nozzle = step(tag, &mut trace, &self.fan_nozzle, &fan.state, &env)?;
        let lpc = step(
            tag,
            &mut trace,
            &self.low_pressure_compressor,
            &fan.state,
            &env,
        )?;

        let section = CoreSection {
            hpc: &self.high_pressure_compressor,
            combustor: &self.combustor,
            hpt: &self.high_pressure_turbine,
            lpt: &self.low_pressure_turbine,
            nozzle: &self.core_nozzle,
        };
        // Core flow passes the fan too; the bypass share enters through α.
        let low_spool = ShaftLoad {
            compressor_work: lpc.side.specific_work + fan.side.specific_work,
            fan_work: fan.side.specific_work,
            bypass_ratio: self.bypass_ratio,
            offtake_work: self.design.offtake_work(mdot_core),
            ..ShaftLoad::default()
        };
        let core = section.run(tag, &mut trace, &lpc.state, &env, low_spool)?;

        let u0 = fs.velocity_mps;
        let f = core.fuel_to_air;
        let specific_thrust = (1.0 + f) * nozzle_specific_thrust(&core.nozzle, fs) - u0
            + self.bypass_ratio * (nozzle_specific_thrust(&fan_nozzle, fs) - u0);
        let thrust_n = specific_thrust * mdot_core;

        let mut outputs = BTreeMap::new();
        outputs.insert("core_mass_flow_kgps".to_string(), mdot_core);
        outputs.insert("fuel_to_air".to_string(), f);
        outputs.insert("specific_thrust_mps".to_string(), specific_thrust);
        outputs.insert(
            "core_exit_velocity_mps".to_string(),
            core.nozzle.side.exit_velocity_mps,
        );
        outputs.insert(
            "fan_exit_velocity_mps".to_string(),
            fan_nozzle.side.exit_velocity_mps,
        );

        Ok(Evaluation::uncoupled(gas_turbine_core(
            thrust_n,
            fs,
            f * mdot_core,
            trace,
            outputs,
            axis,
        )))
    }
}

impl Turbojet {
    pub(crate) fn validate(&self, tag: &str) -> AssemblyResult<()> {
        check_stage(tag, &self.ram)?;
        check_stage(tag, &self.inlet)?;
        check_stage(tag, &self.low_pressure_compressor)?;
        check_stage(tag, &self.high_pressure_compressor)?;
        check_stage(tag, &self.combustor)?;
        check_stage(tag, &self.high_pressure_turbine)?;
        check_stage(tag, &self.low_pressure_turbine)?;
        check_stage(tag, &self.core_nozzle)?;
        self.design.validate(tag)
    }

    pub(crate) fn evaluate(
        &self,
        tag: &str,
        axis: &Vector3<f64>,
        cond: &OperatingConditions,
    ) -> AssemblyResult<Evaluation> {
        let fs = &cond.freestream;
        let env = cond.stage_env();
        let mut trace = Trace::default();
        let start = FlowState::from_freestream(fs)
            .in_stage("freestream")
            .in_assembly(tag)?;

        let ram = step(tag, &mut trace, &self.ram, &start, &env)?;
        let inlet = step(tag, &mut trace, &self.inlet, &ram.state, &env)?;
        let mdot_core = self.design.core_mass_flow(&inlet.state, cond.throttle);
        let lpc = step(
            tag,
            &mut trace,
            &self.low_pressure_compressor,
            &inlet.state,
            &env,
        )?;

        let section = CoreSection {
            hpc: &self.high_pressure_compressor,
            combustor: &self.combustor,
            hpt: &self.high_pressure_turbine,
            lpt: &self.low_pressure_turbine,
            nozzle: &self.core_nozzle,
        };
        let low_spool = ShaftLoad {
            compressor_work: lpc.side.specific_work,
            offtake_work: self.design.offtake_work(mdot_core),
            ..ShaftLoad::default()
        };
        let core = section.run(tag, &mut trace, &lpc.state, &env, low_spool)?;

        let f = core.fuel_to_air;
        let specific_thrust =
            (1.0 + f) * nozzle_specific_thrust(&core.nozzle, fs) - fs.velocity_mps;
        let thrust_n = specific_thrust * mdot_core;

        let mut outputs = BTreeMap::new();
        outputs.insert("core_mass_flow_kgps".to_string(), mdot_core);
        outputs.insert("fuel_to_air".to_string(), f);
        outputs.insert("specific_thrust_mps".to_string(), specific_thrust);
        outputs.insert(
            "core_exit_velocity_mps".to_string(),
            core.nozzle.side.exit_velocity_mps,
        );

        Ok(Evaluation::uncoupled(gas_turbine_core(
            thrust_n,
            fs,
            f * mdot_core,
            trace,
            outputs,
            axis,
        )))
    }
}

/// Stage slots for a turbofan under construction.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TurbofanSlots {
    pub ram: Option<Ram>,
    pub inlet: Option<CompressionNozzle>,
    pub fan: Option<Fan>,
    pub low_pressure_compressor: Option<Compressor>,
    pub high_pressure_compressor: Option<Compressor>,
    pub combustor: Option<Combustor>,
    pub high_pressure_turbine: Option<Turbine>,
    pub low_pressure_turbine: Option<Turbine>,
    pub core_nozzle: Option<ExpansionNozzle>,
    pub fan_nozzle: Option<ExpansionNozzle>,
    pub bypass_ratio: Option<f64>,
    pub design: Option<GasTurbineDesign>,
}

impl VariantSlots for TurbofanSlots {
    fn finish(self, tag: &str) -> AssemblyResult<PropulsorVariant> {
        Ok(PropulsorVariant::Turbofan(Turbofan {
            ram: require(self.ram, tag, "ram")?,
            inlet: require(self.inlet, tag, "inlet")?,
            fan: require(self.fan, tag, "fan")?,
            low_pressure_compressor: require(
                self.low_pressure_compressor,
                tag,
                "low_pressure_compressor",
            )?,
            high_pressure_compressor: require(
                self.high_pressure_compressor,
                tag,
                "high_pressure_compressor",
            )?,
            combustor: require(self.combustor, tag, "combustor")?,
            high_pressure_turbine: require(
                self.high_pressure_turbine,
                tag,
                "high_pressure_turbine",
            )?,
            low_pressure_turbine: require(self.low_pressure_turbine, tag, "low_pressure_turbine")?,
            core_nozzle: require(self.core_nozzle, tag, "core_nozzle")?,
            fan_nozzle: require(self.fan_nozzle, tag, "fan_nozzle")?,
            bypass_ratio: require(self.bypass_ratio, tag, "bypass_ratio")?,
            design: require(self.design, tag, "design")?,
        }))
    }
}

/// Stage slots for a turbojet under construction.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TurbojetSlots {
    pub ram: Option<Ram>,
    pub inlet: Option<CompressionNozzle>,
    pub low_pressure_compressor: Option<Compressor>,
    pub high_pressure_compressor: Option<Compressor>,
    pub combustor: Option<Combustor>,
    pub high_pressure_turbine: Option<Turbine>,
    pub low_pressure_turbine: Option<Turbine>,
    pub core_nozzle: Option<ExpansionNozzle>,
    pub design: Option<GasTurbineDesign>,
}

impl VariantSlots for TurbojetSlots {
    fn finish(self, tag: &str) -> AssemblyResult<PropulsorVariant> {
        Ok(PropulsorVariant::Turbojet(Turbojet {
            ram: require(self.ram, tag, "ram")?,
            inlet: require(self.inlet, tag, "inlet")?,
            low_pressure_compressor: require(
                self.low_pressure_compressor,
                tag,
                "low_pressure_compressor",
            )?,
            high_pressure_compressor: require(
                self.high_pressure_compressor,
                tag,
                "high_pressure_compressor",
            )?,
            combustor: require(self.combustor, tag, "combustor")?,
            high_pressure_turbine: require(
                self.high_pressure_turbine,
                tag,
                "high_pressure_turbine",
            )?,
            low_pressure_turbine: require(self.low_pressure_turbine, tag, "low_pressure_turbine")?,
            core_nozzle: require(self.core_nozzle, tag, "core_nozzle")?,
            design: require(self.design, tag, "design")?,
        }))
    }
}

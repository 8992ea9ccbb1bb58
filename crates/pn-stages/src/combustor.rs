//! Combustor stage.

use crate::common::{check_efficiency, check_positive};
use crate::error::{InStage, StageError, StageResult};
use crate::traits::{ConversionStage, SideOutputs, StageEnv, StageKind, StageOutput};
use pn_core::units::{k, pa};
use pn_flow::FlowState;
use serde::{Deserialize, Serialize};

/// Burner holding a commanded turbine-inlet temperature.
///
/// ## Model
///
/// ```text
/// ht4    = cp · Tt4
/// f      = (ht4 − ht_in) / (η_b · h_fuel − ht4)
/// Pt_out = Pt_in · π_b
/// Tt_out = Tt4
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Combustor {
    pub name: String,
    pub pressure_ratio: f64,
    pub efficiency: f64,
    pub turbine_inlet_temperature_k: f64,
    /// Fuel lower heating value (J/kg)
    pub fuel_heating_value: f64,
}

impl Combustor {
    pub fn new(
        name: impl Into<String>,
        pressure_ratio: f64,
        efficiency: f64,
        turbine_inlet_temperature_k: f64,
        fuel_heating_value: f64,
    ) -> StageResult<Self> {
        let stage = Self {
            name: name.into(),
            pressure_ratio,
            efficiency,
            turbine_inlet_temperature_k,
            fuel_heating_value,
        };
        stage.validate()?;
        Ok(stage)
    }

    /// Fuel-to-air ratio needed to raise `ht_in` to the turbine-inlet enthalpy.
    pub fn fuel_to_air_ratio(&self, cp: f64, ht_in: f64) -> StageResult<f64> {
        let ht4 = cp * self.turbine_inlet_temperature_k;
        let denom = self.efficiency * self.fuel_heating_value - ht4;
        if denom <= 0.0 {
            return Err(StageError::invalid_state(
                &self.name,
                "fuel energy cannot reach turbine-inlet enthalpy",
            ));
        }
        let f = (ht4 - ht_in) / denom;
        if f < 0.0 {
            return Err(StageError::invalid_state(
                &self.name,
                "combustor inlet hotter than turbine-inlet temperature",
            ));
        }
        Ok(f)
    }
}

impl ConversionStage for Combustor {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::Combustor
    }

    fn validate(&self) -> StageResult<()> {
        check_positive(self.pressure_ratio, "burner pressure ratio must be positive")?;
        check_efficiency(self.efficiency, "burner efficiency must be in (0,1]")?;
        check_positive(
            self.turbine_inlet_temperature_k,
            "turbine-inlet temperature must be positive",
        )?;
        check_positive(self.fuel_heating_value, "fuel heating value must be positive")
    }

    fn evaluate(&self, inlet: &FlowState, _env: &StageEnv<'_>) -> StageResult<StageOutput> {
        let gas = *inlet.gas();
        let f = self.fuel_to_air_ratio(gas.cp, inlet.total_enthalpy())?;
        let pt_out = inlet.total_pressure().value * self.pressure_ratio;

        let state = FlowState::from_stagnation(
            k(self.turbine_inlet_temperature_k),
            pa(pt_out),
            inlet.mach(),
            gas,
        )
        .in_stage(&self.name)?
        .with_electrical_from(inlet);

        let side = SideOutputs {
            specific_work: state.total_enthalpy() - inlet.total_enthalpy(),
            fuel_to_air: f,
            ..SideOutputs::default()
        };
        Ok(StageOutput::new(state, side))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pn_flow::{Freestream, GasProperties};

    #[test]
    fn reference_fuel_to_air_ratio() {
        let gas = GasProperties::air().with_cp(1100.0).unwrap();
        let inlet = FlowState::from_stagnation(k(800.0), pa(2_000_000.0), 0.0, gas).unwrap();
        let fs = Freestream::sea_level(0.0).unwrap();
        let burner = Combustor::new("burner", 0.95, 1.0, 1500.0, 43.0e6).unwrap();

        let out = burner.evaluate(&inlet, &StageEnv::new(&fs)).unwrap();
        let expected = (1100.0 * 1500.0 - 1100.0 * 800.0) / (43.0e6 - 1100.0 * 1500.0);
        assert!((out.side.fuel_to_air - expected).abs() < 1e-15);
        assert!((out.side.fuel_to_air - 0.0186).abs() < 1e-4);
        assert_eq!(out.state.total_temperature().value, 1500.0);
        assert!((out.state.total_pressure().value - 1_900_000.0).abs() < 1e-6);
    }

    #[test]
    fn inlet_hotter_than_tt4_is_invalid() {
        let inlet =
            FlowState::from_stagnation(k(1600.0), pa(2_000_000.0), 0.0, GasProperties::air())
                .unwrap();
        let fs = Freestream::sea_level(0.0).unwrap();
        let burner = Combustor::new("burner", 0.95, 0.99, 1500.0, 43.0e6).unwrap();
        let err = burner.evaluate(&inlet, &StageEnv::new(&fs)).unwrap_err();
        assert!(err.is_invalid_state());
    }
}

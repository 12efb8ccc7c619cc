// src/evolve.rs - Forward-Euler thermal history integration.
//
// The loop is deliberately plain: fetch properties, form the Rayleigh
// number, balance production against loss, step the potential temperature.
// Time is tracked as an integer step count multiplied by dt so that long
// runs never accumulate floating-point drift in the time axis.

use crate::constants::{
    DEFAULT_DT_GYR, DEFAULT_TMAX_GYR, SECONDS_PER_GYR, STATIC_REFERENCE_TEMP_K, STO_TP0_K,
    TARGET_BAND_K,
};
use crate::convection::rayleigh;
use crate::error::{EvolveError, Result};
use crate::planet::PlanetState;
use crate::thermals::{benchmark_thermals, ThermalTable};
use serde::{Deserialize, Serialize};

/// Where the integrator gets {alpha, Cp, k} each step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum PropertyMode {
    /// Interpolate the thermal table at the current potential temperature.
    Dynamic,
    /// Interpolate the table once at a fixed reference temperature; the
    /// viscosity still tracks the evolving temperature.
    Static { reference_temp_k: f64 },
    /// Hard-coded benchmark constants; no table needed.
    Benchmark,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RunParams {
    pub dt_gyr: f64,
    pub tmax_gyr: f64,
    /// Starting potential temperature.
    pub tp0_k: f64,
    pub mode: PropertyMode,
    /// Hard cap on iterations; `None` derives one from tmax/dt.
    pub max_steps: Option<usize>,
}

impl RunParams {
    pub fn new(tp0_k: f64, mode: PropertyMode) -> Self {
        RunParams {
            dt_gyr: DEFAULT_DT_GYR,
            tmax_gyr: DEFAULT_TMAX_GYR,
            tp0_k,
            mode,
            max_steps: None,
        }
    }

    /// Defaults for the static-property configuration most batch runs use.
    pub fn static_reference(tp0_k: f64) -> Self {
        Self::new(
            tp0_k,
            PropertyMode::Static {
                reference_temp_k: STATIC_REFERENCE_TEMP_K,
            },
        )
    }

    /// The benchmark run configuration, paired with
    /// [`PlanetState::sto_benchmark`].
    pub fn sto_benchmark() -> Self {
        Self::new(STO_TP0_K, PropertyMode::Benchmark)
    }
}

/// One recorded instant of the thermal history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EvolutionStep {
    pub time_gyr: f64,
    pub tp_k: f64,
    pub viscosity_pa_s: f64,
    pub rayleigh: f64,
    pub production_w: f64,
    pub loss_w: f64,
    /// Urey ratio, production / loss.
    pub urey: f64,
    pub alpha_per_k: f64,
    pub cp_j_kg_k: f64,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Reached tmax. `within_band` is set when the planet declared a target
    /// temperature: did the final temperature land within the band?
    Completed { within_band: Option<bool> },
    /// The energy balance drove the temperature below zero; physically the
    /// parameters describe a mantle that cannot sustain this history. The
    /// recorded steps end at the last physical state.
    Aborted {
        step: usize,
        time_gyr: f64,
        tp_k: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evolution {
    pub steps: Vec<EvolutionStep>,
    pub outcome: RunOutcome,
}

impl Evolution {
    pub fn final_step(&self) -> Option<&EvolutionStep> {
        self.steps.last()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Evolution> {
        serde_json::from_str(text)
    }
}

/// Integrates the planet's thermal history. The planet and table are
/// read-only; every run from the same inputs produces the same record.
pub fn evolve(
    planet: &PlanetState,
    table: Option<&ThermalTable>,
    params: &RunParams,
) -> Result<Evolution> {
    if params.dt_gyr <= 0.0 || !params.dt_gyr.is_finite() {
        return Err(EvolveError::InvalidParameter(format!(
            "dt must be positive and finite, got {} Gyr",
            params.dt_gyr
        )));
    }
    if params.tmax_gyr < 0.0 || !params.tmax_gyr.is_finite() {
        return Err(EvolveError::InvalidParameter(format!(
            "tmax must be non-negative and finite, got {} Gyr",
            params.tmax_gyr
        )));
    }

    let need_table = || {
        table.ok_or_else(|| {
            EvolveError::InvalidParameter(
                "dynamic and static property modes require a thermal table".to_string(),
            )
        })
    };
    // Static and benchmark properties never change; resolve them up front.
    let fixed = match params.mode {
        PropertyMode::Dynamic => {
            need_table()?;
            None
        }
        PropertyMode::Static { reference_temp_k } => Some(need_table()?.lookup(reference_temp_k)?),
        PropertyMode::Benchmark => Some(benchmark_thermals()),
    };

    let max_steps = params
        .max_steps
        .unwrap_or(4 * (params.tmax_gyr / params.dt_gyr) as usize + 16);
    let q0_w = planet.initial_production_w();
    let mantle_mass_kg = planet.mantle_mass_kg();
    // Tolerate one ulp of accumulated scale error so tmax itself is recorded.
    let time_limit = params.tmax_gyr * (1.0 + 1.0e-12);

    let mut steps: Vec<EvolutionStep> = Vec::new();
    let mut tp_k = params.tp0_k;
    let mut step = 0usize;
    let outcome = loop {
        let time_gyr = step as f64 * params.dt_gyr;
        if time_gyr > time_limit {
            let within_band = planet
                .target_temp_k
                .map(|target| (tp_k - target).abs() <= TARGET_BAND_K);
            break RunOutcome::Completed { within_band };
        }
        if step > max_steps {
            return Err(EvolveError::StepLimitExceeded { max_steps });
        }

        let (alpha_per_k, cp_j_kg_k, k_w_m_k) = match fixed {
            Some(properties) => properties,
            None => need_table()?.lookup(tp_k)?,
        };
        let viscosity_pa_s = planet.viscosity.viscosity_pa_s(tp_k);
        let ra = rayleigh(
            planet.mantle_depth_m,
            planet.surface_gravity_m_s2,
            planet.mantle_density_kg_m3,
            tp_k,
            planet.surface_temp_k,
            viscosity_pa_s,
            alpha_per_k,
            cp_j_kg_k,
            k_w_m_k,
        );
        let production_w = planet.heat_source.produce_w(q0_w, time_gyr);
        let loss_w = planet.heat_flux.loss_w(
            planet.surface_area_m2,
            planet.mantle_depth_m,
            &planet.viscosity,
            k_w_m_k,
            tp_k,
            planet.surface_temp_k,
            ra,
        );
        steps.push(EvolutionStep {
            time_gyr,
            tp_k,
            viscosity_pa_s,
            rayleigh: ra,
            production_w,
            loss_w,
            urey: production_w / loss_w,
            alpha_per_k,
            cp_j_kg_k,
        });

        let dtp_k = params.dt_gyr * SECONDS_PER_GYR * (production_w - loss_w)
            / (cp_j_kg_k * mantle_mass_kg);
        let next_tp_k = tp_k + dtp_k;
        if next_tp_k < 0.0 {
            break RunOutcome::Aborted {
                step,
                time_gyr: time_gyr + params.dt_gyr,
                tp_k: next_tp_k,
            };
        }
        tp_k = next_tp_k;
        step += 1;
    };

    Ok(Evolution { steps, outcome })
}

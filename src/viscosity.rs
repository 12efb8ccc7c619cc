// src/viscosity.rs - Arrhenius-law mantle viscosity.

use crate::composition::Composition;
use crate::constants::{
    DEFAULT_ACTIVATION_ENERGY_J_MOL, DEFAULT_FLUX_COEFFICIENT, DEFAULT_VISC_PREFACTOR_PA_S,
    GAS_CONSTANT, PREFACTOR_CONVENTION_THRESHOLD_PA_S, STATIC_REFERENCE_TEMP_K,
};
use crate::mineral::get_profile;
use serde::{Deserialize, Serialize};

/// How the Arrhenius prefactor is to be read.
///
/// Two parameterizations circulate for the same law: `visc0` as the literal
/// prefactor (`Absolute`), or `visc0` as the viscosity *at* a reference
/// temperature (`ReferencedTo`). `Auto` preserves the historical numeric
/// disambiguation: prefactors above [`PREFACTOR_CONVENTION_THRESHOLD_PA_S`]
/// are implausible as absolute values and are treated as referenced to
/// [`STATIC_REFERENCE_TEMP_K`]. Callers who know which convention their
/// parameters use should say so instead of relying on `Auto`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PrefactorConvention {
    Absolute,
    ReferencedTo(f64),
    Auto,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ViscosityLaw {
    pub prefactor_pa_s: f64,
    pub activation_energy_j_mol: f64,
    pub convention: PrefactorConvention,
}

impl ViscosityLaw {
    /// The olivine baseline with an explicit absolute prefactor.
    pub fn olivine() -> Self {
        ViscosityLaw {
            prefactor_pa_s: DEFAULT_VISC_PREFACTOR_PA_S,
            activation_energy_j_mol: DEFAULT_ACTIVATION_ENERGY_J_MOL,
            convention: PrefactorConvention::Absolute,
        }
    }

    /// Resolves `Auto` into one of the two concrete conventions. Called once
    /// at planet construction so the integration loop never guesses.
    pub fn resolved(self) -> Self {
        let convention = match self.convention {
            PrefactorConvention::Auto => {
                if self.prefactor_pa_s > PREFACTOR_CONVENTION_THRESHOLD_PA_S {
                    PrefactorConvention::ReferencedTo(STATIC_REFERENCE_TEMP_K)
                } else {
                    PrefactorConvention::Absolute
                }
            }
            other => other,
        };
        ViscosityLaw { convention, ..self }
    }

    /// Viscosity at `tp_k`, in Pa·s:
    /// `visc0 · exp(Ev/(R·Tp))`, or with a reference temperature,
    /// `visc0 · exp(Ev/(R·Tp) − Ev/(R·Tref))` so that `visc0` is literally
    /// the viscosity at `Tref`.
    pub fn viscosity_pa_s(&self, tp_k: f64) -> f64 {
        let arrhenius = self.activation_energy_j_mol / (GAS_CONSTANT * tp_k);
        match self.resolved().convention {
            PrefactorConvention::Absolute => self.prefactor_pa_s * arrhenius.exp(),
            PrefactorConvention::ReferencedTo(ref_k) => {
                let reference = self.activation_energy_j_mol / (GAS_CONSTANT * ref_k);
                self.prefactor_pa_s * (arrhenius - reference).exp()
            }
            PrefactorConvention::Auto => unreachable!("resolved() removes Auto"),
        }
    }

    /// Viscosity parameters from a bulk composition: the activation energy
    /// is the fraction-weighted mix of the per-phase values, with the
    /// olivine default standing in for phases without one. Returns the flux
    /// coefficient c1 alongside, matching the historical lookup that
    /// produced (c1, Ev, visc0) together.
    pub fn from_composition(composition: &Composition) -> (f64, Self) {
        let mut ev = 0.0;
        let mut total = 0.0;
        for (mineral, fraction) in composition.iter() {
            if fraction <= 0.0 {
                continue;
            }
            ev += fraction
                * get_profile(mineral)
                    .activation_energy_j_mol
                    .unwrap_or(DEFAULT_ACTIVATION_ENERGY_J_MOL);
            total += fraction;
        }
        let activation_energy = if total > 0.0 {
            ev / total
        } else {
            DEFAULT_ACTIVATION_ENERGY_J_MOL
        };
        (
            DEFAULT_FLUX_COEFFICIENT,
            ViscosityLaw {
                prefactor_pa_s: DEFAULT_VISC_PREFACTOR_PA_S,
                activation_energy_j_mol: activation_energy,
                convention: PrefactorConvention::Absolute,
            },
        )
    }
}

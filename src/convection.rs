// src/convection.rs - Rayleigh number and boundary-layer heat-flux closures.
//
// Several historical variants of the flux law differed only in constants and
// optional terms; they are collapsed here into one enum selected per run.

use crate::constants::GAS_CONSTANT;
use crate::viscosity::ViscosityLaw;
use serde::{Deserialize, Serialize};

/// Whole-mantle Rayleigh number:
/// `Ra = pm² · g · alpha · (Tp − Ts) · d³ · Cp / (k · viscosity)`.
#[allow(clippy::too_many_arguments)]
pub fn rayleigh(
    depth_m: f64,
    gravity_m_s2: f64,
    mantle_density_kg_m3: f64,
    tp_k: f64,
    ts_k: f64,
    viscosity_pa_s: f64,
    alpha_per_k: f64,
    cp_j_kg_k: f64,
    k_w_m_k: f64,
) -> f64 {
    mantle_density_kg_m3.powi(2) * gravity_m_s2 * alpha_per_k * (tp_k - ts_k) * depth_m.powi(3)
        * cp_j_kg_k
        / (k_w_m_k * viscosity_pa_s)
}

/// Frank-Kamenetskii parameter: how strongly viscosity varies across the
/// thermal boundary layer. `theta = Ev · (Tp − Ts) / (R · Tp²)`.
pub fn frank_kamenetskii(activation_energy_j_mol: f64, tp_k: f64, ts_k: f64) -> f64 {
    activation_energy_j_mol * (tp_k - ts_k) / (GAS_CONSTANT * tp_k.powi(2))
}

/// The convective heat-loss closure for a run. All variants return total
/// mantle heat loss in W through the surface area `sa_m2`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum HeatFlux {
    /// Nu-Ra scaling with the Frank-Kamenetskii correction:
    /// `F = Sa · (c1 · k · (Tp − Ts) / d) · theta^−(1+beta) · Ra^beta`.
    BoundaryLayer { c1: f64, beta: f64 },
    /// Scaling from a known flux `Q0` at a reference temperature, for runs
    /// constrained by an absolute initial heat flux instead of material
    /// viscosity parameters:
    /// `F = Q0 · (Tp/Tref)^(1+beta) · (visc(Tref)/visc(Tp))^beta`.
    ScaledFlux {
        q0_w: f64,
        scaletemp_k: f64,
        beta: f64,
    },
    /// The classical critical-Rayleigh form used by the benchmark case:
    /// `F = Sa · (k · (Tp − Ts) / d) · (Ra/Ra_cr)^beta`.
    CriticalRayleigh { ra_cr: f64, beta: f64 },
}

impl HeatFlux {
    #[allow(clippy::too_many_arguments)]
    pub fn loss_w(
        &self,
        sa_m2: f64,
        depth_m: f64,
        law: &ViscosityLaw,
        k_w_m_k: f64,
        tp_k: f64,
        ts_k: f64,
        ra: f64,
    ) -> f64 {
        match *self {
            HeatFlux::BoundaryLayer { c1, beta } => {
                let theta = frank_kamenetskii(law.activation_energy_j_mol, tp_k, ts_k);
                sa_m2 * (c1 * k_w_m_k * (tp_k - ts_k) / depth_m)
                    * theta.powf(-(1.0 + beta))
                    * ra.powf(beta)
            }
            HeatFlux::ScaledFlux {
                q0_w,
                scaletemp_k,
                beta,
            } => {
                let visc_ratio = law.viscosity_pa_s(scaletemp_k) / law.viscosity_pa_s(tp_k);
                q0_w * (tp_k / scaletemp_k).powf(1.0 + beta) * visc_ratio.powf(beta)
            }
            HeatFlux::CriticalRayleigh { ra_cr, beta } => {
                sa_m2 * (k_w_m_k * (tp_k - ts_k) / depth_m) * (ra / ra_cr).powf(beta)
            }
        }
    }

    pub fn beta(&self) -> f64 {
        match *self {
            HeatFlux::BoundaryLayer { beta, .. }
            | HeatFlux::ScaledFlux { beta, .. }
            | HeatFlux::CriticalRayleigh { beta, .. } => beta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_BETA, DEFAULT_FLUX_COEFFICIENT, SURFACE_TEMP_K};
    use approx::assert_relative_eq;
    use more_asserts::{assert_gt, assert_lt};

    fn olivine() -> ViscosityLaw {
        ViscosityLaw::olivine()
    }

    #[test]
    fn rayleigh_matches_closed_form() {
        let ra = rayleigh(2.9e6, 9.8, 4400.0, 2000.0, 300.0, 1.0e19, 3.0e-5, 1250.0, 5.0);
        let expected = 4400.0_f64.powi(2) * 9.8 * 3.0e-5 * 1700.0 * 2.9e6_f64.powi(3) * 1250.0
            / (5.0 * 1.0e19);
        assert_relative_eq!(ra, expected, max_relative = 1e-12);
    }

    #[test]
    fn stiffer_mantle_convects_less_vigorously() {
        let soft = rayleigh(2.9e6, 9.8, 4400.0, 2000.0, 300.0, 1.0e19, 3.0e-5, 1250.0, 5.0);
        let stiff = rayleigh(2.9e6, 9.8, 4400.0, 2000.0, 300.0, 1.0e21, 3.0e-5, 1250.0, 5.0);
        assert_lt!(stiff, soft);
    }

    #[test]
    fn frank_kamenetskii_grows_with_activation_energy() {
        let low = frank_kamenetskii(261.0e3, 2000.0, SURFACE_TEMP_K);
        let high = frank_kamenetskii(420.0e3, 2000.0, SURFACE_TEMP_K);
        assert_gt!(high, low);
        // Earth-like values land near theta ~ 10-20.
        assert_gt!(low, 5.0);
        assert_lt!(high, 40.0);
    }

    #[test]
    fn boundary_layer_flux_increases_with_rayleigh() {
        let flux = HeatFlux::BoundaryLayer {
            c1: DEFAULT_FLUX_COEFFICIENT,
            beta: DEFAULT_BETA,
        };
        let law = olivine();
        let lo = flux.loss_w(5.1e14, 2.9e6, &law, 5.0, 2000.0, SURFACE_TEMP_K, 1.0e7);
        let hi = flux.loss_w(5.1e14, 2.9e6, &law, 5.0, 2000.0, SURFACE_TEMP_K, 1.0e9);
        assert_gt!(hi, lo);
        assert_relative_eq!(hi / lo, 100.0_f64.powf(DEFAULT_BETA), max_relative = 1e-9);
    }

    #[test]
    fn scaled_flux_reproduces_q0_at_reference() {
        let flux = HeatFlux::ScaledFlux {
            q0_w: 3.6e13,
            scaletemp_k: 1625.0,
            beta: DEFAULT_BETA,
        };
        let law = olivine();
        let at_ref = flux.loss_w(5.1e14, 2.9e6, &law, 5.0, 1625.0, SURFACE_TEMP_K, 1.0e8);
        assert_relative_eq!(at_ref, 3.6e13, max_relative = 1e-12);
        // Hotter mantle is runnier, so it loses more heat.
        let hotter = flux.loss_w(5.1e14, 2.9e6, &law, 5.0, 1800.0, SURFACE_TEMP_K, 1.0e8);
        assert_gt!(hotter, at_ref);
    }

    #[test]
    fn critical_rayleigh_flux_vanishes_at_threshold_times_conduction() {
        let flux = HeatFlux::CriticalRayleigh {
            ra_cr: 1100.0,
            beta: 0.3,
        };
        let law = olivine();
        let at_crit = flux.loss_w(5.1e14, 2.8e6, &law, 4.18, 3273.0, 273.0, 1100.0);
        // At Ra == Ra_cr the scaling factor is 1: pure conductive flux.
        let conductive = 5.1e14 * 4.18 * 3000.0 / 2.8e6;
        assert_relative_eq!(at_crit, conductive, max_relative = 1e-12);
    }
}

// src/radiogenic.rs - Time-decaying internal heat production.

use serde::{Deserialize, Serialize};

/// One radionuclide's contribution to mantle heating. Weight fractions are
/// early-Earth (4.55 Ga) values normalized to total U; decay constants are
/// per Gyr.
#[derive(Debug, Clone, Copy)]
pub struct Radioisotope {
    pub name: &'static str,
    /// Abundance relative to Earth's inventory.
    pub relative_abundance: f64,
    pub weight_fraction: f64,
    pub decay_per_gyr: f64,
}

pub const RADIOISOTOPES: [Radioisotope; 4] = [
    Radioisotope {
        name: "238U",
        relative_abundance: 1.0,
        weight_fraction: 0.15053,
        decay_per_gyr: 0.155,
    },
    Radioisotope {
        name: "235U",
        relative_abundance: 1.0,
        weight_fraction: 0.28976,
        decay_per_gyr: 0.985,
    },
    Radioisotope {
        name: "232Th",
        relative_abundance: 1.0,
        weight_fraction: 0.10767,
        decay_per_gyr: 0.0495,
    },
    Radioisotope {
        name: "40K",
        relative_abundance: 1.0,
        weight_fraction: 0.45204,
        decay_per_gyr: 0.555,
    },
];

/// Which decay law scales the planet's initial production `Q0` over time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum HeatProduction {
    /// `H(t) = Q0 · Σ_i amt_i · wtfrac_i · exp(−lambda_i · t)` over the four
    /// long-lived isotopes.
    IsotopeSum,
    /// `H(t) = Q0 · exp(−decay · t)`, for parameter sets that carry a single
    /// effective decay constant (per Gyr).
    EffectiveDecay { decay_per_gyr: f64 },
}

impl HeatProduction {
    /// Heat production in W at elapsed time `t_gyr`, given the planet's
    /// initial total production `q0_w` (typically Earth's per-kg rate scaled
    /// by mantle mass and a user multiplier).
    pub fn produce_w(&self, q0_w: f64, t_gyr: f64) -> f64 {
        match *self {
            HeatProduction::IsotopeSum => {
                let sum: f64 = RADIOISOTOPES
                    .iter()
                    .map(|iso| {
                        iso.relative_abundance
                            * iso.weight_fraction
                            * (-iso.decay_per_gyr * t_gyr).exp()
                    })
                    .sum();
                q0_w * sum
            }
            HeatProduction::EffectiveDecay { decay_per_gyr } => {
                q0_w * (-decay_per_gyr * t_gyr).exp()
            }
        }
    }
}

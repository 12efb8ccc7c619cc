// src/planet.rs - The resolved, validated state for one evolution run.
//
// The historical parameter sets were open-ended key/value maps mutated all
// over the integration loop; here every field is named, every default is
// resolved once at construction, and the struct is read-only during a run.

use crate::composition::Composition;
use crate::constants::{
    CMB_ADIABATIC_GRADIENT_K_PER_M, DEFAULT_BETA, EARTH_HEAT_PER_KG_W, EARTH_MASS_KG,
    EARTH_RADIUS_M, GRAV, MIN_REFERENCE_PRESSURE_GPA, SECONDS_PER_GYR,
    STO_CORE_MASS_KG, STO_DECAY_PER_S, STO_GRAVITY_M_S2,
    STO_HEAT_CAPACITY_J_KG_K, STO_HEAT_PER_KG_CP_W, STO_MANTLE_DENSITY_KG_M3,
    STO_MANTLE_DEPTH_M, STO_SURFACE_AREA_PER_KG_CP, STO_SURFACE_TEMP_K, STO_TARGET_TEMP_K,
    STO_TP0_K, STO_VISC_PREFACTOR_PA_S, SURFACE_TEMP_K, STO_ACTIVATION_TEMP_K, GAS_CONSTANT,
    STO_BETA,
};
use crate::convection::HeatFlux;
use crate::error::{EvolveError, Result};
use crate::mineral::Mineral;
use crate::profile::{RadialProfile, MASS_COLUMN};
use crate::radiogenic::HeatProduction;
use crate::viscosity::{PrefactorConvention, ViscosityLaw};
use crate::weighting::bulk_mass_fraction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::PI;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanetState {
    pub mass_kg: f64,
    pub core_mass_kg: f64,
    pub radius_m: f64,
    pub core_radius_m: f64,
    pub mantle_depth_m: f64,
    pub mantle_volume_m3: f64,
    pub surface_area_m2: f64,
    pub mantle_density_kg_m3: f64,
    pub surface_gravity_m_s2: f64,
    pub cmb_pressure_gpa: f64,
    pub cmb_temp_k: f64,
    pub reference_pressure_gpa: f64,
    pub surface_temp_k: f64,
    /// Radiogenic abundance per kg mantle relative to Earth (Qpl).
    pub radiogenic_multiplier: f64,
    /// Starting heat production per kg mantle for the reference planet (Qe).
    pub heat_per_kg_w: f64,
    pub viscosity: ViscosityLaw,
    pub heat_flux: HeatFlux,
    pub heat_source: HeatProduction,
    /// Expected final temperature; when present the run reports whether it
    /// finished within the target band.
    pub target_temp_k: Option<f64>,
}

/// Scalar inputs for a planet without a structural profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlanetScalars {
    /// Planet mass in Earth masses.
    pub mass_me: f64,
    /// Planet radius in Earth radii.
    pub radius_re: f64,
    pub core_mass_fraction: f64,
    pub core_radius_fraction: f64,
    pub radiogenic_multiplier: f64,
    /// Starting potential temperature; used for the CMB temperature estimate.
    pub tp0_k: f64,
    pub reference_pressure_gpa: f64,
}

impl PlanetState {
    /// Builds a planet from scalar inputs, deriving the mantle geometry and
    /// resolving every default once. The viscosity parameters come from the
    /// composition; the flux closure defaults to the boundary-layer form
    /// with the classical 1/3 exponent.
    pub fn from_scalars(scalars: PlanetScalars, composition: &Composition) -> Result<Self> {
        if scalars.mass_me <= 0.0 || scalars.radius_re <= 0.0 {
            return Err(EvolveError::InvalidParameter(format!(
                "planet mass and radius must be positive, got {} Me / {} Re",
                scalars.mass_me, scalars.radius_re
            )));
        }
        for (name, fraction) in [
            ("core mass fraction", scalars.core_mass_fraction),
            ("core radius fraction", scalars.core_radius_fraction),
        ] {
            if !(0.0..1.0).contains(&fraction) {
                return Err(EvolveError::InvalidParameter(format!(
                    "{name} must be in [0, 1), got {fraction}"
                )));
            }
        }

        let mass_kg = scalars.mass_me * EARTH_MASS_KG;
        let core_mass_kg = mass_kg * scalars.core_mass_fraction;
        let radius_m = scalars.radius_re * EARTH_RADIUS_M;
        let core_radius_m = radius_m * scalars.core_radius_fraction;

        let (c1, viscosity) = ViscosityLaw::from_composition(composition);
        Self::assemble(
            mass_kg,
            core_mass_kg,
            radius_m,
            core_radius_m,
            scalars.tp0_k,
            scalars.radiogenic_multiplier,
            scalars.reference_pressure_gpa,
            viscosity,
            HeatFlux::BoundaryLayer {
                c1,
                beta: DEFAULT_BETA,
            },
        )
    }

    /// Builds a planet from a structural-model profile (which must carry a
    /// cumulative `mass` column) along with its bulk composition.
    pub fn from_profile(
        profile: &RadialProfile,
        tp0_k: f64,
        radiogenic_multiplier: f64,
        reference_pressure_gpa: f64,
    ) -> Result<(Self, Composition)> {
        let radii = profile.radius_m()?;
        let pressures = profile.pressure_gpa()?;
        let masses = profile.column(MASS_COLUMN)?;

        let ascending = radii[radii.len() - 1] > radii[0];
        let (inner, outer) = if ascending {
            (0, radii.len() - 1)
        } else {
            (radii.len() - 1, 0)
        };
        let core_radius_m = radii[inner];
        let radius_m = radii[outer];
        let core_mass_kg = masses[inner];
        let mass_kg = masses[outer];
        let cmb_pressure_gpa = pressures[inner];

        let composition = bulk_mass_fraction(profile)?;
        let (c1, viscosity) = ViscosityLaw::from_composition(&composition);

        let mut planet = Self::assemble(
            mass_kg,
            core_mass_kg,
            radius_m,
            core_radius_m,
            tp0_k,
            radiogenic_multiplier,
            reference_pressure_gpa,
            viscosity,
            HeatFlux::BoundaryLayer {
                c1,
                beta: DEFAULT_BETA,
            },
        )?;
        // The profile knows the true CMB pressure; prefer it to the
        // hydrostatic estimate, and re-apply the reference-pressure rule.
        planet.cmb_pressure_gpa = cmb_pressure_gpa;
        if reference_pressure_gpa <= MIN_REFERENCE_PRESSURE_GPA {
            planet.reference_pressure_gpa = 0.5 * cmb_pressure_gpa;
        }
        Ok((planet, composition))
    }

    /// The Schubert, Turcotte & Olson (2001) benchmark planet: Earth-like
    /// geometry tuned so the analytic cooling history is known, a single
    /// effective decay constant, and the critical-Rayleigh flux law.
    pub fn sto_benchmark() -> Self {
        let mantle_mass_kg = EARTH_MASS_KG - STO_CORE_MASS_KG;
        let surface_area_m2 = STO_SURFACE_AREA_PER_KG_CP * mantle_mass_kg * STO_HEAT_CAPACITY_J_KG_K;
        let radius_m = (surface_area_m2 / (4.0 * PI)).sqrt();
        let core_radius_m = radius_m - STO_MANTLE_DEPTH_M;
        let mantle_volume_m3 = (4.0 / 3.0) * PI * (radius_m.powi(3) - core_radius_m.powi(3));
        let cmb_pressure_gpa =
            STO_MANTLE_DENSITY_KG_M3 * STO_GRAVITY_M_S2 * STO_MANTLE_DEPTH_M / 1.0e9;

        PlanetState {
            mass_kg: EARTH_MASS_KG,
            core_mass_kg: STO_CORE_MASS_KG,
            radius_m,
            core_radius_m,
            mantle_depth_m: STO_MANTLE_DEPTH_M,
            mantle_volume_m3,
            surface_area_m2,
            mantle_density_kg_m3: STO_MANTLE_DENSITY_KG_M3,
            surface_gravity_m_s2: STO_GRAVITY_M_S2,
            cmb_pressure_gpa,
            cmb_temp_k: STO_TP0_K + CMB_ADIABATIC_GRADIENT_K_PER_M * STO_MANTLE_DEPTH_M,
            reference_pressure_gpa: 0.5 * cmb_pressure_gpa,
            surface_temp_k: STO_SURFACE_TEMP_K,
            radiogenic_multiplier: 1.0,
            heat_per_kg_w: STO_HEAT_PER_KG_CP_W * STO_HEAT_CAPACITY_J_KG_K,
            viscosity: ViscosityLaw {
                prefactor_pa_s: STO_VISC_PREFACTOR_PA_S,
                activation_energy_j_mol: STO_ACTIVATION_TEMP_K * GAS_CONSTANT,
                convention: PrefactorConvention::Absolute,
            },
            heat_flux: HeatFlux::CriticalRayleigh {
                ra_cr: 1100.0,
                beta: STO_BETA,
            },
            heat_source: HeatProduction::EffectiveDecay {
                decay_per_gyr: STO_DECAY_PER_S * SECONDS_PER_GYR,
            },
            target_temp_k: Some(STO_TARGET_TEMP_K),
        }
    }

    /// Parses a tidy batch summary (`PlanetID,Parameter,Value`, one triple
    /// per line) into planets with their compositions, sorted by ID.
    /// Mineral parameters are composition entries; everything else must
    /// cover the required structural set.
    pub fn from_summary(
        text: &str,
        tp0_k: f64,
        reference_pressure_gpa: f64,
    ) -> Result<Vec<(String, PlanetState, Composition)>> {
        let mut planets: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
        for (line_index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').collect();
            let malformed = || EvolveError::MalformedSummaryLine {
                line: line_index + 1,
                text: line.to_string(),
            };
            if fields.len() != 3 {
                return Err(malformed());
            }
            let value: f64 = fields[2].trim().parse().map_err(|_| malformed())?;
            planets
                .entry(fields[0].trim().to_string())
                .or_default()
                .insert(fields[1].trim().to_string(), value);
        }

        let mut assembled = Vec::with_capacity(planets.len());
        for (id, params) in planets {
            let get = |key: &str| {
                params.get(key).copied().ok_or_else(|| {
                    EvolveError::InvalidParameter(format!(
                        "summary planet '{id}' is missing required parameter '{key}'"
                    ))
                })
            };
            let mass_kg = get("Mass_kg")?;
            let radius_m = get("Radius_m")?;
            let core_mass_kg = mass_kg * get("CMF")?;
            let core_radius_m = radius_m * get("CRF")?;
            let cmb_pressure_gpa = get("CMBP")?;

            let mut composition = Composition::new();
            for mineral in Mineral::ALL {
                if let Some(&fraction) = params.get(mineral.symbol()) {
                    if fraction > 0.0 {
                        composition.set(mineral, fraction);
                    }
                }
            }
            let composition = composition.normalize()?;
            let (c1, viscosity) = ViscosityLaw::from_composition(&composition);

            let mut planet = Self::assemble(
                mass_kg,
                core_mass_kg,
                radius_m,
                core_radius_m,
                tp0_k,
                1.0,
                reference_pressure_gpa,
                viscosity,
                HeatFlux::BoundaryLayer {
                    c1,
                    beta: DEFAULT_BETA,
                },
            )?;
            planet.cmb_pressure_gpa = cmb_pressure_gpa;
            if reference_pressure_gpa <= MIN_REFERENCE_PRESSURE_GPA {
                planet.reference_pressure_gpa = 0.5 * cmb_pressure_gpa;
            }
            assembled.push((id, planet, composition));
        }
        Ok(assembled)
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        mass_kg: f64,
        core_mass_kg: f64,
        radius_m: f64,
        core_radius_m: f64,
        tp0_k: f64,
        radiogenic_multiplier: f64,
        reference_pressure_gpa: f64,
        viscosity: ViscosityLaw,
        heat_flux: HeatFlux,
    ) -> Result<Self> {
        if core_mass_kg >= mass_kg || core_radius_m >= radius_m {
            return Err(EvolveError::InvalidParameter(
                "core must be strictly smaller than the planet".to_string(),
            ));
        }
        let mantle_depth_m = radius_m - core_radius_m;
        let mantle_volume_m3 =
            (4.0 / 3.0) * PI * (radius_m.powi(3) - core_radius_m.powi(3));
        let surface_area_m2 = 4.0 * PI * radius_m.powi(2);
        let mantle_density_kg_m3 = (mass_kg - core_mass_kg) / mantle_volume_m3;
        let surface_gravity_m_s2 = GRAV * mass_kg / radius_m.powi(2);

        // Hydrostatic CMB pressure estimate; profile-based constructors
        // overwrite it with the profiled value.
        let cmb_pressure_gpa =
            mantle_density_kg_m3 * surface_gravity_m_s2 * mantle_depth_m / 1.0e9;
        let reference_pressure_gpa = if reference_pressure_gpa <= MIN_REFERENCE_PRESSURE_GPA {
            0.5 * cmb_pressure_gpa
        } else {
            reference_pressure_gpa
        };

        Ok(PlanetState {
            mass_kg,
            core_mass_kg,
            radius_m,
            core_radius_m,
            mantle_depth_m,
            mantle_volume_m3,
            surface_area_m2,
            mantle_density_kg_m3,
            surface_gravity_m_s2,
            cmb_pressure_gpa,
            cmb_temp_k: tp0_k + CMB_ADIABATIC_GRADIENT_K_PER_M * mantle_depth_m,
            reference_pressure_gpa,
            surface_temp_k: SURFACE_TEMP_K,
            radiogenic_multiplier,
            heat_per_kg_w: EARTH_HEAT_PER_KG_W,
            viscosity: viscosity.resolved(),
            heat_flux,
            heat_source: HeatProduction::IsotopeSum,
            target_temp_k: None,
        })
    }

    pub fn mantle_mass_kg(&self) -> f64 {
        self.mass_kg - self.core_mass_kg
    }

    pub fn core_mass_fraction(&self) -> f64 {
        self.core_mass_kg / self.mass_kg
    }

    pub fn core_radius_fraction(&self) -> f64 {
        self.core_radius_m / self.radius_m
    }

    /// The planet's initial radiogenic production in W.
    pub fn initial_production_w(&self) -> f64 {
        self.heat_per_kg_w * self.radiogenic_multiplier * self.mantle_mass_kg()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::STO_CONDUCTIVITY_W_M_K;
    use approx::assert_relative_eq;
    use more_asserts::{assert_gt, assert_lt};

    fn earth_scalars() -> PlanetScalars {
        PlanetScalars {
            mass_me: 1.0,
            radius_re: 1.0,
            core_mass_fraction: 0.33,
            core_radius_fraction: 0.55,
            radiogenic_multiplier: 1.0,
            tp0_k: 2000.0,
            reference_pressure_gpa: 5.0,
        }
    }

    fn forsterite() -> Composition {
        Composition::from_pairs(&[(Mineral::Forsterite, 1.0)])
            .normalize()
            .unwrap()
    }

    #[test]
    fn earth_like_geometry_is_plausible() {
        let planet = PlanetState::from_scalars(earth_scalars(), &forsterite()).unwrap();
        assert_relative_eq!(planet.mass_kg, EARTH_MASS_KG);
        assert_relative_eq!(planet.core_mass_fraction(), 0.33, max_relative = 1e-12);
        // Mantle depth just under 2900 km, gravity near 9.8 m/s².
        assert_gt!(planet.mantle_depth_m, 2.8e6);
        assert_lt!(planet.mantle_depth_m, 2.95e6);
        assert_gt!(planet.surface_gravity_m_s2, 9.7);
        assert_lt!(planet.surface_gravity_m_s2, 9.9);
        assert_gt!(planet.mantle_density_kg_m3, 4000.0);
        assert_lt!(planet.mantle_density_kg_m3, 5000.0);
        // Initial production within a factor of a few of modern Earth's heat loss.
        assert_gt!(planet.initial_production_w(), 1.0e14);
        assert_lt!(planet.initial_production_w(), 2.0e14);
    }

    #[test]
    fn low_reference_pressure_falls_back_to_half_cmb() {
        let mut scalars = earth_scalars();
        scalars.reference_pressure_gpa = 2.0;
        let planet = PlanetState::from_scalars(scalars, &forsterite()).unwrap();
        assert_relative_eq!(
            planet.reference_pressure_gpa,
            0.5 * planet.cmb_pressure_gpa,
            max_relative = 1e-12
        );
    }

    #[test]
    fn oversized_core_is_rejected() {
        let mut scalars = earth_scalars();
        scalars.core_radius_fraction = 1.5;
        assert!(PlanetState::from_scalars(scalars, &forsterite()).is_err());
    }

    #[test]
    fn profile_constructor_reads_structure() {
        let text = "radius,density,pressure,mass,O,Pv\n\
                    3500.0,5.5,130.0,1.9e24,40.0,60.0\n\
                    5000.0,4.5,60.0,3.9e24,50.0,50.0\n\
                    6371.0,3.3,0.5,5.97e24,80.0,20.0\n";
        let profile = RadialProfile::from_delimited_str(text, ',').unwrap();
        let (planet, composition) =
            PlanetState::from_profile(&profile, 1800.0, 1.0, 5.0).unwrap();
        assert_relative_eq!(planet.radius_m, 6.371e6);
        assert_relative_eq!(planet.core_radius_m, 3.5e6);
        assert_relative_eq!(planet.mass_kg, 5.97e24);
        assert_relative_eq!(planet.core_mass_kg, 1.9e24);
        assert_relative_eq!(planet.cmb_pressure_gpa, 130.0);
        assert_relative_eq!(composition.total(), 1.0, max_relative = 1e-9);
    }

    #[test]
    fn sto_benchmark_is_self_consistent() {
        let planet = PlanetState::sto_benchmark();
        assert_relative_eq!(planet.mantle_mass_kg(), 4.06e24, max_relative = 1e-12);
        assert_relative_eq!(
            planet.surface_area_m2,
            4.0 * PI * planet.radius_m.powi(2),
            max_relative = 1e-12
        );
        assert_relative_eq!(planet.mantle_depth_m, 2.8e6);
        assert_eq!(planet.target_temp_k, Some(1950.0));
        // k = rho * Cp * kappa ties the STO constants together.
        assert_relative_eq!(
            STO_HEAT_CAPACITY_J_KG_K * STO_MANTLE_DENSITY_KG_M3 * 1.0e-6,
            STO_CONDUCTIVITY_W_M_K,
            max_relative = 1e-12
        );
    }

    #[test]
    fn summary_batch_builds_planets() {
        let text = "kepler1,Mass_kg,5.97e24\n\
                    kepler1,Radius_m,6.371e6\n\
                    kepler1,CMF,0.33\n\
                    kepler1,CRF,0.55\n\
                    kepler1,CMBP,130.0\n\
                    kepler1,O,60.0\n\
                    kepler1,Pv,40.0\n\
                    aleph,Mass_kg,1.19e25\n\
                    aleph,Radius_m,7.9e6\n\
                    aleph,CMF,0.3\n\
                    aleph,CRF,0.5\n\
                    aleph,CMBP,260.0\n\
                    aleph,O,100.0\n";
        let planets = PlanetState::from_summary(text, 2000.0, 12.0).unwrap();
        assert_eq!(planets.len(), 2);
        // BTreeMap ordering: aleph first.
        assert_eq!(planets[0].0, "aleph");
        assert_relative_eq!(planets[0].1.cmb_pressure_gpa, 260.0);
        assert_relative_eq!(planets[1].2.fraction(Mineral::Forsterite), 0.6, max_relative = 1e-9);
    }

    #[test]
    fn summary_rejects_malformed_lines() {
        let result = PlanetState::from_summary("kepler1,Mass_kg\n", 2000.0, 12.0);
        assert!(matches!(
            result,
            Err(EvolveError::MalformedSummaryLine { line: 1, .. })
        ));
    }

    #[test]
    fn summary_requires_structural_parameters() {
        let result = PlanetState::from_summary("p,Mass_kg,5.97e24\np,O,100.0\n", 2000.0, 12.0);
        assert!(matches!(result, Err(EvolveError::InvalidParameter(_))));
    }
}

// Physical constants and run defaults shared by the whole crate.

pub const GRAV: f64 = 6.67408e-11; // Newtonian constant of gravitation
pub const GAS_CONSTANT: f64 = 8.3144598; // J/(mol·K)
pub const EARTH_MASS_KG: f64 = 5.97236473e24;
pub const EARTH_RADIUS_M: f64 = 6.371e6;

/// Surface temperature assumed for every run, in K.
pub const SURFACE_TEMP_K: f64 = 300.0;

/// Number of seconds in 1 Gyr; all times are kept in Gyr until the
/// energy balance, which needs SI.
pub const SECONDS_PER_GYR: f64 = 3.1536e16;

/// Earth's starting radiogenic heat production per kg of mantle, W/kg.
/// Planet-specific production is this value scaled by mantle mass and the
/// planet's radiogenic multiplier.
pub const EARTH_HEAT_PER_KG_W: f64 = 3.611610290257257e-11;

// Property defaults used when a phase has no database entry or grid.
pub const DEFAULT_CONDUCTIVITY_W_M_K: f64 = 5.0;
pub const DEFAULT_HEAT_CAPACITY_J_KG_K: f64 = 1250.0;
pub const DEFAULT_EXPANSIVITY_PER_K: f64 = 1.0e-5;
pub const DEFAULT_ACTIVATION_ENERGY_J_MOL: f64 = 300.0e3;

// Viscosity-law defaults (olivine baseline).
pub const DEFAULT_VISC_PREFACTOR_PA_S: f64 = 4.0e10;
pub const DEFAULT_FLUX_COEFFICIENT: f64 = 0.5; // c1

/// Classical boundary-layer exponent for whole-mantle convection.
pub const DEFAULT_BETA: f64 = 1.0 / 3.0;

/// Reference temperature for static-mode property lookups and for
/// temperature-normalized viscosity prefactors, in K.
pub const STATIC_REFERENCE_TEMP_K: f64 = 1625.0;

/// Arrhenius prefactors above this are implausible as absolute values;
/// the `Auto` convention treats them as referenced to
/// [`STATIC_REFERENCE_TEMP_K`]. See `viscosity::PrefactorConvention`.
pub const PREFACTOR_CONVENTION_THRESHOLD_PA_S: f64 = 1.0e13;

/// Composition fractions must sum to 1 within this tolerance or they are
/// rescaled.
pub const COMPOSITION_TOLERANCE: f64 = 1.0e-6;

// Thermal-table layout. Row i sits at (i + 1) * spacing, so lookups index
// with floor(Tp / spacing) - 1. Lookups outside [min, max] are an error.
pub const TABLE_SPACING_K: f64 = 100.0;
pub const TABLE_MIN_TEMP_K: f64 = TABLE_SPACING_K;
pub const TABLE_MAX_TEMP_K: f64 = 4000.0;

/// Radiative conductivity augmentation coefficient, W/(m·K⁴). Applied as
/// k_rad = coeff * T³ when the table builder enables it.
pub const RADIATIVE_CONDUCTIVITY_COEFF: f64 = 3.68e-10;

/// Estimated adiabatic gradient used to place the CMB temperature below the
/// potential temperature, K per m of mantle depth.
pub const CMB_ADIABATIC_GRADIENT_K_PER_M: f64 = 4.0e-4;

/// Reference pressures at or below this are replaced by half the CMB
/// pressure at planet construction.
pub const MIN_REFERENCE_PRESSURE_GPA: f64 = 4.001;

/// Half-width of the pass/fail band around a planet's target temperature, K.
pub const TARGET_BAND_K: f64 = 100.0;

// Run defaults.
pub const DEFAULT_DT_GYR: f64 = 0.001;
pub const DEFAULT_TMAX_GYR: f64 = 4.5;

// === Schubert, Turcotte & Olson (2001) benchmark block ===
// Scalar inputs for the benchmark planet; derived geometry lives in
// PlanetState::sto_benchmark() because it needs sqrt.

pub const STO_SURFACE_TEMP_K: f64 = 273.0;
pub const STO_TP0_K: f64 = 3273.0;
pub const STO_TARGET_TEMP_K: f64 = 1950.0;
pub const STO_BETA: f64 = 0.3;
pub const STO_ACTIVATION_TEMP_K: f64 = 7.0e4; // A0 = Ev / R
pub const STO_VISC_PREFACTOR_PA_S: f64 = 1.65e2;
pub const STO_MANTLE_DENSITY_KG_M3: f64 = 3400.0;
pub const STO_CONDUCTIVITY_W_M_K: f64 = 4.18;
pub const STO_DIFFUSIVITY_M2_S: f64 = 1.0e-6;
pub const STO_EXPANSIVITY_PER_K: f64 = 3.0e-5;
pub const STO_MANTLE_DEPTH_M: f64 = 2.8e6;
pub const STO_GRAVITY_M_S2: f64 = 10.0;
pub const STO_CORE_MASS_KG: f64 = EARTH_MASS_KG - 4.06e24;
pub const STO_DECAY_PER_S: f64 = 1.42e-17;
pub const STO_HEAT_PER_KG_CP_W: f64 = 4.317e-14; // times (Mp - Mc) * Cp
pub const STO_SURFACE_AREA_PER_KG_CP: f64 = 1.377e-13; // times (Mp - Mc) * Cp

/// STO heat capacity, from k = rho * Cp * kappa.
pub const STO_HEAT_CAPACITY_J_KG_K: f64 =
    STO_CONDUCTIVITY_W_M_K / (STO_DIFFUSIVITY_M2_S * STO_MANTLE_DENSITY_KG_M3);

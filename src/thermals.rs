// src/thermals.rs - Temperature-indexed material properties at a reference
// pressure.
//
// Each phase carries pressure × temperature grids of heat capacity and
// thermal expansivity. Building a table collapses the pressure axis by
// linear interpolation at the run's reference pressure, then mixes the
// per-phase temperature curves by composition. Conductivity comes from the
// mineral database and is mixed the same way. The finished table is
// immutable and queried by interpolation only.

use crate::composition::Composition;
use crate::constants::{
    DEFAULT_EXPANSIVITY_PER_K, DEFAULT_HEAT_CAPACITY_J_KG_K, RADIATIVE_CONDUCTIVITY_COEFF,
    STO_CONDUCTIVITY_W_M_K, STO_EXPANSIVITY_PER_K, STO_HEAT_CAPACITY_J_KG_K, TABLE_MAX_TEMP_K,
    TABLE_MIN_TEMP_K, TABLE_SPACING_K,
};
use crate::error::{EvolveError, Result};
use crate::math_utils::lerp;
use crate::mineral::{get_profile, Mineral};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Which of the two gridded properties a query refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GriddedProperty {
    HeatCapacity,
    Expansivity,
}

/// A pressure × temperature grid for one phase and one property.
/// `values[ti][pi]` is the property at `temps_k[ti]`, `pressures_gpa[pi]`.
#[derive(Debug, Clone)]
pub struct PropertyGrid {
    pub pressures_gpa: Vec<f64>,
    pub temps_k: Vec<f64>,
    pub values: Vec<Vec<f64>>,
}

impl PropertyGrid {
    /// Collapses the pressure axis: one value per temperature row, linearly
    /// interpolated between the two bracketing tabulated pressures. Pressures
    /// beyond the grid edges clamp to the edge column.
    pub fn sample_at_pressure(&self, pressure_gpa: f64) -> Vec<f64> {
        let last = self.pressures_gpa.len() - 1;
        let (lo, hi, frac) = if pressure_gpa <= self.pressures_gpa[0] {
            (0, 0, 0.0)
        } else if pressure_gpa >= self.pressures_gpa[last] {
            (last, last, 0.0)
        } else {
            let hi = self
                .pressures_gpa
                .iter()
                .position(|&p| p > pressure_gpa)
                .unwrap_or(last);
            let lo = hi - 1;
            let span = self.pressures_gpa[hi] - self.pressures_gpa[lo];
            (lo, hi, (pressure_gpa - self.pressures_gpa[lo]) / span)
        };
        self.values
            .iter()
            .map(|row| lerp(row[lo], row[hi], frac))
            .collect()
    }
}

/// The per-phase grids available to a table build. Missing grids are not an
/// error; the builder substitutes documented defaults for those phases.
#[derive(Debug, Clone, Default)]
pub struct GridSet {
    cp: HashMap<Mineral, PropertyGrid>,
    alpha: HashMap<Mineral, PropertyGrid>,
}

impl GridSet {
    /// Explicit capability query: does this set carry `property` for `phase`?
    pub fn has_property(&self, phase: Mineral, property: GriddedProperty) -> bool {
        match property {
            GriddedProperty::HeatCapacity => self.cp.contains_key(&phase),
            GriddedProperty::Expansivity => self.alpha.contains_key(&phase),
        }
    }

    pub fn insert(&mut self, phase: Mineral, property: GriddedProperty, grid: PropertyGrid) {
        match property {
            GriddedProperty::HeatCapacity => self.cp.insert(phase, grid),
            GriddedProperty::Expansivity => self.alpha.insert(phase, grid),
        };
    }

    fn get(&self, phase: Mineral, property: GriddedProperty) -> Option<&PropertyGrid> {
        match property {
            GriddedProperty::HeatCapacity => self.cp.get(&phase),
            GriddedProperty::Expansivity => self.alpha.get(&phase),
        }
    }

    /// The grid set generated from the mineral database's Berman heat
    /// capacities and expansivity fits, with a mild pressure damping. Built
    /// once and shared; phases with no fitted data are simply absent.
    pub fn embedded() -> &'static GridSet {
        static EMBEDDED: Lazy<GridSet> = Lazy::new(|| {
            let pressures: Vec<f64> = vec![0.0, 5.0, 10.0, 20.0, 40.0, 80.0, 140.0];
            let temps: Vec<f64> = table_temperatures();
            let mut set = GridSet::default();
            for mineral in Mineral::ALL {
                let profile = get_profile(mineral);
                if let Some(berman) = &profile.berman_cp {
                    let values = temps
                        .iter()
                        .map(|&t| {
                            pressures
                                .iter()
                                .map(|&p| berman.cp_j_kg_k(t) / (1.0 + 0.0015 * p))
                                .collect()
                        })
                        .collect();
                    set.insert(
                        mineral,
                        GriddedProperty::HeatCapacity,
                        PropertyGrid {
                            pressures_gpa: pressures.clone(),
                            temps_k: temps.clone(),
                            values,
                        },
                    );
                }
                if let Some(fit) = &profile.expansivity {
                    let values = temps
                        .iter()
                        .map(|&t| {
                            pressures
                                .iter()
                                .map(|&p| fit.alpha_per_k(t) / (1.0 + 0.04 * p))
                                .collect()
                        })
                        .collect();
                    set.insert(
                        mineral,
                        GriddedProperty::Expansivity,
                        PropertyGrid {
                            pressures_gpa: pressures.clone(),
                            temps_k: temps.clone(),
                            values,
                        },
                    );
                }
            }
            set
        });
        &EMBEDDED
    }

    /// Loads grids from a directory of delimited files named
    /// `<grid_key>_cp.csv` and `<grid_key>_alpha.csv`. A missing file means
    /// the phase falls back to defaults; a malformed file is fatal.
    pub fn load_dir<P: AsRef<Path>>(dir: P, separator: char) -> Result<GridSet> {
        let mut set = GridSet::default();
        for mineral in Mineral::ALL {
            for (suffix, property) in [
                ("cp", GriddedProperty::HeatCapacity),
                ("alpha", GriddedProperty::Expansivity),
            ] {
                let path = dir
                    .as_ref()
                    .join(format!("{}_{}.csv", mineral.grid_key(), suffix));
                if !path.exists() {
                    continue;
                }
                let text = fs::read_to_string(&path).map_err(|source| EvolveError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
                set.insert(mineral, property, parse_grid(&text, separator)?);
            }
        }
        Ok(set)
    }
}

// Grid file format: header "temp<sep>P0<sep>P1...", then one row per
// temperature with the property value at each pressure.
fn parse_grid(text: &str, separator: char) -> Result<PropertyGrid> {
    let mut lines = text.lines().enumerate();
    let (_, header) = lines.next().ok_or(EvolveError::TooFewShells(0))?;
    let pressures_gpa: Vec<f64> = header
        .trim_start_matches('#')
        .split(separator)
        .skip(1)
        .enumerate()
        .map(|(i, field)| {
            field.trim().parse().map_err(|_| EvolveError::NonNumericField {
                line: 1,
                column: format!("pressure[{i}]"),
                value: field.trim().to_string(),
            })
        })
        .collect::<Result<_>>()?;

    let mut temps_k = Vec::new();
    let mut values = Vec::new();
    for (line_index, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(separator).collect();
        if fields.len() != pressures_gpa.len() + 1 {
            return Err(EvolveError::ColumnCountMismatch {
                line: line_index + 1,
                expected: pressures_gpa.len() + 1,
                found: fields.len(),
            });
        }
        let mut row = Vec::with_capacity(pressures_gpa.len());
        for (column_index, field) in fields.iter().enumerate() {
            let value: f64 = field.trim().parse().map_err(|_| EvolveError::NonNumericField {
                line: line_index + 1,
                column: format!("col[{column_index}]"),
                value: field.trim().to_string(),
            })?;
            if column_index == 0 {
                temps_k.push(value);
            } else {
                row.push(value);
            }
        }
        values.push(row);
    }
    Ok(PropertyGrid {
        pressures_gpa,
        temps_k,
        values,
    })
}

fn table_temperatures() -> Vec<f64> {
    let count = (TABLE_MAX_TEMP_K / TABLE_SPACING_K) as usize;
    (1..=count).map(|i| i as f64 * TABLE_SPACING_K).collect()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ThermalRow {
    pub temp_k: f64,
    pub alpha_per_k: f64,
    pub cp_j_kg_k: f64,
    pub k_w_m_k: f64,
}

/// Temperature-indexed {alpha, Cp, k} at a fixed reference pressure.
/// Row i sits at (i + 1) * spacing. Built once per composition and reference
/// pressure, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThermalTable {
    spacing_k: f64,
    rows: Vec<ThermalRow>,
}

impl ThermalTable {
    /// Builds the table from the embedded grid set with no radiative term.
    pub fn build(composition: &Composition, reference_pressure_gpa: f64) -> ThermalTable {
        Self::build_with_grids(composition, reference_pressure_gpa, GridSet::embedded(), false)
    }

    /// Builds the table from an explicit grid set. Phases missing a grid use
    /// the documented defaults and are noted on stdout rather than failing
    /// the build. `radiative` adds a T³ conductivity augmentation.
    pub fn build_with_grids(
        composition: &Composition,
        reference_pressure_gpa: f64,
        grids: &GridSet,
        radiative: bool,
    ) -> ThermalTable {
        let temps = table_temperatures();

        // Collapse each phase's grids at the reference pressure once.
        let mut cp_curves: HashMap<Mineral, Vec<f64>> = HashMap::new();
        let mut alpha_curves: HashMap<Mineral, Vec<f64>> = HashMap::new();
        for (mineral, fraction) in composition.iter() {
            if fraction <= 0.0 {
                continue;
            }
            if let Some(grid) = grids.get(mineral, GriddedProperty::HeatCapacity) {
                cp_curves.insert(mineral, grid.sample_at_pressure(reference_pressure_gpa));
            } else {
                println!(
                    "note: no heat-capacity grid for {}; using default {} J/(kg K)",
                    mineral.symbol(),
                    DEFAULT_HEAT_CAPACITY_J_KG_K
                );
            }
            if let Some(grid) = grids.get(mineral, GriddedProperty::Expansivity) {
                alpha_curves.insert(mineral, grid.sample_at_pressure(reference_pressure_gpa));
            } else {
                println!(
                    "note: no expansivity grid for {}; using default {} 1/K",
                    mineral.symbol(),
                    DEFAULT_EXPANSIVITY_PER_K
                );
            }
        }

        let rows = temps
            .iter()
            .enumerate()
            .map(|(ti, &temp_k)| {
                let mut alpha = 0.0;
                let mut cp = 0.0;
                let mut k = 0.0;
                for (mineral, fraction) in composition.iter() {
                    if fraction <= 0.0 {
                        continue;
                    }
                    alpha += fraction
                        * alpha_curves
                            .get(&mineral)
                            .map_or(DEFAULT_EXPANSIVITY_PER_K, |curve| curve[ti]);
                    cp += fraction
                        * cp_curves
                            .get(&mineral)
                            .map_or(DEFAULT_HEAT_CAPACITY_J_KG_K, |curve| curve[ti]);
                    k += fraction * get_profile(mineral).conductivity_w_m_k;
                }
                if radiative {
                    k += RADIATIVE_CONDUCTIVITY_COEFF * temp_k.powi(3);
                }
                ThermalRow {
                    temp_k,
                    alpha_per_k: alpha,
                    cp_j_kg_k: cp,
                    k_w_m_k: k,
                }
            })
            .collect();

        ThermalTable {
            spacing_k: TABLE_SPACING_K,
            rows,
        }
    }

    pub fn min_temp_k(&self) -> f64 {
        TABLE_MIN_TEMP_K
    }

    pub fn max_temp_k(&self) -> f64 {
        self.rows.last().map_or(TABLE_MIN_TEMP_K, |r| r.temp_k)
    }

    pub fn rows(&self) -> &[ThermalRow] {
        &self.rows
    }

    /// Interpolated (alpha, Cp, k) at `tp_k`. The bracketing rows come from
    /// the fixed spacing: index = floor(Tp / spacing) - 1. Extrapolation is
    /// not supported; out-of-range temperatures are an error.
    pub fn lookup(&self, tp_k: f64) -> Result<(f64, f64, f64)> {
        if !tp_k.is_finite() || tp_k < self.min_temp_k() || tp_k > self.max_temp_k() {
            return Err(EvolveError::TemperatureOutOfRange {
                tp_k,
                min_k: self.min_temp_k(),
                max_k: self.max_temp_k(),
            });
        }
        let index = (tp_k / self.spacing_k).floor() as usize - 1;
        let row = &self.rows[index];
        if index + 1 == self.rows.len() {
            // tp_k == max; the top row needs no interpolation partner.
            return Ok((row.alpha_per_k, row.cp_j_kg_k, row.k_w_m_k));
        }
        let next = &self.rows[index + 1];
        let frac = (tp_k - row.temp_k) / self.spacing_k;
        Ok((
            lerp(row.alpha_per_k, next.alpha_per_k, frac),
            lerp(row.cp_j_kg_k, next.cp_j_kg_k, frac),
            lerp(row.k_w_m_k, next.k_w_m_k, frac),
        ))
    }
}

/// Hard-coded benchmark constants (Schubert, Turcotte & Olson 2001), used by
/// the integrator's benchmark property mode in place of a table lookup.
pub fn benchmark_thermals() -> (f64, f64, f64) {
    (
        STO_EXPANSIVITY_PER_K,
        STO_HEAT_CAPACITY_J_KG_K,
        STO_CONDUCTIVITY_W_M_K,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_CONDUCTIVITY_W_M_K;
    use approx::assert_relative_eq;
    use more_asserts::{assert_gt, assert_lt};

    fn forsterite() -> Composition {
        Composition::from_pairs(&[(Mineral::Forsterite, 1.0)])
            .normalize()
            .unwrap()
    }

    #[test]
    fn lookup_at_grid_point_returns_stored_row() {
        let table = ThermalTable::build(&forsterite(), 5.0);
        let row = table
            .rows()
            .iter()
            .find(|r| r.temp_k == 1600.0)
            .copied()
            .unwrap();
        let (alpha, cp, k) = table.lookup(1600.0).unwrap();
        assert_eq!(alpha, row.alpha_per_k);
        assert_eq!(cp, row.cp_j_kg_k);
        assert_eq!(k, row.k_w_m_k);
    }

    #[test]
    fn lookup_at_midpoint_is_arithmetic_mean() {
        let table = ThermalTable::build(&forsterite(), 5.0);
        let (a_lo, cp_lo, k_lo) = table.lookup(1600.0).unwrap();
        let (a_hi, cp_hi, k_hi) = table.lookup(1700.0).unwrap();
        let (a_mid, cp_mid, k_mid) = table.lookup(1650.0).unwrap();
        assert_relative_eq!(a_mid, 0.5 * (a_lo + a_hi), max_relative = 1e-12);
        assert_relative_eq!(cp_mid, 0.5 * (cp_lo + cp_hi), max_relative = 1e-12);
        assert_relative_eq!(k_mid, 0.5 * (k_lo + k_hi), max_relative = 1e-12);
    }

    #[test]
    fn lookup_outside_range_is_an_error() {
        let table = ThermalTable::build(&forsterite(), 5.0);
        assert!(table.lookup(50.0).is_err());
        assert!(table.lookup(4100.0).is_err());
        assert!(table.lookup(f64::NAN).is_err());
        // The endpoints themselves are fine.
        assert!(table.lookup(table.min_temp_k()).is_ok());
        assert!(table.lookup(table.max_temp_k()).is_ok());
    }

    #[test]
    fn pressure_raises_nothing_and_damps_properties() {
        let comp = forsterite();
        let low_p = ThermalTable::build(&comp, 0.0);
        let high_p = ThermalTable::build(&comp, 100.0);
        let (a_lo, cp_lo, _) = low_p.lookup(1625.0).unwrap();
        let (a_hi, cp_hi, _) = high_p.lookup(1625.0).unwrap();
        assert_lt!(a_hi, a_lo);
        assert_lt!(cp_hi, cp_lo);
    }

    #[test]
    fn missing_grid_phase_uses_defaults() {
        // Stishovite has no fitted grids; the build must substitute the
        // documented defaults instead of failing.
        let comp = Composition::from_pairs(&[(Mineral::Stishovite, 1.0)])
            .normalize()
            .unwrap();
        let table = ThermalTable::build(&comp, 5.0);
        let (alpha, cp, k) = table.lookup(1625.0).unwrap();
        assert_relative_eq!(alpha, crate::constants::DEFAULT_EXPANSIVITY_PER_K);
        assert_relative_eq!(cp, crate::constants::DEFAULT_HEAT_CAPACITY_J_KG_K);
        assert_relative_eq!(k, DEFAULT_CONDUCTIVITY_W_M_K);
    }

    #[test]
    fn conductivity_mixes_compositionally() {
        let comp = Composition::from_pairs(&[
            (Mineral::Forsterite, 0.5),
            (Mineral::Quartz, 0.5),
        ])
        .normalize()
        .unwrap();
        let table = ThermalTable::build(&comp, 5.0);
        let (_, _, k) = table.lookup(1625.0).unwrap();
        assert_relative_eq!(k, 0.5 * 5.10448 + 0.5 * 7.686008, max_relative = 1e-12);
    }

    #[test]
    fn radiative_term_grows_with_temperature() {
        let comp = forsterite();
        let plain = ThermalTable::build_with_grids(&comp, 5.0, GridSet::embedded(), false);
        let radiative = ThermalTable::build_with_grids(&comp, 5.0, GridSet::embedded(), true);
        let (_, _, k_plain) = plain.lookup(3000.0).unwrap();
        let (_, _, k_rad) = radiative.lookup(3000.0).unwrap();
        assert_gt!(k_rad, k_plain);
        let (_, _, k_rad_cool) = radiative.lookup(1000.0).unwrap();
        assert_gt!(k_rad - k_plain, k_rad_cool - plain.lookup(1000.0).unwrap().2);
    }

    #[test]
    fn capability_query_reflects_grid_presence() {
        let grids = GridSet::embedded();
        assert!(grids.has_property(Mineral::Forsterite, GriddedProperty::HeatCapacity));
        assert!(grids.has_property(Mineral::Forsterite, GriddedProperty::Expansivity));
        assert!(!grids.has_property(Mineral::Stishovite, GriddedProperty::HeatCapacity));
    }

    #[test]
    fn grid_parser_round_trips_small_grid() {
        let text = "temp,0.0,10.0\n1000.0,3.0e-5,2.0e-5\n1100.0,3.1e-5,2.1e-5\n";
        let grid = parse_grid(text, ',').unwrap();
        assert_eq!(grid.pressures_gpa, vec![0.0, 10.0]);
        assert_eq!(grid.temps_k, vec![1000.0, 1100.0]);
        let at_5 = grid.sample_at_pressure(5.0);
        assert_relative_eq!(at_5[0], 2.5e-5, max_relative = 1e-12);
        // Clamped beyond the edges.
        let clamped = grid.sample_at_pressure(500.0);
        assert_relative_eq!(clamped[1], 2.1e-5, max_relative = 1e-12);
    }

    #[test]
    fn grid_parser_rejects_malformed_rows() {
        let bad_count = "temp,0.0,10.0\n1000.0,3.0e-5\n";
        assert!(parse_grid(bad_count, ',').is_err());
        let bad_value = "temp,0.0,10.0\n1000.0,3.0e-5,oops\n";
        assert!(parse_grid(bad_value, ',').is_err());
    }
}

// src/profile.rs - Radial structure profiles with a named-column schema.
//
// One row per radial shell, ordered from the core-mantle boundary outward
// (or the reverse; radius only has to be strictly monotonic). Structural
// columns are addressed by name rather than position, so the averaging code
// never depends on the on-disk column order.

use crate::error::{EvolveError, Result};
use crate::mineral::Mineral;
use std::fs;
use std::path::Path;

pub const RADIUS_COLUMN: &str = "radius";
pub const DENSITY_COLUMN: &str = "density";
pub const PRESSURE_COLUMN: &str = "pressure";
pub const MASS_COLUMN: &str = "mass";

/// A parsed radial profile. Stored column-major; radius and density are
/// converted to SI at load (the on-disk convention is km and g/cm³, per the
/// structural-model output format), pressure stays in GPa, mass in kg.
#[derive(Debug, Clone)]
pub struct RadialProfile {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl RadialProfile {
    /// Parses a delimited text table with one header row. Malformed rows
    /// (wrong field count, non-numeric values) are fatal before any
    /// weighting is attempted, as is a profile with fewer than 2 shells or
    /// a non-monotonic radius column.
    pub fn from_delimited_str(text: &str, separator: char) -> Result<Self> {
        let mut lines = text.lines().enumerate();
        let (_, header) = lines
            .next()
            .ok_or(EvolveError::TooFewShells(0))?;
        let names: Vec<String> = header
            .trim_start_matches('#')
            .split(separator)
            .map(|name| name.trim().to_string())
            .collect();

        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];
        for (line_index, line) in lines {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(separator).collect();
            if fields.len() != names.len() {
                return Err(EvolveError::ColumnCountMismatch {
                    line: line_index + 1,
                    expected: names.len(),
                    found: fields.len(),
                });
            }
            for (column_index, field) in fields.iter().enumerate() {
                let value: f64 = field.trim().parse().map_err(|_| {
                    EvolveError::NonNumericField {
                        line: line_index + 1,
                        column: names[column_index].clone(),
                        value: field.trim().to_string(),
                    }
                })?;
                columns[column_index].push(value);
            }
        }

        let mut profile = RadialProfile { names, columns };
        profile.convert_to_si()?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn from_path<P: AsRef<Path>>(path: P, separator: char) -> Result<Self> {
        let text = fs::read_to_string(&path).map_err(|source| EvolveError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::from_delimited_str(&text, separator)
    }

    // km -> m, g/cm³ -> kg/m³. Both are a factor of 1000.
    fn convert_to_si(&mut self) -> Result<()> {
        for name in [RADIUS_COLUMN, DENSITY_COLUMN] {
            let index = self.column_index(name)?;
            for value in &mut self.columns[index] {
                *value *= 1000.0;
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.shell_count() < 2 {
            return Err(EvolveError::TooFewShells(self.shell_count()));
        }
        self.column_index(PRESSURE_COLUMN)?;
        let radii = self.radius_m()?;
        let increasing = radii[1] > radii[0];
        for (i, pair) in radii.windows(2).enumerate() {
            let ordered = if increasing {
                pair[1] > pair[0]
            } else {
                pair[1] < pair[0]
            };
            if !ordered {
                return Err(EvolveError::NonMonotonicRadius {
                    index: i + 1,
                    radius_m: pair[1],
                });
            }
        }
        Ok(())
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| EvolveError::MissingColumn(name.to_string()))
    }

    pub fn shell_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> Result<&[f64]> {
        Ok(&self.columns[self.column_index(name)?])
    }

    pub fn radius_m(&self) -> Result<&[f64]> {
        self.column(RADIUS_COLUMN)
    }

    pub fn density_kg_m3(&self) -> Result<&[f64]> {
        self.column(DENSITY_COLUMN)
    }

    pub fn pressure_gpa(&self) -> Result<&[f64]> {
        self.column(PRESSURE_COLUMN)
    }

    /// Columns whose names are phase symbols, in header order.
    pub fn phase_columns(&self) -> Vec<(Mineral, &[f64])> {
        self.names
            .iter()
            .enumerate()
            .filter_map(|(i, name)| {
                Mineral::from_symbol(name).map(|m| (m, self.columns[i].as_slice()))
            })
            .collect()
    }
}

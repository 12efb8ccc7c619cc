// src/weighting.rs - Whole-mantle averages over irregular radial shells.
//
// Shells are irregular: their surface-area ratios, not their count, determine
// how much each contributes to a boundary-adjacent average. Each adjacent
// shell pair gets a pair of interpolation weights plus the pair's fractional
// contribution to total mantle volume (or mass), and any profiled column can
// then be reduced to a single bulk value.

use crate::composition::Composition;
use crate::error::{EvolveError, Result};
use crate::profile::RadialProfile;
use std::f64::consts::PI;

/// Pairwise interpolation weights and fractional contributions for each
/// adjacent shell pair. For a profile with N shells there are N-1 entries.
#[derive(Debug, Clone)]
pub struct ShellWeights {
    /// (inner, outer) blend weights for each shell pair; each row sums to 1.
    pub pairwise: Vec<[f64; 2]>,
    /// Each pair's fraction of total mantle volume (or mass); sums to 1.
    pub fractions: Vec<f64>,
}

impl ShellWeights {
    pub fn pair_count(&self) -> usize {
        self.pairwise.len()
    }
}

/// Volume weighting: pairwise weights from surface-area ratios, fractions
/// from shell volumes. Returns the shell radii alongside the weights.
pub fn weights_by_volume(profile: &RadialProfile) -> Result<(Vec<f64>, ShellWeights)> {
    if profile.shell_count() < 2 {
        return Err(EvolveError::TooFewShells(profile.shell_count()));
    }
    let radii = profile.radius_m()?.to_vec();
    let surface_areas: Vec<f64> = radii.iter().map(|r| 4.0 * PI * r * r).collect();
    let volumes: Vec<f64> = radii.iter().map(|r| (4.0 / 3.0) * PI * r.powi(3)).collect();

    let v_max = volumes.iter().cloned().fold(f64::MIN, f64::max);
    let v_min = volumes.iter().cloned().fold(f64::MAX, f64::min);
    let v_total = v_max - v_min;

    let mut pairwise = Vec::with_capacity(radii.len() - 1);
    let mut fractions = Vec::with_capacity(radii.len() - 1);
    for i in 0..radii.len() - 1 {
        let sa_sum = surface_areas[i] + surface_areas[i + 1];
        pairwise.push([surface_areas[i] / sa_sum, surface_areas[i + 1] / sa_sum]);
        fractions.push((volumes[i + 1] - volumes[i]).abs() / v_total);
    }
    Ok((radii, ShellWeights { pairwise, fractions }))
}

/// Mass weighting: density-weighted blends of the volume weights, fractions
/// from each shell's absolute mass. Returns the shell masses in kg alongside
/// the weights.
pub fn weights_by_mass(profile: &RadialProfile) -> Result<(Vec<f64>, ShellWeights)> {
    let (radii, volume_weights) = weights_by_volume(profile)?;
    let densities = profile.density_kg_m3()?;

    let r_max = radii.iter().cloned().fold(f64::MIN, f64::max);
    let r_min = radii.iter().cloned().fold(f64::MAX, f64::min);
    let v_total = (4.0 / 3.0) * PI * (r_max.powi(3) - r_min.powi(3));

    let mut pairwise = Vec::with_capacity(volume_weights.pair_count());
    let mut shell_masses = Vec::with_capacity(volume_weights.pair_count());
    for i in 0..volume_weights.pair_count() {
        let rho_sum = densities[i] + densities[i + 1];
        let rho1 = densities[i] / rho_sum;
        let rho2 = densities[i + 1] / rho_sum;

        let [w1, w2] = volume_weights.pairwise[i];
        let mass_sum = rho1 * w1 + rho2 * w2;
        pairwise.push([rho1 * w1 / mass_sum, rho2 * w2 / mass_sum]);

        // Volumetric-average density times the pair's share of total volume.
        let rho_avg = w1 * densities[i] + w2 * densities[i + 1];
        shell_masses.push(rho_avg * volume_weights.fractions[i] * v_total);
    }

    let total_mass: f64 = shell_masses.iter().sum();
    let fractions = shell_masses.iter().map(|m| m / total_mass).collect();
    Ok((shell_masses, ShellWeights { pairwise, fractions }))
}

/// The generic weighted reduction: blend each adjacent pair of column values
/// with the pairwise weights, scale by the pair's fractional contribution,
/// and accumulate. The weighted average of a constant column is the constant,
/// whichever weighting scheme produced `weights`.
pub fn find_average(values: &[f64], weights: &ShellWeights) -> f64 {
    let mut running_total = 0.0;
    for i in 0..weights.pair_count() {
        let [w1, w2] = weights.pairwise[i];
        let blended = values[i] * w1 + values[i + 1] * w2;
        running_total += blended * weights.fractions[i];
    }
    running_total
}

/// [`find_average`] applied to every column of the profile at once, in header
/// order.
pub fn average_all_columns(profile: &RadialProfile, weights: &ShellWeights) -> Result<Vec<f64>> {
    let mut averages = Vec::with_capacity(profile.column_names().len());
    for name in profile.column_names() {
        averages.push(find_average(profile.column(name)?, weights));
    }
    Ok(averages)
}

/// Bulk mantle composition from a profile's phase columns: the mass-weighted
/// whole-mantle average of each phase fraction. Phase columns are stored in
/// percent on disk, hence the 0.01; the result is normalized.
pub fn bulk_mass_fraction(profile: &RadialProfile) -> Result<Composition> {
    let (_, mass_weights) = weights_by_mass(profile)?;
    let mut composition = Composition::new();
    for (mineral, column) in profile.phase_columns() {
        composition.set(mineral, 0.01 * find_average(column, &mass_weights));
    }
    composition.normalize()
}

// src/composition.rs - Bulk mantle composition as phase mass fractions.

use crate::constants::COMPOSITION_TOLERANCE;
use crate::error::{EvolveError, Result};
use crate::mineral::Mineral;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A mapping from phase to mass fraction. Fractions are expected to sum to 1;
/// [`Composition::normalize`] rescales them when they do not. Inputs may be
/// given in percent; normalization handles either convention.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Composition {
    fractions: HashMap<Mineral, f64>,
}

impl Composition {
    pub fn new() -> Self {
        Composition {
            fractions: HashMap::new(),
        }
    }

    pub fn from_pairs(pairs: &[(Mineral, f64)]) -> Self {
        let mut c = Composition::new();
        for &(mineral, fraction) in pairs {
            c.set(mineral, fraction);
        }
        c
    }

    /// Builds a composition from `symbol -> fraction` pairs, rejecting
    /// symbols outside the phase vocabulary.
    pub fn from_symbols(pairs: &[(&str, f64)]) -> Result<Self> {
        let mut c = Composition::new();
        for &(symbol, fraction) in pairs {
            let mineral = Mineral::from_symbol(symbol)
                .ok_or_else(|| EvolveError::UnknownPhase(symbol.to_string()))?;
            c.set(mineral, fraction);
        }
        Ok(c)
    }

    pub fn set(&mut self, mineral: Mineral, fraction: f64) {
        self.fractions.insert(mineral, fraction);
    }

    pub fn fraction(&self, mineral: Mineral) -> f64 {
        self.fractions.get(&mineral).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Mineral, f64)> + '_ {
        self.fractions.iter().map(|(&m, &f)| (m, f))
    }

    pub fn total(&self) -> f64 {
        self.fractions.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.fractions.is_empty()
    }

    /// Rescales the fractions so they sum to 1, unless they already do within
    /// `tolerance`. Imbalance is recovered silently; an all-zero composition
    /// cannot be rescaled and is an error. Idempotent.
    pub fn normalize_with_tolerance(mut self, tolerance: f64) -> Result<Self> {
        let total = self.total();
        if total <= 0.0 {
            return Err(EvolveError::EmptyComposition);
        }
        if (total - 1.0).abs() > tolerance {
            for fraction in self.fractions.values_mut() {
                *fraction /= total;
            }
        }
        Ok(self)
    }

    /// [`Self::normalize_with_tolerance`] at the default tolerance.
    pub fn normalize(self) -> Result<Self> {
        self.normalize_with_tolerance(COMPOSITION_TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normalizes_percent_input() {
        let c = Composition::from_pairs(&[
            (Mineral::Forsterite, 60.0),
            (Mineral::Perovskite, 30.0),
            (Mineral::Periclase, 10.0),
        ])
        .normalize()
        .unwrap();
        assert_relative_eq!(c.total(), 1.0, max_relative = 1e-12);
        assert_relative_eq!(c.fraction(Mineral::Forsterite), 0.6, max_relative = 1e-12);
    }

    #[test]
    fn imbalance_beyond_tolerance_is_rescaled() {
        // Mixed-sign deviations summing to 1.0001, outside the default
        // tolerance, so normalize must rescale.
        let c = Composition::from_pairs(&[
            (Mineral::Forsterite, 0.5001),
            (Mineral::Perovskite, 0.2498),
            (Mineral::Periclase, 0.2502),
        ])
        .normalize()
        .unwrap();
        assert!((c.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn imbalance_within_tolerance_is_left_alone() {
        let c = Composition::from_pairs(&[
            (Mineral::Forsterite, 0.5000001),
            (Mineral::Perovskite, 0.2499998),
            (Mineral::Periclase, 0.2500002),
        ])
        .normalize()
        .unwrap();
        // 1e-7 off is inside the tolerance: values stay exactly as given.
        assert_eq!(c.fraction(Mineral::Forsterite), 0.5000001);
        assert!((c.total() - 1.0).abs() <= COMPOSITION_TOLERANCE);
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = Composition::from_pairs(&[
            (Mineral::Forsterite, 3.0),
            (Mineral::Quartz, 1.0),
        ])
        .normalize()
        .unwrap();
        let fo = once.fraction(Mineral::Forsterite);
        let twice = once.normalize().unwrap();
        assert_eq!(twice.fraction(Mineral::Forsterite), fo);
    }

    #[test]
    fn balanced_composition_is_untouched() {
        let c = Composition::from_pairs(&[(Mineral::Forsterite, 1.0)])
            .normalize()
            .unwrap();
        assert_eq!(c.fraction(Mineral::Forsterite), 1.0);
    }

    #[test]
    fn all_zero_composition_is_rejected() {
        let result = Composition::from_pairs(&[(Mineral::Forsterite, 0.0)]).normalize();
        assert!(matches!(result, Err(EvolveError::EmptyComposition)));

        let empty = Composition::new().normalize();
        assert!(matches!(empty, Err(EvolveError::EmptyComposition)));
    }

    #[test]
    fn unknown_symbols_are_rejected() {
        let result = Composition::from_symbols(&[("O", 0.9), ("bogus", 0.1)]);
        assert!(matches!(result, Err(EvolveError::UnknownPhase(_))));
    }
}

pub mod constants;
pub mod error;
pub mod math_utils;
pub mod mineral;
pub mod composition;
pub mod profile;
pub mod weighting;
pub mod thermals;
pub mod viscosity;
pub mod convection;
pub mod radiogenic;
pub mod planet;
pub mod evolve;
pub mod report;

// src/report.rs - Human-readable run summaries for the terminal.

use crate::evolve::{Evolution, RunOutcome, RunParams};
use crate::planet::PlanetState;
use colored::Colorize;

fn pe(value: f64) -> String {
    format!("{value:.4e}")
}

fn pf(value: f64) -> String {
    format!("{value:.4}")
}

/// Prints the quantities that never change during a run: the planet's
/// geometry and the parameters that drive the energy balance.
pub fn print_unchanging(planet: &PlanetState, params: &RunParams) {
    println!("{}", "--- planet ---".bold());
    println!("mass            {} kg", pe(planet.mass_kg));
    println!("core mass       {} kg", pe(planet.core_mass_kg));
    println!("radius          {} m", pe(planet.radius_m));
    println!("core radius     {} m", pe(planet.core_radius_m));
    println!("mantle depth    {} m", pe(planet.mantle_depth_m));
    println!("mantle density  {} kg/m3", pf(planet.mantle_density_kg_m3));
    println!("surface gravity {} m/s2", pf(planet.surface_gravity_m_s2));
    println!("CMB pressure    {} GPa", pf(planet.cmb_pressure_gpa));
    println!("ref pressure    {} GPa", pf(planet.reference_pressure_gpa));
    println!("Q0              {} W", pe(planet.initial_production_w()));
    println!("{}", "--- run ---".bold());
    println!("Tp0             {} K", pf(params.tp0_k));
    println!("dt              {} Gyr", params.dt_gyr);
    println!("tmax            {} Gyr", params.tmax_gyr);
}

/// Prints the final state of a finished run, coloring the verdict: green
/// for a completed run inside the target band (or with no target), red for
/// a miss or an abort.
pub fn print_final(history: &Evolution) {
    match history.outcome {
        RunOutcome::Completed { within_band } => {
            if let Some(step) = history.final_step() {
                println!("{}", "--- final state ---".bold());
                println!("t       {} Gyr", pf(step.time_gyr));
                println!("Tp      {} K", pf(step.tp_k));
                println!("Ra      {}", pe(step.rayleigh));
                println!("H(t)    {} W", pe(step.production_w));
                println!("F(t)    {} W", pe(step.loss_w));
                println!("Urey    {}", pf(step.urey));
            }
            match within_band {
                Some(true) => println!("{}", "completed: within target band".green()),
                Some(false) => println!("{}", "completed: outside target band".red()),
                None => println!("{}", "completed".green()),
            }
        }
        RunOutcome::Aborted {
            step,
            time_gyr,
            tp_k,
        } => {
            println!(
                "{}",
                format!(
                    "aborted at step {step} (t = {} Gyr): Tp would reach {} K",
                    pf(time_gyr),
                    pf(tp_k)
                )
                .red()
            );
        }
    }
}

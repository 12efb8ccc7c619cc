use mantle_evolve_rust::evolve::{evolve, RunOutcome, RunParams};
use mantle_evolve_rust::mineral::Mineral;
use mantle_evolve_rust::planet::PlanetState;
use mantle_evolve_rust::profile::RadialProfile;
use mantle_evolve_rust::thermals::ThermalTable;
use approx::assert_relative_eq;
use more_asserts::{assert_gt, assert_lt};

// A coarse Earth-like interior: radius in km, density in g/cc, pressure in
// GPa, cumulative mass in kg, then phase percentages.
const PROFILE: &str = "\
radius,density,pressure,mass,O,Opx
3480.0,5.55,136.0,1.93e24,40.0,60.0
4500.0,5.0,90.0,3.1e24,55.0,45.0
5500.0,4.4,40.0,4.6e24,70.0,30.0
6371.0,3.35,0.3,5.97e24,85.0,15.0
";

#[test]
fn profile_to_history_end_to_end() {
    let profile = RadialProfile::from_delimited_str(PROFILE, ',').unwrap();
    let (planet, composition) = PlanetState::from_profile(&profile, 2000.0, 1.0, 12.0).unwrap();

    // The bulk composition is a mass-weighted mix of the shell columns.
    let forsterite = composition.fraction(Mineral::Forsterite);
    let orthopyroxene = composition.fraction(Mineral::Orthopyroxene);
    println!("bulk: O = {forsterite:.3}, Opx = {orthopyroxene:.3}");
    assert_relative_eq!(forsterite + orthopyroxene, 1.0, max_relative = 1e-9);
    // Shallow shells are olivine-rich and hold most of the mantle volume.
    assert_gt!(forsterite, 0.5);

    // Mixed Opx raises the activation energy above the olivine baseline.
    assert_gt!(planet.viscosity.activation_energy_j_mol, 261.0e3);
    assert_lt!(planet.viscosity.activation_energy_j_mol, 420.0e3);

    let table = ThermalTable::build(&composition, planet.reference_pressure_gpa);
    let mut params = RunParams::static_reference(2000.0);
    params.dt_gyr = 0.01;
    params.tmax_gyr = 1.0;
    let history = evolve(&planet, Some(&table), &params).unwrap();

    assert!(matches!(history.outcome, RunOutcome::Completed { .. }));
    assert_eq!(history.steps.len(), 101);
    // The Opx-stiffened viscosity keeps convective loss below radiogenic
    // production at 2000 K, so this mantle warms modestly over its first
    // Gyr rather than cooling.
    let last = history.final_step().unwrap();
    println!("final Tp = {:.1} K, Urey = {:.3}", last.tp_k, last.urey);
    assert_gt!(last.production_w, last.loss_w);
    assert_gt!(last.urey, 1.0);
    assert_gt!(last.tp_k, 2000.0);
    assert_lt!(last.tp_k, 2300.0);
}

#[test]
fn summary_batch_runs_every_planet() {
    let summary = "\
rocky1,Mass_kg,5.97e24
rocky1,Radius_m,6.371e6
rocky1,CMF,0.33
rocky1,CRF,0.55
rocky1,CMBP,130.0
rocky1,O,70.0
rocky1,Opx,30.0
rocky2,Mass_kg,3.0e24
rocky2,Radius_m,5.2e6
rocky2,CMF,0.25
rocky2,CRF,0.48
rocky2,CMBP,80.0
rocky2,O,100.0
";
    let planets = PlanetState::from_summary(summary, 2000.0, 12.0).unwrap();
    assert_eq!(planets.len(), 2);

    for (id, planet, composition) in &planets {
        let table = ThermalTable::build(composition, planet.reference_pressure_gpa);
        let mut params = RunParams::static_reference(2000.0);
        params.dt_gyr = 0.01;
        params.tmax_gyr = 0.5;
        let history = evolve(planet, Some(&table), &params).unwrap();
        let last = history.final_step().unwrap();
        println!("{id}: final Tp = {:.1} K, Urey = {:.3}", last.tp_k, last.urey);
        assert!(matches!(history.outcome, RunOutcome::Completed { .. }));
        assert_gt!(last.tp_k, 0.0);
    }
}

#[test]
fn descending_profile_reads_the_same_structure() {
    // Same interior listed surface-first.
    let reversed: String = {
        let mut lines: Vec<&str> = PROFILE.lines().collect();
        lines[1..].reverse();
        lines.join("\n")
    };
    let up = RadialProfile::from_delimited_str(PROFILE, ',').unwrap();
    let down = RadialProfile::from_delimited_str(&reversed, ',').unwrap();

    let (planet_up, comp_up) = PlanetState::from_profile(&up, 2000.0, 1.0, 12.0).unwrap();
    let (planet_down, comp_down) = PlanetState::from_profile(&down, 2000.0, 1.0, 12.0).unwrap();

    assert_relative_eq!(planet_up.radius_m, planet_down.radius_m);
    assert_relative_eq!(planet_up.core_mass_kg, planet_down.core_mass_kg);
    assert_relative_eq!(planet_up.cmb_pressure_gpa, planet_down.cmb_pressure_gpa);
    assert_relative_eq!(
        comp_up.fraction(Mineral::Forsterite),
        comp_down.fraction(Mineral::Forsterite),
        max_relative = 1e-9
    );
}

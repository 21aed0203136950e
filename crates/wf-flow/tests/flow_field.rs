use wf_core::{Field, GridPoints, GridResolution, TurbineId, Vec3};
use wf_flow::{
    ExtraPoints, FlowError, FlowField, FlowFieldConfig, FlowFieldUpdate, Measurement, WakeOptions,
    WindMap,
};
use wf_turbine::{Turbine, TurbineMap};
use wf_wake::{Curl, DeflectionModel, FlowView, TurbulenceModel, VelocityModel, WakeModelBundle};

const SPEED: f64 = 8.0;
const TI: f64 = 0.06;

fn farm(xs: &[f64], ys: &[f64]) -> TurbineMap {
    let turbines = (0..xs.len())
        .map(|i| Turbine::nrel_5mw(format!("T{i}")))
        .collect();
    TurbineMap::new(xs, ys, turbines).unwrap()
}

fn flow_field(xs: &[f64], ys: &[f64], direction: f64) -> FlowField {
    let wind = WindMap::homogeneous(SPEED, direction, TI).unwrap();
    FlowField::new(FlowFieldConfig::default(), farm(xs, ys), wind).unwrap()
}

fn curl_config(resolution: GridResolution) -> FlowFieldConfig {
    let mut wake = WakeModelBundle::default();
    wake.velocity = VelocityModel::Curl(Curl {
        model_grid_resolution: resolution,
        ..Curl::default()
    });
    wake.deflection = DeflectionModel::Curl;
    FlowFieldConfig {
        wake,
        ..FlowFieldConfig::default()
    }
}

fn no_wake() -> WakeOptions {
    WakeOptions {
        no_wake: true,
        ..WakeOptions::default()
    }
}

fn inflow(ff: &FlowField, i: usize) -> f64 {
    ff.turbine_map().turbines()[i].average_velocity()
}

fn ti(ff: &FlowField, i: usize) -> f64 {
    ff.turbine_map().turbines()[i].turbulence_intensity()
}

#[test]
fn empty_farm_is_rejected() {
    let wind = WindMap::homogeneous(SPEED, 270.0, TI).unwrap();
    let empty = TurbineMap::new(&[], &[], Vec::new()).unwrap();
    let err = FlowField::new(FlowFieldConfig::default(), empty, wind).unwrap_err();
    assert!(matches!(err, FlowError::Precondition { .. }));
}

#[test]
fn no_wake_leaves_ambient_flow() {
    let mut ff = flow_field(&[0.0, 630.0], &[0.0, 0.0], 270.0);
    ff.calculate_wake(WakeOptions::default()).unwrap();
    assert_ne!(ff.u(), ff.u_initial());

    ff.reset_uvw();
    ff.calculate_wake(no_wake()).unwrap();
    assert_eq!(ff.u(), ff.u_initial());
    assert!(ff.v().iter().all(|&v| v == 0.0));
    assert!(ff.w().iter().all(|&w| w == 0.0));
}

#[test]
fn downstream_turbine_sits_in_the_wake() {
    let mut ff = flow_field(&[0.0, 630.0], &[0.0, 0.0], 270.0);

    ff.calculate_wake(no_wake()).unwrap();
    let ambient = inflow(&ff, 0);
    assert_eq!(inflow(&ff, 1), ambient);

    ff.calculate_wake(WakeOptions::default()).unwrap();
    assert_eq!(inflow(&ff, 0), ambient);
    assert!(inflow(&ff, 1) < ambient);
    assert!(ff.turbine_powers()[1] < ff.turbine_powers()[0]);
}

#[test]
fn wake_added_turbulence_never_lowers_ambient() {
    let mut ff = flow_field(&[0.0, 630.0, 1260.0], &[0.0, 0.0, 0.0], 270.0);
    ff.calculate_wake(WakeOptions::default()).unwrap();
    let first: Vec<f64> = (0..3).map(|i| ti(&ff, i)).collect();

    assert_eq!(first[0], TI);
    assert!(first[1] > TI);
    assert!(first[2] > TI);

    // turbines restart from ambient on every call
    ff.calculate_wake(WakeOptions::default()).unwrap();
    let second: Vec<f64> = (0..3).map(|i| ti(&ff, i)).collect();
    assert_eq!(first, second);
}

#[test]
fn isolated_turbine_keeps_ambient_turbulence() {
    let mut ff = flow_field(&[0.0, 630.0, 630.0], &[0.0, 0.0, 2000.0], 270.0);
    let report = ff
        .calculate_wake(WakeOptions {
            track_n_upstream_wakes: true,
            ..WakeOptions::default()
        })
        .unwrap();

    let counts = report.upstream_wakes.unwrap();
    assert_eq!(counts[&TurbineId::from_usize(0)], 0);
    assert_eq!(counts[&TurbineId::from_usize(1)], 1);
    assert_eq!(counts[&TurbineId::from_usize(2)], 0);
    assert_eq!(ti(&ff, 2), TI);
}

#[test]
fn without_a_turbulence_model_turbines_stay_at_ambient() {
    let wind = WindMap::homogeneous(SPEED, 270.0, TI).unwrap();
    let mut wake = WakeModelBundle::default();
    wake.turbulence = TurbulenceModel::None;
    let config = FlowFieldConfig {
        wake,
        ..FlowFieldConfig::default()
    };
    let mut ff = FlowField::new(config, farm(&[0.0, 630.0, 1260.0], &[0.0, 0.0, 0.0]), wind).unwrap();

    let report = ff
        .calculate_wake(WakeOptions {
            track_n_upstream_wakes: true,
            ..WakeOptions::default()
        })
        .unwrap();

    let counts = report.upstream_wakes.unwrap();
    assert_eq!(counts.len(), 3);
    assert!(counts.values().all(|&c| c == 0));
    assert!((0..3).all(|i| ti(&ff, i) == TI));
    // the velocity deficit still reaches the downstream rotors
    assert!(inflow(&ff, 1) < inflow(&ff, 0));
}

#[test]
fn wake_counts_are_only_reported_on_request() {
    let mut ff = flow_field(&[0.0, 630.0], &[0.0, 0.0], 270.0);
    let report = ff.calculate_wake(WakeOptions::default()).unwrap();
    assert!(report.upstream_wakes.is_none());
}

#[test]
fn westerly_wind_matches_an_unrotated_single_turbine() {
    let mut ff = flow_field(&[0.0], &[0.0], 270.0);
    ff.calculate_wake(WakeOptions::default()).unwrap();

    let bundle = ff.config().wake;
    let n = ff.x().len();
    let points = GridPoints::new(ff.x(), ff.y(), ff.z()).unwrap();
    let coord = Vec3::new(0.0, 0.0, 90.0);
    let zeros = Field::zeros(n);

    let mut turbine = Turbine::nrel_5mw("manual");
    turbine.set_turbulence_intensity(TI);
    turbine
        .update_velocities(&zeros, &coord, ff.u_initial(), points)
        .unwrap();
    assert_eq!(turbine.average_velocity(), inflow(&ff, 0));

    let flow = FlowView::new(ff.u_initial(), &zeros, &zeros, 0.0);
    let deflection = bundle.deflection_function(points, &turbine, &coord, &flow).unwrap();
    let deficit = bundle
        .velocity_function(points, &turbine, &coord, &deflection, &flow)
        .unwrap();
    let u_wake = bundle.combination_function(&zeros, &deficit.u).unwrap();
    let expected = ff.u_initial() - &u_wake;

    assert_eq!(ff.u(), &expected);
}

#[test]
fn shear_reinitialisation_sets_power_law_profile() {
    let mut ff = flow_field(&[0.0, 630.0], &[0.0, 0.0], 270.0);
    for shear in [0.0, 0.12, 0.3] {
        ff.reinitialize(FlowFieldUpdate::wind_shear(shear)).unwrap();
        for (z, u) in ff.z().iter().zip(ff.u_initial().iter()) {
            assert_eq!(*u, SPEED * (z / 90.0).powf(shear));
        }
        assert_eq!(ff.u(), ff.u_initial());
    }
}

#[test]
fn failed_reinitialisation_keeps_previous_state() {
    let mut ff = flow_field(&[0.0, 630.0], &[0.0, 0.0], 270.0);
    let before = ff.u_initial().clone();

    let err = ff.reinitialize(FlowFieldUpdate::wind_shear(f64::NAN)).unwrap_err();
    assert!(matches!(err, FlowError::Configuration { .. }));
    assert_eq!(ff.config().wind_shear, 0.12);
    assert_eq!(ff.u_initial(), &before);
}

#[test]
fn extra_points_follow_rotor_points() {
    let mut ff = flow_field(&[0.0, 630.0], &[0.0, 0.0], 270.0);
    let rotor_points = ff.x().len();
    let points = ExtraPoints::new(vec![315.0, 2000.0], vec![0.0, 0.0], vec![90.0, 90.0]).unwrap();

    ff.calculate_wake(WakeOptions {
        points: Some(points),
        ..WakeOptions::default()
    })
    .unwrap();

    assert_eq!(ff.x().len(), rotor_points + 2);
    assert_eq!(ff.x()[rotor_points], 315.0);
    // 2.5 D behind the first rotor
    assert!(ff.u()[rotor_points] < ff.u_initial()[rotor_points]);
}

#[test]
fn heterogeneous_inflow_produces_finite_field() {
    let wind = WindMap::from_measurements(vec![
        Measurement {
            x: -500.0,
            y: 0.0,
            speed: 8.0,
            direction: 265.0,
            turbulence_intensity: 0.06,
        },
        Measurement {
            x: 1500.0,
            y: 0.0,
            speed: 9.0,
            direction: 275.0,
            turbulence_intensity: 0.08,
        },
    ])
    .unwrap();
    let mut ff = FlowField::new(FlowFieldConfig::default(), farm(&[0.0, 630.0], &[0.0, 0.0]), wind)
        .unwrap();
    assert!(!ff.wind_map().is_direction_homogeneous());

    ff.calculate_wake(no_wake()).unwrap();
    let unwaked = inflow(&ff, 1);

    ff.calculate_wake(WakeOptions::default()).unwrap();
    assert!(ff.u().iter().all(|u| u.is_finite()));
    assert!(inflow(&ff, 1) < unwaked);
}

#[test]
fn curl_rotates_its_grid_back() {
    let resolution = GridResolution::new(20, 10, 6).unwrap();
    let wind = WindMap::homogeneous(SPEED, 270.0, TI).unwrap();
    let mut ff = FlowField::new(curl_config(resolution), farm(&[0.0, 630.0], &[0.0, 0.0]), wind)
        .unwrap();
    ff.set_yaw_angles(&[20.0, 0.0]).unwrap();
    let (x, y, bounds) = (ff.x().clone(), ff.y().clone(), ff.bounds());

    ff.calculate_wake(WakeOptions::default()).unwrap();

    assert_eq!(ff.x(), &x);
    assert_eq!(ff.y(), &y);
    assert_eq!(ff.bounds(), bounds);
    assert_eq!(ff.x().len(), resolution.point_count());
    assert!(ff.u().iter().zip(ff.u_initial().iter()).any(|(u, u0)| u < u0));
    assert!(ff.v().iter().all(|v| v.is_finite()));
}

#[test]
fn curl_grid_keeps_its_size_off_axis() {
    let resolution = GridResolution::new(20, 10, 6).unwrap();
    let wind = WindMap::homogeneous(SPEED, 300.0, TI).unwrap();
    let mut ff = FlowField::new(curl_config(resolution), farm(&[0.0, 630.0], &[0.0, 0.0]), wind)
        .unwrap();
    let bounds = ff.bounds();

    ff.calculate_wake(WakeOptions::default()).unwrap();

    assert_eq!(ff.x().len(), resolution.point_count());
    assert_eq!(ff.bounds(), bounds);
    assert!(ff.u().iter().all(|u| u.is_finite()));
}

#[test]
fn failed_curl_sweep_restores_the_physical_grid() {
    let resolution = GridResolution::new(20, 10, 6).unwrap();
    // finite but large enough that the sheared baseline above hub height overflows
    let wind = WindMap::homogeneous(f64::MAX, 300.0, TI).unwrap();
    let mut ff = FlowField::new(curl_config(resolution), farm(&[0.0, 630.0], &[0.0, 0.0]), wind)
        .unwrap();
    let (x, y, bounds) = (ff.x().clone(), ff.y().clone(), ff.bounds());

    let err = ff.calculate_wake(WakeOptions::default()).unwrap_err();

    assert!(matches!(err, FlowError::Turbine(_)));
    assert_eq!(ff.x(), &x);
    assert_eq!(ff.y(), &y);
    assert_eq!(ff.bounds(), bounds);
}

#[test]
fn extra_points_below_ground_are_refused() {
    let mut ff = flow_field(&[0.0, 630.0], &[0.0, 0.0], 270.0);
    let len = ff.x().len();
    assert!(ExtraPoints::new(vec![300.0], vec![0.0], vec![-10.0]).is_err());

    let below = ExtraPoints {
        x: vec![300.0],
        y: vec![0.0],
        z: vec![-10.0],
    };
    let err = ff
        .calculate_wake(WakeOptions {
            points: Some(below),
            ..WakeOptions::default()
        })
        .unwrap_err();

    assert!(matches!(err, FlowError::Precondition { .. }));
    assert_eq!(ff.x().len(), len);
    assert!(ff.u_initial().iter().all(|u| u.is_finite()));
}

#[test]
fn gridded_model_refuses_extra_points() {
    let resolution = GridResolution::new(20, 10, 6).unwrap();
    let wind = WindMap::homogeneous(SPEED, 270.0, TI).unwrap();
    let mut ff = FlowField::new(curl_config(resolution), farm(&[0.0], &[0.0]), wind).unwrap();
    let points = ExtraPoints::new(vec![100.0], vec![0.0], vec![90.0]).unwrap();

    let err = ff
        .calculate_wake(WakeOptions {
            points: Some(points),
            ..WakeOptions::default()
        })
        .unwrap_err();
    assert!(matches!(err, FlowError::Configuration { .. }));
}

#[test]
fn gridded_model_rejects_other_resolution() {
    let resolution = GridResolution::new(20, 10, 6).unwrap();
    let wind = WindMap::homogeneous(SPEED, 270.0, TI).unwrap();
    let mut ff = FlowField::new(curl_config(resolution), farm(&[0.0], &[0.0]), wind).unwrap();

    let err = ff
        .reinitialize(FlowFieldUpdate {
            with_resolution: Some(GridResolution::new(10, 10, 10).unwrap()),
            ..FlowFieldUpdate::default()
        })
        .unwrap_err();
    assert!(matches!(err, FlowError::Configuration { .. }));
    assert_eq!(ff.x().len(), resolution.point_count());
}

#[test]
fn visualisation_grid_for_a_sparse_model() {
    let mut ff = flow_field(&[0.0, 630.0], &[0.0, 0.0], 270.0);
    ff.reinitialize(FlowFieldUpdate {
        with_resolution: Some(GridResolution::new(30, 12, 5).unwrap()),
        ..FlowFieldUpdate::default()
    })
    .unwrap();
    assert_eq!(ff.x().len(), 30 * 12 * 5);

    ff.calculate_wake(WakeOptions::default()).unwrap();
    assert!(ff.u().iter().zip(ff.u_initial().iter()).any(|(u, u0)| u < u0));
}

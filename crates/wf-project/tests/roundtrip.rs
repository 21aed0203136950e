use wf_project::schema::*;
use wf_project::{load_json, load_yaml, save_json, save_yaml};

fn project() -> Project {
    Project {
        version: 1,
        name: "Roundtrip".to_string(),
        turbine_types: vec![TurbineTypeDef {
            id: "custom".to_string(),
            rotor_diameter_m: 100.0,
            hub_height_m: 80.0,
            power_curve: Some(PowerCurveDef {
                wind_speed_mps: vec![3.0, 10.0, 25.0],
                power_coefficient: vec![0.0, 0.45, 0.05],
                thrust_coefficient: vec![0.9, 0.7, 0.1],
            }),
            ngrid: Some(3),
            rloc: None,
            yaw_loss_exponent: None,
            generator_efficiency: Some(0.96),
            air_density_kg_per_m3: None,
        }],
        turbines: vec![TurbineDef {
            id: "A".to_string(),
            type_id: "custom".to_string(),
            x_m: 10.0,
            y_m: -5.0,
            yaw_deg: 5.0,
        }],
        wind: WindDef::Measured {
            measurements: vec![MeasurementDef {
                x_m: 0.0,
                y_m: 0.0,
                speed_mps: 9.0,
                direction_deg: 260.0,
                turbulence_intensity: 0.07,
            }],
        },
        flow: FlowDef {
            bounds_m: Some([-500.0, 2000.0, -500.0, 500.0, 0.1, 300.0]),
            ..FlowDef::default()
        },
        wake: WakeDef::default(),
    }
}

#[test]
fn roundtrip_yaml() {
    let path = std::env::temp_dir().join("wf_project_roundtrip.yaml");
    save_yaml(&path, &project()).unwrap();
    assert_eq!(load_yaml(&path).unwrap(), project());
}

#[test]
fn roundtrip_json() {
    let path = std::env::temp_dir().join("wf_project_roundtrip.json");
    save_json(&path, &project()).unwrap();
    assert_eq!(load_json(&path).unwrap(), project());
}

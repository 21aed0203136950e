use wf_project::schema::*;
use wf_project::{ProjectError, ValidationError, from_yaml_str, validate_project};

fn base_project() -> Project {
    Project {
        version: 1,
        name: "Pair".to_string(),
        turbine_types: vec![TurbineTypeDef {
            id: "nrel_5mw".to_string(),
            rotor_diameter_m: 126.0,
            hub_height_m: 90.0,
            power_curve: None,
            ngrid: None,
            rloc: None,
            yaw_loss_exponent: None,
            generator_efficiency: None,
            air_density_kg_per_m3: None,
        }],
        turbines: vec![
            TurbineDef {
                id: "T0".to_string(),
                type_id: "nrel_5mw".to_string(),
                x_m: 0.0,
                y_m: 0.0,
                yaw_deg: 0.0,
            },
            TurbineDef {
                id: "T1".to_string(),
                type_id: "nrel_5mw".to_string(),
                x_m: 630.0,
                y_m: 0.0,
                yaw_deg: 0.0,
            },
        ],
        wind: WindDef::Homogeneous {
            speed_mps: 8.0,
            direction_deg: 270.0,
            turbulence_intensity: 0.06,
        },
        flow: FlowDef::default(),
        wake: WakeDef::default(),
    }
}

#[test]
fn base_project_validates() {
    validate_project(&base_project()).expect("base project should validate");
}

#[test]
fn duplicate_turbine_ids_are_rejected() {
    let mut project = base_project();
    project.turbines[1].id = "T0".to_string();
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::DuplicateId { .. })
    ));
}

#[test]
fn unknown_turbine_type_is_rejected() {
    let mut project = base_project();
    project.turbines[1].type_id = "missing".to_string();
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::MissingReference { .. })
    ));
}

#[test]
fn mismatched_curve_lengths_are_rejected() {
    let mut project = base_project();
    project.turbine_types[0].power_curve = Some(PowerCurveDef {
        wind_speed_mps: vec![3.0, 10.0, 25.0],
        power_coefficient: vec![0.0, 0.45],
        thrust_coefficient: vec![0.9, 0.7, 0.1],
    });
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn non_positive_dimensions_are_rejected() {
    let mut project = base_project();
    project.turbine_types[0].rotor_diameter_m = 0.0;
    assert!(validate_project(&project).is_err());
}

#[test]
fn sample_patch_below_ground_is_rejected() {
    let mut project = base_project();
    project.turbine_types[0].hub_height_m = 30.0;
    let err = validate_project(&project).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidValue { ref field, .. } if field.contains("hub_height_m")));

    project.turbine_types[0].rloc = Some(0.4);
    validate_project(&project).expect("a tighter patch clears the ground");
}

#[test]
fn turbulence_intensity_outside_unit_range_is_rejected() {
    let mut project = base_project();
    project.wind = WindDef::Homogeneous {
        speed_mps: 8.0,
        direction_deg: 270.0,
        turbulence_intensity: 1.2,
    };
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn unknown_model_names_are_rejected() {
    let mut project = base_project();
    project.wake.velocity_model = "park".to_string();
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::UnknownModel { kind: "velocity", .. })
    ));
}

#[test]
fn future_versions_are_rejected() {
    let mut project = base_project();
    project.version = 7;
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::UnsupportedVersion { version: 7 })
    ));
}

#[test]
fn coincident_turbines_fail_to_build() {
    let mut project = base_project();
    project.turbines[1].x_m = 0.0;
    validate_project(&project).unwrap();
    assert!(matches!(
        wf_project::build_flow_field(&project),
        Err(ProjectError::Turbine(_))
    ));
}

#[test]
fn defaults_fill_in_omitted_sections() {
    let yaml = r#"
version: 1
name: Minimal
turbine_types:
  - id: t
    rotor_diameter_m: 126.0
    hub_height_m: 90.0
turbines:
  - id: only
    type_id: t
    x_m: 0.0
    y_m: 0.0
wind:
  type: Homogeneous
  speed_mps: 10.0
  direction_deg: 250.0
  turbulence_intensity: 0.1
"#;
    let project = from_yaml_str(yaml).unwrap();
    assert_eq!(project.flow.wind_shear, 0.12);
    assert_eq!(project.wake.turbulence_model, "crespo_hernandez");
    assert_eq!(project.turbines[0].yaw_deg, 0.0);
}

#[test]
fn unsupported_extension_is_reported() {
    let path = std::path::Path::new("farm.toml");
    assert!(matches!(
        wf_project::load_project(path),
        Err(ProjectError::UnsupportedFormat { .. })
    ));
}

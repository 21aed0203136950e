use std::path::PathBuf;

use wf_flow::{DomainKind, WakeOptions};

fn project_path(name: &str) -> PathBuf {
    let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    crate_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .join("projects")
        .join(name)
}

#[test]
fn bundled_projects_load_and_run() {
    for name in ["three_turbine_row.yaml", "measured_inflow_curl.yaml"] {
        let path = project_path(name);
        let project = wf_project::load_project(&path)
            .unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e));
        let mut flow_field = wf_project::build_flow_field(&project)
            .unwrap_or_else(|e| panic!("Failed to build {}: {}", name, e));
        flow_field
            .calculate_wake(WakeOptions::default())
            .unwrap_or_else(|e| panic!("Failed to run {}: {}", name, e));
        assert!(flow_field.u().iter().all(|u| u.is_finite()), "{name}");
    }
}

#[test]
fn row_project_builds_expected_farm() {
    let project = wf_project::load_project(&project_path("three_turbine_row.yaml")).unwrap();
    let flow_field = wf_project::build_flow_field(&project).unwrap();

    let map = flow_field.turbine_map();
    assert_eq!(map.len(), 3);
    assert_eq!(map.layout_x(), vec![0.0, 630.0, 1260.0]);
    assert_eq!(map.turbines()[0].yaw_angle(), 10.0);
    assert_eq!(map.turbines()[1].name, "T1");
    assert_eq!(flow_field.config().wake.velocity.name(), "gauss");
    assert!(matches!(flow_field.domain().kind(), DomainKind::Sparse { .. }));
}

#[test]
fn project_resolution_sizes_the_curl_grid() {
    let project = wf_project::load_project(&project_path("measured_inflow_curl.yaml")).unwrap();
    let flow_field = wf_project::build_flow_field(&project).unwrap();

    assert_eq!(flow_field.x().len(), 30 * 12 * 6);
    assert_eq!(flow_field.turbine_map().turbines()[0].grid_point_count(), 16);
}

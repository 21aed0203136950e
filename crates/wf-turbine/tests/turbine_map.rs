use proptest::prelude::*;
use wf_core::Vec3;
use wf_turbine::{Turbine, TurbineMap};

fn farm(xs: &[f64], ys: &[f64]) -> TurbineMap {
    let turbines = (0..xs.len())
        .map(|i| Turbine::nrel_5mw(format!("T{i}")))
        .collect();
    TurbineMap::new(xs, ys, turbines).unwrap()
}

#[test]
fn zero_rotation_is_identity() {
    let map = farm(&[0.0, 630.0, 315.5], &[0.0, 12.25, -400.0]);
    let center = Vec3::new(123.4, -56.7, 0.0);
    let rotated = map.rotated(&[0.0; 3], &center).unwrap();
    for (a, b) in map.coords().iter().zip(rotated.coords()) {
        assert_eq!(a.x1, b.x1);
        assert_eq!(a.x2, b.x2);
        assert_eq!(a.x3, b.x3);
    }
}

#[test]
fn ties_in_x_keep_input_order() {
    let map = farm(&[0.0, 0.0, -10.0], &[300.0, -300.0, 0.0]);
    let order: Vec<f64> = map
        .sorted_in_x_as_list()
        .iter()
        .map(|(c, _)| c.x2)
        .collect();
    assert_eq!(order, [0.0, 300.0, -300.0]);
}

#[test]
fn yaw_angles_are_applied_in_index_order() {
    let mut map = farm(&[0.0, 630.0], &[0.0, 0.0]);
    map.set_yaw_angles(&[20.0, -5.0]).unwrap();
    assert_eq!(map.turbines()[0].yaw_angle(), 20.0);
    assert_eq!(map.turbines()[1].yaw_angle(), -5.0);
    assert!(map.set_yaw_angles(&[0.0]).is_err());
}

proptest! {
    #[test]
    fn rotation_preserves_pairwise_distance(theta in -180.0f64..180.0, cx in -1e3f64..1e3, cy in -1e3f64..1e3) {
        let map = farm(&[0.0, 630.0], &[0.0, 250.0]);
        let angles = [theta; 2];
        let rotated = map.rotated(&angles, &Vec3::new(cx, cy, 0.0)).unwrap();
        let d = |m: &TurbineMap| {
            let c = m.coords();
            ((c[0].x1 - c[1].x1).powi(2) + (c[0].x2 - c[1].x2).powi(2)).sqrt()
        };
        prop_assert!((d(&map) - d(&rotated)).abs() < 1e-6);
    }
}

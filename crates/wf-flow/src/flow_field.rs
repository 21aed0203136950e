//! The wake-calculation engine.

use std::collections::BTreeMap;

use tracing::{debug, info, trace};
use wf_core::rotation::{RotationAngles, incremental_rotation, rotate_points};
use wf_core::units::{Power, watts};
use wf_core::{DomainBounds, Field, GridPoints, GridResolution, TurbineId, Vec3};
use wf_turbine::TurbineMap;
use wf_wake::{Crossflow, FlowView};

use crate::config::{FlowFieldConfig, FlowFieldUpdate, WakeOptions, WakeReport};
use crate::error::{FlowError, FlowResult};
use crate::grid::{Domain, DomainKind, ExtraPoints, default_bounds};
use crate::overlap::area_overlap;
use crate::wind_map::WindMap;

/// Vertical extent of the default domain, in reference heights.
const Z_FACTOR: f64 = 2.0;
/// Vertical extent for models that lay their grid out in the wind frame.
const Z_FACTOR_ROTATED_GRID: f64 = 6.0;

/// Steady flow through a wind farm.
///
/// Owns the turbine map, the wind map and the sample-point domain. The
/// domain and its ambient baseline are rebuilt as a whole by
/// [`FlowField::reinitialize`]; [`FlowField::calculate_wake`] only touches
/// the current velocities and the turbines' operating state.
#[derive(Clone, Debug)]
pub struct FlowField {
    config: FlowFieldConfig,
    turbine_map: TurbineMap,
    wind_map: WindMap,
    domain: Domain,
}

impl FlowField {
    pub fn new(config: FlowFieldConfig, turbine_map: TurbineMap, wind_map: WindMap) -> FlowResult<Self> {
        if turbine_map.is_empty() {
            return Err(FlowError::precondition("flow field needs at least one turbine"));
        }
        let (wind_map, domain) = build_domain(&config, None, &turbine_map, wind_map)?;
        let mut flow_field = Self {
            config,
            turbine_map,
            wind_map,
            domain,
        };
        flow_field.reset_turbines();
        flow_field.log_initialised();
        Ok(flow_field)
    }

    /// Rebuild the domain and baseline from an updated configuration.
    ///
    /// The new state is assembled off to the side and swapped in only when
    /// every step succeeds; on error the flow field is left untouched.
    pub fn reinitialize(&mut self, update: FlowFieldUpdate) -> FlowResult<()> {
        let config = update.merged(&self.config);
        let wind_map = update
            .wind_map
            .unwrap_or_else(|| self.wind_map.clone());
        let (wind_map, domain) =
            build_domain(&config, update.with_resolution, &self.turbine_map, wind_map)?;

        self.config = config;
        self.wind_map = wind_map;
        self.domain = domain;
        self.reset_turbines();
        self.log_initialised();
        Ok(())
    }

    /// Recompute the ambient baseline on the current sample points and
    /// restore the current velocities to it.
    pub fn initialize_velocities(&mut self) -> FlowResult<()> {
        let height = self.reference_wind_height();
        self.wind_map.set_grid_layout(&self.domain.x, &self.domain.y)?;
        self.domain
            .initialize_velocities(self.wind_map.grid_wind_speed(), height, self.config.wind_shear)
    }

    /// Restore u, v and w to the ambient baseline.
    pub fn reset_uvw(&mut self) {
        self.domain.reset_uvw();
    }

    /// Replace the domain extent and rebuild.
    pub fn set_bounds(&mut self, bounds: DomainBounds) -> FlowResult<()> {
        self.reinitialize(FlowFieldUpdate {
            bounds: Some(bounds),
            ..FlowFieldUpdate::default()
        })
    }

    /// Set every turbine's yaw angle (degrees), in turbine index order.
    pub fn set_yaw_angles(&mut self, yaw_angles: &[f64]) -> FlowResult<()> {
        self.turbine_map.set_yaw_angles(yaw_angles)?;
        Ok(())
    }

    /// Propagate every turbine's wake through the farm.
    ///
    /// Turbines are processed upstream to downstream in the wind-aligned
    /// frame. Each one reads its inflow from the deficit accumulated so far,
    /// then contributes its own deficit, crossflow and added turbulence.
    ///
    /// If the sweep fails, a model that lays its grid out in the wind frame
    /// gets its physical grid back; turbine operating state is left as the
    /// sweep left it.
    pub fn calculate_wake(&mut self, options: WakeOptions) -> FlowResult<WakeReport> {
        let WakeOptions {
            no_wake,
            points,
            track_n_upstream_wakes,
        } = options;
        let bundle = self.config.wake;
        let gridded_model = bundle.grid_resolution().is_some();
        let rotates_grid = bundle.velocity.rotates_physical_grid();

        if gridded_model {
            self.domain.reset_uvw();
        }
        if let Some(points) = &points {
            if gridded_model {
                return Err(FlowError::configuration(format!(
                    "the {} model evaluates on its own grid and cannot take extra points",
                    bundle.velocity.name()
                )));
            }
            self.rebuild_with_points(points)?;
        }

        self.reset_turbines();
        let physical_frame = rotates_grid.then(|| (self.domain.clone(), self.wind_map.clone()));
        let counts = match self.propagate_wakes(no_wake, track_n_upstream_wakes) {
            Ok(counts) => counts,
            Err(err) => {
                if let Some((domain, wind_map)) = physical_frame {
                    self.domain = domain;
                    self.wind_map = wind_map;
                }
                return Err(err);
            }
        };

        let upstream_wakes = counts.map(|counts| {
            counts
                .into_iter()
                .enumerate()
                .map(|(i, c)| (TurbineId::from_usize(i), c))
                .collect::<BTreeMap<_, _>>()
        });
        Ok(WakeReport { upstream_wakes })
    }

    /// Sweep the turbines upstream to downstream, returning per-turbine
    /// upstream wake counts when tracking is requested.
    fn propagate_wakes(
        &mut self,
        no_wake: bool,
        track_n_upstream_wakes: bool,
    ) -> FlowResult<Option<Vec<usize>>> {
        let bundle = self.config.wake;
        let limits = self.config.limits;
        let veer = self.config.wind_veer;
        let rotates_grid = bundle.velocity.rotates_physical_grid();
        let mut counts = track_n_upstream_wakes.then(|| vec![0usize; self.turbine_map.len()]);

        let center = self.domain.center_of_rotation();
        let rotated_map = self
            .turbine_map
            .rotated(&self.wind_map.turbine_rotation_angles(), &center)?;
        let rx: Vec<f64> = rotated_map.coords().iter().map(|c| c.x1).collect();
        let ry: Vec<f64> = rotated_map.coords().iter().map(|c| c.x2).collect();

        let homogeneous = self.wind_map.is_direction_homogeneous();
        let grid_angles = self.wind_map.grid_rotation_angles();
        let grid_angle = grid_angles.iter().next().copied().unwrap_or(0.0);
        let (initial_rx, initial_ry) = if rotates_grid {
            if !homogeneous {
                return Err(FlowError::configuration(format!(
                    "the {} model needs a single wind direction across the domain",
                    bundle.velocity.name()
                )));
            }
            self.lay_out_in_wind_frame(&rotated_map)?;
            (self.domain.x.clone(), self.domain.y.clone())
        } else {
            let angles = if homogeneous {
                RotationAngles::Uniform(grid_angle)
            } else {
                RotationAngles::PerPoint(&grid_angles)
            };
            rotate_points(&self.domain.x, &self.domain.y, angles, &center)?
        };

        let order: Vec<Vec3> = rotated_map
            .sorted_in_x_as_list()
            .into_iter()
            .map(|(coord, _)| coord)
            .collect();

        let n = self.domain.len();
        let mut u_wake = Field::zeros(n);
        self.domain.v = Field::zeros(n);
        self.domain.w = Field::zeros(n);

        let Self {
            domain,
            turbine_map,
            wind_map,
            ..
        } = self;
        let ambient_ti = wind_map.turbine_turbulence_intensity();

        for coord in &order {
            let idx = locate_turbine_index(&rx, &ry, coord)?;

            let adjusted;
            let (gx, gy) = if homogeneous {
                (&initial_rx, &initial_ry)
            } else {
                let turbine_direction = wind_map.turbine_wind_direction()[idx];
                let offsets = wind_map.grid_wind_direction().map(|g| turbine_direction - g);
                adjusted = incremental_rotation(
                    &initial_rx,
                    &initial_ry,
                    &offsets,
                    &center,
                    (rx[idx], ry[idx]),
                )?;
                (&adjusted.0, &adjusted.1)
            };
            let points = GridPoints::new(gx, gy, &domain.z)?;

            turbine_map.turbines_mut()[idx].update_velocities(
                &u_wake,
                coord,
                &domain.u_initial,
                points,
            )?;

            let turbines = turbine_map.turbines();
            let turbine = &turbines[idx];
            let flow = FlowView::new(&domain.u_initial, &domain.v, &domain.w, veer);
            let deflection = bundle.deflection_function(points, turbine, coord, &flow)?;
            let deficit = bundle.velocity_function(points, turbine, coord, &deflection, &flow)?;
            debug!(
                turbine = idx,
                x = coord.x1,
                y = coord.x2,
                inflow = turbine.average_velocity(),
                "turbine wake computed"
            );

            if bundle.turbulence.propagates_downstream() {
                let additional = &domain.u_initial - &deficit.u;
                let mut ti_updates = Vec::new();
                for coord_ti in &order {
                    let idx_ti = locate_turbine_index(&rx, &ry, coord_ti)?;
                    if !limits.influences(coord, coord_ti, turbine.rotor_diameter()) {
                        continue;
                    }
                    let turbine_ti = &turbines[idx_ti];
                    let (freestream, wake) = turbine_ti.calculate_swept_area_velocities(
                        &domain.u_initial,
                        coord_ti,
                        points,
                        &additional,
                    )?;
                    let overlap = area_overlap(&wake, &freestream, limits.freestream_tolerance)?;
                    if overlap > 0.0 {
                        let ambient = ambient_ti[idx_ti];
                        let added =
                            overlap * bundle.turbulence_function(ambient, coord_ti, coord, turbine);
                        let ti = added.hypot(ambient).max(turbine_ti.turbulence_intensity());
                        trace!(from = idx, to = idx_ti, overlap, added, ti, "wake-added turbulence");
                        ti_updates.push((idx_ti, ti));
                        if let Some(counts) = counts.as_mut() {
                            counts[idx_ti] += 1;
                        }
                    }
                }
                let turbines = turbine_map.turbines_mut();
                for (i, ti) in ti_updates {
                    turbines[i].set_turbulence_intensity(ti);
                }
            }

            if !no_wake {
                u_wake = bundle.combination_function(&u_wake, &deficit.u)?;
                match bundle.crossflow() {
                    Crossflow::Absolute => {
                        domain.v = deficit.v;
                        domain.w = deficit.w;
                    }
                    Crossflow::Incremental => {
                        domain.v += &deficit.v;
                        domain.w += &deficit.w;
                    }
                }
            }
        }

        if !no_wake {
            domain.u = &domain.u_initial - &u_wake;
        }

        if rotates_grid {
            let (x, y) = rotate_points(
                &domain.x,
                &domain.y,
                RotationAngles::Uniform(-grid_angle),
                &center,
            )?;
            domain.x = x;
            domain.y = y;
            wind_map.set_grid_layout(&domain.x, &domain.y)?;
        }
        Ok(counts)
    }

    /// Rotor points rebuilt for the current layout with `points` appended.
    fn rebuild_with_points(&mut self, points: &ExtraPoints) -> FlowResult<()> {
        let angles = self.wind_map.turbine_rotation_angles();
        let domain = Domain::sparse(&self.turbine_map, &angles, self.domain.bounds())?
            .with_points(points)?;
        let mut wind_map = self.wind_map.clone();
        let domain = initialize_domain(
            domain,
            &mut wind_map,
            self.reference_wind_height(),
            self.config.wind_shear,
        )?;
        debug!(points = points.len(), total = domain.len(), "extra sample points appended");
        self.wind_map = wind_map;
        self.domain = domain;
        Ok(())
    }

    /// Re-lay the dense grid directly in the wind-aligned frame around the
    /// rotated turbine positions. The recorded bounds stay physical.
    fn lay_out_in_wind_frame(&mut self, rotated_map: &TurbineMap) -> FlowResult<()> {
        let DomainKind::Gridded(resolution) = self.domain.kind() else {
            return Err(FlowError::Consistency {
                what: "a wind-frame grid was requested for a sparse domain".into(),
            });
        };
        let physical = self.domain.bounds();
        let margin = self.reference_turbine_diameter();
        let frame = default_bounds(
            &rotated_map.layout_x(),
            &rotated_map.layout_y(),
            margin,
            physical.zmax,
            1.0,
        )?;
        let frame = DomainBounds {
            zmin: physical.zmin,
            ..frame
        };
        let domain = Domain::gridded(frame, resolution)?.with_bounds(physical);
        let height = self.reference_wind_height();
        self.domain = initialize_domain(domain, &mut self.wind_map, height, self.config.wind_shear)?;
        Ok(())
    }

    fn reset_turbines(&mut self) {
        let ambient = self.wind_map.turbine_turbulence_intensity();
        for (turbine, &ti) in self.turbine_map.turbines_mut().iter_mut().zip(ambient) {
            turbine.set_turbulence_intensity(ti);
            turbine.reset_velocities();
        }
    }

    fn log_initialised(&self) {
        info!(
            turbines = self.turbine_map.len(),
            points = self.domain.len(),
            gridded = matches!(self.domain.kind(), DomainKind::Gridded(_)),
            velocity = self.config.wake.velocity.name(),
            shear = self.config.wind_shear,
            "flow field initialised"
        );
    }

    /// Height at which the wind map speeds apply.
    pub fn reference_wind_height(&self) -> f64 {
        reference_wind_height(&self.config, &self.turbine_map)
    }

    pub fn reference_turbine_diameter(&self) -> f64 {
        self.config
            .reference_turbine_diameter
            .unwrap_or_else(|| self.turbine_map.max_rotor_diameter())
    }

    pub fn config(&self) -> &FlowFieldConfig {
        &self.config
    }

    pub fn turbine_map(&self) -> &TurbineMap {
        &self.turbine_map
    }

    pub fn turbine_map_mut(&mut self) -> &mut TurbineMap {
        &mut self.turbine_map
    }

    pub fn wind_map(&self) -> &WindMap {
        &self.wind_map
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn bounds(&self) -> DomainBounds {
        self.domain.bounds()
    }

    pub fn x(&self) -> &Field {
        &self.domain.x
    }

    pub fn y(&self) -> &Field {
        &self.domain.y
    }

    pub fn z(&self) -> &Field {
        &self.domain.z
    }

    pub fn u(&self) -> &Field {
        &self.domain.u
    }

    pub fn v(&self) -> &Field {
        &self.domain.v
    }

    pub fn w(&self) -> &Field {
        &self.domain.w
    }

    pub fn u_initial(&self) -> &Field {
        &self.domain.u_initial
    }

    pub fn v_initial(&self) -> &Field {
        &self.domain.v_initial
    }

    pub fn w_initial(&self) -> &Field {
        &self.domain.w_initial
    }

    /// Electrical power of every turbine, in index order.
    pub fn turbine_powers(&self) -> Vec<Power> {
        self.turbine_map.turbines().iter().map(|t| t.power()).collect()
    }

    pub fn farm_power(&self) -> Power {
        self.turbine_powers()
            .into_iter()
            .fold(watts(0.0), |total, p| total + p)
    }
}

fn reference_wind_height(config: &FlowFieldConfig, turbine_map: &TurbineMap) -> f64 {
    config.reference_wind_height.unwrap_or_else(|| {
        turbine_map
            .turbines()
            .first()
            .map_or(1.0, |t| t.hub_height())
    })
}

/// Assemble a fresh wind map and domain for `config`.
fn build_domain(
    config: &FlowFieldConfig,
    with_resolution: Option<GridResolution>,
    turbine_map: &TurbineMap,
    mut wind_map: WindMap,
) -> FlowResult<(WindMap, Domain)> {
    config.validate()?;

    let resolution = match (config.wake.grid_resolution(), with_resolution) {
        (Some(required), Some(requested)) if required != requested => {
            return Err(FlowError::configuration(format!(
                "the {} model requires a {}x{}x{} grid, got {}x{}x{}",
                config.wake.velocity.name(),
                required.nx,
                required.ny,
                required.nz,
                requested.nx,
                requested.ny,
                requested.nz
            )));
        }
        (Some(required), _) => Some(required),
        (None, requested) => requested,
    };

    let layout_x = turbine_map.layout_x();
    let layout_y = turbine_map.layout_y();
    wind_map.set_turbine_layout(&layout_x, &layout_y)?;

    let height = reference_wind_height(config, turbine_map);
    let bounds = match config.bounds {
        Some(bounds) => bounds,
        None => {
            let margin = config
                .reference_turbine_diameter
                .unwrap_or_else(|| turbine_map.max_rotor_diameter());
            let z_factor = if config.wake.velocity.rotates_physical_grid() {
                Z_FACTOR_ROTATED_GRID
            } else {
                Z_FACTOR
            };
            default_bounds(&layout_x, &layout_y, margin, height, z_factor)?
        }
    };

    let domain = match resolution {
        Some(resolution) => Domain::gridded(bounds, resolution)?,
        None => Domain::sparse(turbine_map, &wind_map.turbine_rotation_angles(), bounds)?,
    };
    let domain = initialize_domain(domain, &mut wind_map, height, config.wind_shear)?;
    Ok((wind_map, domain))
}

fn initialize_domain(
    mut domain: Domain,
    wind_map: &mut WindMap,
    height: f64,
    shear: f64,
) -> FlowResult<Domain> {
    wind_map.set_grid_layout(&domain.x, &domain.y)?;
    domain.initialize_velocities(wind_map.grid_wind_speed(), height, shear)?;
    Ok(domain)
}

/// Index of the turbine whose rotated position is exactly `coord`.
pub(crate) fn locate_turbine_index(rx: &[f64], ry: &[f64], coord: &Vec3) -> FlowResult<usize> {
    let mut matches = rx
        .iter()
        .zip(ry)
        .enumerate()
        .filter(|(_, (x, y))| **x == coord.x1 && **y == coord.x2)
        .map(|(i, _)| i);
    match (matches.next(), matches.next()) {
        (Some(i), None) => Ok(i),
        (None, _) => Err(FlowError::Consistency {
            what: format!("no turbine at rotated position ({}, {})", coord.x1, coord.x2),
        }),
        (Some(first), Some(second)) => Err(FlowError::Consistency {
            what: format!(
                "turbines {first} and {second} share rotated position ({}, {})",
                coord.x1, coord.x2
            ),
        }),
    }
}

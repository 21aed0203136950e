use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wf_core::TurbineId;
use wf_flow::{FlowError, FlowFieldUpdate, WakeOptions};
use wf_project::{ProjectError, WindDef};

#[derive(Parser)]
#[command(name = "wf-cli")]
#[command(about = "wakeflow CLI - steady-state wind farm wake calculations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// Compute the wakes once and report every turbine
    Run {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Leave the flow at its ambient state
        #[arg(long)]
        no_wake: bool,
        /// Report how many upstream wakes reach each turbine
        #[arg(long)]
        track_wakes: bool,
        /// Override the project wind speed (m/s)
        #[arg(long)]
        wind_speed: Option<f64>,
        /// Override the project wind direction (degrees)
        #[arg(long)]
        wind_direction: Option<f64>,
    },
    /// Sweep the wind direction and report farm power per step
    Sweep {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// First wind direction (degrees)
        #[arg(long)]
        from: f64,
        /// Last wind direction (degrees, inclusive)
        #[arg(long)]
        to: f64,
        /// Direction increment (degrees)
        #[arg(long, default_value_t = 5.0)]
        step: f64,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error("Invalid sweep: {what}")]
    InvalidSweep { what: String },
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Run {
            project_path,
            no_wake,
            track_wakes,
            wind_speed,
            wind_direction,
        } => cmd_run(&project_path, no_wake, track_wakes, wind_speed, wind_direction),
        Commands::Sweep {
            project_path,
            from,
            to,
            step,
        } => cmd_sweep(&project_path, from, to, step),
    }
}

fn cmd_validate(project_path: &Path) -> CliResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = wf_project::load_project(project_path)?;
    println!(
        "✓ Project is valid ({} turbine types, {} turbines)",
        project.turbine_types.len(),
        project.turbines.len()
    );
    Ok(())
}

fn cmd_run(
    project_path: &Path,
    no_wake: bool,
    track_wakes: bool,
    wind_speed: Option<f64>,
    wind_direction: Option<f64>,
) -> CliResult<()> {
    let mut project = wf_project::load_project(project_path)?;
    override_wind(&mut project.wind, wind_speed, wind_direction);
    wf_project::validate_project(&project).map_err(ProjectError::from)?;

    let started = Instant::now();
    let mut flow_field = wf_project::build_flow_field(&project)?;
    let report = flow_field.calculate_wake(WakeOptions {
        no_wake,
        points: None,
        track_n_upstream_wakes: track_wakes,
    })?;
    info!(elapsed_s = started.elapsed().as_secs_f64(), "wake calculation finished");

    println!("Project: {}", project.name);
    println!(
        "{:<10} {:>10} {:>10} {:>10} {:>8} {:>12}{}",
        "turbine",
        "x [m]",
        "y [m]",
        "U [m/s]",
        "TI",
        "P [kW]",
        if track_wakes { "   wakes" } else { "" }
    );
    let powers = flow_field.turbine_powers();
    for (i, ((coord, turbine), power)) in flow_field
        .turbine_map()
        .items()
        .zip(&powers)
        .enumerate()
    {
        let wakes = report
            .upstream_wakes
            .as_ref()
            .and_then(|counts| counts.get(&TurbineId::from_usize(i)))
            .map(|n| format!(" {n:>7}"))
            .unwrap_or_default();
        println!(
            "{:<10} {:>10.1} {:>10.1} {:>10.3} {:>8.4} {:>12.1}{}",
            turbine.name,
            coord.x1,
            coord.x2,
            turbine.average_velocity(),
            turbine.turbulence_intensity(),
            power.value / 1e3,
            wakes
        );
    }
    println!("\nFarm power: {:.3} MW", flow_field.farm_power().value / 1e6);
    Ok(())
}

fn cmd_sweep(project_path: &Path, from: f64, to: f64, step: f64) -> CliResult<()> {
    if !(step.is_finite() && step > 0.0) {
        return Err(CliError::InvalidSweep {
            what: format!("step must be positive, got {step}"),
        });
    }
    if !(from.is_finite() && to.is_finite() && from <= to) {
        return Err(CliError::InvalidSweep {
            what: format!("expected finite from <= to, got {from}..{to}"),
        });
    }

    let project = wf_project::load_project(project_path)?;
    let mut flow_field = wf_project::build_flow_field(&project)?;

    println!("Project: {}", project.name);
    println!("{:>10} {:>14}", "WD [deg]", "farm P [MW]");
    let steps = ((to - from) / step).floor() as usize;
    for k in 0..=steps {
        let direction = from + k as f64 * step;
        // measured inflow keeps its speeds and turbulence, turned to the new direction
        let mut wind = project.wind.clone();
        override_wind(&mut wind, None, Some(direction));
        flow_field.reinitialize(FlowFieldUpdate::wind_map(wf_project::build_wind_map(&wind)?))?;
        flow_field.calculate_wake(WakeOptions::default())?;
        println!("{:>10.1} {:>14.4}", direction, flow_field.farm_power().value / 1e6);
    }
    Ok(())
}

fn override_wind(wind: &mut WindDef, wind_speed: Option<f64>, wind_direction: Option<f64>) {
    match wind {
        WindDef::Homogeneous {
            speed_mps,
            direction_deg,
            ..
        } => {
            if let Some(speed) = wind_speed {
                *speed_mps = speed;
            }
            if let Some(direction) = wind_direction {
                *direction_deg = direction;
            }
        }
        WindDef::Measured { measurements } => {
            for m in measurements {
                if let Some(speed) = wind_speed {
                    m.speed_mps = speed;
                }
                if let Some(direction) = wind_direction {
                    m.direction_deg = direction;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf_project::MeasurementDef;

    fn measurement(x_m: f64, speed_mps: f64) -> MeasurementDef {
        MeasurementDef {
            x_m,
            y_m: 0.0,
            speed_mps,
            direction_deg: 270.0,
            turbulence_intensity: 0.08,
        }
    }

    #[test]
    fn direction_override_keeps_measured_speeds() {
        let mut wind = WindDef::Measured {
            measurements: vec![measurement(-200.0, 9.0), measurement(800.0, 7.5)],
        };
        override_wind(&mut wind, None, Some(300.0));

        let WindDef::Measured { measurements } = &wind else {
            panic!("measured inflow became {wind:?}");
        };
        let speeds: Vec<f64> = measurements.iter().map(|m| m.speed_mps).collect();
        assert_eq!(speeds, [9.0, 7.5]);
        assert!(measurements.iter().all(|m| m.direction_deg == 300.0));

        let wind_map = wf_project::build_wind_map(&wind).unwrap();
        assert_eq!(wind_map.measurements().len(), 2);
    }

    #[test]
    fn speed_override_on_homogeneous_inflow() {
        let mut wind = WindDef::Homogeneous {
            speed_mps: 8.0,
            direction_deg: 270.0,
            turbulence_intensity: 0.06,
        };
        override_wind(&mut wind, Some(11.0), None);
        assert!(matches!(
            wind,
            WindDef::Homogeneous { speed_mps, direction_deg, .. } if speed_mps == 11.0 && direction_deg == 270.0
        ));
    }
}

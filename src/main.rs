use navie_cavity::{JsonSnapshotWriter, Simulation, SimulationConfig, SnapshotSink, Termination};
use tracing::{error, info, Level};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    // optional JSON config; defaults describe a 41x41 cavity with a unit lid
    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::from_json_file(path)?,
        None => SimulationConfig::default(),
    };

    let simulation = Simulation::new(&config)?;
    let grid = simulation.grid().clone();
    let summary = simulation.run();

    if let Some(output) = &config.output {
        let mut writer = JsonSnapshotWriter::new(output)?;
        writer.consume(&grid, &summary.snapshots)?;
    }

    match summary.termination {
        Termination::Completed => {
            info!("Completed {} frames in {} steps", summary.snapshots.len() - 1, summary.steps_taken);
            Ok(())
        }
        Termination::Halted { last_valid_frame, error: cause } => {
            error!("Halted after frame {}: {}", last_valid_frame, cause);
            Err(cause.into())
        }
    }
}

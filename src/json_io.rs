// src/json_io.rs

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::domain::grid2d::Grid2D;
use crate::domain::state::{Snapshot, SnapshotSequence};
use crate::error::SolverError;

/// Consumer of a finished run. Receives the whole sequence once, after the last frame.
pub trait SnapshotSink {
    fn consume(&mut self, grid: &Grid2D, snapshots: &SnapshotSequence) -> Result<(), SolverError>;
}

// --- Data Structures for Serialization ---
#[derive(Serialize, Debug)]
struct Metadata {
    nx: usize,
    ny: usize,
    dx: f64,
    dy: f64,
    frame_count: usize,
    /// Fields are flattened column-major: entry `(i, j)` sits at `j * ny + i`.
    layout: &'static str,
}

#[derive(Serialize, Debug)]
struct FrameData<'a> {
    frame: usize,
    time: f64,
    u: &'a [f64],
    v: &'a [f64],
    p: &'a [f64],
}

impl<'a> From<&'a Snapshot> for FrameData<'a> {
    fn from(snapshot: &'a Snapshot) -> Self {
        Self {
            frame: snapshot.frame,
            time: snapshot.time,
            u: snapshot.u.as_slice(),
            v: snapshot.v.as_slice(),
            p: snapshot.p.as_slice(),
        }
    }
}

#[derive(Serialize, Debug)]
struct SimulationOutput<'a> {
    metadata: Metadata,
    data: Vec<FrameData<'a>>,
}

/// Writes every snapshot into one pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonSnapshotWriter {
    output_filepath: PathBuf,
}

impl JsonSnapshotWriter {
    /// Creates the parent directory of `output_filepath` if it is missing.
    pub fn new<P: AsRef<Path>>(output_filepath: P) -> Result<Self, SolverError> {
        let output_filepath = output_filepath.as_ref().to_path_buf();
        if let Some(parent_dir) = output_filepath.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent_dir).map_err(|e| SolverError::Io(e.to_string()))?;
            info!("Ensured output directory exists: {}", parent_dir.display());
        }
        Ok(Self { output_filepath })
    }

    pub fn output_filepath(&self) -> &Path {
        &self.output_filepath
    }
}

impl SnapshotSink for JsonSnapshotWriter {
    fn consume(&mut self, grid: &Grid2D, snapshots: &SnapshotSequence) -> Result<(), SolverError> {
        if snapshots.is_empty() {
            info!("No snapshots, skipping JSON output to {}", self.output_filepath.display());
            return Ok(());
        }
        info!("Writing {} snapshots to {}...", snapshots.len(), self.output_filepath.display());
        let output_start = Instant::now();

        let output = SimulationOutput {
            metadata: Metadata {
                nx: grid.nx(),
                ny: grid.ny(),
                dx: grid.dx(),
                dy: grid.dy(),
                frame_count: snapshots.len(),
                layout: "column_major",
            },
            data: snapshots.iter().map(FrameData::from).collect(),
        };
        let json_string = serde_json::to_string_pretty(&output)
            .map_err(|e| SolverError::Io(format!("Failed to serialize snapshots: {}", e)))?;

        let write = || -> std::io::Result<()> {
            let mut writer = BufWriter::new(File::create(&self.output_filepath)?);
            writer.write_all(json_string.as_bytes())?;
            writer.flush()
        };
        write().map_err(|e| SolverError::Io(e.to_string()))?;
        info!("JSON output finished in {:.2}ms", output_start.elapsed().as_millis());
        Ok(())
    }
}

use crate::domain::grid2d::{Grid2D, ScalarField};
use crate::error::FieldKind;

/// Live prognostic fields at one instant. Owned by the simulation driver and lent
/// to the stepper one step at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub u: ScalarField,
    pub v: ScalarField,
    pub p: ScalarField,
    pub time: f64,
}

impl SimulationState {
    /// Rest configuration: every field zero.
    pub fn at_rest(grid: &Grid2D, time: f64) -> Self {
        Self {
            u: grid.zeros(),
            v: grid.zeros(),
            p: grid.zeros(),
            time,
        }
    }

    /// First field holding a NaN or infinity, checked in u, v, p order.
    pub fn first_non_finite(&self) -> Option<FieldKind> {
        [(FieldKind::U, &self.u), (FieldKind::V, &self.v), (FieldKind::Pressure, &self.p)]
            .into_iter()
            .find(|(_, field)| field.iter().any(|x| !x.is_finite()))
            .map(|(kind, _)| kind)
    }
}

/// Deep copy of the state taken at the end of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub frame: usize,
    pub time: f64,
    pub u: ScalarField,
    pub v: ScalarField,
    pub p: ScalarField,
}

impl Snapshot {
    pub fn capture(frame: usize, state: &SimulationState) -> Self {
        Self {
            frame,
            time: state.time,
            u: state.u.clone(),
            v: state.v.clone(),
            p: state.p.clone(),
        }
    }
}

/// Append-only sequence of snapshots, indexed by frame number from 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotSequence {
    snapshots: Vec<Snapshot>,
}

impl SnapshotSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies `state` in as the next frame and returns its frame index.
    pub fn capture(&mut self, state: &SimulationState) -> usize {
        let frame = self.snapshots.len();
        self.snapshots.push(Snapshot::capture(frame, state));
        frame
    }

    pub fn get(&self, frame: usize) -> Option<&Snapshot> {
        self.snapshots.get(frame)
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot> {
        self.snapshots.iter()
    }

    pub fn as_slice(&self) -> &[Snapshot] {
        &self.snapshots
    }
}

impl<'a> IntoIterator for &'a SnapshotSequence {
    type Item = &'a Snapshot;
    type IntoIter = std::slice::Iter<'a, Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.iter()
    }
}

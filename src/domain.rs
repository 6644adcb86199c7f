pub mod grid2d;
pub mod state;

//! Error types for setup and API misuse.
//!
//! Numerical degeneracy (zero-length springs, coincident stick endpoints) is
//! never reported here; it propagates as `inf`/`nan` through positions.

use core::fmt;

use crate::arena::ParticleId;

/// Errors returned by builders and by [`crate::solver::ParticleSystem`].
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Mass must be positive and finite.
    InvalidMass,
    /// Spring grids need at least 2 particles along both axes; fluid grids
    /// need at least one cell.
    InvalidGridDimensions { cols: usize, rows: usize },
    /// Lattice builders need at least 2 particles along each of the three axes.
    InvalidLatticeDimensions { width: usize, height: usize, depth: usize },
    /// A rope needs at least one segment.
    InsufficientSegments,
    /// The id's slot has been freed or reused.
    StaleParticle(ParticleId),
    /// A spring or stick cannot join a particle to itself.
    SelfConnection(ParticleId),
    /// Fixed timesteps must be positive and finite.
    InvalidTimestep,
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::InvalidMass => write!(f, "mass must be positive and finite"),
            PhysicsError::InvalidGridDimensions { cols, rows } => {
                write!(f, "invalid grid dimensions {}x{}", cols, rows)
            }
            PhysicsError::InvalidLatticeDimensions { width, height, depth } => write!(
                f,
                "lattice must be at least 2x2x2 (got {}x{}x{})",
                width, height, depth
            ),
            PhysicsError::InsufficientSegments => write!(f, "rope needs at least 1 segment"),
            PhysicsError::StaleParticle(id) => write!(
                f,
                "particle {} (generation {}) no longer exists",
                id.index(),
                id.generation()
            ),
            PhysicsError::SelfConnection(id) => {
                write!(f, "cannot connect particle {} to itself", id.index())
            }
            PhysicsError::InvalidTimestep => write!(f, "timestep must be positive and finite"),
        }
    }
}

impl core::error::Error for PhysicsError {}

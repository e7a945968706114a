//! Tick orchestration on top of the core data structures.
//!
//! - [`Spawner`] - Creates pieces at the spawn coordinate and detects spawn collisions
//! - [`Session`] - Owns the field and the falling/held pieces, applies one [`Action`] per tick
//! - [`SessionStats`] - Score, landed pieces and line-clear histogram
//! - [`SessionConfig`] - Field size and spawn coordinate
//!
//! # Tick Flow
//!
//! 1. Spawn a new piece if none is falling (a blocked spawn ends the session)
//! 2. Remove the falling piece's footprint from the field
//! 3. Apply the action to the piece, validated against the remaining occupants
//! 4. Register the piece's footprint again
//! 5. If the piece landed, clear solid rows and add them to the score

pub use self::{config::*, session::*, spawner::*, stats::*};

mod config;
mod session;
mod spawner;
mod stats;

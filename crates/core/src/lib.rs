//! Domain logic for the swinglab analysis backend.
//!
//! Everything HTTP- and database-free lives here: the external process
//! runner, the analysis pipeline that orchestrates it, result-artifact
//! discovery, and filename/storage helpers. The `swinglab-api` crate wires
//! these into Axum handlers.

pub mod analysis;
pub mod error;
pub mod locate;
pub mod process;
pub mod storage;
pub mod types;

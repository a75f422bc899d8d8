//! Procedural tile-assembly engine for a classic brush/entity map format.
//!
//! Snaps prefabricated tiles together along `info_connector` marker entities
//! to grow a single valid output map: no brush overlaps, fits inside the
//! world boundary, deterministic given a seed.

pub mod cli;
pub mod collision;
pub mod config;
pub mod connector;
pub mod counters;
pub mod driver;
pub mod error;
pub mod scoping;
pub mod tileset;
pub mod transform;
pub mod variants;

pub use config::GeneratorConfig;
pub use driver::{assemble, AssemblyResult, PlacedTile};
pub use error::GenError;
pub use tileset::{load_tileset, load_tilesets, TileSet};

//! The stateful connector-join loop that grows a root map from a tileset.

use glam::DVec3;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use map::Map;

use crate::collision::{maps_intersect, within_world_boundary};
use crate::config::GeneratorConfig;
use crate::connector::{connectors, ConnectorRef};
use crate::counters::backfill_counters;
use crate::error::GenError;
use crate::scoping::scope_names;
use crate::tileset::{fallback_tile, Tile, TileSet};
use crate::transform::{rotate_map, translate_map};
use crate::variants::apply_variants;

/// One entry of the placed-tile log the driver hands back to its caller.
#[derive(Debug, Clone)]
pub struct PlacedTile {
    pub basename: String,
    pub tile_index: u32,
}

/// Result of a single run of the assembly driver.
#[derive(Debug, Clone)]
pub struct AssemblyResult {
    pub map: Map,
    pub success: bool,
    pub placed: Vec<PlacedTile>,
}

/// Grows `base` (the seed "empty" map, already parsed) by repeatedly joining
/// tiles from `tileset` onto its open connectors, until no open connectors
/// remain or a connector cannot be satisfied within the configured attempt
/// budget.
pub fn assemble(
    base: Map,
    tileset: &TileSet,
    config: &GeneratorConfig,
    rng: &mut StdRng,
) -> Result<AssemblyResult, GenError> {
    let mut root = base;
    let mut placed = Vec::new();

    if tileset.start.is_empty() {
        return GenError::EmptyPool("start".to_string()).to_result();
    }
    let start = tileset.start.choose(rng).expect("checked non-empty above");
    let mut start_tile = start.map.clone();
    scope_names(&mut start_tile, 0);
    root.merge(start_tile);
    placed.push(PlacedTile {
        basename: start.basename.clone(),
        tile_index: 0,
    });

    let mut counter: u32 = 1;
    let mut success = true;

    while !connectors(&root, None).is_empty() {
        let open = connectors(&root, None);
        let a = open.choose(rng).expect("non-empty checked above").clone();

        match try_place(&root, &a, tileset, config, counter, rng)? {
            Some((scratch, basename)) => {
                remove_connector(&mut root, a.index);
                counter += 1;
                root.merge(scratch);
                placed.push(PlacedTile {
                    basename,
                    tile_index: counter,
                });
                sweep_duplicate_connectors(&mut root);
            }
            None => {
                success = false;
                break;
            }
        }
    }

    backfill_counters(&mut root);

    Ok(AssemblyResult {
        map: root,
        success,
        placed,
    })
}

/// Tries up to `config.attempts_per_connector` candidate tiles against the
/// open connector `a`. Returns the accepted, already-transformed scratch map
/// (with its own matching connector removed and variants/names applied)
/// together with its source basename, or `None` if every attempt failed.
fn try_place(
    root: &Map,
    a: &ConnectorRef,
    tileset: &TileSet,
    config: &GeneratorConfig,
    tile_index: u32,
    rng: &mut StdRng,
) -> Result<Option<(Map, String)>, GenError> {
    for attempt in 0..config.attempts_per_connector {
        let candidate = draw_candidate(tileset, config, &a.name, tile_index, attempt, rng)?;
        let Some(candidate) = candidate else {
            continue;
        };

        let mut scratch = candidate.map.clone();
        let matching = connectors(&scratch, Some(&a.name));
        if matching.is_empty() {
            continue;
        }
        let b = matching.choose(rng).expect("non-empty checked above").clone();

        let r = (180.0 - (a.yaw - b.yaw)).rem_euclid(360.0);
        rotate_map(&mut scratch, r)?;

        let b_rotated = connectors(&scratch, Some(&a.name))
            .into_iter()
            .find(|c| c.index == b.index)
            .expect("connector survives rotation");
        let delta = a.centroid - b_rotated.centroid;
        translate_map(&mut scratch, delta);

        if maps_intersect(root, &scratch) {
            continue;
        }
        if !within_world_boundary(&scratch, config.boundary_limit) {
            continue;
        }

        remove_connector(&mut scratch, b.index);

        scope_names(&mut scratch, tile_index);
        let snapshot = rng.clone();
        apply_variants(&mut scratch, rng);
        *rng = snapshot;

        return Ok(Some((scratch, candidate.basename.clone())));
    }

    Ok(None)
}

fn draw_candidate(
    tileset: &TileSet,
    config: &GeneratorConfig,
    connector_type: &str,
    tile_index: u32,
    attempt: u32,
    rng: &mut StdRng,
) -> Result<Option<Tile>, GenError> {
    if let Some(path) = config.fallback_for(connector_type, attempt) {
        return Ok(Some(fallback_tile(path)?));
    }

    let pool = if tile_index < config.tile_limit {
        &tileset.ordinary
    } else {
        &tileset.cap
    };

    if pool.is_empty() {
        return Ok(None);
    }

    Ok(pool.choose(rng).cloned())
}

fn remove_connector(map: &mut Map, index: usize) {
    map.entities.remove(index);
}

/// Removes pairs of connector entities that share a centroid and face
/// exactly opposite directions (yaws differing by 180 mod 360): back-to-back
/// mates welded shut by adjacent placements.
fn sweep_duplicate_connectors(map: &mut Map) {
    loop {
        let refs = connectors(map, None);
        let mut to_remove: Option<(usize, usize)> = None;

        'outer: for i in 0..refs.len() {
            for j in (i + 1)..refs.len() {
                let same_spot = (refs[i].centroid - refs[j].centroid).length() < 1e-6;
                let opposite = (refs[i].yaw - refs[j].yaw).rem_euclid(360.0) == 180.0;
                if same_spot && opposite {
                    to_remove = Some((refs[i].index, refs[j].index));
                    break 'outer;
                }
            }
        }

        let Some((a, b)) = to_remove else { break };
        let (hi, lo) = if a > b { (a, b) } else { (b, a) };
        map.entities.remove(hi);
        map.entities.remove(lo);
    }
}

/// Draws a uniformly random seed in the source tooling's 9-digit range.
pub fn random_seed(rng: &mut impl Rng) -> u64 {
    rng.gen_range(100_000_000..1_000_000_000)
}

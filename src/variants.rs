//! Weighted selection among `mapgen_choice` entities in a freshly placed tile.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use map::Map;

const CHOICE_KEY: &str = "mapgen_choice";

/// Scans `tile`'s entities for the `mapgen_choice` key (a string parseable
/// as a positive float weight). If any entity carries it, picks exactly one
/// by weighted random selection, strips the key from the winner, and drops
/// every other entity that carried the key. Entities without the key are
/// untouched. Uses `rng` without disturbing the caller's subsequent draws
/// beyond this call: the caller is expected to snapshot/restore around it
/// the same way the upstream tooling saves and restores random state around
/// this same step.
pub fn apply_variants(tile: &mut Map, rng: &mut StdRng) {
    let mut choice_indices = Vec::new();
    let mut weights = Vec::new();

    for (index, entity) in tile.entities.iter().enumerate() {
        let Some(raw) = entity.attributes.get(CHOICE_KEY) else {
            continue;
        };
        let Ok(weight) = raw.parse::<f64>() else {
            continue;
        };
        if weight <= 0.0 {
            continue;
        }
        choice_indices.push(index);
        weights.push(weight);
    }

    if choice_indices.is_empty() {
        return;
    }

    let Ok(dist) = WeightedIndex::new(&weights) else {
        return;
    };
    let winner = choice_indices[dist.sample(rng)];

    let mut kept = Vec::with_capacity(tile.entities.len());
    for (index, mut entity) in tile.entities.drain(..).enumerate() {
        if choice_indices.contains(&index) && index != winner {
            continue;
        }
        if index == winner {
            entity.attributes.shift_remove(CHOICE_KEY);
        }
        kept.push(entity);
    }
    tile.entities = kept;
}

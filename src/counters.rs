//! Backfill of `$count$NAME` placeholders in `health` once the number of
//! matching targets in the assembled map is known.

use map::Map;

const PREFIX: &str = "$count$";

/// For every entity in `map.entities` whose `health` value begins with
/// `$count$NAME`, replaces it with the number of entities in the map whose
/// `targetname` equals `NAME`.
pub fn backfill_counters(map: &mut Map) {
    let mut pending: Vec<(usize, u32)> = Vec::new();

    for (index, entity) in map.entities.iter().enumerate() {
        let Some(health) = entity.attributes.get("health") else {
            continue;
        };
        let Some(name) = health.strip_prefix(PREFIX) else {
            continue;
        };

        let count = map
            .entities
            .iter()
            .filter(|e| e.attributes.get("targetname").map(String::as_str) == Some(name))
            .count() as u32;

        pending.push((index, count));
    }

    for (index, count) in pending {
        map.entities[index]
            .attributes
            .insert("health".to_string(), count.to_string());
    }
}

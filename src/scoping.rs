//! Per-tile rewriting of inter-entity name references so that duplicated
//! tiles do not cross-trigger each other.

use map::Map;

const SCOPED_KEYS: [&str; 3] = ["target", "targetname", "killtarget"];

/// Rewrites `target`/`targetname`/`killtarget` values on every non-worldspawn
/// entity of `tile` from `V` to `tile{prefix:03}_V`, except:
///
/// - values starting with `g_` (global, left unchanged)
/// - values starting with `$count$` (deferred, resolved by counter backfill)
/// - the `game_player_equip` → `game_playerspawn` reference
pub fn scope_names(tile: &mut Map, prefix: u32) {
    for entity in &mut tile.entities {
        let classname = entity.classname().to_string();

        for key in SCOPED_KEYS {
            let Some(value) = entity.attributes.get(key).cloned() else {
                continue;
            };

            if value.is_empty() || value.starts_with("g_") || value.starts_with("$count$") {
                continue;
            }
            if classname == "game_player_equip" && value == "game_playerspawn" {
                continue;
            }

            entity
                .attributes
                .insert(key.to_string(), format!("tile{prefix:03}_{value}"));
        }
    }
}

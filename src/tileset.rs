//! Directory walking and classification of tile `.map` files into start/cap/
//! ordinary pools.

use std::path::Path;

use map::Map;
use walkdir::WalkDir;

use crate::error::GenError;

/// One loaded tile: its parsed map and the basename it was loaded from (used
/// in the placed-tile log).
#[derive(Debug, Clone)]
pub struct Tile {
    pub map: Map,
    pub basename: String,
}

/// The three pools of one named tileset.
#[derive(Debug, Clone, Default)]
pub struct TileSet {
    pub start: Vec<Tile>,
    pub cap: Vec<Tile>,
    pub ordinary: Vec<Tile>,
}

/// Loads every `.map` file directly inside `dir`, classifying each by
/// basename. Autosave files (basename containing `.auto.`) are skipped.
pub fn load_tileset(dir: impl AsRef<Path>) -> Result<TileSet, GenError> {
    let dir = dir.as_ref();
    let mut set = TileSet::default();

    let entries = WalkDir::new(dir).min_depth(1).max_depth(1);
    for entry in entries {
        let entry = entry.map_err(|err| GenError::Io {
            source: err.into_io_error().unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::Other, "directory walk failed")
            }),
            path: dir.to_path_buf(),
        })?;

        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("map") {
            continue;
        }

        let basename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();

        if basename.contains(".auto.") {
            continue;
        }

        let map = Map::from_file(path)?;
        let tile = Tile { map, basename: basename.clone() };

        if basename == "start.map" || basename.starts_with("start_") {
            set.start.push(tile);
        } else if basename == "cap.map" || basename.starts_with("cap_") {
            set.cap.push(tile);
        } else {
            set.ordinary.push(tile);
        }
    }

    Ok(set)
}

/// Loads every immediate subdirectory of `root` as a named tileset.
pub fn load_tilesets(root: impl AsRef<Path>) -> Result<Vec<(String, TileSet)>, GenError> {
    let root = root.as_ref();
    let mut out = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|err| GenError::Io {
            source: err.into_io_error().unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::Other, "directory walk failed")
            }),
            path: root.to_path_buf(),
        })?;

        if !entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        let set = load_tileset(entry.path())?;
        out.push((name, set));
    }

    Ok(out)
}

pub fn fallback_tile(path: &Path) -> Result<Tile, GenError> {
    let basename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string();
    Ok(Tile {
        map: Map::from_file(path)?,
        basename,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicU32, Ordering};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    fn scratch_dir() -> std::path::PathBuf {
        let id = COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!("tilegen-tileset-test-{}-{id}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const CUBE_MAP: &str = "{\r\n\"classname\" \"worldspawn\"\r\n{\r\n( -16 -16 -16 ) ( -16 -16 16 ) ( -16 16 -16 ) NULL [ 1 0 0 0 ] [ 0 -1 0 0 ] 0 1 1\r\n( 16 -16 -16 ) ( 16 16 -16 ) ( 16 -16 16 ) NULL [ 1 0 0 0 ] [ 0 -1 0 0 ] 0 1 1\r\n( -16 -16 -16 ) ( -16 16 -16 ) ( 16 -16 -16 ) NULL [ 1 0 0 0 ] [ 0 -1 0 0 ] 0 1 1\r\n( -16 -16 16 ) ( 16 -16 16 ) ( -16 16 16 ) NULL [ 1 0 0 0 ] [ 0 -1 0 0 ] 0 1 1\r\n}\r\n}\r\n";

    #[test]
    fn classifies_by_basename() {
        let dir = scratch_dir();
        for name in ["start.map", "cap_a.map", "hallway.map", "weird.auto.map"] {
            fs::write(dir.join(name), CUBE_MAP).unwrap();
        }

        let set = load_tileset(&dir).unwrap();
        assert_eq!(set.start.len(), 1);
        assert_eq!(set.cap.len(), 1);
        assert_eq!(set.ordinary.len(), 1);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn non_map_files_are_ignored() {
        let dir = scratch_dir();
        fs::write(dir.join("start.map"), CUBE_MAP).unwrap();
        fs::write(dir.join("readme.txt"), "not a map").unwrap();

        let set = load_tileset(&dir).unwrap();
        assert_eq!(set.start.len(), 1);

        fs::remove_dir_all(&dir).ok();
    }
}

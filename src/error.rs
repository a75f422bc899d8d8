#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("rotation angle {0} is not a multiple of 90 degrees")]
    BadRotation(f64),
    #[error("could not place a tile for an open connector within the attempt budget")]
    PlacementFailure,
    #[error("tile pool `{0}` has no tiles to draw from")]
    EmptyPool(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Map(#[from] map::MapError),
    #[error("could not read tileset directory `{path}`: {source}")]
    Io {
        #[source]
        source: std::io::Error,
        path: std::path::PathBuf,
    },
}

impl GenError {
    pub fn to_result<T>(self) -> Result<T, Self> {
        Err(self)
    }
}

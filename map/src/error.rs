use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Failed to parse map text: {message}")]
    Parse { message: String },
    #[error("Map does not contain exactly one worldspawn entity")]
    MissingWorldspawn,
    #[error("Brush has fewer than 4 faces")]
    DegenerateBrush,
    #[error("Cannot read file `{path}`: {source}")]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

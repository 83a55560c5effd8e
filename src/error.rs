use thiserror::Error;

/// Errors raised by the booking core and the ambient layers around it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("name already exists: {0}")]
    DuplicateName(String),

    #[error("unknown id: {0}")]
    UnknownId(u64),

    #[error("unknown movie id: {0}")]
    UnknownMovie(u64),

    #[error("unknown theater id: {0}")]
    UnknownTheater(u64),

    #[error("no room for movie {movie} at theater {theater}")]
    UnknownRoom { movie: u64, theater: u64 },

    #[error("theater {theater} is already assigned to movie {movie}")]
    AlreadyAssigned { movie: u64, theater: u64 },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to read seed file: {0}")]
    Seed(#[from] std::io::Error),

    #[error("failed to parse seed file: {0}")]
    SeedParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::core::BookingStore;
use crate::error::Result;

/// On-disk shape of a seed file: a flat list of movie/theater names plus
/// the assignments between them. Loading replays this DTO onto the
/// public `BookingStore` API itself, so a seed file can never put the
/// store in a state a real caller couldn't reach too.
#[derive(Debug, Deserialize)]
pub struct SeedDto {
    pub movies: Vec<String>,
    pub theaters: Vec<String>,
    #[serde(default)]
    pub assignments: Vec<SeedAssignmentDto>,
}

#[derive(Debug, Deserialize)]
pub struct SeedAssignmentDto {
    pub movie: String,
    pub theaters: Vec<String>,
}

/// Loads a JSON seed file and replays it onto `store` via `add_movies`,
/// `add_theaters` and `assign_theaters_to_movie`.
pub fn load_from_file(store: &BookingStore, path: &Path) -> Result<()> {
    let data = std::fs::read_to_string(path)?;
    let dto: SeedDto = serde_json::from_str(&data)?;
    load(store, dto)
}

fn load(store: &BookingStore, dto: SeedDto) -> Result<()> {
    let movie_ids = store.add_movies(dto.movies.clone())?;
    let movie_id_by_name: HashMap<&str, u64> = dto.movies.iter().map(String::as_str).zip(movie_ids).collect();

    let theater_ids = store.add_theaters(dto.theaters.clone())?;
    let theater_id_by_name: HashMap<&str, u64> = dto.theaters.iter().map(String::as_str).zip(theater_ids).collect();

    for assignment in &dto.assignments {
        let Some(&movie_id) = movie_id_by_name.get(assignment.movie.as_str()) else {
            log::warn!("seed: skipping assignment for unknown movie '{}'", assignment.movie);
            continue;
        };
        let theater_ids: Vec<u64> = assignment
            .theaters
            .iter()
            .filter_map(|name| {
                let id = theater_id_by_name.get(name.as_str()).copied();
                if id.is_none() {
                    log::warn!("seed: skipping unknown theater '{}' for movie '{}'", name, assignment.movie);
                }
                id
            })
            .collect();
        store.assign_theaters_to_movie(movie_id, theater_ids)?;
    }

    log::info!("seed: loaded {} movies, {} theaters", dto.movies.len(), dto.theaters.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_seeds_movies_theaters_and_assignments() {
        let store = BookingStore::new();
        let dto = SeedDto {
            movies: vec!["Terminator".into(), "The Matrix".into()],
            theaters: vec!["Odeon".into(), "Cineworld".into()],
            assignments: vec![SeedAssignmentDto { movie: "Terminator".into(), theaters: vec!["Odeon".into(), "Cineworld".into()] }],
        };

        load(&store, dto).unwrap();

        assert_eq!(store.sorted_movie_ids().len(), 2);
        assert_eq!(store.sorted_theater_ids().len(), 2);

        let terminator_id = store.sorted_movie_ids()[0];
        let listing = store.list_theaters_for_movie(terminator_id).unwrap();
        assert!(listing.contains("Odeon"));
        assert!(listing.contains("Cineworld"));
    }

    #[test]
    fn load_skips_assignment_to_unknown_movie_without_failing() {
        let store = BookingStore::new();
        let dto = SeedDto {
            movies: vec!["Terminator".into()],
            theaters: vec!["Odeon".into()],
            assignments: vec![SeedAssignmentDto { movie: "Not A Movie".into(), theaters: vec!["Odeon".into()] }],
        };

        load(&store, dto).unwrap();
        assert_eq!(store.sorted_movie_ids().len(), 1);
    }
}

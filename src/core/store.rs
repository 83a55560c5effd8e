use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::name_table::NameTable;
use super::room::{BookingOutcome, Room};
use crate::error::{Error, Result};

const EOL: &str = "\r\n";

/// The aggregate booking store: two name tables (movies, theaters), the
/// two-level `movie -> theater -> Room` map, and a per-movie cache of
/// rendered theater listings.
///
/// `movies` and `theaters` are each self-locked (see `NameTable`); the
/// store additionally owns one `RwLock` of its own over `rooms` and
/// `theaters_per_movie_cache`, since those two only ever change together.
/// The two locks are always acquired outer-then-inner (store lock first,
/// then a `NameTable`'s own lock if needed) and never the reverse, so
/// there is no deadlock cycle. Booking a seat acquires only the store's
/// *read* side plus the target room's own lock; that room's `Arc` is
/// what actually keeps it valid once the store guard is released, so the
/// read lock is held only long enough to look the room up.
pub struct BookingStore {
    movies: NameTable,
    theaters: NameTable,
    inner: RwLock<StoreInner>,
}

struct StoreInner {
    rooms: HashMap<u64, HashMap<u64, Arc<Room>>>,
    theaters_per_movie_cache: HashMap<u64, Arc<str>>,
}

impl StoreInner {
    fn rebuild_theaters_per_movie_cache(&mut self, movie_id: u64, theaters: &NameTable) {
        let Some(rooms_for_movie) = self.rooms.get(&movie_id) else { return };
        let mut theater_ids: Vec<u64> = rooms_for_movie.keys().copied().collect();
        theater_ids.sort_unstable();

        let mut out = String::new();
        for theater_id in theater_ids {
            // Every id in `rooms` is guaranteed valid in `theaters` by invariant 5.
            let name = theaters.get_name(theater_id).expect("room references unknown theater");
            out.push_str(&theater_id.to_string());
            out.push(',');
            out.push_str(&name);
            out.push_str(EOL);
        }
        self.theaters_per_movie_cache.insert(movie_id, Arc::from(out));
    }

    /// Wipes and repopulates the whole per-movie cache. Not on any hot
    /// path today; kept for the case a future bulk mutator needs to
    /// rebuild every movie's listing at once instead of one at a time.
    #[allow(dead_code)]
    fn rebuild_theaters_per_movie_cache_all(&mut self, theaters: &NameTable) {
        self.theaters_per_movie_cache.clear();
        let movie_ids: Vec<u64> = self.rooms.keys().copied().collect();
        for movie_id in movie_ids {
            self.rebuild_theaters_per_movie_cache(movie_id, theaters);
        }
    }
}

impl Default for BookingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingStore {
    pub fn new() -> Self {
        BookingStore {
            movies: NameTable::new(),
            theaters: NameTable::new(),
            inner: RwLock::new(StoreInner { rooms: HashMap::new(), theaters_per_movie_cache: HashMap::new() }),
        }
    }

    /// Adds a batch of movies. For every newly issued id, creates an
    /// empty room sub-map and an empty theater listing cache entry.
    pub fn add_movies(&self, names: Vec<String>) -> Result<Vec<u64>> {
        let mut guard = self.inner.write().expect("lock poisoned");
        let ids = self.movies.add(names)?;
        for &id in &ids {
            guard.rooms.insert(id, HashMap::new());
            guard.theaters_per_movie_cache.insert(id, Arc::from(""));
        }
        Ok(ids)
    }

    /// Adds a batch of theaters. No room/cache bookkeeping is needed
    /// since a theater only gains rooms once assigned to a movie.
    pub fn add_theaters(&self, names: Vec<String>) -> Result<Vec<u64>> {
        let _guard = self.inner.write().expect("lock poisoned");
        self.theaters.add(names)
    }

    /// Assigns a set of theaters to a movie, creating a fresh,
    /// fully-available room for each. Atomic across the whole batch.
    pub fn assign_theaters_to_movie(&self, movie_id: u64, theater_ids: Vec<u64>) -> Result<()> {
        let mut guard = self.inner.write().expect("lock poisoned");

        if !self.movies.has_id(movie_id) {
            return Err(Error::UnknownMovie(movie_id));
        }

        let rooms_for_movie = guard.rooms.get(&movie_id).expect("movie id without a room sub-map");

        // Pass 1: validate the whole batch against a snapshot before mutating anything.
        let mut seen_in_batch = std::collections::HashSet::with_capacity(theater_ids.len());
        for &theater_id in &theater_ids {
            if !self.theaters.has_id(theater_id) {
                return Err(Error::UnknownTheater(theater_id));
            }
            if rooms_for_movie.contains_key(&theater_id) || !seen_in_batch.insert(theater_id) {
                return Err(Error::AlreadyAssigned { movie: movie_id, theater: theater_id });
            }
        }

        // Pass 2: commit.
        let rooms_for_movie = guard.rooms.get_mut(&movie_id).expect("movie id without a room sub-map");
        for theater_id in theater_ids {
            rooms_for_movie.insert(theater_id, Arc::new(Room::new()));
        }
        guard.rebuild_theaters_per_movie_cache(movie_id, &self.theaters);
        Ok(())
    }

    pub fn list_movies(&self) -> Arc<str> {
        let _guard = self.inner.read().expect("lock poisoned");
        self.movies.rendered()
    }

    pub fn list_theaters_for_movie(&self, movie_id: u64) -> Result<Arc<str>> {
        let guard = self.inner.read().expect("lock poisoned");
        guard.theaters_per_movie_cache.get(&movie_id).cloned().ok_or(Error::UnknownMovie(movie_id))
    }

    pub fn list_available_seats(&self, movie_id: u64, theater_id: u64) -> Result<Arc<str>> {
        let room = self.find_room(movie_id, theater_id)?;
        Ok(room.available())
    }

    /// Books a set of seats. Takes only the store-wide *read* lock, so
    /// bookings against different rooms never block each other or other
    /// readers; the target room's own write lock serialises bookings
    /// against that room.
    pub fn book(&self, movie_id: u64, theater_id: u64, seats: std::collections::HashSet<u32>) -> Result<BookingOutcome> {
        let room = self.find_room(movie_id, theater_id)?;
        Ok(room.book(&seats))
    }

    pub fn sorted_movie_ids(&self) -> Vec<u64> {
        let _guard = self.inner.read().expect("lock poisoned");
        self.movies.sorted_ids()
    }

    pub fn sorted_theater_ids(&self) -> Vec<u64> {
        let _guard = self.inner.read().expect("lock poisoned");
        self.theaters.sorted_ids()
    }

    /// Empties everything. The id counters of `movies`/`theaters` are
    /// not reset.
    pub fn clear(&self) {
        let mut guard = self.inner.write().expect("lock poisoned");
        guard.rooms.clear();
        guard.theaters_per_movie_cache.clear();
        self.movies.clear();
        self.theaters.clear();
    }

    fn find_room(&self, movie_id: u64, theater_id: u64) -> Result<Arc<Room>> {
        let guard = self.inner.read().expect("lock poisoned");
        guard
            .rooms
            .get(&movie_id)
            .and_then(|theaters| theaters.get(&theater_id))
            .cloned()
            .ok_or(Error::UnknownRoom { movie: movie_id, theater: theater_id })
    }
}

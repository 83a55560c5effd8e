use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::error::{Error, Result};

const EOL: &str = "\r\n";

/// An append-only bijection between a unique name and a monotonically
/// increasing numeric id, with a cached rendered `id,name` listing.
///
/// Both maps are protected with a single lock: every mutation touches
/// the id→name map, the name set and the cache together, so splitting the
/// lock would only invite them to drift out of sync.
#[derive(Debug)]
pub struct NameTable {
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    next_id: u64,
    id_to_name: BTreeMap<u64, String>,
    names: HashSet<String>,
    rendered: Arc<str>,
}

impl Inner {
    fn rebuild_cache(&mut self) {
        let mut out = String::new();
        for (id, name) in &self.id_to_name {
            out.push_str(&id.to_string());
            out.push(',');
            out.push_str(name);
            out.push_str(EOL);
        }
        self.rendered = Arc::from(out);
    }
}

impl Default for NameTable {
    fn default() -> Self {
        Self::new()
    }
}

impl NameTable {
    pub fn new() -> Self {
        NameTable {
            inner: RwLock::new(Inner { next_id: 1, id_to_name: BTreeMap::new(), names: HashSet::new(), rendered: Arc::from("") }),
        }
    }

    /// Allocates one id per name in `names`. Either every name is
    /// accepted or none are: a duplicate anywhere in the batch (against
    /// existing entries, or against another name in the same batch)
    /// leaves the table byte-identical to before the call.
    pub fn add(&self, names: Vec<String>) -> Result<Vec<u64>> {
        let mut guard = self.inner.write().expect("lock poisoned");

        // Pass 1: validate the whole batch against a snapshot before mutating anything.
        let mut seen_in_batch = HashSet::with_capacity(names.len());
        for name in &names {
            if guard.names.contains(name) || !seen_in_batch.insert(name.clone()) {
                return Err(Error::DuplicateName(name.clone()));
            }
        }

        // Pass 2: all preconditions hold, commit.
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let id = guard.next_id;
            guard.next_id += 1;
            guard.names.insert(name.clone());
            guard.id_to_name.insert(id, name);
            ids.push(id);
        }
        guard.rebuild_cache();
        Ok(ids)
    }

    pub fn has_id(&self, id: u64) -> bool {
        self.inner.read().expect("lock poisoned").id_to_name.contains_key(&id)
    }

    pub fn get_name(&self, id: u64) -> Result<String> {
        self.inner.read().expect("lock poisoned").id_to_name.get(&id).cloned().ok_or(Error::UnknownId(id))
    }

    pub fn sorted_ids(&self) -> Vec<u64> {
        self.inner.read().expect("lock poisoned").id_to_name.keys().copied().collect()
    }

    pub fn rendered(&self) -> Arc<str> {
        self.inner.read().expect("lock poisoned").rendered.clone()
    }

    /// Empties the table. The id counter is *not* reset.
    pub fn clear(&self) {
        let mut guard = self.inner.write().expect("lock poisoned");
        guard.id_to_name.clear();
        guard.names.clear();
        guard.rebuild_cache();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_allocates_ids_starting_at_one() {
        let table = NameTable::new();
        let mut ids = table.add(vec!["Terminator".into(), "The Matrix".into(), "The Flintstones".into()]).unwrap();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn rendered_listing_contains_every_line() {
        let table = NameTable::new();
        table.add(vec!["Terminator".into(), "The Matrix".into()]).unwrap();
        let rendered = table.rendered();
        assert!(rendered.contains("1,Terminator\r\n"));
        assert!(rendered.contains("2,The Matrix\r\n"));
    }

    #[test]
    fn duplicate_name_against_existing_is_atomic() {
        let table = NameTable::new();
        table.add(vec!["Terminator".into()]).unwrap();
        let before = table.rendered();

        let err = table.add(vec!["Terminator".into()]);
        assert!(matches!(err, Err(Error::DuplicateName(_))));
        assert_eq!(table.rendered(), before);
        assert_eq!(table.sorted_ids(), vec![1]);
    }

    #[test]
    fn duplicate_name_within_batch_is_atomic() {
        let table = NameTable::new();
        let err = table.add(vec!["A".into(), "B".into(), "A".into()]);
        assert!(matches!(err, Err(Error::DuplicateName(_))));
        assert!(table.sorted_ids().is_empty());
        assert_eq!(table.rendered().as_ref(), "");
    }

    #[test]
    fn get_name_unknown_id_fails() {
        let table = NameTable::new();
        assert!(matches!(table.get_name(42), Err(Error::UnknownId(42))));
    }

    #[test]
    fn clear_empties_but_keeps_counter_monotonic() {
        let table = NameTable::new();
        table.add(vec!["A".into()]).unwrap();
        table.clear();
        assert!(table.sorted_ids().is_empty());
        assert_eq!(table.rendered().as_ref(), "");

        let ids = table.add(vec!["B".into()]).unwrap();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn clear_is_idempotent() {
        let table = NameTable::new();
        table.add(vec!["A".into()]).unwrap();
        table.clear();
        table.clear();
        assert!(table.sorted_ids().is_empty());
    }
}

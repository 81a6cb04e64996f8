use serde::{Deserialize, Serialize};

use crate::constants::COLLECTIONS_KEY;
use crate::error::CollectionError;
use crate::storage::{load_json, save_json, KeyValueStore};

/// Named watchlist of symbols.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    #[serde(default)]
    pub symbols: Vec<String>,
}

/// Local cache of collections, persisted as one JSON array in the store.
#[derive(Debug, Clone)]
pub struct CollectionStore<S> {
    store: S,
    collections: Vec<Collection>,
}

impl<S: KeyValueStore> CollectionStore<S> {
    pub fn open(store: S) -> Result<Self, CollectionError> {
        let collections: Vec<Collection> = load_json(&store, COLLECTIONS_KEY)?.unwrap_or_default();
        Ok(Self { store, collections })
    }

    /// Start without cached collections; the next change overwrites the stored list.
    pub fn empty(store: S) -> Self {
        Self {
            store,
            collections: Vec::new(),
        }
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn list(&self) -> &[Collection] {
        &self.collections
    }

    pub fn get(&self, name: &str) -> Option<&Collection> {
        self.position(name).map(|idx| &self.collections[idx])
    }

    pub fn create(&mut self, name: &str) -> Result<&Collection, CollectionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CollectionError::EmptyName);
        }
        if self.position(name).is_some() {
            return Err(CollectionError::Duplicate(name.to_string()));
        }

        let mut next = self.collections.clone();
        next.push(Collection {
            name: name.to_string(),
            symbols: Vec::new(),
        });
        self.commit(next)?;
        log::debug!(target: "collections.create", "{name}");
        let idx = self.collections.len() - 1;
        Ok(&self.collections[idx])
    }

    pub fn delete(&mut self, name: &str) -> Result<Collection, CollectionError> {
        let idx = self.require(name)?;
        let mut next = self.collections.clone();
        let removed = next.remove(idx);
        self.commit(next)?;
        Ok(removed)
    }

    /// Add `symbol` (uppercased). Returns `false` when it was already present.
    pub fn add_symbol(&mut self, name: &str, symbol: &str) -> Result<bool, CollectionError> {
        let symbol = normalize_symbol(symbol)?;
        let idx = self.require(name)?;
        if self.collections[idx].symbols.contains(&symbol) {
            return Ok(false);
        }
        let mut next = self.collections.clone();
        next[idx].symbols.push(symbol);
        self.commit(next)?;
        Ok(true)
    }

    /// Remove `symbol`. Returns `false` when it was not in the collection.
    pub fn remove_symbol(&mut self, name: &str, symbol: &str) -> Result<bool, CollectionError> {
        let symbol = normalize_symbol(symbol)?;
        let idx = self.require(name)?;
        if !self.collections[idx].symbols.contains(&symbol) {
            return Ok(false);
        }
        let mut next = self.collections.clone();
        next[idx].symbols.retain(|existing| existing != &symbol);
        self.commit(next)?;
        Ok(true)
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.collections
            .iter()
            .position(|collection| collection.name.eq_ignore_ascii_case(name))
    }

    fn require(&self, name: &str) -> Result<usize, CollectionError> {
        self.position(name)
            .ok_or_else(|| CollectionError::NotFound(name.trim().to_string()))
    }

    /// Save `next` and adopt it only once the store accepted it.
    fn commit(&mut self, next: Vec<Collection>) -> Result<(), CollectionError> {
        save_json(&mut self.store, COLLECTIONS_KEY, &next)?;
        self.collections = next;
        Ok(())
    }
}

fn normalize_symbol(symbol: &str) -> Result<String, CollectionError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(CollectionError::EmptySymbol);
    }
    Ok(symbol)
}

// File: src/core/entities.rs
use crate::error::StorageError;
use crate::persistence::{load_json, save_json, KeyValueStore};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Shortest name worth remembering.
pub const MIN_ENTITY_LEN: usize = 3;

/// Names seen in earlier confirmed tasks (clients, suppliers...), kept in
/// insertion order with their original casing.
pub struct EntityMemory {
    backend: Arc<dyn KeyValueStore>,
    key: String,
    write_lock: Mutex<()>,
}

impl EntityMemory {
    pub fn new(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// All remembered names; empty when the store cannot be read.
    pub fn all(&self) -> Vec<String> {
        self.load().unwrap_or_else(|e| {
            warn!("entity memory unavailable: {}", e);
            Vec::new()
        })
    }

    /// Remembers `name` unless it is too short or already known under any
    /// casing. Returns whether it was added.
    pub fn add(&self, name: &str) -> bool {
        let name = name.trim();
        if name.chars().count() < MIN_ENTITY_LEN {
            return false;
        }

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entities = match self.load() {
            Ok(entities) => entities,
            Err(e) => {
                warn!("entity memory unavailable, not remembering {:?}: {}", name, e);
                return false;
            }
        };

        let normalized = name.to_lowercase();
        if entities.iter().any(|e| e.to_lowercase() == normalized) {
            return false;
        }

        entities.push(name.to_string());
        if let Err(e) = save_json(self.backend.as_ref(), &self.key, &entities) {
            warn!("failed to persist entity memory: {}", e);
        }
        debug!(entity = name, "remembered entity");
        true
    }

    /// The longest remembered name that `text` starts with, compared
    /// case-insensitively.
    pub fn match_start(&self, text: &str) -> Option<String> {
        let mut entities = self.all();
        entities.sort_by_key(|e| std::cmp::Reverse(e.chars().count()));

        let text = text.to_lowercase();
        entities
            .into_iter()
            .find(|entity| text.starts_with(&entity.to_lowercase()))
    }

    fn load(&self) -> Result<Vec<String>, StorageError> {
        Ok(load_json(self.backend.as_ref(), &self.key)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, ENTITIES_KEY};

    fn memory() -> EntityMemory {
        EntityMemory::new(Arc::new(MemoryStore::new()), ENTITIES_KEY)
    }

    #[test]
    fn longest_entity_wins() {
        let entities = memory();
        entities.add("Juan");
        entities.add("Juan Pérez");

        assert_eq!(
            entities.match_start("Juan Pérez necesita ayuda").as_deref(),
            Some("Juan Pérez")
        );
        assert_eq!(entities.match_start("juan llama mañana").as_deref(), Some("Juan"));
        assert_eq!(entities.match_start("Llamar a Juan"), None);
    }

    #[test]
    fn add_trims_and_deduplicates_case_insensitively() {
        let entities = memory();

        assert!(entities.add("  Constructora López "));
        assert!(!entities.add("constructora lópez"));
        assert!(!entities.add("CONSTRUCTORA LÓPEZ"));

        assert_eq!(entities.all(), vec!["Constructora López".to_string()]);
    }

    #[test]
    fn short_names_are_ignored() {
        let entities = memory();

        assert!(!entities.add(""));
        assert!(!entities.add("  Al  "));
        assert!(entities.all().is_empty());
    }

    #[test]
    fn insertion_order_is_kept() {
        let entities = memory();
        entities.add("Beta S.L.");
        entities.add("Alfa S.A.");

        assert_eq!(entities.all(), vec!["Beta S.L.".to_string(), "Alfa S.A.".to_string()]);
    }

    #[test]
    fn corrupt_store_reads_as_empty() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(ENTITIES_KEY, "\"not a list\"").unwrap();
        let entities = EntityMemory::new(backend, ENTITIES_KEY);

        assert!(entities.all().is_empty());
        assert_eq!(entities.match_start("anything"), None);
        assert!(!entities.add("Ana García"));
    }
}

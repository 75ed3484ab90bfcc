use crate::config::AssistantConfig;
use crate::core::entities::EntityMemory;
use crate::core::parser::IntentParser;
use crate::core::types::{Board, ParseOutcome};
use crate::core::vocabulary::VocabularyStore;
use crate::persistence::{
    scoped_key, FileStore, KeyValueStore, MemoryStore, ENTITIES_KEY, VOCABULARY_KEY,
};
use std::sync::Arc;
use tracing::{info, warn};

// The assistant engine owns the two learned stores. The parser itself is
// stateless and borrows them per call.
pub struct AssistantEngine {
    pub vocabulary: VocabularyStore,
    pub entities: EntityMemory,
}

impl AssistantEngine {
    /// Engine over an arbitrary backend, sharing one vocabulary per installation.
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_namespace(backend, None)
    }

    pub fn with_namespace(backend: Arc<dyn KeyValueStore>, namespace: Option<&str>) -> Self {
        Self {
            vocabulary: VocabularyStore::new(
                backend.clone(),
                scoped_key(namespace, VOCABULARY_KEY),
            ),
            entities: EntityMemory::new(backend, scoped_key(namespace, ENTITIES_KEY)),
        }
    }

    /// Engine that forgets everything when dropped.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Engine persisting under the configured data directory. Falls back to
    /// an in-memory store when the directory cannot be created.
    pub fn from_config(config: &AssistantConfig) -> Self {
        let backend: Arc<dyn KeyValueStore> = match std::fs::create_dir_all(&config.data_dir) {
            Ok(()) => {
                info!(dir = %config.data_dir.display(), "assistant storage ready");
                Arc::new(FileStore::new(&config.data_dir))
            }
            Err(e) => {
                warn!(
                    dir = %config.data_dir.display(),
                    "cannot create data directory, learning will not persist: {}", e
                );
                Arc::new(MemoryStore::new())
            }
        };
        Self::with_namespace(backend, config.namespace.as_deref())
    }

    /// Records a confirmed task title as an entity and learns its words.
    pub fn learn_entity(&self, name: &str) {
        if name.trim().is_empty() {
            return;
        }
        self.entities.add(name);
        self.vocabulary.learn(name);
    }

    /// Learns free text (e.g. a comment) without remembering it as an entity.
    pub fn learn_vocabulary(&self, text: &str) {
        self.vocabulary.learn(text);
    }

    /// Makes every board and column title a known word so routing keywords
    /// are never "corrected" into something else.
    pub fn inject_context(&self, boards: &[Board]) {
        let titles: Vec<&str> = boards
            .iter()
            .flat_map(|board| {
                std::iter::once(board.title.as_str())
                    .chain(board.columns.iter().map(|column| column.title.as_str()))
            })
            .collect();
        if titles.is_empty() {
            return;
        }
        self.vocabulary.prime(&titles.join("\n"));
    }

    pub fn parse_task_intent(
        &self,
        text: &str,
        boards: &[Board],
        active_board_id: Option<&str>,
    ) -> Option<ParseOutcome> {
        IntentParser::new(&self.vocabulary, &self.entities).parse(text, boards, active_board_id)
    }
}

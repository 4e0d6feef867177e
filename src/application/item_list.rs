use std::collections::HashSet;

use chrono::Utc;
use tokio::sync::broadcast;

use crate::application::store_adapter::StoreAdapter;
use crate::domain::item::{seed_items, FilterMode, Item, ItemId, Stats};
use crate::domain::store::KeyValueStore;

pub const DEFAULT_STORAGE_KEY: &str = "tasks";

/// Change notifications sent after a mutation has been applied and persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    Added(ItemId),
    Toggled { id: ItemId, completed: bool },
    Deleted(ItemId),
    ClearedCompleted { removed: usize },
    FilterChanged(FilterMode),
}

/// Owns the task list, the current filter and the pending input text.
///
/// Every mutating call writes the full list back through the store adapter
/// before it returns, so each user action yields exactly one write.
pub struct ItemListManager<S: KeyValueStore> {
    store: StoreAdapter<S>,
    key: String,
    items: Vec<Item>,
    filter: FilterMode,
    draft: String,
    events: broadcast::Sender<ListEvent>,
}

impl<S: KeyValueStore> ItemListManager<S> {
    pub async fn initialize(store: StoreAdapter<S>) -> Self {
        Self::initialize_with_key(store, DEFAULT_STORAGE_KEY).await
    }

    /// Reads the persisted list, seeding it when storage holds nothing.
    pub async fn initialize_with_key(store: StoreAdapter<S>, key: impl Into<String>) -> Self {
        let key = key.into();
        let items: Vec<Item> = store.read(&key, Vec::new()).await;
        let (events, _) = broadcast::channel(64);
        let mut manager = Self { store, key, items, filter: FilterMode::All, draft: String::new(), events };
        if manager.items.is_empty() {
            manager.items = seed_items(Utc::now());
            tracing::info!(key = %manager.key, "storage empty; installed seed tasks");
            manager.persist().await;
        }
        manager
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ListEvent> { self.events.subscribe() }

    pub fn items(&self) -> &[Item] { &self.items }

    pub fn filter(&self) -> FilterMode { self.filter }

    pub fn draft(&self) -> &str { &self.draft }

    pub fn set_draft(&mut self, text: impl Into<String>) { self.draft = text.into(); }

    /// Appends a new task. Blank input is ignored and returns `None`.
    pub async fn add_item(&mut self, text: &str) -> Option<Item> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let now = Utc::now();
        let item = Item { id: self.next_id(now.timestamp_millis()), text: text.to_string(), completed: false, created_at: now };
        self.items.push(item.clone());
        self.draft.clear();
        self.commit(ListEvent::Added(item.id)).await;
        Some(item)
    }

    /// Adds the pending input; the draft is kept if it is blank.
    pub async fn submit_draft(&mut self) -> Option<Item> {
        let draft = std::mem::take(&mut self.draft);
        let added = self.add_item(&draft).await;
        if added.is_none() {
            self.draft = draft;
        }
        added
    }

    pub async fn toggle_item(&mut self, id: ItemId) {
        let toggled = self.items.iter_mut().find(|item| item.id == id).map(|item| {
            item.completed = !item.completed;
            item.completed
        });
        match toggled {
            Some(completed) => self.commit(ListEvent::Toggled { id, completed }).await,
            None => {
                tracing::debug!(%id, "toggle ignored; no such task");
                self.persist().await;
            }
        }
    }

    pub async fn delete_item(&mut self, id: ItemId) {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        if self.items.len() < before {
            self.commit(ListEvent::Deleted(id)).await;
        } else {
            tracing::debug!(%id, "delete ignored; no such task");
            self.persist().await;
        }
    }

    /// Removes every completed task and returns how many were dropped.
    pub async fn clear_completed(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !item.completed);
        let removed = before - self.items.len();
        self.commit(ListEvent::ClearedCompleted { removed }).await;
        removed
    }

    /// Session-local; never persisted.
    pub fn set_filter(&mut self, mode: FilterMode) {
        if self.filter != mode {
            self.filter = mode;
            let _ = self.events.send(ListEvent::FilterChanged(mode));
        }
    }

    /// Tasks matching the current filter, in insertion order. Clone the
    /// iterator to walk it again.
    pub fn visible_items(&self) -> impl Iterator<Item = &Item> + Clone + '_ {
        let filter = self.filter;
        self.items.iter().filter(move |item| filter.matches(item))
    }

    pub fn stats(&self) -> Stats {
        let completed = self.items.iter().filter(|item| item.completed).count();
        Stats { total: self.items.len(), active: self.items.len() - completed, completed }
    }

    pub fn can_clear_completed(&self) -> bool { self.stats().completed > 0 }

    // Time-derived but strictly increasing, so same-millisecond adds cannot collide.
    fn next_id(&self, now_millis: i64) -> ItemId {
        let Some(max) = self.items.iter().map(|item| item.id.0).max() else { return ItemId(now_millis) };
        match max.checked_add(1) {
            Some(floor) => ItemId(now_millis.max(floor)),
            None => {
                let taken: HashSet<i64> = self.items.iter().map(|item| item.id.0).collect();
                let id = (1..).find(|id| !taken.contains(id)).unwrap_or(0);
                tracing::warn!(id, "task ids exhausted; reusing lowest free id");
                ItemId(id)
            }
        }
    }

    async fn persist(&self) {
        self.store.write(&self.key, &self.items).await;
    }

    async fn commit(&self, event: ListEvent) {
        self.persist().await;
        let _ = self.events.send(event);
    }
}

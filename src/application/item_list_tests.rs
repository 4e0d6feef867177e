#[cfg(test)]
mod tests {
    use super::super::item_list::{ItemListManager, ListEvent, DEFAULT_STORAGE_KEY};
    use super::super::store_adapter::StoreAdapter;
    use crate::domain::item::{FilterMode, Item, ItemId};
    use crate::domain::store::{KeyValueStore, StoreError};
    use crate::infrastructure::memory_store::MemoryStore;
    use async_trait::async_trait;
    use chrono::Utc;

    async fn fresh() -> (MemoryStore, ItemListManager<MemoryStore>) {
        let store = MemoryStore::new();
        let manager = ItemListManager::initialize(StoreAdapter::new(store.clone())).await;
        (store, manager)
    }

    async fn persisted(store: &MemoryStore) -> Vec<Item> {
        let raw = store.get(DEFAULT_STORAGE_KEY).await.unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    fn ids(items: &[Item]) -> Vec<ItemId> { items.iter().map(|i| i.id).collect() }

    #[tokio::test]
    async fn empty_storage_is_seeded_and_persisted() {
        let (store, manager) = fresh().await;
        assert_eq!(manager.items().len(), 3);
        let done: Vec<_> = manager.items().iter().filter(|i| i.completed).map(|i| i.text.as_str()).collect();
        assert_eq!(done, vec!["Learn React"]);
        assert_eq!(persisted(&store).await, manager.items());
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn existing_list_is_not_reseeded() {
        let store = MemoryStore::new();
        let stored = vec![Item { id: ItemId(42), text: "Only one".into(), completed: false, created_at: Utc::now() }];
        store.set(DEFAULT_STORAGE_KEY, &serde_json::to_string(&stored).unwrap()).await.unwrap();
        let manager = ItemListManager::initialize(StoreAdapter::new(store.clone())).await;
        assert_eq!(manager.items(), stored.as_slice());
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn corrupt_storage_counts_as_empty() {
        let store = MemoryStore::new();
        store.set(DEFAULT_STORAGE_KEY, "{oops").await.unwrap();
        let manager = ItemListManager::initialize(StoreAdapter::new(store)).await;
        assert_eq!(manager.items().len(), 3);
    }

    #[tokio::test]
    async fn blank_text_is_rejected() {
        let (store, mut manager) = fresh().await;
        for text in ["", "   ", "\t\n"] {
            assert!(manager.add_item(text).await.is_none());
        }
        assert_eq!(manager.items().len(), 3);
        assert_eq!(store.write_count(), 1);

        let added = manager.add_item("  Write docs  ").await.unwrap();
        assert_eq!(added.text, "Write docs");
        assert_eq!(manager.items().len(), 4);
    }

    #[tokio::test]
    async fn ids_stay_unique_within_one_millisecond() {
        let (_, mut manager) = fresh().await;
        for n in 0..20 {
            manager.add_item(&format!("task {n}")).await.unwrap();
        }
        let ids = ids(manager.items());
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn ids_stay_unique_at_the_top_of_the_range() {
        let store = MemoryStore::new();
        let stored = vec![
            Item { id: ItemId(1), text: "low".into(), completed: false, created_at: Utc::now() },
            Item { id: ItemId(i64::MAX), text: "max".into(), completed: false, created_at: Utc::now() },
        ];
        store.set(DEFAULT_STORAGE_KEY, &serde_json::to_string(&stored).unwrap()).await.unwrap();
        let mut manager = ItemListManager::initialize(StoreAdapter::new(store)).await;

        let added = manager.add_item("a").await.unwrap();
        assert_eq!(added.id, ItemId(2));
        manager.add_item("b").await.unwrap();
        assert_eq!(ids(manager.items()), vec![ItemId(1), ItemId(i64::MAX), ItemId(2), ItemId(3)]);
    }

    #[tokio::test]
    async fn add_clears_the_draft() {
        let (_, mut manager) = fresh().await;
        manager.set_draft("   ");
        assert!(manager.submit_draft().await.is_none());
        assert_eq!(manager.draft(), "   ");

        manager.set_draft("Ship it");
        let item = manager.submit_draft().await.unwrap();
        assert_eq!(item.text, "Ship it");
        assert_eq!(manager.draft(), "");
    }

    #[tokio::test]
    async fn toggle_twice_restores_state() {
        let (_, mut manager) = fresh().await;
        let before = manager.items().to_vec();
        let id = before[1].id;
        manager.toggle_item(id).await;
        assert!(manager.items()[1].completed);
        manager.toggle_item(id).await;
        assert_eq!(manager.items(), before.as_slice());
    }

    #[tokio::test]
    async fn misses_are_noops_but_still_persist() {
        let (store, mut manager) = fresh().await;
        let before = manager.items().to_vec();
        manager.toggle_item(ItemId(999)).await;
        manager.delete_item(ItemId(999)).await;
        assert_eq!(manager.items(), before.as_slice());
        assert_eq!(store.write_count(), 3);
    }

    #[tokio::test]
    async fn delete_removes_exactly_one() {
        let (store, mut manager) = fresh().await;
        let target = manager.items()[0].id;
        manager.delete_item(target).await;
        assert_eq!(ids(manager.items()), vec![ItemId(2), ItemId(3)]);
        assert_eq!(ids(&persisted(&store).await), vec![ItemId(2), ItemId(3)]);
    }

    #[tokio::test]
    async fn clear_completed_is_idempotent() {
        let (_, mut manager) = fresh().await;
        manager.toggle_item(ItemId(3)).await;
        assert!(manager.can_clear_completed());
        assert_eq!(manager.clear_completed().await, 2);
        let once = manager.items().to_vec();
        assert_eq!(manager.clear_completed().await, 0);
        assert_eq!(manager.items(), once.as_slice());
        assert!(!manager.can_clear_completed());
    }

    #[tokio::test]
    async fn filter_selects_without_persisting() {
        let (store, mut manager) = fresh().await;
        manager.add_item("Write tests").await;
        let writes = store.write_count();

        manager.set_filter(FilterMode::Active);
        let active: Vec<_> = manager.visible_items().map(|i| i.text.as_str()).collect();
        assert_eq!(active, vec!["Build Task Manager", "Style with Tailwind CSS", "Write tests"]);

        manager.set_filter(FilterMode::All);
        let visible = manager.visible_items();
        assert_eq!(visible.clone().count(), 4);
        assert_eq!(visible.map(|i| i.id).collect::<Vec<_>>(), ids(manager.items()));
        assert_eq!(store.write_count(), writes);
    }

    #[tokio::test]
    async fn stats_always_add_up() {
        let (_, mut manager) = fresh().await;
        manager.add_item("a").await;
        manager.toggle_item(ItemId(2)).await;
        let stats = manager.stats();
        assert_eq!((stats.total, stats.active, stats.completed), (4, 2, 2));
        assert_eq!(stats.total, stats.active + stats.completed);
    }

    #[tokio::test]
    async fn observers_hear_each_mutation() {
        let (_, mut manager) = fresh().await;
        let mut rx = manager.subscribe();
        let item = manager.add_item("Write tests").await.unwrap();
        manager.toggle_item(item.id).await;
        manager.set_filter(FilterMode::Completed);
        manager.delete_item(item.id).await;
        assert_eq!(rx.recv().await.unwrap(), ListEvent::Added(item.id));
        assert_eq!(rx.recv().await.unwrap(), ListEvent::Toggled { id: item.id, completed: true });
        assert_eq!(rx.recv().await.unwrap(), ListEvent::FilterChanged(FilterMode::Completed));
        assert_eq!(rx.recv().await.unwrap(), ListEvent::Deleted(item.id));
    }

    #[tokio::test]
    async fn reload_reproduces_the_list() {
        let (store, mut manager) = fresh().await;
        manager.add_item("Write tests").await;
        manager.toggle_item(ItemId(2)).await;
        let reloaded = ItemListManager::initialize(StoreAdapter::new(store)).await;
        assert_eq!(reloaded.items(), manager.items());
    }

    struct ReadOnlyStore(MemoryStore);

    #[async_trait]
    impl KeyValueStore for ReadOnlyStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> { self.0.get(key).await }
        async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Backend { reason: "quota exceeded".into() })
        }
    }

    #[tokio::test]
    async fn write_failures_keep_the_session_going() {
        let mut manager = ItemListManager::initialize(StoreAdapter::new(ReadOnlyStore(MemoryStore::new()))).await;
        let item = manager.add_item("Still here").await.unwrap();
        manager.toggle_item(item.id).await;
        assert_eq!(manager.stats().completed, 2);
    }

    #[tokio::test]
    async fn end_to_end_scenario() {
        let (_, mut manager) = fresh().await;
        assert_eq!(manager.items().len(), 3);

        let item = manager.add_item("Write tests").await.unwrap();
        let last = manager.items().last().unwrap();
        assert_eq!((manager.items().len(), last.text.as_str(), last.completed), (4, "Write tests", false));

        let completed_before = manager.stats().completed;
        manager.toggle_item(item.id).await;
        assert!(manager.items().iter().find(|i| i.id == item.id).unwrap().completed);
        assert_eq!(manager.stats().completed, completed_before + 1);

        manager.set_filter(FilterMode::Completed);
        let visible: Vec<_> = manager.visible_items().map(|i| i.text.as_str()).collect();
        assert_eq!(visible, vec!["Learn React", "Write tests"]);
    }
}

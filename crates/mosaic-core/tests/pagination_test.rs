//! Pagination property: walking every page yields exactly the stored
//! records, with no duplicates and no omissions.

use mosaic_core::{
    Record, RecordContent, RecordKind, RecordMetadata, RecordSource, RecordStore, ScraperMetadata,
    SqliteStore,
};
use proptest::prelude::*;
use std::collections::HashSet;

fn record(id: &str) -> Record {
    Record {
        id: id.to_string(),
        kind: RecordKind::Article,
        source: RecordSource::default(),
        metadata: RecordMetadata::default(),
        content: RecordContent::default(),
        raw_text: None,
        scraper_metadata: ScraperMetadata::default(),
        assigned_tags: None,
        tags_assigned_at: None,
        coords: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn pages_concatenate_to_exactly_all_records(total in 0usize..40, page_size in 1usize..12) {
        let store = SqliteStore::open_in_memory().unwrap();
        store.initialize().unwrap();

        for i in 0..total {
            store.insert(&record(&format!("rec-{:03}", i))).unwrap();
        }

        let first = store.list(1, page_size, None).unwrap();
        prop_assert_eq!(first.total_count, total);
        prop_assert_eq!(first.total_pages, total.div_ceil(page_size));

        let mut seen = HashSet::new();
        for page in 1..=first.total_pages.max(1) {
            let result = store.list(page, page_size, None).unwrap();
            for rec in result.data {
                // No duplicates across pages
                prop_assert!(seen.insert(rec.id));
            }
        }
        prop_assert_eq!(seen.len(), total);
    }

    #[test]
    fn pages_past_the_end_are_empty_but_correct(page_size in 1usize..8) {
        let store = SqliteStore::open_in_memory().unwrap();
        store.initialize().unwrap();
        for i in 0..5usize {
            store.insert(&record(&format!("rec-{}", i))).unwrap();
        }

        let far = store.list(1000, page_size, None).unwrap();
        prop_assert!(far.data.is_empty());
        prop_assert_eq!(far.total_count, 5);
    }
}

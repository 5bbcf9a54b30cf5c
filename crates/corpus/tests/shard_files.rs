use proptest::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;
use wordrank_corpus::{snapshot, ShardFilter, ShardReader};

#[test]
fn shard_file_feeds_snapshot() {
    let tmp = TempDir::new().unwrap();
    let shard = tmp.path().join("grams1.csv");
    fs::write(
        &shard,
        "apple\t1999\t10\t4\t2\n\
         apple\t2000\t12\t6\t3\n\
         b4nana\t2000\t99\t9\t9\n\
         cherry\t2000\t7\t0\t1\n",
    )
    .unwrap();

    let mut reader = ShardReader::open(&shard, ShardFilter::default()).unwrap();
    let words: Vec<_> = reader.by_ref().collect();
    let stats = reader.stats();

    assert_eq!(stats.rows, 4);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.aggregates, 2);
    assert!(reader.read_error().is_none());

    let out = tmp.path().join("top.json");
    snapshot::save(&out, &words).unwrap();
    let loaded = snapshot::load(&out).unwrap();

    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].text(), "apple");
    assert_eq!(loaded[0].total_count(), 22);
    assert_eq!(loaded[1].total_page_density(), None);
}

fn grouped_rows() -> impl Strategy<Value = Vec<(String, Vec<(i32, u64)>)>> {
    prop::collection::btree_map(
        "[a-z]{1,6}",
        prop::collection::vec((1900i32..1910, 0u64..1000), 1..6),
        1..20,
    )
    .prop_map(|groups| groups.into_iter().collect())
}

proptest! {
    #[test]
    fn proptest_one_aggregate_per_group(groups in grouped_rows()) {
        let mut input = String::new();
        for (word, rows) in &groups {
            for (year, usage) in rows {
                input.push_str(&format!("{word}\t{year}\t{usage}\t1\t1\n"));
            }
        }

        let reader = ShardReader::new(input.as_bytes(), ShardFilter::default());
        let words: Vec<_> = reader.collect();
        prop_assert_eq!(words.len(), groups.len());

        for (word, (text, rows)) in words.iter().zip(&groups) {
            let mut by_year = BTreeMap::new();
            for (year, usage) in rows {
                by_year.insert(*year, *usage);
            }
            prop_assert_eq!(word.text(), text.as_str());
            prop_assert_eq!(word.total_count(), by_year.values().sum::<u64>());
            prop_assert_eq!(word.year_count(), by_year.len());
        }
    }
}

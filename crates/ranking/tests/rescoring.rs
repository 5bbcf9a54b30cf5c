use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wordrank_corpus::{snapshot, Entry, OpenAggregate, WordAggregate};
use wordrank_ranking::{RankingService, RescoreRequest, ScoringMode, WeightVector};

fn word(text: &str, entries: &[(i32, u64, u64, u64)]) -> WordAggregate {
    let mut open = OpenAggregate::new(text);
    for &(year, usage, pages, books) in entries {
        open.add_entry(Entry::new(year, usage, pages, books));
    }
    open.seal()
}

#[test]
fn snapshot_file_serves_ranked_pages() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("top.json");
    snapshot::save(
        &path,
        &[
            word("the", &[(2000, 1000, 100, 50)]),
            word("cat", &[(2000, 50, 10, 5)]),
            word("dog", &[(2000, 50, 25, 5)]),
        ],
    )
    .unwrap();

    let mut service = RankingService::from_snapshot_file(&path, ScoringMode::PerYear).unwrap();
    assert_eq!(service.snapshot().maxima().max_count, 1000);

    // Only books matter: cat and dog tie and must both survive.
    let ranked = service
        .rescore(&RescoreRequest {
            year: 2000,
            weights: WeightVector::new(0.0, 0.0, 0.0, 1.0),
        })
        .unwrap();
    assert_eq!(ranked, 3);

    let page: Vec<_> = service
        .page(1, 5)
        .iter()
        .map(|point| (point.word.as_str(), point.y))
        .collect();
    assert_eq!(page, vec![("cat", 0.1), ("dog", 0.1)]);
}

#[test]
fn missing_snapshot_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let result =
        RankingService::from_snapshot_file(tmp.path().join("absent.json"), ScoringMode::Lifetime);
    assert!(result.is_err());
}

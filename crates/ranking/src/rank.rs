use crate::scoring::Score;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use wordrank_corpus::WordAggregate;
use wordrank_topk::{Direction, InsertOutcome, OrderedTopK};

/// One plotted word: `y` is its score, `x` its book count in the ranked year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPoint {
    pub word: String,
    pub x: f64,
    pub y: f64,
}

/// Score first, then word text so that equal scores never collide.
/// `Reverse` makes ties list alphabetically in a descending traversal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct RankKey {
    score: Score,
    word: Reverse<String>,
}

/// Sorts scored words by descending score.
pub fn build_ranking<'a, I>(scored: I, year: i32) -> Vec<RankedPoint>
where
    I: IntoIterator<Item = (&'a WordAggregate, f64)>,
{
    let mut ordered = OrderedTopK::unbounded();
    for (word, score) in scored {
        let score = score + 0.0;
        let point = RankedPoint {
            word: word.text().to_string(),
            x: word.book_count(year) as f64,
            y: score,
        };
        let key = RankKey {
            score: Score(score),
            word: Reverse(point.word.clone()),
        };
        if let InsertOutcome::Collided(point) = ordered.insert(key, point) {
            log::debug!("Duplicate word '{}' dropped from ranking", point.word);
        }
    }
    ordered.into_sorted_vec(Direction::Descending)
}

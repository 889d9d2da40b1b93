//! Near-duplicate filtering over candidate titles.
//!
//! Lexical similarity only: good enough to collapse re-reported headlines at
//! batch scale (tens of items), not a learned dedup model. O(n·m) against a
//! growing pool; acceptance is order-sensitive, so the first occurrence of a
//! near-duplicate cluster survives and later ones are dropped.

use newsdeck_common::CandidateItem;
use strsim::jaro_winkler;
use tracing::debug;

/// Two titles above this similarity are treated as the same story.
pub const SIMILARITY_THRESHOLD: f64 = 0.8;

/// Case-insensitive lexical similarity over title text.
pub fn is_similar(a: &str, b: &str, threshold: f64) -> bool {
    jaro_winkler(&a.to_lowercase(), &b.to_lowercase()) > threshold
}

/// Filter `new_items` against already-known titles and against each other.
///
/// The pool is seeded with `known_titles`; every accepted candidate's title
/// joins the pool so later candidates in the same batch compare against it.
pub fn deduplicate(new_items: Vec<CandidateItem>, known_titles: &[String]) -> Vec<CandidateItem> {
    let mut pool: Vec<String> = known_titles.to_vec();
    let mut unique = Vec::with_capacity(new_items.len());

    for item in new_items {
        let duplicate = pool
            .iter()
            .any(|seen| is_similar(&item.title, seen, SIMILARITY_THRESHOLD));

        if duplicate {
            debug!(title = item.title.as_str(), "Dropping near-duplicate");
        } else {
            pool.push(item.title.clone());
            unique.push(item);
        }
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::candidate;

    #[test]
    fn similar_titles_cross_the_threshold() {
        assert!(is_similar(
            "OpenAI releases GPT-5",
            "OpenAI Releases GPT 5",
            SIMILARITY_THRESHOLD
        ));
        assert!(!is_similar(
            "OpenAI releases GPT-5",
            "Stocks rally on Fed news",
            SIMILARITY_THRESHOLD
        ));
    }

    #[test]
    fn known_titles_suppress_their_cluster() {
        let known = vec!["OpenAI releases GPT-5".to_string()];
        let items = vec![
            candidate("OpenAI Releases GPT 5"),
            candidate("OpenAI releases GPT-5 today"),
            candidate("Stocks rally on Fed news"),
        ];

        let kept = deduplicate(items, &known);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "Stocks rally on Fed news");
    }

    #[test]
    fn first_occurrence_in_batch_survives() {
        let items = vec![
            candidate("Fed cuts rates by 50 basis points"),
            candidate("Fed Cuts Rates By 50 Basis Points!"),
            candidate("Nvidia unveils next-gen AI chip"),
        ];

        let kept = deduplicate(items, &[]);

        let titles: Vec<_> = kept.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Fed cuts rates by 50 basis points",
                "Nvidia unveils next-gen AI chip"
            ]
        );
    }

    #[test]
    fn empty_pool_keeps_everything() {
        let items = vec![
            candidate("OpenAI releases GPT-5"),
            candidate("Anthropic ships Claude update"),
        ];
        assert_eq!(deduplicate(items, &[]).len(), 2);
    }
}

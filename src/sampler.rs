use rand::seq::SliceRandom;
use rand::Rng;

use crate::bank::{BankQuestion, QuestionRecord};

/// Draw up to `count` distinct questions from `pool` in random order, each
/// stamped with `theme_label`. Asking for more than the pool holds returns
/// the whole pool shuffled.
pub fn pick(pool: &[BankQuestion], count: usize, theme_label: &str) -> Vec<QuestionRecord> {
    pick_with_rng(pool, count, theme_label, &mut rand::thread_rng())
}

pub fn pick_with_rng<R: Rng + ?Sized>(
    pool: &[BankQuestion],
    count: usize,
    theme_label: &str,
    rng: &mut R,
) -> Vec<QuestionRecord> {
    if pool.is_empty() {
        return Vec::new();
    }

    let mut shuffled: Vec<&BankQuestion> = pool.iter().collect();
    shuffled.shuffle(rng);

    shuffled
        .into_iter()
        .take(count)
        .map(|entry| QuestionRecord::stamped(entry, theme_label))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn pool(n: usize) -> Vec<BankQuestion> {
        (0..n)
            .map(|i| BankQuestion {
                question: format!("q{i}"),
                choices: vec!["oui".into(), "non".into()],
                correct_answer: "oui".into(),
                hint: None,
            })
            .collect()
    }

    #[test]
    fn empty_pool_yields_nothing() {
        assert!(pick(&[], 3, "Institutions").is_empty());
        assert!(pick(&[], 0, "").is_empty());
    }

    #[test]
    fn returns_requested_count_without_duplicates() {
        let source = pool(10);
        let mut rng = StdRng::seed_from_u64(7);
        for count in 0..=10 {
            let picked = pick_with_rng(&source, count, "Histoire & Géo", &mut rng);
            assert_eq!(picked.len(), count);

            let unique: HashSet<&str> = picked.iter().map(|q| q.question.as_str()).collect();
            assert_eq!(unique.len(), count);

            for q in &picked {
                assert!(source.iter().any(|s| s.question == q.question));
                assert_eq!(q.theme_label, "Histoire & Géo");
                assert_eq!(q.user_answer(), None);
            }
        }
    }

    #[test]
    fn oversized_request_returns_whole_pool() {
        let source = pool(3);
        let picked = pick(&source, 8, "Vivre en France");
        assert_eq!(picked.len(), 3);
    }

    #[test]
    fn input_pool_is_left_untouched() {
        let source = pool(6);
        let before = source.clone();
        let _ = pick(&source, 4, "x");
        assert_eq!(source, before);
    }

    #[test]
    fn choice_order_is_preserved() {
        let mut source = pool(1);
        source[0].choices = vec!["c".into(), "a".into(), "b".into()];
        source[0].correct_answer = "a".into();
        let picked = pick(&source, 1, "x");
        assert_eq!(picked[0].choices, vec!["c", "a", "b"]);
    }

    #[test]
    fn order_varies_across_seeds() {
        let source = pool(8);
        let orders: HashSet<Vec<String>> = (0..20u64)
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                pick_with_rng(&source, 8, "x", &mut rng)
                    .into_iter()
                    .map(|q| q.question)
                    .collect()
            })
            .collect();
        assert!(orders.len() > 1);
    }
}

//! Cross-backend equivalence checking.
//!
//! `sample_corpus` builds a deterministic set of inputs (fixed edge cases plus a
//! seeded random sample) and `compare_backends` runs every function except
//! `hello` on two backends, reporting any output that differs. Floats are
//! compared by bit pattern and errors by message, so "identical" means
//! byte-for-byte identical.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::backend::{Backend, Number};
use crate::error::DemopyError;

pub const DEFAULT_SEED: u64 = 0x00DE_1109;

const ALPHABET: [char; 12] = [
    'a', 'b', 'z', ' ', '!', 'é', 'ß', 'Ж', '日', '本', '🦀', '\u{301}',
];

//==================================================================================
// 1. The Corpus
//==================================================================================

#[derive(Debug, Clone, Default)]
pub struct SampleCorpus {
    pub int_pairs: Vec<(i64, i64)>,
    pub float_pairs: Vec<(f64, f64)>,
    pub lists: Vec<Vec<i64>>,
    pub strings: Vec<String>,
    pub powers: Vec<(i64, i64)>,
}

impl SampleCorpus {
    pub fn len(&self) -> usize {
        self.int_pairs.len()
            + self.float_pairs.len()
            + self.lists.len()
            + self.strings.len()
            + self.powers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds the shared corpus: edge cases first, then `samples` random inputs of
/// each kind drawn from a `StdRng` seeded with `seed`.
pub fn sample_corpus(seed: u64, samples: usize) -> SampleCorpus {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut corpus = SampleCorpus {
        int_pairs: vec![
            (0, 0),
            (2, 3),
            (-1, 1),
            (i64::MAX, 0),
            (i64::MAX, 1),
            (i64::MIN, -1),
            (i64::MIN, i64::MAX),
        ],
        float_pairs: vec![
            (2.0, 3.0),
            (-1.0, 1.0),
            (0.0, 100.0),
            (-0.0, 5.0),
            (f64::NAN, 1.0),
            (f64::INFINITY, 0.0),
            (1e308, 10.0),
            (f64::MIN_POSITIVE, 0.5),
        ],
        lists: vec![
            vec![],
            vec![7],
            vec![1, 2, 3, 4, 5],
            vec![-1, -2, -3],
            vec![i64::MAX, i64::MAX, i64::MIN, i64::MIN, 5],
            vec![i64::MAX, 1],
        ],
        strings: vec![
            String::new(),
            "a".to_string(),
            "hello".to_string(),
            "héllo wörld".to_string(),
            "日本語🦀".to_string(),
            "e\u{301}".to_string(),
        ],
        powers: vec![
            (0, 0),
            (5, 0),
            (2, 10),
            (0, 3),
            (0, -1),
            (2, -1),
            (-2, -3),
            (2, 63),
            (-2, 63),
            (i64::MIN, 1),
            (-1, i64::MAX),
            (1, i64::MIN),
            (10, 19),
        ],
    };

    for _ in 0..samples {
        let a: i64 = if rng.random_bool(0.5) {
            rng.random()
        } else {
            rng.random_range(-1_000..1_000)
        };
        let b: i64 = if rng.random_bool(0.5) {
            rng.random()
        } else {
            rng.random_range(-1_000..1_000)
        };
        corpus.int_pairs.push((a, b));

        let x: f64 = rng.random_range(-1e6..1e6);
        let y: f64 = rng.random::<f64>() * 1e3;
        corpus.float_pairs.push((x, y));

        let len = rng.random_range(0..64);
        let list: Vec<i64> = (0..len)
            .map(|_| {
                if rng.random_bool(0.1) {
                    rng.random()
                } else {
                    rng.random_range(-1_000_000..1_000_000)
                }
            })
            .collect();
        corpus.lists.push(list);

        let len = rng.random_range(0..24);
        let s: String = (0..len)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())])
            .collect();
        corpus.strings.push(s);

        corpus
            .powers
            .push((rng.random_range(-20..=20), rng.random_range(-6..=45)));
    }

    corpus
}

//==================================================================================
// 2. The Comparison
//==================================================================================

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub function: &'static str,
    pub input: String,
    pub left: String,
    pub right: String,
}

fn float_key(v: f64) -> String {
    format!("f64:{:#018x}", v.to_bits())
}

fn outcome_key<T, F>(result: &Result<T, DemopyError>, key: F) -> String
where
    F: Fn(&T) -> String,
{
    match result {
        Ok(v) => key(v),
        Err(e) => format!("error:{}", e),
    }
}

fn number_key(n: &Number) -> String {
    match n {
        Number::Int(v) => format!("i64:{}", v),
        Number::Float(v) => float_key(*v),
    }
}

/// Runs every corpus input through both backends and returns the differences.
///
/// `hello` is excluded: its text intentionally names the backend.
pub fn compare_backends(left: &dyn Backend, right: &dyn Backend, corpus: &SampleCorpus) -> Vec<Mismatch> {
    let mut mismatches = Vec::new();
    let mut record = |function: &'static str, input: String, l: String, r: String| {
        if l != r {
            mismatches.push(Mismatch {
                function,
                input,
                left: l,
                right: r,
            });
        }
    };

    for &(a, b) in &corpus.int_pairs {
        let key = |v: &i64| format!("i64:{}", v);
        record(
            "add",
            format!("({}, {})", a, b),
            outcome_key(&left.add(a, b), key),
            outcome_key(&right.add(a, b), key),
        );
    }

    for &(a, b) in &corpus.float_pairs {
        record(
            "multiply",
            format!("({:?}, {:?})", a, b),
            float_key(left.multiply(a, b)),
            float_key(right.multiply(a, b)),
        );
    }

    for list in &corpus.lists {
        let key = |v: &i64| format!("i64:{}", v);
        record(
            "sum_list",
            format!("{:?}", list),
            outcome_key(&left.sum_list(list), key),
            outcome_key(&right.sum_list(list), key),
        );
    }

    for s in &corpus.strings {
        let key = |v: &String| format!("str:{:?}", v);
        record(
            "reverse_string",
            format!("{:?}", s),
            outcome_key(&left.reverse_string(s), key),
            outcome_key(&right.reverse_string(s), key),
        );
    }

    for &(base, exp) in &corpus.powers {
        record(
            "power",
            format!("({}, {})", base, exp),
            outcome_key(&left.power(base, exp), number_key),
            outcome_key(&right.power(base, exp), number_key),
        );
    }

    if !mismatches.is_empty() {
        log::warn!(
            "{} cross-backend mismatches between {} and {}",
            mismatches.len(),
            left.kind(),
            right.kind()
        );
    }
    mismatches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::FallbackBackend;

    #[test]
    fn test_corpus_is_deterministic() {
        let a = sample_corpus(DEFAULT_SEED, 32);
        let b = sample_corpus(DEFAULT_SEED, 32);
        assert_eq!(a.int_pairs, b.int_pairs);
        assert_eq!(a.lists, b.lists);
        assert_eq!(a.strings, b.strings);
        assert_eq!(a.powers, b.powers);
        assert!(a.len() > 5 * 32);
    }

    #[test]
    fn test_backend_agrees_with_itself() {
        let corpus = sample_corpus(DEFAULT_SEED, 64);
        let b = FallbackBackend::new();
        assert!(compare_backends(&b, &b, &corpus).is_empty());
    }

    /// A backend that gets one thing wrong, to prove mismatches are caught.
    struct OffByOne;

    impl Backend for OffByOne {
        fn kind(&self) -> crate::backend::BackendKind {
            crate::backend::BackendKind::Accelerated
        }
        fn hello(&self) -> String {
            String::new()
        }
        fn add(&self, a: i64, b: i64) -> Result<i64, DemopyError> {
            Ok(a.wrapping_add(b).wrapping_add(1))
        }
        fn multiply(&self, a: f64, b: f64) -> f64 {
            a * b
        }
        fn sum_list(&self, numbers: &[i64]) -> Result<i64, DemopyError> {
            FallbackBackend.sum_list(numbers)
        }
        fn reverse_string(&self, s: &str) -> Result<String, DemopyError> {
            FallbackBackend.reverse_string(s)
        }
        fn power(&self, base: i64, exponent: i64) -> Result<Number, DemopyError> {
            FallbackBackend.power(base, exponent)
        }
    }

    #[test]
    fn test_mismatches_are_reported() {
        let corpus = sample_corpus(DEFAULT_SEED, 0);
        let mismatches = compare_backends(&FallbackBackend, &OffByOne, &corpus);
        assert_eq!(mismatches.len(), corpus.int_pairs.len());
        assert!(mismatches.iter().all(|m| m.function == "add"));
        assert_eq!(mismatches[1].input, "(2, 3)");
        assert_eq!(mismatches[1].left, "i64:5");
        assert_eq!(mismatches[1].right, "i64:6");
    }
}

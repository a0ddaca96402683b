//! Ratcliff/Obershelp sequence similarity.
//!
//! [`SequenceMatcher::ratio`] is `2·M / T`, where `T` is the combined length
//! of both strings and `M` the number of characters in matching blocks. Blocks
//! are found by taking the longest common substring, then recursing on the
//! pieces to its left and right. Strings are compared per Unicode scalar value.
//!
//! When the second sequence is 200 characters or longer, characters occurring
//! in more than 1% of its positions are treated as "popular" and cannot seed a
//! match (they may still extend one), which keeps matching near-linear on long
//! inputs.

use std::collections::HashMap;

/// Length from which the popular-character heuristic kicks in.
const AUTOJUNK_MIN_LEN: usize = 200;

/// A matching block: `a[a_start..a_start + len] == b[b_start..b_start + len]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Start in the first sequence.
    pub a_start: usize,
    /// Start in the second sequence.
    pub b_start: usize,
    /// Block length.
    pub len: usize,
}

/// Compares one fixed sequence `b` against any number of sequences `a`.
///
/// Building the index over `b` is the expensive part, so callers comparing a
/// single new name to many candidates should keep `b` fixed and swap `a`.
#[derive(Debug, Clone)]
pub struct SequenceMatcher {
    a: Vec<char>,
    b: Vec<char>,
    /// Positions of every non-popular character of `b`, ascending.
    b2j: HashMap<char, Vec<usize>>,
    /// Character counts of `b`, for [`Self::quick_ratio`].
    b_counts: HashMap<char, usize>,
}

impl SequenceMatcher {
    /// Create a matcher for `a` against `b`.
    #[must_use]
    pub fn new(a: &str, b: &str) -> Self {
        let mut matcher = Self {
            a: Vec::new(),
            b: Vec::new(),
            b2j: HashMap::new(),
            b_counts: HashMap::new(),
        };
        matcher.set_seq2(b);
        matcher.set_seq1(a);
        matcher
    }

    /// Replace the first sequence, keeping the index over the second.
    pub fn set_seq1(&mut self, a: &str) {
        self.a = a.chars().collect();
    }

    /// Replace the second sequence and rebuild its index.
    pub fn set_seq2(&mut self, b: &str) {
        self.b = b.chars().collect();
        self.b2j.clear();
        self.b_counts.clear();

        for (j, &c) in self.b.iter().enumerate() {
            self.b2j.entry(c).or_default().push(j);
            *self.b_counts.entry(c).or_default() += 1;
        }

        let n = self.b.len();
        if n >= AUTOJUNK_MIN_LEN {
            let threshold = n / 100 + 1;
            self.b2j.retain(|_, positions| positions.len() <= threshold);
        }
    }

    /// Longest matching block in `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Among equally long blocks, the one starting earliest in `a` wins, then
    /// the one starting earliest in `b`.
    #[must_use]
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Match {
        let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);

        // j2len[j] = length of the match ending with a[i - 1] and b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next_j2len = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j.checked_sub(1).and_then(|p| j2len.get(&p)).copied().unwrap_or(0) + 1;
                    next_j2len.insert(j, k);
                    if k > best_len {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_len = k;
                    }
                }
            }
            j2len = next_j2len;
        }

        // Popular characters never seed a block but may extend one
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_len += 1;
        }
        while best_i + best_len < ahi
            && best_j + best_len < bhi
            && self.a[best_i + best_len] == self.b[best_j + best_len]
        {
            best_len += 1;
        }

        Match { a_start: best_i, b_start: best_j, len: best_len }
    }

    /// All matching blocks, ordered by position, without the trailing sentinel.
    #[must_use]
    pub fn matching_blocks(&self) -> Vec<Match> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.len == 0 {
                continue;
            }
            if alo < m.a_start && blo < m.b_start {
                queue.push((alo, m.a_start, blo, m.b_start));
            }
            if m.a_start + m.len < ahi && m.b_start + m.len < bhi {
                queue.push((m.a_start + m.len, ahi, m.b_start + m.len, bhi));
            }
            blocks.push(m);
        }

        blocks.sort_by_key(|m| (m.a_start, m.b_start));

        // Merge adjacent blocks
        let mut merged: Vec<Match> = Vec::with_capacity(blocks.len());
        for m in blocks {
            match merged.last_mut() {
                Some(last)
                    if last.a_start + last.len == m.a_start
                        && last.b_start + last.len == m.b_start =>
                {
                    last.len += m.len;
                }
                _ => merged.push(m),
            }
        }
        merged
    }

    /// Similarity in `[0, 1]`; two empty strings are identical.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        let matches: usize = self.matching_blocks().iter().map(|m| m.len).sum();
        ratio_of(matches, self.a.len() + self.b.len())
    }

    /// Upper bound on [`Self::ratio`] from character multisets alone.
    #[must_use]
    pub fn quick_ratio(&self) -> f64 {
        let mut available: HashMap<char, usize> = HashMap::new();
        let mut matches = 0;
        for &c in &self.a {
            let left = available
                .entry(c)
                .or_insert_with(|| self.b_counts.get(&c).copied().unwrap_or(0));
            if *left > 0 {
                *left -= 1;
                matches += 1;
            }
        }
        ratio_of(matches, self.a.len() + self.b.len())
    }

    /// Upper bound on [`Self::ratio`] from lengths alone.
    #[must_use]
    pub fn real_quick_ratio(&self) -> f64 {
        let (la, lb) = (self.a.len(), self.b.len());
        ratio_of(la.min(lb), la + lb)
    }
}

fn ratio_of(matches: usize, total: usize) -> f64 {
    if total == 0 { 1.0 } else { 2.0 * matches as f64 / total as f64 }
}

/// Best candidates for `word` scoring at least `cutoff`, best first.
///
/// Returns at most `n` candidates. Equal scores are ordered by descending
/// candidate string, so the result does not depend on candidate order.
#[must_use]
pub fn get_close_matches<'a, I>(word: &str, candidates: I, n: usize, cutoff: f64) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    if n == 0 {
        return Vec::new();
    }

    let mut matcher = SequenceMatcher::new("", word);
    let mut scored: Vec<(f64, &'a str)> = Vec::new();

    for candidate in candidates {
        matcher.set_seq1(candidate);
        if matcher.real_quick_ratio() >= cutoff && matcher.quick_ratio() >= cutoff {
            let score = matcher.ratio();
            if score >= cutoff {
                scored.push((score, candidate));
            }
        }
    }

    scored.sort_by(|x, y| y.0.total_cmp(&x.0).then_with(|| y.1.cmp(x.1)));
    scored.into_iter().take(n).map(|(_, candidate)| candidate).collect()
}

/// Single best candidate for `word` at or above `cutoff`.
#[must_use]
pub fn closest_match<'a, I>(word: &str, candidates: I, cutoff: f64) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    get_close_matches(word, candidates, 1, cutoff).into_iter().next()
}

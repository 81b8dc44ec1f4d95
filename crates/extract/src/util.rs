/// Levenshtein edit distance over chars, two-row O(min(m,n)) space.
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();

    // Shorter string in the inner loop.
    let (a, b) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if a.is_empty() {
        return b.len();
    }

    let mut prev: Vec<usize> = (0..=a.len()).collect();
    let mut curr = vec![0usize; a.len() + 1];

    for (j, cb) in b.iter().enumerate() {
        curr[0] = j + 1;
        for (i, ca) in a.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[i + 1] = (prev[i + 1] + 1).min(curr[i] + 1).min(prev[i] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[a.len()]
}

/// Case-insensitive similarity in `0.0..=1.0`; two empty strings are identical.
pub fn similarity(s1: &str, s2: &str) -> f32 {
    let (s1, s2) = (s1.to_lowercase(), s2.to_lowercase());
    let max_len = s1.chars().count().max(s2.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - (levenshtein_distance(&s1, &s2) as f32 / max_len as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_and_empty() {
        assert_eq!(levenshtein_distance("name", "name"), 0);
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("", "dob"), 3);
        assert_eq!(levenshtein_distance("dob", ""), 3);
    }

    #[test]
    fn ocr_confusions_cost_one_edit() {
        assert_eq!(levenshtein_distance("name", "nane"), 1);
        assert_eq!(levenshtein_distance("name", "nam"), 1);
        assert_eq!(levenshtein_distance("name", "nnme"), 1);
    }

    #[test]
    fn distance_is_symmetric() {
        assert_eq!(levenshtein_distance("surname", "name"), levenshtein_distance("name", "surname"));
    }

    #[test]
    fn counts_chars_not_bytes() {
        assert_eq!(levenshtein_distance("prénom", "prenom"), 1);
    }

    #[test]
    fn similarity_ignores_case() {
        assert_eq!(similarity("NAME", "name"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("Nane", "name"), 0.75);
        assert!(similarity("DLN", "name") < 0.5);
    }
}

//! Local answer grading, used when no AI grader is available.
//!
//! Answers are compared with Levenshtein similarity on normalized text.

/// Similarity an answer must reach to count as correct.
pub const DEFAULT_THRESHOLD: f64 = 0.8;

const ALTERNATIVE_SEPARATORS: [char; 3] = [',', ';', '/'];

/// Trim, lower-case and collapse inner whitespace.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    // single rolling row
    let mut row: Vec<usize> = (0..=b_chars.len()).collect();
    for (i, ca) in a_chars.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let above = row[j + 1];
            let cost = if ca == cb { 0 } else { 1 };
            row[j + 1] = (above + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = above;
        }
    }
    row[b_chars.len()]
}

/// Similarity in [0, 1] between two answers after normalization.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(&a, &b) as f64 / longest as f64
}

/// Grade a typed answer against an expected meaning that may list alternatives.
pub fn grade_locally(answer: &str, expected: &str, threshold: f64) -> bool {
    if normalize(answer).is_empty() {
        return false;
    }

    let best = expected
        .split(&ALTERNATIVE_SEPARATORS[..])
        .map(str::trim)
        .filter(|alt| !alt.is_empty())
        .map(|alt| similarity(answer, alt))
        .fold(0.0_f64, f64::max);

    tracing::debug!(best_similarity = best, threshold = threshold, "Graded answer locally");
    best >= threshold
}

/// Lowercases, drops punctuation and collapses whitespace, so that
/// "DOOM® (2016)" and "doom 2016" compare equal.
pub fn normalize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Score in `[0, 1]`, 1 meaning the normalized titles are identical.
pub fn title_similarity(query: &str, candidate: &str) -> f64 {
    strsim::normalized_levenshtein(&normalize_title(query), &normalize_title(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("DOOM® (2016)"), "doom 2016");
        assert_eq!(normalize_title("  Half-Life:   Source "), "half life source");
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(title_similarity("Portal", "portal"), 1.0);
        assert_eq!(title_similarity("", ""), 1.0);
        assert_eq!(title_similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_closer_title_scores_higher() {
        let query = "The Witcher 3: Wild Hunt - Game of the Year Edition";
        let exact = title_similarity(query, "The Witcher 3: Wild Hunt");
        let other = title_similarity(query, "The Witcher");
        assert!(exact > other);
    }
}

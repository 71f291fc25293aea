use crate::core::similarity::title_similarity;
use crate::domain::model::Candidate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

/// Picks one search hit out of several for a queried title.
pub trait MatchSelector: Send + Sync {
    /// Index into `candidates`, or `None` to treat the title as unmatched.
    /// Only called with a non-empty slice.
    fn select(&self, query: &str, candidates: &[Candidate]) -> Option<usize>;

    fn name(&self) -> &'static str;
}

/// Takes the lookup service's top-ranked hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstResult;

impl MatchSelector for FirstResult {
    fn select(&self, _query: &str, candidates: &[Candidate]) -> Option<usize> {
        if candidates.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    fn name(&self) -> &'static str {
        "first-result"
    }
}

/// Takes the hit whose title is closest to the query. Ties keep the
/// service's ranking.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighestSimilarity;

impl MatchSelector for HighestSimilarity {
    fn select(&self, query: &str, candidates: &[Candidate]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, candidate) in candidates.iter().enumerate() {
            let score = title_similarity(query, &candidate.title);
            tracing::debug!("similarity '{}' ~ '{}' = {:.3}", query, candidate.title, score);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((index, score)),
            }
        }
        best.map(|(index, _)| index)
    }

    fn name(&self) -> &'static str {
        "highest-similarity"
    }
}

/// Hands ambiguous searches to a callback. A single hit is taken as is.
pub struct Manual<F> {
    choose: F,
}

impl<F> Manual<F>
where
    F: Fn(&str, &[Candidate]) -> Option<usize> + Send + Sync,
{
    pub fn new(choose: F) -> Self {
        Self { choose }
    }
}

impl<F> MatchSelector for Manual<F>
where
    F: Fn(&str, &[Candidate]) -> Option<usize> + Send + Sync,
{
    fn select(&self, query: &str, candidates: &[Candidate]) -> Option<usize> {
        match candidates.len() {
            0 => None,
            1 => Some(0),
            len => (self.choose)(query, candidates).filter(|index| *index < len),
        }
    }

    fn name(&self) -> &'static str {
        "manual"
    }
}

/// Asks on the terminal which candidate matches. An empty answer skips the
/// game; anything unparsable is asked again.
pub fn prompt_on_terminal(query: &str, candidates: &[Candidate]) -> Option<usize> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    let _ = writeln!(stdout, "\nSeveral matches for '{}':", query);
    for (index, candidate) in candidates.iter().enumerate() {
        let hours = candidate
            .main_story_hours
            .map(|h| format!("{:.1} h", h))
            .unwrap_or_else(|| "no data".to_string());
        let _ = writeln!(stdout, "  {}) {} [{}]", index + 1, candidate.title, hours);
    }

    loop {
        let _ = write!(stdout, "Pick 1-{} (empty to skip): ", candidates.len());
        let _ = stdout.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => return None,
            Ok(_) => {}
        }

        let answer = line.trim();
        if answer.is_empty() {
            return None;
        }
        match answer.parse::<usize>() {
            Ok(choice) if (1..=candidates.len()).contains(&choice) => return Some(choice - 1),
            _ => {
                let _ = writeln!(stdout, "'{}' is not a valid choice", answer);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    #[default]
    FirstResult,
    HighestSimilarity,
    Manual,
}

impl TieBreak {
    pub fn build(self) -> Box<dyn MatchSelector> {
        match self {
            TieBreak::FirstResult => Box::new(FirstResult),
            TieBreak::HighestSimilarity => Box::new(HighestSimilarity),
            TieBreak::Manual => Box::new(Manual::new(prompt_on_terminal)),
        }
    }

    /// Whether the strategy needs lookups to run one at a time.
    pub fn is_interactive(self) -> bool {
        matches!(self, TieBreak::Manual)
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TieBreak::FirstResult => "first-result",
            TieBreak::HighestSimilarity => "highest-similarity",
            TieBreak::Manual => "manual",
        };
        f.write_str(name)
    }
}

impl FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first-result" | "first" => Ok(TieBreak::FirstResult),
            "highest-similarity" | "similarity" => Ok(TieBreak::HighestSimilarity),
            "manual" => Ok(TieBreak::Manual),
            other => Err(format!(
                "unknown tie-break '{}', expected first-result, highest-similarity or manual",
                other
            )),
        }
    }
}

//! Marks the target sounds inside a word.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A run of characters, flagged when it is part of a target sound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Characters of the run.
    pub text: String,
    /// Whether the run spells (part of) a target sound.
    pub target: bool,
}

impl Segment {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target: false,
        }
    }

    fn target(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target: true,
        }
    }
}

/// Splits `word` into plain and target segments.
///
/// `targets` is a comma-separated list of sounds. A sound like `a_e` is a
/// split digraph: it matches a letter, any single letter, then the second
/// letter, and only the outer two are targets. Other sounds match as
/// substrings. Matching ignores case and the first sound in list order wins
/// at each position. Adjacent plain characters are merged into one segment.
#[instrument(level = "trace")]
pub fn highlight_target_sounds(word: &str, targets: &str) -> Vec<Segment> {
    let sounds: Vec<String> = targets
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    let chars: Vec<char> = word.chars().collect();
    let mut segments: Vec<Segment> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        match match_at(&chars, i, &sounds) {
            Some(Match::Split) => {
                segments.push(Segment::target(chars[i]));
                push_plain(&mut segments, chars[i + 1]);
                segments.push(Segment::target(chars[i + 2]));
                i += 3;
            }
            Some(Match::Run(len)) => {
                segments.push(Segment::target(chars[i..i + len].iter().collect::<String>()));
                i += len;
            }
            None => {
                push_plain(&mut segments, chars[i]);
                i += 1;
            }
        }
    }
    segments
}

/// Renders segments with target runs in brackets, e.g. `[b]ik[e]`.
pub fn bracket_targets(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| {
            if s.target {
                format!("[{}]", s.text)
            } else {
                s.text.clone()
            }
        })
        .collect()
}

enum Match {
    Split,
    Run(usize),
}

fn match_at(chars: &[char], i: usize, sounds: &[String]) -> Option<Match> {
    for sound in sounds {
        if let Some((first, last)) = sound.split_once('_') {
            if i + 2 < chars.len()
                && same_letter(chars[i], first)
                && same_letter(chars[i + 2], last)
            {
                return Some(Match::Split);
            }
        } else {
            let len = sound.chars().count();
            if i + len <= chars.len() {
                let candidate: String = chars[i..i + len].iter().collect();
                if candidate.to_lowercase() == *sound {
                    return Some(Match::Run(len));
                }
            }
        }
    }
    None
}

fn same_letter(c: char, letter: &str) -> bool {
    c.to_lowercase().eq(letter.chars())
}

fn push_plain(segments: &mut Vec<Segment>, c: char) {
    match segments.last_mut() {
        Some(last) if !last.target => last.text.push(c),
        _ => segments.push(Segment::plain(c)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(word: &str, targets: &str) -> String {
        bracket_targets(&highlight_target_sounds(word, targets))
    }

    #[test]
    fn test_blend_is_highlighted() {
        assert_eq!(render("black", "bl, cl, fl"), "[bl]ack");
        assert_eq!(render("clap", "bl, cl, fl"), "[cl]ap");
    }

    #[test]
    fn test_split_digraph() {
        assert_eq!(render("cake", "a_e"), "c[a]k[e]");
        assert_eq!(render("bike", "i_e"), "b[i]k[e]");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(render("SHIP", "sh"), "[SH]IP");
        assert_eq!(render("Ape", "a_e"), "[A]p[e]");
    }

    #[test]
    fn test_no_targets_is_one_plain_segment() {
        let segments = highlight_target_sounds("dog", "");
        assert_eq!(segments, vec![Segment::plain("dog")]);
    }

    #[test]
    fn test_split_needs_room() {
        assert_eq!(render("ae", "a_e"), "ae");
    }

    #[test]
    fn test_repeated_matches() {
        assert_eq!(render("shush", "sh"), "[sh]u[sh]");
    }

    #[test]
    fn test_first_listed_sound_wins() {
        assert_eq!(render("shop", "s, sh"), "[s]hop");
        assert_eq!(render("shop", "sh, s"), "[sh]op");
    }
}

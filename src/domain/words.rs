use std::sync::OnceLock;

use anyhow::{Result, bail};
use regex::Regex;

/// A word and its weight. List order is draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct WordItem {
    pub text: String,
    pub weight: f64,
}

impl WordItem {
    pub fn new(text: impl Into<String>, weight: f64) -> Self {
        Self {
            text: text.into(),
            weight,
        }
    }
}

fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+))\s+(\S.*?)\s*$").expect("word line pattern")
    })
}

/// Parses `<weight> <text>` lines. Blank lines and `#` comments are ignored.
pub fn parse_word_list(input: &str) -> Result<Vec<WordItem>> {
    let mut words = Vec::new();
    for (number, line) in input.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some(captures) = line_pattern().captures(line) else {
            bail!(
                "line {}: expected `<weight> <text>`, got `{trimmed}`",
                number + 1
            );
        };
        let weight: f64 = captures[1].parse()?;
        words.push(WordItem::new(&captures[2], weight));
    }
    Ok(words)
}

pub fn demo_words() -> Vec<WordItem> {
    [
        (40.0, "Rust"),
        (28.0, "borrow"),
        (26.0, "ownership"),
        (22.0, "traits"),
        (20.0, "cargo"),
        (18.0, "lifetimes"),
        (16.0, "async"),
        (16.0, "tokio"),
        (14.0, "serde"),
        (14.0, "clap"),
        (12.0, "macros"),
        (12.0, "iterators"),
        (12.0, "enums"),
        (10.0, "match"),
        (10.0, "crates"),
        (10.0, "unsafe"),
        (9.0, "generics"),
        (9.0, "closures"),
        (8.0, "Result"),
        (8.0, "Option"),
        (8.0, "slices"),
        (8.0, "Vec"),
        (8.0, "Arc"),
        (8.0, "Box"),
    ]
    .into_iter()
    .map(|(weight, text)| WordItem::new(text, weight))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_weight_then_text() {
        let words = parse_word_list("12 hello\n3.5   two words  \n").expect("parse");
        assert_eq!(
            words,
            vec![WordItem::new("hello", 12.0), WordItem::new("two words", 3.5)]
        );
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let words = parse_word_list("# header\n\n  \n7 kept\n").expect("parse");
        assert_eq!(words, vec![WordItem::new("kept", 7.0)]);
    }

    #[test]
    fn keeps_input_order() {
        let words = parse_word_list("1 small\n99 large\n").expect("parse");
        assert_eq!(words[0].text, "small");
        assert_eq!(words[1].text, "large");
    }

    #[test]
    fn reports_line_number_on_error() {
        let err = parse_word_list("5 ok\nnoweight\n").expect_err("should fail");
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn accepts_fractional_without_leading_digit() {
        let words = parse_word_list(".5 half").expect("parse");
        assert_eq!(words, vec![WordItem::new("half", 0.5)]);
    }

    #[test]
    fn demo_list_is_not_sorted_away() {
        let words = demo_words();
        assert_eq!(words.first().map(|w| w.text.as_str()), Some("Rust"));
        assert!(words.len() > 20);
    }
}

//! Name filtering for table and column pickers.

use regex::{Regex, RegexBuilder};

use crate::Result;

/// How a typed pattern is compared with candidate names.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Candidate starts with the pattern.
    #[default]
    Prefix,
    /// Candidate contains the pattern anywhere.
    Contains,
    /// Whole-name match where `*` is any run of characters and `?` is one.
    Wildcard,
}

/// A compiled, case-insensitive name filter. An empty pattern matches all.
#[derive(Debug, Clone)]
pub struct NameFilter {
    mode: MatchMode,
    needle: String,
    wildcard: Option<Regex>,
}

impl NameFilter {
    pub fn new(pattern: &str, mode: MatchMode) -> Result<Self> {
        let pattern = pattern.trim();
        let wildcard = match mode {
            MatchMode::Wildcard if !pattern.is_empty() => Some(wildcard_regex(pattern)?),
            _ => None,
        };
        Ok(Self {
            mode,
            needle: pattern.to_lowercase(),
            wildcard,
        })
    }

    pub fn matches(&self, name: &str) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        match self.mode {
            MatchMode::Prefix => name.to_lowercase().starts_with(&self.needle),
            MatchMode::Contains => name.to_lowercase().contains(&self.needle),
            MatchMode::Wildcard => self
                .wildcard
                .as_ref()
                .is_some_and(|regex| regex.is_match(name)),
        }
    }

    pub fn filter<'a, I>(&self, names: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names.into_iter().filter(|name| self.matches(name)).collect()
    }
}

fn wildcard_regex(pattern: &str) -> Result<Regex> {
    let mut expr = String::from("^");
    for ch in pattern.chars() {
        match ch {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            c => expr.push_str(&regex::escape(&c.to_string())),
        }
    }
    expr.push('$');
    Ok(RegexBuilder::new(&expr).case_insensitive(true).build()?)
}

/// One-shot convenience over [`NameFilter`].
pub fn filter_names<'a, I>(names: I, pattern: &str, mode: MatchMode) -> Result<Vec<&'a str>>
where
    I: IntoIterator<Item = &'a str>,
{
    Ok(NameFilter::new(pattern, mode)?.filter(names))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: [&str; 5] = ["customer", "customer_out", "Address", "orders", "order_lines"];

    #[test]
    fn prefix_is_case_insensitive() {
        let hits = filter_names(NAMES, "CUST", MatchMode::Prefix).unwrap();
        assert_eq!(hits, vec!["customer", "customer_out"]);
    }

    #[test]
    fn contains_matches_inside_names() {
        let hits = filter_names(NAMES, "dre", MatchMode::Contains).unwrap();
        assert_eq!(hits, vec!["Address"]);
    }

    #[test]
    fn wildcard_is_anchored() {
        assert_eq!(
            filter_names(NAMES, "order*", MatchMode::Wildcard).unwrap(),
            vec!["orders", "order_lines"]
        );
        assert_eq!(
            filter_names(NAMES, "*_out", MatchMode::Wildcard).unwrap(),
            vec!["customer_out"]
        );
        assert_eq!(
            filter_names(NAMES, "order?", MatchMode::Wildcard).unwrap(),
            vec!["orders"]
        );
    }

    #[test]
    fn wildcard_escapes_regex_metacharacters() {
        let names = ["a.b", "axb"];
        assert_eq!(
            filter_names(names, "a.b", MatchMode::Wildcard).unwrap(),
            vec!["a.b"]
        );
    }

    #[test]
    fn empty_pattern_matches_everything() {
        for mode in [MatchMode::Prefix, MatchMode::Contains, MatchMode::Wildcard] {
            assert_eq!(filter_names(NAMES, "  ", mode).unwrap().len(), NAMES.len());
        }
    }
}

use std::fmt::Display;

/// Substring patterns selecting which module paths are worth fetching.
/// An empty set selects every module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    patterns: Vec<String>,
}

impl FilterSet {
    pub fn new(patterns: impl IntoIterator<Item = String>) -> Self {
        FilterSet {
            patterns: patterns
                .into_iter()
                .map(|p| p.trim().to_owned())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Parses a comma-separated pattern list such as `corp.example.com/, github.com/corp`.
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(',').map(str::to_owned))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_related(&self, module_path: &str) -> bool {
        self.is_empty() || self.patterns.iter().any(|p| module_path.contains(p.as_str()))
    }
}

impl Display for FilterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.patterns.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_trims_and_drops_empty() {
        let filters = FilterSet::parse(" corp/ ,, github.com/org ,");
        assert_eq!(filters.patterns(), &["corp/", "github.com/org"]);
    }

    #[test]
    fn empty_filter_relates_everything() {
        let filters = FilterSet::parse("");
        assert!(filters.is_empty());
        assert!(filters.is_related("other/b"));
    }

    #[test]
    fn substring_match() {
        let filters = FilterSet::parse("corp/");
        assert!(filters.is_related("corp/a"));
        assert!(filters.is_related("git.example.com/corp/a"));
        assert!(!filters.is_related("other/b"));
    }

    #[test]
    fn any_pattern_matches() {
        let filters = FilterSet::new(vec!["a.com".to_owned(), "b.com".to_owned()]);
        assert!(filters.is_related("b.com/x"));
        assert!(!filters.is_related("c.com/x"));
    }
}

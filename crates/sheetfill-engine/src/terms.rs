use std::collections::BTreeMap;

/// One thesaurus entry: a stable identifier plus its display title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub identifier: String,
    pub title: String,
}

/// Immutable identifier-to-term mapping, fully loaded before a run starts.
///
/// Construction belongs to the loader (remote thesaurus domains or a local
/// fixture); normalization only ever reads.
#[derive(Debug, Clone, Default)]
pub struct TermDirectory {
    terms: BTreeMap<String, Term>,
}

impl TermDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a term, replacing any previous entry for the same identifier.
    pub fn insert(&mut self, term: Term) -> Option<Term> {
        self.terms.insert(term.identifier.clone(), term)
    }

    pub fn lookup(&self, identifier: &str) -> Option<&Term> {
        self.terms.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl FromIterator<Term> for TermDirectory {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        let mut directory = Self::new();
        for term in iter {
            directory.insert(term);
        }
        directory
    }
}

/// Longest worksheet name derived from a term title.
const SHEET_NAME_LIMIT: usize = 30;

/// Derive a worksheet name from a term title: at most thirty characters,
/// trimmed of surrounding whitespace.
pub fn sheet_name(title: &str) -> String {
    let cut: String = title.chars().take(SHEET_NAME_LIMIT).collect();
    cut.trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(identifier: &str, title: &str) -> Term {
        Term {
            identifier: identifier.to_owned(),
            title: title.to_owned(),
        }
    }

    #[test]
    fn lookup_finds_inserted_terms() {
        let directory: TermDirectory =
            [term("ca", "Canada"), term("de", "Germany")].into_iter().collect();
        assert_eq!(directory.len(), 2);
        assert_eq!(directory.lookup("ca").map(|t| t.title.as_str()), Some("Canada"));
        assert!(directory.lookup("xx").is_none());
    }

    #[test]
    fn insert_replaces_existing_entries() {
        let mut directory = TermDirectory::new();
        directory.insert(term("tz", "Tanzania"));
        let previous = directory.insert(term("tz", "Tanzania, United Republic of"));
        assert_eq!(previous.map(|t| t.title), Some("Tanzania".to_owned()));
        assert_eq!(
            directory.lookup("tz").map(|t| t.title.as_str()),
            Some("Tanzania, United Republic of")
        );
    }

    #[test]
    fn sheet_name_truncates_then_trims() {
        assert_eq!(sheet_name("Canada"), "Canada");
        assert_eq!(
            sheet_name("United Kingdom of Great Britain and Northern Ireland"),
            "United Kingdom of Great Britai"
        );
        assert_eq!(sheet_name("  Chad  "), "Chad");
        assert_eq!(sheet_name(""), "");
    }
}

use once_cell::sync::Lazy;
use regex::Regex;

/// Whole-cell placeholder: one `{{...}}` expression, nothing else but
/// surrounding whitespace.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\{\{(.*?)\}\}\s*$").expect("placeholder regex must compile"));

/// Conditional form `path=value`, split at the first `=`.
static CONDITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)=(.+?)$").expect("condition regex must compile"));

/// One discovered placeholder cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// 1-based row of the cell in the template sheet.
    pub row: u32,
    /// 1-based column of the cell in the template sheet.
    pub col: u32,
    /// Dotted path looked up in a record's value map.
    pub path: String,
    /// When set, the cell becomes a match flag instead of a value.
    pub condition: Option<String>,
}

/// Scan a template's used cells for placeholder bindings.
///
/// Only a cell whose entire text is a single `{{...}}` expression binds;
/// text with an embedded placeholder stays inert. Bindings come back in
/// the order the cells were supplied.
pub fn scan<'a, I>(cells: I) -> Vec<Binding>
where
    I: IntoIterator<Item = (u32, u32, &'a str)>,
{
    let mut bindings = Vec::new();
    for (row, col, text) in cells {
        let Some(found) = PLACEHOLDER.captures(text) else {
            continue;
        };
        let inner = &found[1];
        let (path, condition) = match CONDITION.captures(inner) {
            Some(split) => (split[1].to_owned(), Some(split[2].to_owned())),
            None => (inner.to_owned(), None),
        };
        bindings.push(Binding {
            row,
            col,
            path,
            condition,
        });
    }
    bindings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_one(text: &str) -> Option<Binding> {
        scan([(1, 1, text)]).into_iter().next()
    }

    #[test]
    fn whole_cell_placeholders_bind() {
        let binding = scan_one("  {{government.title}}  ").expect("binding");
        assert_eq!(binding.path, "government.title");
        assert_eq!(binding.condition, None);
        assert_eq!((binding.row, binding.col), (1, 1));
    }

    #[test]
    fn conditions_split_at_the_first_equals() {
        let binding = scan_one("{{status=active}}").expect("binding");
        assert_eq!(binding.path, "status");
        assert_eq!(binding.condition.as_deref(), Some("active"));

        let binding = scan_one("{{kind=a=b}}").expect("binding");
        assert_eq!(binding.path, "kind");
        assert_eq!(binding.condition.as_deref(), Some("a=b"));
    }

    #[test]
    fn one_sided_equals_stays_a_path() {
        let binding = scan_one("{{a=}}").expect("binding");
        assert_eq!(binding.path, "a=");
        assert_eq!(binding.condition, None);

        let binding = scan_one("{{=b}}").expect("binding");
        assert_eq!(binding.path, "=b");
        assert_eq!(binding.condition, None);
    }

    #[test]
    fn partial_matches_do_not_bind() {
        assert_eq!(scan_one("prefix {{x}}"), None);
        assert_eq!(scan_one("{{x}} suffix"), None);
        assert_eq!(scan_one("plain text"), None);
        assert_eq!(scan_one(""), None);
    }

    #[test]
    fn bindings_keep_cell_order() {
        let bindings = scan([
            (3, 2, "{{b}}"),
            (1, 5, "{{a}}"),
            (2, 1, "not a placeholder"),
        ]);
        let paths: Vec<_> = bindings.iter().map(|b| b.path.as_str()).collect();
        assert_eq!(paths, ["b", "a"]);
        assert_eq!(bindings[1].row, 1);
        assert_eq!(bindings[1].col, 5);
    }

    #[test]
    fn empty_expression_binds_an_empty_path() {
        let binding = scan_one("{{}}").expect("binding");
        assert_eq!(binding.path, "");
        assert_eq!(binding.condition, None);
    }
}

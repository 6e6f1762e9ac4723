//! Dotted-path helpers shared by the flattener and the normaliser.
//!
//! A path addresses one position inside a record tree: object keys and
//! array indices both contribute one segment, joined by `.` (for example
//! `nationalPlansData.domesticSources.sources.0.amount2014`).

/// Join a child segment onto a parent path.
pub fn join(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_owned()
    } else {
        let mut out = String::with_capacity(parent.len() + 1 + segment.len());
        out.push_str(parent);
        out.push('.');
        out.push_str(segment);
        out
    }
}

/// Split a dotted path into its segments.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('.')
}

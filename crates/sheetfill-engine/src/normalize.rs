use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use sheetfill_common::{Node, path};

use crate::diagnostics::{self, Warning};
use crate::error::NormalizeError;
use crate::terms::TermDirectory;

/// Year span covered by the funding-source accumulators.
pub const SOURCE_YEARS: RangeInclusive<i32> = 2014..=2020;

/// Collections re-keyed by each element's `year` field.
const YEAR_KEYED: &[(&str, &str)] = &[
    ("internationalResources.baselineData", "baselineFlows"),
    ("internationalResources.progressData", "progressFlows"),
    ("domesticExpendituresData", "expenditures"),
    ("fundingNeedsData", "annualEstimates"),
];

/// Collections re-keyed by each element's `identifier` field.
const IDENTIFIER_KEYED: &[(&str, &str)] = &[
    ("internationalResources.baselineData", "odaCategories"),
    ("internationalResources.baselineData", "odaoofActions"),
    ("internationalResources.baselineData", "otherActions"),
];

/// Collections wrapped with per-year totals.
const AGGREGATED: &[(&str, &str)] = &[
    ("nationalPlansData", "domesticSources"),
    ("nationalPlansData", "internationalSources"),
];

/// Snapshot of a term sub-tree, exposed to the flattener under
/// `<base_path>.<identifier>` so a template can address a term by its
/// identifier value instead of its position in a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct TermAlias {
    /// Path of the object the snapshot was taken from, in the reshaped tree.
    pub base_path: String,
    /// Identifier value, used as the synthetic child segment.
    pub identifier: String,
    /// Deep copy of the object as it looked right after title resolution.
    pub snapshot: Node,
}

/// A record ready for flattening.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub tree: Node,
    pub aliases: Vec<TermAlias>,
    pub warnings: Vec<Warning>,
}

/// Reshapes raw catalog records for template binding.
///
/// Three passes run over an owned record tree:
///
/// 1. the designated flow and estimate collections are re-keyed from
///    arrays into objects keyed by each element's `year` or `identifier`,
/// 2. the two funding-source collections are wrapped under a `sources`
///    object carrying one total per year in [`SOURCE_YEARS`],
/// 3. every object holding a string `identifier` gets its thesaurus
///    `title` and is snapshotted into the alias namespace.
///
/// Term snapshots are taken from the reshaped tree, so every alias
/// `base_path` is a valid flatten path of the final record.
pub struct Normalizer<'a> {
    terms: &'a TermDirectory,
}

impl<'a> Normalizer<'a> {
    pub fn new(terms: &'a TermDirectory) -> Self {
        Self { terms }
    }

    /// Normalize one record. Shape violations abort this record only;
    /// data-quality findings are collected on the result instead.
    ///
    /// Running the normalizer over its own output leaves the tree
    /// unchanged: re-keying and aggregation skip object-shaped
    /// collections and term resolution rewrites the same titles. Alias
    /// snapshots of objects holding nested term objects differ, though:
    /// a first run captures them before the nested titles exist.
    pub fn normalize(&self, record: Node) -> Result<NormalizedRecord, NormalizeError> {
        let mut tree = record;
        if !matches!(tree, Node::Object(_)) {
            return Err(NormalizeError::RootNotObject);
        }

        let mut warnings = Vec::new();

        for (parent, field) in YEAR_KEYED {
            rekey(&mut tree, parent, field, "year", &mut warnings)?;
        }
        for (parent, field) in IDENTIFIER_KEYED {
            rekey(&mut tree, parent, field, "identifier", &mut warnings)?;
        }
        for (parent, field) in AGGREGATED {
            aggregate(&mut tree, parent, field)?;
        }

        let mut aliases = Vec::new();
        resolve_terms(
            &mut tree,
            String::new(),
            self.terms,
            &mut aliases,
            &mut warnings,
        );

        Ok(NormalizedRecord {
            tree,
            aliases,
            warnings,
        })
    }
}

/// Walk `target` (dotted) down from the root, insisting on objects.
fn object_at<'t>(
    tree: &'t mut Node,
    target: &str,
) -> Result<&'t mut BTreeMap<String, Node>, NormalizeError> {
    let mut current = tree;
    let mut walked = String::new();
    for segment in path::segments(target) {
        match current {
            Node::Object(fields) => {
                walked = path::join(&walked, segment);
                match fields.get_mut(segment) {
                    Some(next) => current = next,
                    None => return Err(NormalizeError::MissingContainer { path: walked }),
                }
            }
            other => {
                return Err(NormalizeError::UnexpectedShape {
                    path: walked,
                    found: other.kind(),
                });
            }
        }
    }
    match current {
        Node::Object(fields) => Ok(fields),
        other => Err(NormalizeError::UnexpectedShape {
            path: walked,
            found: other.kind(),
        }),
    }
}

/// Replace the array at `parent`.`field` with an object keyed by each
/// element's `key` value.
///
/// A missing, null, or scalar collection becomes an empty object; an
/// object passes through untouched. Elements without a usable key value
/// are dropped with a warning, and a duplicated key keeps the later
/// element.
fn rekey(
    tree: &mut Node,
    parent: &str,
    field: &str,
    key: &'static str,
    warnings: &mut Vec<Warning>,
) -> Result<(), NormalizeError> {
    let container = object_at(tree, parent)?;
    let collection_path = path::join(parent, field);

    let collection = container
        .entry(field.to_owned())
        .or_insert_with(|| Node::Object(BTreeMap::new()));

    let items = match collection {
        Node::Array(items) => std::mem::take(items),
        Node::Object(_) => return Ok(()),
        _ => Vec::new(),
    };

    let mut keyed = BTreeMap::new();
    for (index, item) in items.into_iter().enumerate() {
        let slot = match &item {
            Node::Object(fields) => fields
                .get(key)
                .map(|value| value.to_scalar().to_string())
                .filter(|text| !text.is_empty()),
            _ => None,
        };
        match slot {
            Some(text) => {
                keyed.insert(text, item);
            }
            None => {
                let warning = Warning::MissingKeyField {
                    path: path::join(&collection_path, &index.to_string()),
                    key,
                };
                diagnostics::report(&warning);
                warnings.push(warning);
            }
        }
    }

    *collection = Node::Object(keyed);
    Ok(())
}

/// Wrap the array at `parent`.`field` under `{ sources, amount<year>... }`
/// with one summed total per year in [`SOURCE_YEARS`].
///
/// Elements that do not define a given year's amount simply do not
/// contribute to it; non-numeric amounts are skipped the same way. A
/// missing or null collection aggregates to all-zero totals over an empty
/// `sources` array, and an object passes through untouched.
fn aggregate(tree: &mut Node, parent: &str, field: &str) -> Result<(), NormalizeError> {
    let container = object_at(tree, parent)?;

    let sources = match container.remove(field) {
        Some(wrapper @ Node::Object(_)) => {
            container.insert(field.to_owned(), wrapper);
            return Ok(());
        }
        Some(Node::Null) | None => Node::Array(Vec::new()),
        Some(node) => node,
    };

    let mut totals: BTreeMap<i32, f64> = SOURCE_YEARS.map(|year| (year, 0.0)).collect();
    if let Node::Array(items) = &sources {
        for item in items {
            let Node::Object(fields) = item else { continue };
            for (year, total) in totals.iter_mut() {
                if let Some(amount) = numeric(fields.get(&format!("amount{year}"))) {
                    *total += amount;
                }
            }
        }
    }

    let mut wrapper = BTreeMap::new();
    wrapper.insert("sources".to_owned(), sources);
    for (year, total) in totals {
        wrapper.insert(format!("amount{year}"), Node::Number(total));
    }
    container.insert(field.to_owned(), Node::Object(wrapper));
    Ok(())
}

fn numeric(node: Option<&Node>) -> Option<f64> {
    match node? {
        Node::Int(i) => Some(*i as f64),
        Node::Number(n) => Some(*n),
        Node::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Pre-order walk setting `title` on every object with a string
/// `identifier` and snapshotting it into the alias namespace.
///
/// An outer object is snapshotted before its descendants are enriched, so
/// nested term objects inside a snapshot keep their raw form. Null
/// identifiers are skipped silently; any other non-string kind is a
/// warning.
fn resolve_terms(
    node: &mut Node,
    at: String,
    terms: &TermDirectory,
    aliases: &mut Vec<TermAlias>,
    warnings: &mut Vec<Warning>,
) {
    match node {
        Node::Object(fields) => {
            let identifier = match fields.get("identifier") {
                Some(Node::Text(id)) => Some(id.clone()),
                Some(Node::Null) | None => None,
                Some(other) => {
                    let warning = Warning::InvalidIdentifierType {
                        path: path::join(&at, "identifier"),
                        found: other.kind(),
                    };
                    diagnostics::report(&warning);
                    warnings.push(warning);
                    None
                }
            };

            if let Some(id) = identifier {
                if let Some(term) = terms.lookup(&id) {
                    fields.insert("title".to_owned(), Node::Text(term.title.clone()));
                }
                if !id.trim().is_empty() {
                    aliases.push(TermAlias {
                        base_path: at.clone(),
                        identifier: id,
                        snapshot: Node::Object(fields.clone()),
                    });
                }
            }

            for (key, child) in fields.iter_mut() {
                resolve_terms(child, path::join(&at, key), terms, aliases, warnings);
            }
        }
        Node::Array(items) => {
            for (index, item) in items.iter_mut().enumerate() {
                let child = path::join(&at, &index.to_string());
                resolve_terms(item, child, terms, aliases, warnings);
            }
        }
        _ => {}
    }
}

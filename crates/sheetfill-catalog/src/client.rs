use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header;
use serde::Deserialize;
use sheetfill_engine::{Term, TermDirectory};

use crate::countries::country_term;
use crate::error::CatalogError;

/// Production catalog endpoint.
pub const DEFAULT_BASE: &str = "https://api.cbd.int/api/v2013";

/// Thesaurus domains folded into the term directory, in load order. Later
/// domains win identifier collisions.
pub const TERM_DOMAINS: &[&str] = &[
    COUNTRY_DOMAIN,
    "ISO-4217",
    "AB782477-9942-4C6B-B9F0-79A82915A069",
    "1FBEF0A8-EE94-4E6B-8547-8EDFCB1E2301",
    "33D62DA5-D4A9-48A6-AAE0-3EEAA23D5EB0",
    "6BDB1F2A-FDD8-4922-BB40-D67C22236581",
    "A9AB3215-353C-4077-8E8C-AF1BF0A89645",
];

const COUNTRY_DOMAIN: &str = "countries";

const REPORT_QUERY: &str = "schema_s:resourceMobilisation AND _state_s:public AND realm_ss:chm";
const REPORT_FIELDS: &str = "identifier_s,government_s";
const REPORT_ROWS: &str = "2000";

/// One row of the report index: enough to fetch the document and name its
/// sheet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportHandle {
    #[serde(rename = "identifier_s")]
    pub identifier: String,
    #[serde(rename = "government_s", default)]
    pub government: String,
}

#[derive(Debug, Deserialize)]
struct IndexResponse {
    response: IndexBody,
}

#[derive(Debug, Deserialize)]
struct IndexBody {
    #[serde(default)]
    docs: Vec<ReportHandle>,
}

/// Thesaurus row. The API spells the display title `name`; local fixtures
/// may spell it `title`.
#[derive(Debug, Deserialize)]
struct TermRow {
    identifier: String,
    #[serde(alias = "title")]
    name: Option<String>,
}

impl From<TermRow> for Term {
    fn from(row: TermRow) -> Self {
        Term {
            identifier: row.identifier,
            title: row.name.unwrap_or_default(),
        }
    }
}

/// Blocking client for the report index, document store, and thesaurus.
pub struct CatalogClient {
    base: String,
    http: Client,
}

impl CatalogClient {
    pub fn new() -> Result<Self, CatalogError> {
        Self::with_base(DEFAULT_BASE)
    }

    pub fn with_base(base: &str) -> Result<Self, CatalogError> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            base: base.trim_end_matches('/').to_owned(),
            http,
        })
    }

    /// List every public resource-mobilisation report in the index.
    pub fn list_reports(&self) -> Result<Vec<ReportHandle>, CatalogError> {
        let url = format!("{}/index", self.base);
        let text = self.get_text(
            &url,
            &[
                ("q", REPORT_QUERY),
                ("fl", REPORT_FIELDS),
                ("rows", REPORT_ROWS),
            ],
        )?;
        let listing: IndexResponse = serde_json::from_str(&text)?;
        Ok(listing.response.docs)
    }

    /// Fetch one report document as raw JSON.
    pub fn fetch_document(&self, identifier: &str) -> Result<serde_json::Value, CatalogError> {
        let url = format!("{}/documents/{}", self.base, identifier);
        let text = self.get_text(&url, &[])?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Fetch the terms of one thesaurus domain.
    pub fn fetch_domain_terms(&self, domain: &str) -> Result<Vec<Term>, CatalogError> {
        let url = format!("{}/thesaurus/domains/{}/terms", self.base, domain);
        let text = self.get_text(&url, &[])?;
        let rows: Vec<TermRow> = serde_json::from_str(&text)?;
        Ok(rows.into_iter().map(Term::from).collect())
    }

    /// Load all reference domains into one directory.
    pub fn load_term_directory(&self) -> Result<TermDirectory, CatalogError> {
        let mut directory = TermDirectory::new();
        for domain in TERM_DOMAINS {
            #[cfg(feature = "tracing")]
            tracing::debug!(domain, "loading thesaurus domain");
            fold_domain(&mut directory, domain, self.fetch_domain_terms(domain)?);
        }
        Ok(directory)
    }

    fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, CatalogError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .header(header::ACCEPT, "application/json")
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                url: url.to_owned(),
                status,
            });
        }
        Ok(response.text()?)
    }
}

/// Build a term directory from a local fixture: a JSON object keyed by
/// domain, each value an array of `{ identifier, name }` rows. Domains
/// outside [`TERM_DOMAINS`] are ignored, and load order matches the remote
/// path.
pub fn term_directory_from_slice(data: &[u8]) -> Result<TermDirectory, CatalogError> {
    let mut fixture: BTreeMap<String, Vec<TermRow>> = serde_json::from_slice(data)?;
    let mut directory = TermDirectory::new();
    for domain in TERM_DOMAINS {
        let Some(rows) = fixture.remove(*domain) else {
            continue;
        };
        fold_domain(&mut directory, domain, rows.into_iter().map(Term::from));
    }
    Ok(directory)
}

/// Country titles come from the built-in table rather than the thesaurus
/// payload; every other domain keeps its payload titles.
fn fold_domain(directory: &mut TermDirectory, domain: &str, terms: impl IntoIterator<Item = Term>) {
    for term in terms {
        let term = if domain == COUNTRY_DOMAIN {
            country_term(&term.identifier)
        } else {
            term
        };
        directory.insert(term);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_rows_deserialize_with_solr_field_names() {
        let raw = r#"{
            "responseHeader": { "status": 0 },
            "response": {
                "numFound": 2,
                "docs": [
                    { "identifier_s": "8A0E7282-54D1-4D48-BA72-8A4EF3D2A6E9", "government_s": "ca" },
                    { "identifier_s": "0E4B2C70-2E93-4B63-B522-C2A157F9768F" }
                ]
            }
        }"#;

        let listing: IndexResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(listing.response.docs.len(), 2);
        assert_eq!(listing.response.docs[0].government, "ca");
        assert_eq!(listing.response.docs[1].government, "");
    }

    #[test]
    fn term_rows_accept_both_title_spellings() {
        let rows: Vec<TermRow> =
            serde_json::from_str(r#"[{ "identifier": "EUR", "name": "Euro" },
                                     { "identifier": "CHF", "title": "Swiss Franc" },
                                     { "identifier": "XXX" }]"#)
                .unwrap();

        let terms: Vec<Term> = rows.into_iter().map(Term::from).collect();
        assert_eq!(terms[0].title, "Euro");
        assert_eq!(terms[1].title, "Swiss Franc");
        assert_eq!(terms[2].title, "");
    }

    #[test]
    fn fixture_countries_resolve_against_the_built_in_table() {
        let raw = br#"{
            "countries": [
                { "identifier": "ca", "name": "CANADA (index spelling)" },
                { "identifier": "xx", "name": "Atlantis" }
            ],
            "ISO-4217": [ { "identifier": "EUR", "name": "Euro" } ],
            "unrelated-domain": [ { "identifier": "zz", "name": "Ignored" } ]
        }"#;

        let directory = term_directory_from_slice(raw).unwrap();
        assert_eq!(directory.lookup("ca").unwrap().title, "Canada");
        assert_eq!(directory.lookup("xx").unwrap().title, "");
        assert_eq!(directory.lookup("EUR").unwrap().title, "Euro");
        assert!(directory.lookup("zz").is_none());
    }

    #[test]
    fn later_domains_win_identifier_collisions() {
        let raw = br#"{
            "ISO-4217": [ { "identifier": "SHARED", "name": "currency" } ],
            "AB782477-9942-4C6B-B9F0-79A82915A069": [ { "identifier": "SHARED", "name": "category" } ]
        }"#;

        let directory = term_directory_from_slice(raw).unwrap();
        assert_eq!(directory.lookup("SHARED").unwrap().title, "category");
    }
}

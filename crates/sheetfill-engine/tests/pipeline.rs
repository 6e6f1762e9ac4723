use sheetfill_common::{DateDetection, Node, Scalar};
use sheetfill_engine::{Normalizer, Term, TermDirectory, flatten, resolve, scan, sheet_name};

fn directory() -> TermDirectory {
    [
        Term {
            identifier: "ca".to_owned(),
            title: "Canada".to_owned(),
        },
        Term {
            identifier: "oda".to_owned(),
            title: "Official Development Assistance".to_owned(),
        },
        Term {
            identifier: "EUR".to_owned(),
            title: "Euro".to_owned(),
        },
    ]
    .into_iter()
    .collect()
}

fn sample_record() -> Node {
    let raw = serde_json::json!({
        "government": { "identifier": "ca" },
        "currency": { "identifier": "EUR" },
        "updatedOn": "2015-06-01",
        "internationalResources": {
            "baselineData": {
                "baselineFlows": [
                    { "year": 2014, "amount": 120.5 },
                    { "year": 2015, "amount": 80 }
                ],
                "odaCategories": [
                    { "identifier": "oda", "share": 0.4 }
                ],
                "odaoofActions": [],
                "otherActions": null
            },
            "progressData": { "progressFlows": [] }
        },
        "domesticExpendituresData": { "expenditures": [] },
        "fundingNeedsData": {
            "annualEstimates": [
                { "year": 2016, "amount": 300 }
            ]
        },
        "nationalPlansData": {
            "hasNationalPlan": true,
            "domesticSources": [
                { "name": "treasury", "amount2014": 10, "amount2015": 1.5 },
                { "name": "levy", "amount2014": 5 }
            ],
            "internationalSources": null
        }
    });
    Node::from_json(raw, DateDetection::Iso8601).expect("ingest")
}

/// Cell texts of a small template sheet, row by row.
fn template_cells() -> Vec<(u32, u32, &'static str)> {
    vec![
        (1, 1, "Government"),
        (1, 2, "{{government.title}}"),
        (2, 1, "Currency"),
        (2, 2, "  {{currency.EUR.title}}  "),
        (3, 1, "Baseline 2014"),
        (3, 2, "{{internationalResources.baselineData.baselineFlows.2014.amount}}"),
        (4, 1, "ODA share"),
        (4, 2, "{{internationalResources.baselineData.odaCategories.oda.share}}"),
        (5, 1, "Domestic 2014 total"),
        (5, 2, "{{nationalPlansData.domesticSources.amount2014}}"),
        (6, 1, "Has plan?"),
        (6, 2, "{{nationalPlansData.hasNationalPlan=1}}"),
        (7, 1, "Needs 2016"),
        (7, 2, "{{fundingNeedsData.annualEstimates.2016.amount}}"),
        (8, 1, "Missing datum"),
        (8, 2, "{{no.such.path}}"),
        (9, 1, "note: {{not.a.binding}} inline"),
    ]
}

#[test]
fn record_fills_a_template_end_to_end() {
    let terms = directory();
    let normalized = Normalizer::new(&terms)
        .normalize(sample_record())
        .expect("normalize");
    assert!(normalized.warnings.is_empty());

    let values = flatten(&normalized);
    let bindings = scan(template_cells());
    assert_eq!(bindings.len(), 8);

    let mut filled = Vec::new();
    for binding in &bindings {
        filled.push((binding.row, binding.col, resolve(binding, &values)));
    }

    assert_eq!(
        filled,
        vec![
            (1, 2, Scalar::Text("Canada".to_owned())),
            (2, 2, Scalar::Text("Euro".to_owned())),
            (3, 2, Scalar::Number(120.5)),
            (4, 2, Scalar::Number(0.4)),
            (5, 2, Scalar::Number(15.0)),
            (6, 2, Scalar::Int(1)),
            (7, 2, Scalar::Int(300)),
            (8, 2, Scalar::Empty),
        ]
    );
}

#[test]
fn government_title_drives_the_sheet_name() {
    let terms = directory();
    let normalized = Normalizer::new(&terms)
        .normalize(sample_record())
        .expect("normalize");
    let values = flatten(&normalized);

    let title = match values.get("government.title") {
        Some(Scalar::Text(title)) => title.clone(),
        other => panic!("unexpected title value: {other:?}"),
    };
    assert_eq!(sheet_name(&title), "Canada");
}

#[test]
fn ingested_dates_survive_to_cells() {
    let terms = directory();
    let normalized = Normalizer::new(&terms)
        .normalize(sample_record())
        .expect("normalize");
    let values = flatten(&normalized);

    let expected = chrono::NaiveDate::from_ymd_opt(2015, 6, 1).expect("date");
    assert_eq!(values.get("updatedOn"), Some(&Scalar::Date(expected)));
}

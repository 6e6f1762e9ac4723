use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use sheetfill::catalog::{CatalogClient, DEFAULT_BASE, term_directory_from_slice};
use sheetfill::{
    DateDetection, GridRead, GridWrite, MemoryGrid, Node, Normalizer, Scalar, TermDirectory,
    ValueMap, flatten, resolve, scan, sheet_name,
};
use tracing::{error, info, warn};

/// Generated sheet names are listed in this column of the menu sheet,
/// starting at this row.
const MENU_COL: u32 = 2;
const MENU_FIRST_ROW: u32 = 3;

#[derive(Parser)]
#[command(
    about = "Fill a spreadsheet template with one sheet per published resource-mobilisation report."
)]
struct Args {
    /// Template grid in the JSON grid format.
    #[arg(long)]
    template: PathBuf,

    /// Output path; defaults to `out-<timestamp>.json` next to the template.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Directory of local report documents, one `<government>.json` per
    /// report, used instead of the remote index.
    #[arg(long)]
    records: Option<PathBuf>,

    /// Local thesaurus fixture (JSON object keyed by domain) used instead of
    /// the remote thesaurus.
    #[arg(long)]
    terms: Option<PathBuf>,

    /// Catalog endpoint for the report index, documents, and thesaurus.
    #[arg(long, default_value = DEFAULT_BASE)]
    api_base: String,

    /// Sheet holding the placeholder layout.
    #[arg(long, default_value = "{{template}}")]
    template_sheet: String,

    /// Sheet listing the generated report sheets in its second column.
    #[arg(long, default_value = "MENU")]
    menu_sheet: String,
}

struct Report {
    name: String,
    government: String,
    body: ReportBody,
}

enum ReportBody {
    Remote { identifier: String },
    File(PathBuf),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sheetfill=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    run(&Args::parse())
}

fn run(args: &Args) -> Result<()> {
    let mut grid = MemoryGrid::open_path(&args.template)
        .with_context(|| format!("could not open {}", args.template.display()))?;
    if !grid.has_sheet(&args.template_sheet) {
        bail!("template sheet `{}` not found", args.template_sheet);
    }

    let layout = grid.used_range(&args.template_sheet)?;
    let bindings = scan(layout.iter().map(|(&(row, col), text)| (row, col, text.as_str())));
    info!(bindings = bindings.len(), "template scanned");

    let menu = if grid.has_sheet(&args.menu_sheet) {
        Some(grid.used_range(&args.menu_sheet)?)
    } else {
        warn!(sheet = %args.menu_sheet, "menu sheet not found; menu skipped");
        None
    };
    let mut menu_row = MENU_FIRST_ROW;

    let client = CatalogClient::with_base(&args.api_base)?;
    let directory = match &args.terms {
        Some(path) => {
            let data = fs::read(path)
                .with_context(|| format!("could not read {}", path.display()))?;
            term_directory_from_slice(&data)?
        }
        None => client.load_term_directory()?,
    };
    info!(terms = directory.len(), "term directory loaded");

    let mut reports = match &args.records {
        Some(dir) => local_reports(dir, &directory)?,
        None => remote_reports(&client, &directory)?,
    };
    reports.sort_by_key(|report| report.name.to_lowercase());
    info!(reports = reports.len(), "reports listed");

    let normalizer = Normalizer::new(&directory);
    for report in &reports {
        if grid.has_sheet(&report.name) {
            info!(sheet = %report.name, "sheet already exists; skipped");
            continue;
        }

        let values = match report_values(&client, &normalizer, report) {
            Ok(values) => values,
            Err(error) => {
                error!(sheet = %report.name, error = %error, "report skipped");
                continue;
            }
        };

        grid.copy_sheet(&args.template_sheet, &report.name)?;
        if let Some(cells) = &menu {
            menu_row = next_menu_row(cells, menu_row);
            let label = Scalar::Text(report.name.clone());
            grid.write_cell(&args.menu_sheet, menu_row, MENU_COL, label)?;
            menu_row += 1;
        }
        for binding in &bindings {
            grid.write_cell(&report.name, binding.row, binding.col, resolve(binding, &values))?;
        }
        info!(sheet = %report.name, cells = bindings.len(), "sheet filled");
    }

    let out = args
        .out
        .clone()
        .unwrap_or_else(|| timestamped_out(&args.template));
    grid.save_path(&out)
        .with_context(|| format!("could not write {}", out.display()))?;
    info!(path = %out.display(), "grid saved");
    Ok(())
}

fn remote_reports(client: &CatalogClient, directory: &TermDirectory) -> Result<Vec<Report>> {
    let handles = client.list_reports()?;
    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        let Some(name) = report_name(directory, &handle.government) else {
            warn!(identifier = %handle.identifier, "report has no usable name; skipped");
            continue;
        };
        reports.push(Report {
            name,
            government: handle.government,
            body: ReportBody::Remote {
                identifier: handle.identifier,
            },
        });
    }
    Ok(reports)
}

fn local_reports(dir: &Path, directory: &TermDirectory) -> Result<Vec<Report>> {
    let mut reports = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("could not read {}", dir.display()))?
    {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let Some(government) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let government = government.to_owned();
        let Some(name) = report_name(directory, &government) else {
            warn!(path = %path.display(), "record has no usable name; skipped");
            continue;
        };
        reports.push(Report {
            name,
            government,
            body: ReportBody::File(path),
        });
    }
    Ok(reports)
}

/// Sheet name for a report: the government's display title, or the raw code
/// when the directory has no usable title.
fn report_name(directory: &TermDirectory, government: &str) -> Option<String> {
    let title = directory
        .lookup(government)
        .map(|term| term.title.as_str())
        .unwrap_or("");
    let name = sheet_name(title);
    if !name.is_empty() {
        return Some(name);
    }
    let code = sheet_name(government);
    if code.is_empty() {
        None
    } else {
        warn!(government, "no display title; using the code as sheet name");
        Some(code)
    }
}

fn report_values(
    client: &CatalogClient,
    normalizer: &Normalizer<'_>,
    report: &Report,
) -> Result<ValueMap> {
    let raw = match &report.body {
        ReportBody::Remote { identifier } => {
            info!(government = %report.government, "fetching report");
            client.fetch_document(identifier)?
        }
        ReportBody::File(path) => {
            let data = fs::read(path)
                .with_context(|| format!("could not read {}", path.display()))?;
            serde_json::from_slice(&data)?
        }
    };
    let record = Node::from_json(raw, DateDetection::Iso8601)?;
    let normalized = normalizer.normalize(record)?;
    for warning in &normalized.warnings {
        warn!(report = %report.name, %warning, "normalization warning");
    }
    Ok(flatten(&normalized))
}

/// First row at or after `from` whose menu column held no text when the menu
/// was read.
fn next_menu_row(cells: &BTreeMap<(u32, u32), String>, from: u32) -> u32 {
    let mut row = from;
    while cells
        .get(&(row, MENU_COL))
        .is_some_and(|text| !text.trim().is_empty())
    {
        row += 1;
    }
    row
}

fn timestamped_out(template: &Path) -> PathBuf {
    let stamp = chrono::Local::now().format("out-%Y-%m-%d-%H-%M-%S.json");
    template.with_file_name(stamp.to_string())
}

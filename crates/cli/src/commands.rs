use std::fs;
use std::io::Write;
use std::str::FromStr;

use anyhow::{Context, bail};
use chrono::Local;
use serde::Serialize;

use backoffice_infra::{
    Dataset, DocumentRepository, InMemoryStore, PartyRepository, ProjectRepository,
};
use backoffice_parties::{Party, PartyId, TaxId};
use backoffice_reporting::{
    CsvRenderer, DateRange, DocumentQuery, PeriodFilter, ReportContext, ReportRenderer,
    attachment_file_name, dashboard, debt_report, party_ledger, party_statement,
    project_overview, project_summary, summarize_strict,
};

use crate::args::{Cli, Command};
use crate::settings;

/// Execute one command against the dataset named in `cli`, writing the result
/// to `out`.
pub fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let config = settings::load(cli.config.as_deref())?;
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let ctx = ReportContext::new(today).with_config(config);

    let store = Dataset::from_path(&cli.data)
        .with_context(|| format!("loading dataset {}", cli.data.display()))?
        .into_store()?;

    execute(&cli.command, &store, &ctx, cli.compact, out)
}

pub fn execute(
    command: &Command,
    store: &InMemoryStore,
    ctx: &ReportContext,
    compact: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Dashboard { year, months } => {
            let period = PeriodFilter::from_query(
                year.as_deref(),
                months.iter().map(String::as_str),
                ctx.today,
            );
            tracing::info!(year = period.year, months = ?period.months, "building dashboard");
            let documents = store.documents(&DocumentQuery::all().in_period(period.clone()))?;
            let parties = store.parties()?;
            print_json(out, &dashboard(&documents, &parties, &period, ctx), compact)
        }
        Command::Statement { party, from, to } => {
            let party = find_party(store, party)?;
            let range = DateRange::from_query(from.as_deref(), to.as_deref());
            tracing::info!(party = party.name(), "building statement");
            let documents = store.documents(&DocumentQuery::for_party(party.id_typed()))?;
            print_json(out, &party_statement(&party, &documents, range, ctx), compact)
        }
        Command::Ledger => {
            let parties = store.parties()?;
            let documents = store.documents(&DocumentQuery::all())?;
            tracing::info!(parties = parties.len(), "building party ledger");
            print_json(out, &party_ledger(&parties, &documents, ctx), compact)
        }
        Command::Export {
            party,
            out_dir,
            delimiter,
            stdout,
        } => {
            let party = find_party(store, party)?;
            if !delimiter.is_ascii() {
                bail!("delimiter must be a single ASCII character, got {delimiter:?}");
            }
            let renderer = CsvRenderer::with_delimiter(*delimiter as u8);

            let documents = store.documents(&DocumentQuery::for_party(party.id_typed()))?;
            let report = debt_report(&party, &documents, ctx);
            let bytes = renderer.render(&report)?;

            if *stdout {
                out.write_all(&bytes)?;
                return Ok(());
            }

            let path = out_dir.join(attachment_file_name(party.name(), &renderer));
            fs::write(&path, &bytes).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(
                path = %path.display(),
                rows = report.rows.len(),
                content_type = renderer.content_type(),
                "debt report written"
            );
            writeln!(out, "{}", path.display())?;
            Ok(())
        }
        Command::Projects { code } => {
            let documents = store.documents(&DocumentQuery::all())?;
            match code {
                Some(code) => {
                    let project = store
                        .project_by_code(code)?
                        .with_context(|| format!("no project with code {code:?}"))?;
                    print_json(out, &project_summary(&project, &documents, ctx), compact)
                }
                None => {
                    let projects = store.projects()?;
                    print_json(out, &project_overview(&projects, &documents, ctx), compact)
                }
            }
        }
        Command::Check => {
            let documents = store.documents(&DocumentQuery::all())?;
            let problems: Vec<String> = documents
                .iter()
                .filter_map(|d| summarize_strict(d, ctx).err())
                .map(|e| e.to_string())
                .collect();

            for problem in &problems {
                writeln!(out, "{problem}")?;
            }
            if !problems.is_empty() {
                bail!("{} document(s) have unpriced lines", problems.len());
            }
            tracing::info!(documents = documents.len(), "all document lines are priced");
            Ok(())
        }
    }
}

/// Look a party up by tax id first, then by identifier.
fn find_party(store: &InMemoryStore, key: &str) -> anyhow::Result<Party> {
    if let Ok(tax_id) = TaxId::parse(key) {
        if let Some(party) = store.party_by_tax_id(&tax_id)? {
            return Ok(party);
        }
    }

    let id = PartyId::from_str(key.trim())
        .map_err(|_| anyhow::anyhow!("no party with tax id or identifier {key:?}"))?;
    Ok(store.require_party(id)?)
}

fn print_json(out: &mut impl Write, value: &impl Serialize, compact: bool) -> anyhow::Result<()> {
    if compact {
        serde_json::to_writer(&mut *out, value)?;
    } else {
        serde_json::to_writer_pretty(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

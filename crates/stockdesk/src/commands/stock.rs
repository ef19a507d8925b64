//! Certificate stock command handlers: batches, summary, migrations.

use tabled::Tabled;

use stockdesk_core::api::{CertificateBatch, StockMigration, StockSummary};
use stockdesk_core::forms::stock as form;
use stockdesk_core::{Console, FormState, format};

use crate::cli::{BatchFields, GlobalOpts, MigrationFields, StockArgs, StockCommand};
use crate::error::CliError;
use crate::output::{self, Palette};

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct BatchRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Branch")]
    branch: String,
    #[tabled(rename = "Batch")]
    batch: String,
    #[tabled(rename = "Certificates")]
    certificates: String,
    #[tabled(rename = "Medals")]
    medals: String,
    #[tabled(rename = "Received")]
    received: String,
}

impl From<&CertificateBatch> for BatchRow {
    fn from(b: &CertificateBatch) -> Self {
        Self {
            id: b.id.to_string(),
            branch: b.branch_code.clone(),
            batch: format::or_dash(b.batch_number.as_deref()),
            certificates: format::count(b.certificate_quantity),
            medals: format::count(b.medal_quantity),
            received: format::date(b.created_at),
        }
    }
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Branch")]
    branch: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Hub")]
    hub: String,
    #[tabled(rename = "Certificates")]
    certificates: String,
    #[tabled(rename = "Medals")]
    medals: String,
}

impl SummaryRow {
    fn new(s: &StockSummary, palette: Palette) -> Self {
        Self {
            branch: s.branch_code.clone(),
            name: format::or_dash(s.branch_name.as_deref()),
            hub: format::or_dash(s.regional_hub.as_deref()),
            certificates: palette.count(s.certificates),
            medals: palette.count(s.medals),
        }
    }
}

#[derive(Tabled)]
struct MigrationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Certificates")]
    certificates: String,
    #[tabled(rename = "Medals")]
    medals: String,
    #[tabled(rename = "Date")]
    date: String,
}

impl From<&StockMigration> for MigrationRow {
    fn from(m: &StockMigration) -> Self {
        Self {
            id: m.id.to_string(),
            from: m.from_branch.clone(),
            to: m.to_branch.clone(),
            certificates: format::count(m.certificate_quantity),
            medals: format::count(m.medal_quantity),
            date: format::date(m.created_at),
        }
    }
}

fn batch_detail(b: &CertificateBatch) -> String {
    output::detail_lines(&[
        ("ID", b.id.to_string()),
        ("Branch", b.branch_code.clone()),
        ("Batch", format::or_dash(b.batch_number.as_deref())),
        ("Certificates", format::count(b.certificate_quantity)),
        ("Medals", format::count(b.medal_quantity)),
        ("Notes", format::or_dash(b.notes.as_deref())),
        ("Received", format::datetime(b.created_at)),
    ])
}

fn migration_detail(m: &StockMigration) -> String {
    output::detail_lines(&[
        ("ID", m.id.to_string()),
        ("From", m.from_branch.clone()),
        ("To", m.to_branch.clone()),
        ("Certificates", format::count(m.certificate_quantity)),
        ("Medals", format::count(m.medal_quantity)),
        ("Notes", format::or_dash(m.notes.as_deref())),
        ("Date", format::datetime(m.created_at)),
    ])
}

// ── Forms ───────────────────────────────────────────────────────────

fn quantities(form: &mut FormState, certificates: Option<i64>, medals: Option<i64>) {
    form.handle_change("certificate_quantity", certificates);
    form.handle_change("medal_quantity", medals);
}

fn batch_form(fields: BatchFields) -> FormState {
    let mut form = form::batch_form();
    form.handle_change("branch_code", fields.branch);
    quantities(&mut form, fields.certificates, fields.medals);
    if let Some(notes) = fields.notes {
        form.handle_change("notes", notes);
    }
    form
}

fn migration_form(fields: MigrationFields) -> FormState {
    let mut form = form::migration_form();
    form.handle_change("from_branch", fields.from);
    form.handle_change("to_branch", fields.to);
    quantities(&mut form, fields.certificates, fields.medals);
    if let Some(notes) = fields.notes {
        form.handle_change("notes", notes);
    }
    form
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: StockArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let palette = util::palette(console, global);

    match args.command {
        StockCommand::Batches(list) => {
            util::list(
                console,
                &list,
                global,
                console.api().list_batches(),
                |b| BatchRow::from(b),
                |b| b.id.to_string(),
            )
            .await
        }

        StockCommand::Add(fields) => {
            let batch = util::submit_form(batch_form(fields), |values| async move {
                let request = form::batch_request(&values);
                Ok::<_, CliError>(console.call(console.api().add_batch(&request)).await?)
            })
            .await?;
            output::print_status(
                &format!(
                    "Added {} certificates and {} medals to {}",
                    format::count(batch.certificate_quantity),
                    format::count(batch.medal_quantity),
                    batch.branch_code
                ),
                global.quiet,
            );
            let out =
                output::render_single(global.output, &batch, batch_detail, |b| b.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        StockCommand::Summary(list) => {
            util::list(
                console,
                &list,
                global,
                console.api().stock_summary(),
                |s| SummaryRow::new(s, palette),
                |s| s.branch_code.clone(),
            )
            .await
        }

        StockCommand::Migrate(fields) => {
            let yes = global.yes;
            let migrated = util::submit_form(migration_form(fields), |values| async move {
                let request = form::migration_request(&values);
                if !util::confirm(
                    &format!(
                        "Move {} certificates and {} medals from {} to {}?",
                        format::count(request.certificate_quantity),
                        format::count(request.medal_quantity),
                        request.from_branch,
                        request.to_branch
                    ),
                    "migrate stock",
                    yes,
                )? {
                    return Ok(None);
                }
                Ok::<_, CliError>(Some(
                    console.call(console.api().migrate_stock(&request)).await?,
                ))
            })
            .await?;
            let Some(migration) = migrated else {
                return Ok(());
            };
            output::print_status(
                &format!(
                    "Stock moved from {} to {}",
                    migration.from_branch, migration.to_branch
                ),
                global.quiet,
            );
            let out = output::render_single(global.output, &migration, migration_detail, |m| {
                m.id.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        StockCommand::Migrations(list) => {
            util::list(
                console,
                &list,
                global,
                console.api().list_migrations(),
                |m| MigrationRow::from(m),
                |m| m.id.to_string(),
            )
            .await
        }
    }
}

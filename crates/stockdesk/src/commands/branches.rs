//! Branch command handlers.

use tabled::Tabled;

use stockdesk_core::api::{Branch, BranchOption};
use stockdesk_core::forms::branch as form;
use stockdesk_core::{Console, FormState, format};

use crate::cli::{BranchFields, BranchesArgs, BranchesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, Palette};

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub(super) struct BranchRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Head")]
    head: String,
    #[tabled(rename = "Hub")]
    hub: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl BranchRow {
    pub(super) fn new(b: &Branch, palette: Palette) -> Self {
        Self {
            id: b.id.to_string(),
            code: b.code.clone(),
            name: b.name.clone(),
            head: format::yes_no(b.is_head_branch).into(),
            hub: format::or_dash(b.regional_hub.as_deref()),
            status: palette.active(b.is_active),
        }
    }
}

#[derive(Tabled)]
struct OptionRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Head")]
    head: &'static str,
}

impl From<&BranchOption> for OptionRow {
    fn from(o: &BranchOption) -> Self {
        Self {
            code: o.code.clone(),
            name: o.name.clone(),
            head: format::yes_no(o.is_head_branch),
        }
    }
}

fn detail(b: &Branch) -> String {
    output::detail_lines(&[
        ("ID", b.id.to_string()),
        ("Code", b.code.clone()),
        ("Name", b.name.clone()),
        ("Head branch", format::yes_no(b.is_head_branch).into()),
        ("Regional hub", format::or_dash(b.regional_hub.as_deref())),
        ("Address", format::or_dash(b.address.as_deref())),
        ("Phone", format::or_dash(b.phone.as_deref())),
        ("Status", format::active_label(b.is_active).into()),
        ("Created", format::datetime(b.created_at)),
        ("Updated", format::datetime(b.updated_at)),
    ])
}

/// Overlay the flags that were given onto a (blank or prefilled) form.
fn apply_fields(form: &mut FormState, fields: BranchFields) {
    if let Some(code) = fields.code {
        form.handle_change("branch_code", code);
    }
    if let Some(name) = fields.name {
        form.handle_change("branch_name", name);
    }
    if let Some(head) = fields.head {
        form.handle_change("is_head_branch", head);
    }
    if let Some(hub) = fields.hub {
        form.handle_change("regional_hub", hub);
    }
    if let Some(address) = fields.address {
        form.handle_change("address", address);
    }
    if let Some(phone) = fields.phone {
        form.handle_change("phone", phone);
    }
}

fn not_found(id: &str) -> impl FnOnce(CliError) -> CliError + '_ {
    move |e| e.for_resource("Branch", id, "branches list")
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    console: &Console,
    args: BranchesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let palette = util::palette(console, global);

    match args.command {
        BranchesCommand::List(list) => {
            util::list(
                console,
                &list,
                global,
                console.api().list_branches(),
                |b| BranchRow::new(b, palette),
                |b| b.code.clone(),
            )
            .await
        }

        BranchesCommand::Get { id } => {
            let branch = console
                .call(console.api().get_branch(&util::entity_id(&id)))
                .await
                .map_err(CliError::from)
                .map_err(not_found(&id))?;
            let out = output::render_single(global.output, &branch, detail, |b| b.code.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BranchesCommand::Create(fields) => {
            let mut form = form::create();
            apply_fields(&mut form, fields);
            let branch = util::submit_form(form, |values| async move {
                let request = form::to_request(&values)?;
                Ok::<_, CliError>(console.call(console.api().create_branch(&request)).await?)
            })
            .await?;
            output::print_status(&format!("Branch {} created", branch.code), global.quiet);
            let out = output::render_single(global.output, &branch, detail, |b| b.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BranchesCommand::Update { id, fields } => {
            let entity = util::entity_id(&id);
            let current = console
                .call(console.api().get_branch(&entity))
                .await
                .map_err(CliError::from)
                .map_err(not_found(&id))?;
            let mut form = form::edit(&current);
            apply_fields(&mut form, fields);
            let branch = util::submit_form(form, |values| async move {
                let request = form::to_request(&values)?;
                Ok::<_, CliError>(
                    console
                        .call(console.api().update_branch(&entity, &request))
                        .await?,
                )
            })
            .await?;
            output::print_status(&format!("Branch {} updated", branch.code), global.quiet);
            let out = output::render_single(global.output, &branch, detail, |b| b.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BranchesCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete branch {id}? Its stock history stays on the server."),
                "delete a branch",
                global.yes,
            )? {
                return Ok(());
            }
            console
                .call(console.api().delete_branch(&util::entity_id(&id)))
                .await
                .map_err(CliError::from)
                .map_err(not_found(&id))?;
            output::print_status(&format!("Branch {id} deleted"), global.quiet);
            Ok(())
        }

        BranchesCommand::Toggle { id } => {
            let branch = console
                .call(console.api().toggle_branch_active(&util::entity_id(&id)))
                .await
                .map_err(CliError::from)
                .map_err(not_found(&id))?;
            output::print_status(
                &format!(
                    "Branch {} is now {}",
                    branch.code,
                    format::active_label(branch.is_active)
                ),
                global.quiet,
            );
            Ok(())
        }

        BranchesCommand::Options => {
            util::with_spinner(
                "Loading branch options",
                global,
                console.refresh_branch_options(),
            )
            .await?;
            let options = console.context().dropdowns().branches();
            let out = output::render_list(
                global.output,
                options.as_slice(),
                |o| OptionRow::from(o),
                |o| o.code.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

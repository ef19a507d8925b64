//! Learning module command handlers.

use tabled::Tabled;

use stockdesk_core::api::LearningModule;
use stockdesk_core::forms::module as form;
use stockdesk_core::{Console, FormState, format};

use crate::cli::{GlobalOpts, ModuleFields, ModulesArgs, ModulesCommand};
use crate::error::CliError;
use crate::output::{self, Palette};

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(super) struct ModuleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Division")]
    division: String,
    #[tabled(rename = "Ages")]
    ages: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl ModuleRow {
    pub(super) fn new(m: &LearningModule, palette: Palette) -> Self {
        Self {
            id: m.id.to_string(),
            code: m.code.clone(),
            name: format::truncate(&m.name, 40),
            division: format::or_dash(m.division.as_deref()),
            ages: age_range(m),
            status: palette.active(m.is_active),
        }
    }
}

fn age_range(m: &LearningModule) -> String {
    match (m.min_age, m.max_age) {
        (Some(min), Some(max)) => format!("{min}–{max}"),
        (Some(min), None) => format!("{min}+"),
        (None, Some(max)) => format!("≤{max}"),
        (None, None) => "-".into(),
    }
}

fn detail(m: &LearningModule) -> String {
    output::detail_lines(&[
        ("ID", m.id.to_string()),
        ("Code", m.code.clone()),
        ("Name", m.name.clone()),
        ("Description", format::or_dash(m.description.as_deref())),
        ("Division", format::or_dash(m.division.as_deref())),
        ("Ages", age_range(m)),
        ("Status", format::active_label(m.is_active).into()),
        ("Created", format::datetime(m.created_at)),
    ])
}

fn apply_fields(form: &mut FormState, fields: ModuleFields) {
    if let Some(code) = fields.code {
        form.handle_change("module_code", code);
    }
    if let Some(name) = fields.name {
        form.handle_change("module_name", name);
    }
    if let Some(description) = fields.description {
        form.handle_change("description", description);
    }
    if let Some(division) = fields.division {
        form.handle_change("division", division);
    }
    if let Some(min_age) = fields.min_age {
        form.handle_change("min_age", min_age);
    }
    if let Some(max_age) = fields.max_age {
        form.handle_change("max_age", max_age);
    }
}

fn not_found(id: &str) -> impl FnOnce(CliError) -> CliError + '_ {
    move |e| e.for_resource("Module", id, "modules list")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: ModulesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let palette = util::palette(console, global);

    match args.command {
        ModulesCommand::List(list) => {
            util::list(
                console,
                &list,
                global,
                console.api().list_modules(),
                |m| ModuleRow::new(m, palette),
                |m| m.code.clone(),
            )
            .await
        }

        ModulesCommand::Get { id } => {
            let module = console
                .call(console.api().get_module(&util::entity_id(&id)))
                .await
                .map_err(CliError::from)
                .map_err(not_found(&id))?;
            let out = output::render_single(global.output, &module, detail, |m| m.code.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ModulesCommand::Create(fields) => {
            let mut form = form::create();
            apply_fields(&mut form, fields);
            let module = util::submit_form(form, |values| async move {
                Ok::<_, CliError>(
                    console
                        .call(console.api().create_module(&form::to_request(&values)))
                        .await?,
                )
            })
            .await?;
            output::print_status(&format!("Module {} created", module.code), global.quiet);
            let out = output::render_single(global.output, &module, detail, |m| m.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ModulesCommand::Update { id, fields } => {
            let entity = util::entity_id(&id);
            let current = console
                .call(console.api().get_module(&entity))
                .await
                .map_err(CliError::from)
                .map_err(not_found(&id))?;
            let mut form = form::edit(&current);
            apply_fields(&mut form, fields);
            let module = util::submit_form(form, |values| async move {
                Ok::<_, CliError>(
                    console
                        .call(console.api().update_module(&entity, &form::to_request(&values)))
                        .await?,
                )
            })
            .await?;
            output::print_status(&format!("Module {} updated", module.code), global.quiet);
            let out = output::render_single(global.output, &module, detail, |m| m.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ModulesCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete module {id}?"),
                "delete a module",
                global.yes,
            )? {
                return Ok(());
            }
            console
                .call(console.api().delete_module(&util::entity_id(&id)))
                .await
                .map_err(CliError::from)
                .map_err(not_found(&id))?;
            output::print_status(&format!("Module {id} deleted"), global.quiet);
            Ok(())
        }
    }
}

//! Teacher account command handlers.

use tabled::Tabled;

use stockdesk_core::api::{Teacher, TeacherCredentials};
use stockdesk_core::forms::teacher as form;
use stockdesk_core::{Console, FormState, format};

use crate::cli::{GlobalOpts, OutputFormat, TeacherFields, TeachersArgs, TeachersCommand};
use crate::error::CliError;
use crate::output::{self, Palette};

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(super) struct TeacherRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Branch")]
    branch: String,
    #[tabled(rename = "Division")]
    division: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl TeacherRow {
    pub(super) fn new(t: &Teacher, palette: Palette) -> Self {
        Self {
            id: t.id.to_string(),
            username: t.username.clone(),
            name: format::truncate(&t.full_name, 32),
            branch: t.branch_code.clone(),
            division: format::or_dash(t.division.as_deref()),
            status: palette.active(t.is_active),
        }
    }
}

fn detail(t: &Teacher) -> String {
    output::detail_lines(&[
        ("ID", t.id.to_string()),
        ("Username", t.username.clone()),
        ("Name", t.full_name.clone()),
        ("Email", format::or_dash(t.email.as_deref())),
        ("Phone", format::or_dash(t.phone.as_deref())),
        ("Branch", t.branch_code.clone()),
        ("Division", format::or_dash(t.division.as_deref())),
        ("Status", format::active_label(t.is_active).into()),
        ("Created", format::datetime(t.created_at)),
    ])
}

fn credentials_detail(c: &TeacherCredentials) -> String {
    output::detail_lines(&[("Username", c.username.clone()), ("Password", c.password.clone())])
}

fn apply_fields(form: &mut FormState, fields: TeacherFields) {
    if let Some(username) = fields.username {
        form.handle_change("username", username);
    }
    if let Some(full_name) = fields.full_name {
        form.handle_change("full_name", full_name);
    }
    if let Some(email) = fields.email {
        form.handle_change("email", email);
    }
    if let Some(phone) = fields.phone {
        form.handle_change("phone", phone);
    }
    if let Some(branch) = fields.branch {
        form.handle_change("branch_code", branch);
    }
    if let Some(division) = fields.division {
        form.handle_change("division", division);
    }
}

fn not_found(id: &str) -> impl FnOnce(CliError) -> CliError + '_ {
    move |e| e.for_resource("Teacher", id, "teachers list")
}

/// The one-time password goes to stdout even with `--quiet`; it cannot be
/// retrieved again.
fn print_credentials(credentials: &TeacherCredentials, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.output, credentials, credentials_detail, |c| {
        c.password.clone()
    })?;
    output::print_output(&out, false);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    console: &Console,
    args: TeachersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let palette = util::palette(console, global);

    match args.command {
        TeachersCommand::List(list) => {
            util::list(
                console,
                &list,
                global,
                console.api().list_teachers(),
                |t| TeacherRow::new(t, palette),
                |t| t.username.clone(),
            )
            .await
        }

        TeachersCommand::Get { id } => {
            let teacher = console
                .call(console.api().get_teacher(&util::entity_id(&id)))
                .await
                .map_err(CliError::from)
                .map_err(not_found(&id))?;
            let out =
                output::render_single(global.output, &teacher, detail, |t| t.username.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TeachersCommand::Create(fields) => {
            let mut form = form::create();
            apply_fields(&mut form, fields);
            let created = util::submit_form(form, |values| async move {
                Ok::<_, CliError>(
                    console
                        .call(console.api().create_teacher(&form::to_request(&values)))
                        .await?,
                )
            })
            .await?;
            output::print_status(
                &format!("Teacher {} created", created.teacher.username),
                global.quiet,
            );
            if global.output == OutputFormat::Table {
                return print_credentials(&created.credentials, global);
            }
            let out = output::render_single(global.output, &created, |_| String::new(), |c| {
                c.credentials.password.clone()
            })?;
            output::print_output(&out, false);
            Ok(())
        }

        TeachersCommand::Update { id, fields } => {
            let entity = util::entity_id(&id);
            let current = console
                .call(console.api().get_teacher(&entity))
                .await
                .map_err(CliError::from)
                .map_err(not_found(&id))?;
            let mut form = form::edit(&current);
            apply_fields(&mut form, fields);
            let teacher = util::submit_form(form, |values| async move {
                Ok::<_, CliError>(
                    console
                        .call(console.api().update_teacher(&entity, &form::to_request(&values)))
                        .await?,
                )
            })
            .await?;
            output::print_status(&format!("Teacher {} updated", teacher.username), global.quiet);
            let out = output::render_single(global.output, &teacher, detail, |t| t.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TeachersCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete teacher {id}? Their login stops working immediately."),
                "delete a teacher",
                global.yes,
            )? {
                return Ok(());
            }
            console
                .call(console.api().delete_teacher(&util::entity_id(&id)))
                .await
                .map_err(CliError::from)
                .map_err(not_found(&id))?;
            output::print_status(&format!("Teacher {id} deleted"), global.quiet);
            Ok(())
        }

        TeachersCommand::ResetPassword { id } => {
            if !util::confirm(
                &format!("Generate a new password for teacher {id}?"),
                "reset a teacher password",
                global.yes,
            )? {
                return Ok(());
            }
            let credentials = console
                .call(console.api().reset_teacher_password(&util::entity_id(&id)))
                .await
                .map_err(CliError::from)
                .map_err(not_found(&id))?;
            output::print_status(
                &format!("Password reset for {}", credentials.username),
                global.quiet,
            );
            print_credentials(&credentials, global)
        }

        TeachersCommand::Toggle { id } => {
            let teacher = console
                .call(console.api().toggle_teacher_active(&util::entity_id(&id)))
                .await
                .map_err(CliError::from)
                .map_err(not_found(&id))?;
            output::print_status(
                &format!(
                    "Teacher {} is now {}",
                    teacher.username,
                    format::active_label(teacher.is_active)
                ),
                global.quiet,
            );
            Ok(())
        }
    }
}

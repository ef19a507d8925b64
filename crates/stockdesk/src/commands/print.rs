//! Certificate printing command handlers.

use tabled::Tabled;

use stockdesk_core::api::PrintRecord;
use stockdesk_core::forms::print as form;
use stockdesk_core::{Console, format};

use crate::cli::{GlobalOpts, PrintArgs, PrintCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct PrintRow {
    #[tabled(rename = "Certificate")]
    number: String,
    #[tabled(rename = "Student")]
    student: String,
    #[tabled(rename = "Module")]
    module: String,
    #[tabled(rename = "Teacher")]
    teacher: String,
    #[tabled(rename = "Printed")]
    printed: String,
}

impl From<&PrintRecord> for PrintRow {
    fn from(p: &PrintRecord) -> Self {
        Self {
            number: format::or_dash(p.certificate_number.as_deref()),
            student: p.student_name.clone(),
            module: p.module_code.clone(),
            teacher: format::or_dash(p.teacher_username.as_deref()),
            printed: format::date(p.printed_at),
        }
    }
}

fn detail(p: &PrintRecord) -> String {
    output::detail_lines(&[
        ("Certificate", format::or_dash(p.certificate_number.as_deref())),
        ("Student", p.student_name.clone()),
        ("Module", p.module_code.clone()),
        ("Module name", format::or_dash(p.module_name.as_deref())),
        ("Teacher", format::or_dash(p.teacher_username.as_deref())),
        ("Branch", format::or_dash(p.branch_code.as_deref())),
        ("Printed", format::datetime(p.printed_at)),
    ])
}

pub async fn handle(console: &Console, args: PrintArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        PrintCommand::Certificate {
            module,
            student,
            date,
        } => {
            let mut form = form::create();
            form.handle_change("module_code", module);
            form.handle_change("student_name", student);
            if let Some(date) = date {
                form.handle_change("print_date", date);
            }
            let yes = global.yes;
            let printed = util::submit_form(form, |values| async move {
                let request = form::to_request(&values);
                if !util::confirm(
                    &format!(
                        "Print a {} certificate for {}? Branch stock is deducted.",
                        request.module_code, request.student_name
                    ),
                    "print a certificate",
                    yes,
                )? {
                    return Ok(None);
                }
                let record = console
                    .call(console.api().print_certificate(&request))
                    .await
                    .map_err(CliError::from)
                    .map_err(|e| e.for_resource("Module", &request.module_code, "modules list"))?;
                Ok::<_, CliError>(Some(record))
            })
            .await?;
            let Some(record) = printed else {
                return Ok(());
            };
            output::print_status(
                &format!("Certificate printed for {}", record.student_name),
                global.quiet,
            );
            let out = output::render_single(global.output, &record, detail, |p| {
                p.certificate_number
                    .clone()
                    .unwrap_or_else(|| p.id.to_string())
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PrintCommand::History(list) => {
            util::list(
                console,
                &list,
                global,
                console.api().print_history(),
                |p| PrintRow::from(p),
                |p| p.id.to_string(),
            )
            .await
        }
    }
}

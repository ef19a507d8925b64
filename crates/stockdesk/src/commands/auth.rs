//! Session command handlers: login, logout, whoami.

use std::io::{BufRead, IsTerminal};

use dialoguer::Input;
use secrecy::SecretString;
use serde::Serialize;
use tracing::{debug, info};

use stockdesk_core::Console;
use stockdesk_core::api::CurrentUser;
use stockdesk_core::forms;

use crate::cli::{GlobalOpts, LoginArgs, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct Session<'a> {
    profile: &'a str,
    api_url: &'a str,
    user: &'a CurrentUser,
}

fn user_detail(user: &CurrentUser) -> String {
    output::detail_lines(&[
        ("User", user.username.clone()),
        ("Name", user.full_name.clone().unwrap_or_else(|| "-".into())),
        ("Role", format!("{:?}", user.role).to_lowercase()),
        ("Branch", user.branch_code.clone().unwrap_or_else(|| "-".into())),
    ])
}

fn read_password(from_stdin: bool) -> Result<String, CliError> {
    if from_stdin {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        return Ok(line.trim_end_matches(['\r', '\n']).to_owned());
    }
    rpassword::prompt_password("Password: ").map_err(util::prompt_err)
}

pub async fn login(
    console: &Console,
    profile_name: &str,
    args: LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let remembered = config::load_config_or_default()
        .profiles
        .get(profile_name)
        .and_then(|p| p.username.clone());

    let username = match args.username.or(remembered) {
        Some(name) if args.password_stdin || !std::io::stdin().is_terminal() => name,
        initial => {
            let mut prompt = Input::<String>::new().with_prompt("Username");
            if let Some(name) = initial {
                prompt = prompt.default(name);
            }
            prompt.interact_text().map_err(util::prompt_err)?
        }
    };
    let password = read_password(args.password_stdin)?;

    let mut form = forms::login::create();
    form.handle_change("username", username.trim());
    form.handle_change("password", password.as_str());
    let password = SecretString::from(password);
    let (user, token) = util::submit_form(form, |values| async move {
        let username = stockdesk_core::form::text(&values, "username");
        Ok::<_, CliError>(console.login(username, &password).await?)
    })
    .await?;
    config::remember_session(
        profile_name,
        console.api().base_url().as_str(),
        &user.username,
        &token,
    )?;
    info!(profile = profile_name, "session stored");

    match global.output {
        OutputFormat::Table => output::print_status(
            &format!("Logged in as {} on profile '{profile_name}'", user.username),
            global.quiet,
        ),
        format => {
            let session = Session {
                profile: profile_name,
                api_url: console.api().base_url().as_str(),
                user: &user,
            };
            let out = output::render_single(format, &session, |_| String::new(), |s| {
                s.user.username.clone()
            })?;
            output::print_output(&out, global.quiet);
        }
    }
    Ok(())
}

pub async fn logout(
    console: &Console,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // The stored token goes regardless of what the server says.
    if console.api().has_token() {
        if let Err(e) = console.logout().await {
            debug!(error = %e, "server-side logout failed");
        }
    }
    config::forget_session(profile_name)?;
    output::print_status(&format!("Logged out of profile '{profile_name}'"), global.quiet);
    Ok(())
}

pub async fn whoami(console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    let user = console.current_user().await?;
    let out = output::render_single(global.output, &user, user_detail, |u| u.username.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

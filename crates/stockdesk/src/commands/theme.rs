//! Theme command handler. The theme is client state and needs no backend.

use serde::Serialize;

use stockdesk_core::{AppContext, Theme};

use crate::cli::{GlobalOpts, ThemeArgs, ThemeCommand, ThemeName};
use crate::config::{self, ClientState};
use crate::error::CliError;
use crate::output::{self, Palette};

#[derive(Serialize)]
struct ThemeView {
    theme: Theme,
}

fn resolve(context: &AppContext, command: Option<ThemeCommand>) -> bool {
    match command.unwrap_or(ThemeCommand::Show) {
        ThemeCommand::Show => false,
        ThemeCommand::Toggle => {
            context.toggle_theme();
            true
        }
        ThemeCommand::Set { theme } => {
            let theme = match theme {
                ThemeName::Light => Theme::Light,
                ThemeName::Dark => Theme::Dark,
            };
            let changed = theme != context.theme();
            context.set_theme(theme);
            changed
        }
    }
}

pub fn handle(args: ThemeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let context = AppContext::new(config::load_state().theme);

    if resolve(&context, args.command) {
        config::save_state(&ClientState {
            theme: context.theme(),
        })?;
        output::print_status(&format!("Theme set to {}", context.theme()), global.quiet);
    }

    let view = ThemeView {
        theme: context.theme(),
    };
    let palette = Palette::new(global.color, view.theme);
    let out = output::render_single(
        global.output,
        &view,
        |v| palette.emphasis(&v.theme.to_string()),
        |v| v.theme.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_and_reports_change() {
        let context = AppContext::new(Theme::Light);
        assert!(resolve(&context, Some(ThemeCommand::Toggle)));
        assert_eq!(context.theme(), Theme::Dark);
    }

    #[test]
    fn setting_the_same_theme_is_not_a_change() {
        let context = AppContext::new(Theme::Dark);
        assert!(!resolve(
            &context,
            Some(ThemeCommand::Set {
                theme: ThemeName::Dark
            })
        ));
        assert!(!resolve(&context, None));
        assert_eq!(context.theme(), Theme::Dark);
    }
}

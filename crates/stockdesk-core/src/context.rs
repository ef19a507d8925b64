// ── Application context ──
//
// Read-mostly state shared by every view: the colour theme and the branch
// dropdown options. Each has exactly one writer. The context is built once
// at startup and handed out by reference.

use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use stockdesk_api::BranchOption;
use strum::{Display, EnumString};
use tokio::sync::watch;
use tracing::info;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

/// Branch picker options, swapped wholesale on refresh.
#[derive(Default)]
pub struct DropdownCache {
    branches: ArcSwap<Vec<BranchOption>>,
}

impl DropdownCache {
    pub fn branches(&self) -> Arc<Vec<BranchOption>> {
        self.branches.load_full()
    }

    pub fn replace_branches(&self, options: Vec<BranchOption>) {
        info!(count = options.len(), "branch options refreshed");
        self.branches.store(Arc::new(options));
    }

    pub fn is_empty(&self) -> bool {
        self.branches.load().is_empty()
    }

    /// Codes of head branches, i.e. valid regional hubs.
    pub fn regional_hubs(&self) -> Vec<String> {
        self.branches
            .load()
            .iter()
            .filter(|b| b.is_head_branch)
            .map(|b| b.code.clone())
            .collect()
    }

    pub fn branch_name(&self, code: &str) -> Option<String> {
        self.branches
            .load()
            .iter()
            .find(|b| b.code.eq_ignore_ascii_case(code))
            .map(|b| b.name.clone())
    }
}

pub struct AppContext {
    theme: watch::Sender<Theme>,
    dropdowns: DropdownCache,
}

impl AppContext {
    pub fn new(theme: Theme) -> Self {
        let (theme, _) = watch::channel(theme);
        Self {
            theme,
            dropdowns: DropdownCache::default(),
        }
    }

    pub fn theme(&self) -> Theme {
        *self.theme.borrow()
    }

    pub fn set_theme(&self, theme: Theme) {
        self.theme.send_replace(theme);
    }

    /// Flip the theme and return the new value.
    pub fn toggle_theme(&self) -> Theme {
        let next = self.theme().toggled();
        self.set_theme(next);
        next
    }

    /// Observe theme changes (e.g. to persist them).
    pub fn subscribe_theme(&self) -> watch::Receiver<Theme> {
        self.theme.subscribe()
    }

    pub fn dropdowns(&self) -> &DropdownCache {
        &self.dropdowns
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(code: &str, head: bool) -> BranchOption {
        BranchOption {
            code: code.into(),
            name: format!("{code} branch"),
            is_head_branch: head,
        }
    }

    #[test]
    fn theme_toggle_notifies_subscribers() {
        let ctx = AppContext::default();
        let mut rx = ctx.subscribe_theme();
        assert_eq!(ctx.toggle_theme(), Theme::Dark);
        assert!(rx.has_changed().unwrap_or(false));
        assert_eq!(*rx.borrow_and_update(), Theme::Dark);
    }

    #[test]
    fn theme_parses() {
        assert_eq!("DARK".parse::<Theme>().ok(), Some(Theme::Dark));
        assert_eq!(Theme::Light.to_string(), "light");
    }

    #[test]
    fn dropdown_snapshot_survives_replace() {
        let ctx = AppContext::default();
        ctx.dropdowns()
            .replace_branches(vec![option("SND", true), option("BKS", false)]);
        let before = ctx.dropdowns().branches();

        ctx.dropdowns().replace_branches(vec![option("JKT", true)]);
        assert_eq!(before.len(), 2);
        assert_eq!(ctx.dropdowns().regional_hubs(), vec!["JKT".to_owned()]);
        assert_eq!(ctx.dropdowns().branch_name("jkt").as_deref(), Some("JKT branch"));
    }
}

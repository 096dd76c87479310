//! Switch state machine.

use crate::catalog::ThemeId;
use crate::error::ThemeError;

/// Where the switcher stands.
///
/// ```text
/// Uninitialized ──switch──▶ Loading(t) ──ok──▶ Active(t)
///                               │
///                               └──err──▶ Failed { t, error }
/// Active(_) / Failed { .. } ──switch──▶ Loading(t')
/// ```
///
/// `Failed` does not change what the document shows: the previously active
/// theme's marker stays in place. Use
/// [`ThemeLoader::current_theme`](crate::ThemeLoader::current_theme) for the
/// theme actually on screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ThemeState {
    #[default]
    Uninitialized,
    Loading(ThemeId),
    Active(ThemeId),
    Failed { theme: ThemeId, error: ThemeError },
}

impl ThemeState {
    /// The theme this state refers to, if any.
    pub fn theme(&self) -> Option<ThemeId> {
        match self {
            ThemeState::Uninitialized => None,
            ThemeState::Loading(theme) | ThemeState::Active(theme) => Some(*theme),
            ThemeState::Failed { theme, .. } => Some(*theme),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ThemeState::Loading(_))
    }
}

/// Mutable switcher bookkeeping.
#[derive(Debug, Default)]
pub(crate) struct SwitchState {
    pub(crate) phase: ThemeState,
    /// Theme whose marker is active on the document.
    pub(crate) displayed: Option<ThemeId>,
    /// Token of the most recently started switch.
    pub(crate) generation: u64,
}

impl SwitchState {
    /// Starts a switch and returns its token.
    pub(crate) fn begin(&mut self, theme: ThemeId) -> u64 {
        self.generation += 1;
        self.phase = ThemeState::Loading(theme);
        self.generation
    }

    pub(crate) fn is_current(&self, token: u64) -> bool {
        self.generation == token
    }

    /// Records a failure, unless a later switch owns the state.
    pub(crate) fn fail(&mut self, token: u64, theme: ThemeId, error: ThemeError) {
        if self.is_current(token) {
            self.phase = ThemeState::Failed { theme, error };
        }
    }

    pub(crate) fn activate(&mut self, theme: ThemeId) {
        self.phase = ThemeState::Active(theme);
        self.displayed = Some(theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme(name: &str) -> ThemeId {
        ThemeId::parse(name).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let state = SwitchState::default();
        assert_eq!(state.phase, ThemeState::Uninitialized);
        assert_eq!(state.phase.theme(), None);
        assert_eq!(state.displayed, None);
    }

    #[test]
    fn test_begin_issues_increasing_tokens() {
        let mut state = SwitchState::default();
        let first = state.begin(theme("bayer"));
        let second = state.begin(theme("asgrow"));
        assert!(second > first);
        assert!(!state.is_current(first));
        assert!(state.is_current(second));
        assert!(state.phase.is_loading());
    }

    #[test]
    fn test_stale_failure_ignored() {
        let mut state = SwitchState::default();
        let stale = state.begin(theme("bayer"));
        state.begin(theme("asgrow"));

        let error = ThemeError::Load {
            theme: "bayer".into(),
            reason: "timeout".into(),
        };
        state.fail(stale, theme("bayer"), error);
        assert_eq!(state.phase, ThemeState::Loading(theme("asgrow")));
    }

    #[test]
    fn test_failure_keeps_displayed_theme() {
        let mut state = SwitchState::default();
        state.begin(theme("bayer"));
        state.activate(theme("bayer"));

        let token = state.begin(theme("asgrow"));
        let error = ThemeError::Load {
            theme: "asgrow".into(),
            reason: "404".into(),
        };
        state.fail(token, theme("asgrow"), error.clone());

        assert_eq!(
            state.phase,
            ThemeState::Failed {
                theme: theme("asgrow"),
                error
            }
        );
        assert_eq!(state.displayed, Some(theme("bayer")));
    }
}

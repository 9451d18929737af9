//! Screens and navigation events.
//!
//! Controllers emit [`NavigationEvent`] values; the shell applies them to a
//! [`BackStack`]. Keeping the stack logic here makes history guarantees, such
//! as logout removing the home screen, testable without a UI.

use std::fmt;

/// Every screen of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppScreen {
    /// Landing screen for signed-out users.
    Welcome,
    /// Email and password form.
    Login,
    /// Account creation form.
    Register,
    /// Game catalogue.
    Home,
    /// Signed-in user's profile.
    Profile,
}

impl AppScreen {
    /// Stable route name.
    pub const fn route(self) -> &'static str {
        match self {
            Self::Welcome => "welcome_screen",
            Self::Login => "login_screen",
            Self::Register => "register_screen",
            Self::Home => "home_screen",
            Self::Profile => "profile_screen",
        }
    }
}

impl fmt::Display for AppScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route())
    }
}

/// A request to change the visible screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEvent {
    /// Show `route`, optionally trimming history first.
    NavigateTo {
        /// Destination screen.
        route: AppScreen,
        /// Pop entries above this screen before pushing.
        pop_up_to: Option<AppScreen>,
        /// Also pop the `pop_up_to` screen itself.
        inclusive: bool,
        /// Do not push when `route` is already on top.
        single_top: bool,
    },
    /// Return to the previous screen.
    PopBackStack,
    /// Move up the hierarchy; equivalent to [`NavigationEvent::PopBackStack`]
    /// in a single-activity app.
    NavigateUp,
}

impl NavigationEvent {
    /// Plain navigation to `route`.
    pub const fn to(route: AppScreen) -> Self {
        Self::NavigateTo {
            route,
            pop_up_to: None,
            inclusive: false,
            single_top: false,
        }
    }
}

/// Screen history, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackStack {
    entries: Vec<AppScreen>,
}

impl BackStack {
    /// Start with `start` as the only entry.
    pub fn new(start: AppScreen) -> Self {
        Self {
            entries: vec![start],
        }
    }

    /// Visible screen, if any.
    pub fn current(&self) -> Option<AppScreen> {
        self.entries.last().copied()
    }

    /// Whether `screen` can still be reached by going back.
    pub fn contains(&self, screen: AppScreen) -> bool {
        self.entries.contains(&screen)
    }

    /// History, oldest first.
    pub fn entries(&self) -> &[AppScreen] {
        &self.entries
    }

    /// Apply `event`.
    ///
    /// `pop_up_to` naming a screen that is not in the stack leaves history
    /// untouched. Popping never removes the last entry; the return value
    /// reports whether the visible screen changed.
    pub fn apply(&mut self, event: NavigationEvent) -> bool {
        let before = self.current();
        match event {
            NavigationEvent::NavigateTo {
                route,
                pop_up_to,
                inclusive,
                single_top,
            } => {
                if let Some(target) = pop_up_to {
                    self.pop_up_to(target, inclusive);
                }
                if !(single_top && self.current() == Some(route)) {
                    self.entries.push(route);
                }
            }
            NavigationEvent::PopBackStack | NavigationEvent::NavigateUp => {
                if self.entries.len() > 1 {
                    self.entries.pop();
                }
            }
        }
        self.current() != before
    }

    fn pop_up_to(&mut self, target: AppScreen, inclusive: bool) {
        let Some(position) = self.entries.iter().rposition(|screen| *screen == target) else {
            return;
        };
        let keep = if inclusive { position } else { position + 1 };
        self.entries.truncate(keep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn stack(entries: &[AppScreen]) -> BackStack {
        BackStack {
            entries: entries.to_vec(),
        }
    }

    #[rstest]
    fn logout_event_removes_home_from_history() {
        let mut back = stack(&[AppScreen::Welcome, AppScreen::Login, AppScreen::Home]);

        back.apply(NavigationEvent::NavigateTo {
            route: AppScreen::Welcome,
            pop_up_to: Some(AppScreen::Home),
            inclusive: true,
            single_top: false,
        });

        assert!(!back.contains(AppScreen::Home));
        assert_eq!(back.current(), Some(AppScreen::Welcome));
    }

    #[rstest]
    #[case(false, vec![AppScreen::Welcome, AppScreen::Login, AppScreen::Home])]
    #[case(true, vec![AppScreen::Welcome, AppScreen::Home])]
    fn pop_up_to_respects_inclusive(#[case] inclusive: bool, #[case] expected: Vec<AppScreen>) {
        let mut back = stack(&[AppScreen::Welcome, AppScreen::Login, AppScreen::Register]);

        back.apply(NavigationEvent::NavigateTo {
            route: AppScreen::Home,
            pop_up_to: Some(AppScreen::Login),
            inclusive,
            single_top: false,
        });

        assert_eq!(back.entries(), expected.as_slice());
    }

    #[rstest]
    fn single_top_does_not_duplicate() {
        let mut back = stack(&[AppScreen::Home]);
        let changed = back.apply(NavigationEvent::NavigateTo {
            route: AppScreen::Home,
            pop_up_to: None,
            inclusive: false,
            single_top: true,
        });

        assert!(!changed);
        assert_eq!(back.entries(), &[AppScreen::Home]);
    }

    #[rstest]
    #[case(NavigationEvent::PopBackStack)]
    #[case(NavigationEvent::NavigateUp)]
    fn back_keeps_the_root(#[case] event: NavigationEvent) {
        let mut back = stack(&[AppScreen::Welcome, AppScreen::Login]);

        assert!(back.apply(event));
        assert!(!back.apply(event));
        assert_eq!(back.current(), Some(AppScreen::Welcome));
    }

    #[rstest]
    fn unknown_pop_target_keeps_history() {
        let mut back = stack(&[AppScreen::Welcome]);
        back.apply(NavigationEvent::NavigateTo {
            route: AppScreen::Login,
            pop_up_to: Some(AppScreen::Profile),
            inclusive: true,
            single_top: false,
        });
        assert_eq!(back.entries(), &[AppScreen::Welcome, AppScreen::Login]);
    }
}

//! Register → build → scan lifecycle on a single handle.
//!
//! [`AutomatonBuilder`] and [`Automaton`] enforce the lifecycle through
//! types. `Matcher` keeps both phases behind one value for callers that
//! hold it across steps, and reports misuse at the offending call.

use std::sync::Arc;

use super::builder::{AutomatonBuilder, Registration};
use super::machine::Automaton;
use super::match_set::MatchSet;
use super::trie::PatternId;
use crate::error::{DeadassetError, DeadassetResult};

#[derive(Debug)]
enum State {
    Registering(AutomatonBuilder),
    Built(Arc<Automaton>),
}

/// Pattern matcher with an explicit build step.
#[derive(Debug)]
pub struct Matcher {
    state: State,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher {
    pub fn new() -> Self {
        Self {
            state: State::Registering(AutomatonBuilder::new()),
        }
    }

    /// Start from a pre-filled builder.
    pub fn from_builder(builder: AutomatonBuilder) -> Self {
        Self {
            state: State::Registering(builder),
        }
    }

    pub fn register(&mut self, pattern: impl Into<String>) -> DeadassetResult<PatternId> {
        self.register_detailed(pattern).map(Registration::id)
    }

    pub fn register_detailed(
        &mut self,
        pattern: impl Into<String>,
    ) -> DeadassetResult<Registration> {
        match &mut self.state {
            State::Registering(builder) => builder.register_detailed(pattern),
            State::Built(_) => Err(DeadassetError::AlreadyBuilt),
        }
    }

    /// Finalize the automaton. Only the first call succeeds.
    pub fn build(&mut self) -> DeadassetResult<Arc<Automaton>> {
        match &self.state {
            State::Registering(builder) => {
                let automaton = Arc::new(builder.build());
                self.state = State::Built(Arc::clone(&automaton));
                Ok(automaton)
            }
            State::Built(_) => Err(DeadassetError::AlreadyBuilt),
        }
    }

    pub fn is_built(&self) -> bool {
        matches!(self.state, State::Built(_))
    }

    /// The built automaton, shareable across threads.
    pub fn automaton(&self) -> DeadassetResult<&Arc<Automaton>> {
        match &self.state {
            State::Built(automaton) => Ok(automaton),
            State::Registering(_) => Err(DeadassetError::BuildNotInvoked),
        }
    }

    /// Scan one document; fails only if `build` was never called.
    pub fn scan(&self, document: impl AsRef<[u8]>) -> DeadassetResult<MatchSet> {
        Ok(self.automaton()?.scan(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_before_build_fails() {
        let mut matcher = Matcher::new();
        matcher.register("logo.png").unwrap();
        let err = matcher.scan("logo.png").unwrap_err();
        assert!(matches!(err, DeadassetError::BuildNotInvoked));
    }

    #[test]
    fn test_lifecycle() {
        let mut matcher = Matcher::new();
        let logo = matcher.register("logo.png").unwrap();
        matcher.register("icon.png").unwrap();
        assert!(!matcher.is_built());

        matcher.build().unwrap();
        assert!(matcher.is_built());

        let found = matcher.scan("<img src='assets/logo.png'>").unwrap();
        assert_eq!(found.iter().collect::<Vec<_>>(), vec![logo]);
    }

    #[test]
    fn test_from_builder_keeps_registrations() {
        let mut builder = AutomatonBuilder::with_capacity(2);
        let logo = builder.register("logo.png").unwrap();
        let mut matcher = Matcher::from_builder(builder);
        let icon = matcher.register("icon.png").unwrap();
        assert_ne!(logo, icon);
        assert_eq!(matcher.register("logo.png").unwrap(), logo);

        matcher.build().unwrap();
        let found = matcher.scan("logo.png icon.png").unwrap();
        assert_eq!(found.iter().collect::<Vec<_>>(), vec![logo, icon]);
    }

    #[test]
    fn test_register_after_build_fails() {
        let mut matcher = Matcher::new();
        matcher.build().unwrap();
        assert!(matches!(
            matcher.register("late.png"),
            Err(DeadassetError::AlreadyBuilt)
        ));
        assert!(matches!(matcher.build(), Err(DeadassetError::AlreadyBuilt)));
    }

    #[test]
    fn test_concurrent_scans_share_automaton() {
        let mut matcher = Matcher::new();
        matcher.register("needle").unwrap();
        let automaton = matcher.build().unwrap();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let automaton = Arc::clone(&automaton);
                std::thread::spawn(move || {
                    let doc = if i % 2 == 0 { "hay needle hay" } else { "hay hay" };
                    automaton.scan(doc).len()
                })
            })
            .collect();

        let counts: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(counts, vec![1, 0, 1, 0]);
    }
}

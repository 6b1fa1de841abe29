//! One dispatch cycle: verb lookup, argument binding, handler call, reset.
//!
//! The dispatcher never exits the process. A handler asks to leave by
//! returning [`Flow::Exit`], which surfaces here as [`Outcome::Exit`] for the
//! outer loop to act on.

use crate::core::element::{CommandElement, Flow};
use crate::core::registry::Registry;
use crate::error::{CalbrError, Result};
use crate::storage::config::Settings;

/// Read-only view handed to handlers.
#[derive(Debug, Clone, Copy)]
pub struct DispatchContext<'a> {
    registry: &'a Registry,
    settings: &'a Settings,
}

impl<'a> DispatchContext<'a> {
    #[must_use]
    pub const fn new(registry: &'a Registry, settings: &'a Settings) -> Self {
        Self { registry, settings }
    }

    #[must_use]
    pub fn lookup(&self, alias: &str) -> Option<&'a CommandElement> {
        self.registry.lookup(alias)
    }

    #[must_use]
    pub fn all(&self) -> &'a [CommandElement] {
        self.registry.all()
    }

    #[must_use]
    pub const fn max_name_len(&self) -> usize {
        self.registry.max_name_len()
    }

    #[must_use]
    pub const fn settings(&self) -> &'a Settings {
        self.settings
    }
}

/// Result of dispatching one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Blank line, nothing ran.
    Idle,
    /// A handler ran and asked to continue.
    Handled,
    /// A handler asked the loop to stop.
    Exit,
}

/// Owns the registry and settings for a session.
#[derive(Debug)]
pub struct Dispatcher {
    registry: Registry,
    settings: Settings,
}

impl Dispatcher {
    #[must_use]
    pub const fn new(registry: Registry, settings: Settings) -> Self {
        Self { registry, settings }
    }

    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run one cycle for `line`.
    ///
    /// The element's argument buffer is reset afterwards whatever the result.
    ///
    /// # Errors
    ///
    /// - [`CalbrError::CommandNotFound`] if the verb is not registered
    /// - bind and coercion errors from [`CommandElement::bind`]
    /// - any error the handler returns
    pub fn dispatch(&mut self, line: &str) -> Result<Outcome> {
        let line = line.trim_start();
        if line.trim_end().is_empty() {
            return Ok(Outcome::Idle);
        }

        // Only a space ends the verb, matching how the remainder is tokenized.
        let (verb, remainder) = line.split_once(' ').unwrap_or((line, ""));

        let Some(index) = self.registry.position(verb) else {
            tracing::debug!(verb, "Command not found");
            return Err(CalbrError::CommandNotFound {
                verb: verb.to_string(),
            });
        };

        tracing::debug!(verb, remainder, "Dispatching");
        let result = self.cycle(index, remainder);
        if let Some(element) = self.registry.get_mut(index) {
            element.reset();
        }

        match result? {
            Flow::Continue => Ok(Outcome::Handled),
            Flow::Exit => Ok(Outcome::Exit),
        }
    }

    fn cycle(&mut self, index: usize, remainder: &str) -> Result<Flow> {
        if let Some(element) = self.registry.get_mut(index) {
            element.bind(remainder)?;
        }

        let context = DispatchContext::new(&self.registry, &self.settings);
        self.registry
            .get(index)
            .map_or(Ok(Flow::Continue), |element| element.invoke(&context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::core::coercion::TypedValue;
    use crate::core::element::Arguments;

    type Seen = Rc<RefCell<Vec<Arguments>>>;

    fn recording_dispatcher() -> (Dispatcher, Seen) {
        let seen: Seen = Rc::default();
        let sink = Rc::clone(&seen);

        let mut registry = Registry::new();
        registry
            .register(
                CommandElement::builder(["make-derivative", "makeder"])
                    .param("dry", "bool")
                    .param("mode", "str")
                    .default_value("dry", false)
                    .callback(move |_, args| {
                        sink.borrow_mut().push(args.clone());
                        Ok(Flow::Continue)
                    })
                    .build()
                    .unwrap(),
            )
            .unwrap();
        registry
            .register(
                CommandElement::builder(["exit", "quit"])
                    .callback(|_, _| Ok(Flow::Exit))
                    .build()
                    .unwrap(),
            )
            .unwrap();
        registry
            .register(
                CommandElement::builder(["fail"])
                    .callback(|_, _| Err(CalbrError::handler("fail", "boom")))
                    .build()
                    .unwrap(),
            )
            .unwrap();

        (Dispatcher::new(registry, Settings::default()), seen)
    }

    #[test]
    fn blank_lines_are_idle() {
        let (mut dispatcher, seen) = recording_dispatcher();
        assert_eq!(dispatcher.dispatch("").unwrap(), Outcome::Idle);
        assert_eq!(dispatcher.dispatch("   \t ").unwrap(), Outcome::Idle);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn verb_selects_element_and_remainder_is_bound() {
        let (mut dispatcher, seen) = recording_dispatcher();
        let outcome = dispatcher.dispatch("makeder 1001,1002 dry=yes").unwrap();
        assert_eq!(outcome, Outcome::Handled);

        let seen = seen.borrow();
        assert_eq!(seen[0].positional(), ["1001", "1002"]);
        assert_eq!(seen[0].flag("dry"), Some(true));
    }

    #[test]
    fn leading_whitespace_before_verb_is_ignored() {
        let (mut dispatcher, seen) = recording_dispatcher();
        dispatcher.dispatch("   makeder 1001").unwrap();
        assert_eq!(seen.borrow()[0].positional(), ["1001"]);
    }

    #[test]
    fn keyword_values_do_not_leak_between_cycles() {
        let (mut dispatcher, seen) = recording_dispatcher();
        dispatcher.dispatch("makeder 1001 dry=yes mode=fast").unwrap();
        dispatcher.dispatch("makeder 1002").unwrap();

        let seen = seen.borrow();
        assert_eq!(seen[1].positional(), ["1002"]);
        assert_eq!(seen[1].flag("dry"), Some(false));
        assert_eq!(seen[1].get("mode"), None);
        assert_eq!(
            seen[0].get("mode"),
            Some(&TypedValue::Str("fast".to_string()))
        );
    }

    #[test]
    fn unknown_verb_touches_nothing() {
        let (mut dispatcher, seen) = recording_dispatcher();
        let err = dispatcher.dispatch("zzz 1001 dry=yes").unwrap_err();
        assert!(matches!(err, CalbrError::CommandNotFound { ref verb } if verb == "zzz"));

        assert_eq!(dispatcher.registry().len(), 3);
        for element in dispatcher.registry().all() {
            assert!(element.arguments().positional().is_empty());
        }
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn bind_failure_resets_buffer() {
        let (mut dispatcher, seen) = recording_dispatcher();
        let err = dispatcher.dispatch("makeder 1001 dry=perhaps").unwrap_err();
        assert!(err.is_recoverable());
        assert!(seen.borrow().is_empty());

        let element = dispatcher.registry().lookup("makeder").unwrap();
        assert!(element.arguments().is_empty());
    }

    #[test]
    fn handler_error_propagates_and_buffer_is_reset() {
        let (mut dispatcher, _) = recording_dispatcher();
        let err = dispatcher.dispatch("fail now").unwrap_err();
        assert!(matches!(err, CalbrError::Handler { .. }));
        assert!(
            dispatcher
                .registry()
                .lookup("fail")
                .unwrap()
                .arguments()
                .is_empty()
        );
    }

    #[test]
    fn exit_is_reported_not_performed() {
        let (mut dispatcher, _) = recording_dispatcher();
        assert_eq!(dispatcher.dispatch("quit").unwrap(), Outcome::Exit);
        assert_eq!(dispatcher.dispatch("exit now").unwrap(), Outcome::Exit);
    }

    #[test]
    fn tab_does_not_end_the_verb() {
        let (mut dispatcher, seen) = recording_dispatcher();
        let err = dispatcher.dispatch("makeder\t1001").unwrap_err();
        assert!(
            matches!(err, CalbrError::CommandNotFound { ref verb } if verb == "makeder\t1001")
        );
        assert!(seen.borrow().is_empty());

        dispatcher.dispatch("makeder 1001\t1002").unwrap();
        assert_eq!(seen.borrow()[0].positional(), ["1001\t1002"]);
    }

    #[test]
    fn verb_prefix_is_not_matched() {
        let (mut dispatcher, _) = recording_dispatcher();
        assert!(dispatcher.dispatch("make").is_err());
    }
}

//! Command registry and dispatch.
//!
//! A line is split into a verb and a remainder. The verb selects a
//! [`CommandElement`] from the [`Registry`], the remainder is tokenized and
//! coerced against the element's prototype, and the handler runs with the
//! bound [`Arguments`].

pub mod coercion;
pub mod dispatcher;
pub mod element;
pub mod logging;
pub mod registry;
pub mod tokenizer;

pub use coercion::{TypeTag, TypedValue, coerce};
pub use dispatcher::{DispatchContext, Dispatcher, Outcome};
pub use element::{Arguments, CommandElement, ElementBuilder, Flow, Handler};
pub use registry::{Registry, aliases_conflict};
pub use tokenizer::{Tokens, tokenize};

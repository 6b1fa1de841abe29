//! Command elements: one registered command with its aliases, keyword
//! prototype, defaults, handler and per-cycle argument buffer.

use std::collections::HashMap;
use std::fmt;

use crate::core::coercion::{TypeTag, TypedValue, coerce};
use crate::core::dispatcher::DispatchContext;
use crate::core::tokenizer::tokenize;
use crate::error::{CalbrError, Result};

/// Minimum alias length in characters.
pub const MIN_ALIAS_LEN: usize = 2;

/// What the outer loop should do after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Prompt for the next line.
    #[default]
    Continue,
    /// Leave the REPL.
    Exit,
}

/// Handler bound to a command element.
pub type Handler = Box<dyn Fn(&DispatchContext<'_>, &Arguments) -> Result<Flow>>;

/// Arguments bound for one dispatch cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    positional: Vec<String>,
    keyword: HashMap<String, TypedValue>,
}

impl Arguments {
    /// Positional tokens in input order, uncoerced.
    #[must_use]
    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    /// Coerced keyword values, defaults included.
    #[must_use]
    pub const fn keyword(&self) -> &HashMap<String, TypedValue> {
        &self.keyword
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.keyword.get(name)
    }

    /// Boolean keyword, if present and boolean.
    #[must_use]
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(TypedValue::as_bool)
    }

    /// String keyword, if present and a string.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(TypedValue::as_str)
    }

    /// Integer keyword, if present and an integer.
    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(TypedValue::as_int)
    }

    #[must_use]
    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(TypedValue::as_float)
    }

    /// List keyword items, if present and a list.
    #[must_use]
    pub fn list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(TypedValue::as_list)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }

    fn clear(&mut self) {
        self.positional.clear();
        self.keyword.clear();
    }
}

/// A registered command.
pub struct CommandElement {
    aliases: Vec<String>,
    name: String,
    description: String,
    prototype: HashMap<String, TypeTag>,
    defaults: HashMap<String, TypedValue>,
    handler: Handler,
    arguments: Arguments,
}

impl CommandElement {
    /// Start building a command identified by `aliases`.
    pub fn builder<I, S>(aliases: I) -> ElementBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ElementBuilder {
            aliases: aliases.into_iter().map(Into::into).collect(),
            ..ElementBuilder::default()
        }
    }

    /// All aliases, in declaration order.
    #[must_use]
    pub fn identifier(&self) -> &[String] {
        &self.aliases
    }

    /// Display name: the longest alias.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `token` is exactly one of the aliases.
    #[must_use]
    pub fn matches(&self, token: &str) -> bool {
        self.aliases.iter().any(|alias| alias == token)
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub const fn prototype(&self) -> &HashMap<String, TypeTag> {
        &self.prototype
    }

    #[must_use]
    pub const fn defaults(&self) -> &HashMap<String, TypedValue> {
        &self.defaults
    }

    /// Arguments currently bound for this cycle.
    #[must_use]
    pub const fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Tokenize `remainder` and coerce its keywords against the prototype.
    ///
    /// The buffer is cleared and re-seeded with the defaults first, so an
    /// omitted keyword always carries its configured fallback.
    ///
    /// # Errors
    ///
    /// - [`CalbrError::MalformedKeyword`] for a token with more than one `=`
    /// - [`CalbrError::UnknownKeyword`] for a keyword missing from the prototype
    /// - [`CalbrError::Coercion`] for a value that does not parse
    pub fn bind(&mut self, remainder: &str) -> Result<()> {
        self.arguments.clear();
        self.arguments.keyword.extend(
            self.defaults
                .iter()
                .map(|(param, value)| (param.clone(), value.clone())),
        );

        let tokens = tokenize(remainder)?;
        for (key, raw) in tokens.keyword {
            let Some(tag) = self.prototype.get(&key) else {
                return Err(CalbrError::UnknownKeyword {
                    command: self.name.clone(),
                    keyword: key,
                });
            };
            let value = coerce(&raw, *tag)?;
            self.arguments.keyword.insert(key, value);
        }
        self.arguments.positional = tokens.positional;

        Ok(())
    }

    /// Call the handler with the bound arguments.
    ///
    /// # Errors
    ///
    /// Whatever the handler returns, unmodified.
    pub fn invoke(&self, context: &DispatchContext<'_>) -> Result<Flow> {
        (self.handler)(context, &self.arguments)
    }

    /// Clear the argument buffer. Identity, prototype and defaults are kept.
    pub fn reset(&mut self) {
        self.arguments.clear();
    }
}

impl fmt::Debug for CommandElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandElement")
            .field("aliases", &self.aliases)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("prototype", &self.prototype)
            .field("defaults", &self.defaults)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

/// Builder for [`CommandElement`]. Validation happens in [`ElementBuilder::build`].
#[derive(Default)]
pub struct ElementBuilder {
    aliases: Vec<String>,
    params: Vec<(String, String)>,
    defaults: Vec<(String, TypedValue)>,
    description: Option<String>,
    handler: Option<Handler>,
}

impl ElementBuilder {
    /// Add another alias.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Declare a keyword parameter with a textual type tag (`str`, `int`, ...).
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.params.push((name.into(), type_name.into()));
        self
    }

    /// Fallback value for a declared parameter.
    #[must_use]
    pub fn default_value(mut self, name: impl Into<String>, value: impl Into<TypedValue>) -> Self {
        self.defaults.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn callback<F>(mut self, handler: F) -> Self
    where
        F: Fn(&DispatchContext<'_>, &Arguments) -> Result<Flow> + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Validate and build the element.
    ///
    /// # Errors
    ///
    /// Returns a registration error for a bad alias, an unknown type tag, a
    /// default that is undeclared or of the wrong type, or a missing callback.
    pub fn build(self) -> Result<CommandElement> {
        let mut aliases: Vec<String> = Vec::with_capacity(self.aliases.len());
        let mut name = String::new();
        for alias in self.aliases {
            validate_alias(&alias)?;
            if alias.chars().count() > name.chars().count() {
                name.clone_from(&alias);
            }
            if !aliases.contains(&alias) {
                aliases.push(alias);
            }
        }
        if aliases.is_empty() {
            return Err(CalbrError::NoAliases);
        }

        let mut prototype = HashMap::with_capacity(self.params.len());
        for (param, type_name) in self.params {
            let tag = TypeTag::from_name(&type_name).ok_or_else(|| CalbrError::UnknownType {
                param: param.clone(),
                type_name,
            })?;
            prototype.insert(param, tag);
        }

        let mut defaults = HashMap::with_capacity(self.defaults.len());
        for (param, value) in self.defaults {
            let Some(expected) = prototype.get(&param).copied() else {
                return Err(CalbrError::DefaultNotInPrototype { param });
            };
            let actual = value.type_tag();
            if actual != expected {
                return Err(CalbrError::DefaultTypeMismatch {
                    param,
                    expected,
                    actual,
                });
            }
            defaults.insert(param, value);
        }

        let handler = self
            .handler
            .ok_or_else(|| CalbrError::MissingCallback {
                command: name.clone(),
            })?;

        let arguments = Arguments {
            positional: Vec::new(),
            keyword: defaults.clone(),
        };

        Ok(CommandElement {
            aliases,
            name,
            description: self.description.unwrap_or_default(),
            prototype,
            defaults,
            handler,
            arguments,
        })
    }
}

fn validate_alias(alias: &str) -> Result<()> {
    if alias.chars().count() < MIN_ALIAS_LEN {
        return Err(CalbrError::InvalidAlias {
            alias: alias.to_string(),
            reason: "too short",
        });
    }
    if alias.chars().any(char::is_whitespace) {
        return Err(CalbrError::InvalidAlias {
            alias: alias.to_string(),
            reason: "contains whitespace",
        });
    }
    Ok(())
}

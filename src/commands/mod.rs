//! Built-in commands.
//!
//! Each command is declared once here and registered at startup, after
//! applying any `[commands.<name>]` overrides from the config file.

mod handlers;

use crate::core::element::{CommandElement, ElementBuilder, Flow};
use crate::core::registry::Registry;
use crate::error::{CalbrError, Result};
use crate::storage::config::{CommandOverride, Settings};

/// A built-in command before overrides.
struct Builtin {
    aliases: &'static [&'static str],
    declare: fn(ElementBuilder) -> ElementBuilder,
}

impl Builtin {
    fn answers_to(&self, key: &str) -> bool {
        self.aliases.contains(&key)
    }
}

const BUILTINS: &[Builtin] = &[
    Builtin {
        aliases: &["copy-calibrates", "copycal"],
        declare: |b| {
            b.param("pres", "bool")
                .param("flow", "bool")
                .param("dest", "str")
                .param("move", "bool")
                .default_value("pres", true)
                .default_value("flow", true)
                .default_value("move", false)
                .description("Copy pressure/flow calibrates to dest (pres=, flow=, move=)")
                .callback(handlers::copy_calibrates)
        },
    },
    Builtin {
        aliases: &["copy-linearfits", "copylfit"],
        declare: |b| {
            b.param("dest", "str")
                .param("move", "bool")
                .default_value("move", false)
                .description("Copy linear fits to dest (move=)")
                .callback(handlers::copy_linearfits)
        },
    },
    Builtin {
        aliases: &["concat-calibrates", "concat"],
        declare: |b| {
            b.param("dest", "str")
                .description("Join <serial>.pCal and <serial>.fCal into <serial>.Cal")
                .callback(handlers::concat_calibrates)
        },
    },
    Builtin {
        aliases: &["make-derivative", "makeder"],
        declare: |b| {
            b.param("dry", "bool")
                .default_value("dry", false)
                .description("Assemble derivative packages (dry=)")
                .callback(handlers::make_derivative)
        },
    },
    Builtin {
        aliases: &["help"],
        declare: |b| {
            b.description("List available commands")
                .callback(handlers::help)
        },
    },
    Builtin {
        aliases: &["exit"],
        declare: |b| b.description("Leave calbr").callback(|_, _| Ok(Flow::Exit)),
    },
    Builtin {
        aliases: &["quit"],
        declare: |b| b.description("Leave calbr").callback(|_, _| Ok(Flow::Exit)),
    },
];

/// Register every built-in command with the overrides in `settings`.
///
/// # Errors
///
/// Returns a configuration error for an override naming no built-in
/// command, and any registration error from building or registering.
pub fn register_builtins(registry: &mut Registry, settings: &Settings) -> Result<()> {
    if let Some(unknown) = settings
        .commands
        .keys()
        .find(|key| !BUILTINS.iter().any(|builtin| builtin.answers_to(key)))
    {
        return Err(CalbrError::Config(format!(
            "[commands.{unknown}]: no such command"
        )));
    }

    for builtin in BUILTINS {
        let overrides = settings
            .commands
            .iter()
            .filter(|(key, _)| builtin.answers_to(key))
            .map(|(key, over)| (key.as_str(), over));

        let mut builder = (builtin.declare)(CommandElement::builder(builtin.aliases.iter().copied()));
        for (key, over) in overrides {
            builder = apply_override(builder, key, over)?;
        }
        registry.register(builder.build()?)?;
    }
    Ok(())
}

fn apply_override(
    mut builder: ElementBuilder,
    key: &str,
    over: &CommandOverride,
) -> Result<ElementBuilder> {
    tracing::debug!(command = key, ?over, "Applying command override");
    for alias in &over.aliases {
        builder = builder.alias(alias.clone());
    }
    if let Some(description) = &over.description {
        builder = builder.description(description.clone());
    }
    for (param, value) in over.typed_defaults(key)? {
        builder = builder.default_value(param, value);
    }
    Ok(builder)
}

//! Generates an Icinga 2 `CheckCommand` definition from a clap command.

use clap::ArgAction;

pub struct CommandDescription {
    arguments: Vec<ArgumentDescription>,
}

pub struct ArgumentDescription {
    key: ArgumentKey,
    value: String,
    description: Option<String>,
    kind: ArgumentKind,
    default_value: Option<String>,
}

enum ArgumentKey {
    Long(String),
    Positional(String),
}

#[derive(PartialEq)]
enum ArgumentKind {
    Flag,
    Single,
    Repeated,
}

#[derive(Debug, thiserror::Error)]
pub enum ToIcingaCommandError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid executable path")]
    InvalidExecutablePath,
    #[error("error converting to command description: {0}")]
    CommandDescriptionFromError(#[from] CommandDescriptionFromError),
}

impl CommandDescription {
    pub fn to_icinga_command(&self, name: &str) -> Result<String, ToIcingaCommandError> {
        let current_exe = std::env::current_exe()?
            .to_str()
            .ok_or(ToIcingaCommandError::InvalidExecutablePath)?
            .to_owned();

        Ok(self.to_icinga_command_for(name, &current_exe))
    }

    fn to_icinga_command_for(&self, name: &str, exe: &str) -> String {
        let mut out = format!("object CheckCommand \"{name}\" {{\n");

        out.push_str(&format!("  command = [ \"{}\" ]\n", escape_string(exe)));
        out.push_str("  arguments = {\n");
        for (order, arg) in self.arguments.iter().enumerate() {
            let key = match &arg.key {
                ArgumentKey::Long(long) => format!("--{long}"),
                ArgumentKey::Positional(id) => id.clone(),
            };
            out.push_str(&format!("  \"{}\" = {{\n", key));

            if arg.kind == ArgumentKind::Flag {
                out.push_str(&format!("    set_if = \"${}$\"\n", arg.value));
            } else {
                out.push_str(&format!("    value = \"${}$\"\n", arg.value));
            }

            match arg.key {
                ArgumentKey::Positional(_) => {
                    out.push_str("    skip_key = true\n");
                    out.push_str(&format!("    order = {}\n", order + 1));
                }
                ArgumentKey::Long(_) if arg.kind == ArgumentKind::Repeated => {
                    out.push_str("    repeat_key = true\n");
                }
                ArgumentKey::Long(_) => {}
            }

            if let Some(description) = &arg.description {
                out.push_str(&format!(
                    "    description = \"{}\"\n",
                    escape_string(description)
                ));
            }

            out.push_str("  }\n");
        }

        out.push_str("  }\n\n");

        for arg in &self.arguments {
            if let Some(default_value) = &arg.default_value {
                out.push_str(&format!(
                    "  vars.{} = \"{}\"\n",
                    arg.value,
                    escape_string(default_value)
                ));
            }
        }

        out.push_str("}\n");
        out
    }
}

fn escape_string(s: &str) -> String {
    ["\"", "$"]
        .iter()
        .fold(s.to_string(), |acc, c| acc.replace(c, &format!("\\{}", c)))
}

#[derive(Debug, thiserror::Error)]
pub enum CommandDescriptionFromError {
    #[error("option {0:?} has no long name")]
    MissingLongArgument(String),
}

impl TryFrom<&clap::Command> for CommandDescription {
    type Error = CommandDescriptionFromError;

    fn try_from(cmd: &clap::Command) -> Result<Self, Self::Error> {
        let mut arguments = Vec::new();
        let prefix = cmd.get_name().replace('-', "_");

        for arg in cmd.get_arguments() {
            if matches!(
                arg.get_action(),
                ArgAction::Help | ArgAction::HelpShort | ArgAction::HelpLong | ArgAction::Version
            ) {
                continue;
            }

            let id = arg.get_id().as_str().to_owned();
            let key = if arg.is_positional() {
                ArgumentKey::Positional(id)
            } else {
                let long = arg
                    .get_long()
                    .ok_or(CommandDescriptionFromError::MissingLongArgument(id))?;
                ArgumentKey::Long(long.to_owned())
            };

            let value = match &key {
                ArgumentKey::Long(name) | ArgumentKey::Positional(name) => {
                    format!("{}_{}", prefix, name.replace('-', "_"))
                }
            };
            let description = arg.get_help().map(|s| s.to_string());

            let kind = match arg.get_action() {
                ArgAction::SetTrue | ArgAction::SetFalse => ArgumentKind::Flag,
                ArgAction::Append => ArgumentKind::Repeated,
                _ => ArgumentKind::Single,
            };

            let default_value = arg
                .get_default_values()
                .first()
                .and_then(|v| v.to_str())
                .map(|s| s.to_string());

            arguments.push(ArgumentDescription {
                key,
                value,
                description,
                kind,
                default_value,
            });
        }

        Ok(CommandDescription { arguments })
    }
}

/// Print the Icinga command configuration if the GENERATE_ICINGA_COMMAND environment
/// variable is set and exit the process.
pub fn print_icinga_command_config_if_env_and_exit(
    name: &str,
    cmd: &clap::Command,
) -> Result<(), ToIcingaCommandError> {
    if std::env::var_os("GENERATE_ICINGA_COMMAND").is_none() {
        return Ok(());
    }

    let description = CommandDescription::try_from(cmd)?;
    let out = description.to_icinga_command(name)?;

    println!("{}", out.trim());
    std::process::exit(0);
}

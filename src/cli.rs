use std::path::PathBuf;

use anyhow::{Result, anyhow};

pub const DEFAULT_CONFIG_PATH: &str = "./gxp-provision.jsonc";

pub const USAGE: &str = "usage: gxp-provision [--config <path>] <command>
commands:
  capabilities                          list the capabilities of every model
  lookup <identifier>                   show one capability record
  validate <descriptor.json>            check a descriptor file
  identify <user-agent>                 identify a phone from its User-Agent
  configure <device.json> <raw.json>    build the provisioning parameters";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Capabilities,
    Lookup { identifier: String },
    Validate { descriptor_path: PathBuf },
    Identify { user_agent: String },
    Configure { device_path: PathBuf, raw_config_path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub command: Command,
}

pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs> {
    let mut args = args.into_iter();
    let mut config_path = None;
    let mut positional = Vec::new();
    let mut help = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("missing value for --config"))?;
                config_path = Some(PathBuf::from(value));
            }
            "-h" | "--help" => help = true,
            other if other.starts_with("--") => {
                return Err(anyhow!("unknown option: {other}\n{USAGE}"));
            }
            _ => positional.push(arg),
        }
    }

    if help {
        return Ok(CliArgs {
            config_path,
            command: Command::Help,
        });
    }

    let mut positional = positional.into_iter();
    let name = positional
        .next()
        .ok_or_else(|| anyhow!("missing command\n{USAGE}"))?;
    let operands: Vec<String> = positional.collect();

    let command = match (name.as_str(), operands.as_slice()) {
        ("capabilities", []) => Command::Capabilities,
        ("lookup", [identifier]) => Command::Lookup {
            identifier: identifier.clone(),
        },
        ("validate", [path]) => Command::Validate {
            descriptor_path: PathBuf::from(path),
        },
        ("identify", [user_agent]) => Command::Identify {
            user_agent: user_agent.clone(),
        },
        ("configure", [device, raw_config]) => Command::Configure {
            device_path: PathBuf::from(device),
            raw_config_path: PathBuf::from(raw_config),
        },
        (
            "capabilities" | "lookup" | "validate" | "identify" | "configure",
            _,
        ) => {
            return Err(anyhow!("wrong number of arguments for {name}\n{USAGE}"));
        }
        (other, _) => return Err(anyhow!("unknown command: {other}\n{USAGE}")),
    };

    Ok(CliArgs {
        config_path,
        command,
    })
}

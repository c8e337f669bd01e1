use std::env;
use std::fs;
use std::io::{self, Read};

use tools::{ScriptError, replay};
use tracing_subscriber::EnvFilter;
use view::{ConfigError, DashboardConfig};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("read {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), CliError> {
    let mut args = env::args().skip(1);
    let mut script_path: Option<String> = None;
    let mut seed: u64 = 0;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let v = args
                    .next()
                    .ok_or_else(|| CliError::Usage("--seed requires a value".to_string()))?;
                seed = v
                    .parse()
                    .map_err(|_| CliError::Usage(format!("bad seed `{v}`")))?;
            }
            "-h" | "--help" => {
                println!("{}", usage());
                return Ok(());
            }
            s if s.starts_with('-') && s != "-" => {
                return Err(CliError::Usage(format!("unknown arg: {s}\n\n{}", usage())));
            }
            _ => script_path = Some(arg),
        }
    }

    let script = match script_path.as_deref() {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| CliError::Io {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            buf
        }
        Some(path) => fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_string(),
            source,
        })?,
    };

    let config = DashboardConfig::from_env()?;
    let out = replay(&script, config, seed)?;
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn usage() -> String {
    [
        "geosense - replay a scripted dashboard session headlessly",
        "",
        "usage: geosense [--seed N] [SCRIPT|-]",
        "",
        "Reads commands from SCRIPT (or stdin) and prints the final state as JSON.",
        "Config comes from GEOSENSE_CONFIG (path to JSON) plus GEOSENSE_* overrides.",
        "",
        "commands:",
        "  start | show <section> | mode <citizen|expert> | toggle <layer> <on|off>",
        "  locate <lat, lon|denied|unsupported> | tick <ms> | load | map-error <msg>",
        "  set <id> <value> | select <group> <value> | analyze | plan-route",
        "  open|close <route|post> | submit-post | upvote <id> | chatbot | chat",
        "  click <id>",
    ]
    .join("\n")
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mindgraph CLI entrypoint.
//!
//! Works on generated diagram payloads without a render surface: print the payload
//! schema, validate a payload, or import one and print its render view as JSON.
//!
//! Log output goes to stderr and is filtered by `MINDGRAPH_LOG` (default `info`).

use std::error::Error;
use std::fs;

use serde_json::Value;
use tracing_subscriber::EnvFilter;

use mindgraph::config::EngineConfig;
use mindgraph::import::{import_into, parse_payload, payload_schema};
use mindgraph::store::GraphStore;
use mindgraph::surface::{HeadlessSurface, RenderView};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} schema\n  {program} validate <payload.json>\n  {program} import <payload.json> [--config <config.json>]\n\nschema prints the JSON Schema generated diagrams must follow.\nvalidate checks a payload and exits with status 1 if it is rejected.\nimport validates the payload, imports it and prints the render view (nodes back to front).\n\nSet MINDGRAPH_LOG (e.g. `debug`) to change log verbosity."
    );
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum Command {
    #[default]
    Schema,
    Validate,
    Import,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    command: Command,
    payload: Option<String>,
    config: Option<String>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let command = match args.next().as_deref() {
        Some("schema") => Command::Schema,
        Some("validate") => Command::Validate,
        Some("import") => Command::Import,
        _ => return Err(()),
    };
    let mut options = CliOptions {
        command,
        ..CliOptions::default()
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                if options.config.is_some() || options.command != Command::Import {
                    return Err(());
                }
                let path = args.next().ok_or(())?;
                options.config = Some(path);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.payload.is_some() {
                    return Err(());
                }
                options.payload = Some(arg);
            }
        }
    }

    match options.command {
        Command::Schema if options.payload.is_some() => Err(()),
        Command::Validate | Command::Import if options.payload.is_none() => Err(()),
        _ => Ok(options),
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("MINDGRAPH_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(options: CliOptions) -> Result<bool, Box<dyn Error>> {
    match options.command {
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&payload_schema())?);
            Ok(true)
        }
        Command::Validate => {
            let path = options.payload.ok_or("missing payload path")?;
            let raw = fs::read_to_string(&path)?;
            match parse_payload(&raw) {
                Ok(graph) => {
                    let (nodes, edges) = (graph.nodes().len(), graph.edges().len());
                    println!("{path}: ok ({nodes} nodes, {edges} edges)");
                    Ok(true)
                }
                Err(err) => {
                    for issue in &err.issues {
                        println!("{path}: {issue}");
                    }
                    Ok(false)
                }
            }
        }
        Command::Import => {
            let path = options.payload.ok_or("missing payload path")?;
            let config = match options.config {
                Some(config) => EngineConfig::load(config)?,
                None => EngineConfig::default(),
            };
            let payload: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;

            let mut store = GraphStore::new(&config);
            let mut surface = HeadlessSurface::default();
            import_into(&mut store, &mut surface, &payload)?;

            for (kind, count) in store.kind_counts() {
                eprintln!("{kind}: {count}");
            }
            let view = RenderView::of(store.graph());
            println!("{}", serde_json::to_string_pretty(&view)?);
            Ok(true)
        }
    }
}

fn main() {
    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "mindgraph".to_owned());

    let options = match parse_options(args) {
        Ok(options) => options,
        Err(()) => {
            print_usage(&program);
            std::process::exit(2);
        }
    };

    init_logging();

    match run(options) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("mindgraph: {err}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions, Command};

    fn args(raw: &[&str]) -> impl Iterator<Item = String> {
        raw.iter()
            .map(|arg| (*arg).to_owned())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn parses_schema() {
        let options = parse_options(args(&["schema"])).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_validate_with_payload() {
        let options = parse_options(args(&["validate", "diagram.json"])).expect("parse options");
        assert_eq!(options.command, Command::Validate);
        assert_eq!(options.payload.as_deref(), Some("diagram.json"));
        assert_eq!(options.config, None);
    }

    #[test]
    fn parses_import_with_config_in_any_order() {
        let options = parse_options(args(&["import", "--config", "c.json", "d.json"]));
        let options = options.expect("parse options");
        assert_eq!(options.command, Command::Import);
        assert_eq!(options.payload.as_deref(), Some("d.json"));
        assert_eq!(options.config.as_deref(), Some("c.json"));

        let options = parse_options(args(&["import", "d.json", "--config", "c.json"]));
        let options = options.expect("parse options");
        assert_eq!(options.payload.as_deref(), Some("d.json"));
    }

    #[test]
    fn rejects_missing_or_unknown_command() {
        parse_options(args(&[])).unwrap_err();
        parse_options(args(&["render"])).unwrap_err();
    }

    #[test]
    fn rejects_missing_payload() {
        parse_options(args(&["validate"])).unwrap_err();
        parse_options(args(&["import", "--config", "c.json"])).unwrap_err();
    }

    #[test]
    fn rejects_config_outside_import() {
        parse_options(args(&["validate", "d.json", "--config", "c.json"])).unwrap_err();
    }

    #[test]
    fn rejects_duplicates_and_unknown_flags() {
        parse_options(args(&["validate", "a.json", "b.json"])).unwrap_err();
        let twice = ["import", "a.json", "--config", "x", "--config", "y"];
        parse_options(args(&twice)).unwrap_err();
        parse_options(args(&["validate", "a.json", "--nope"])).unwrap_err();
        parse_options(args(&["schema", "extra"])).unwrap_err();
    }

    #[test]
    fn rejects_missing_config_value() {
        parse_options(args(&["import", "a.json", "--config"])).unwrap_err();
    }
}

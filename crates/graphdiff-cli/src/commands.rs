use std::path::Path as FsPath;

use anyhow::{anyhow, Context};
use graphdiff_core::{DiffConfig, ObjectDiffer};
use graphdiff_types::{Path, Value};

use crate::cli::*;
use crate::render;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Diff(args) => {
            print!("{}", diff_report(&args)?);
            Ok(())
        }
        Command::Config(args) => cmd_config(args),
    }
}

fn load_config(path: Option<&FsPath>) -> anyhow::Result<DiffConfig> {
    match path {
        Some(path) => DiffConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(DiffConfig::default()),
    }
}

fn read_document(path: &FsPath) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    Ok(Value::from(json))
}

/// Run a comparison and render the requested report.
pub fn diff_report(args: &DiffArgs) -> anyhow::Result<String> {
    let config = load_config(args.config.as_deref())?;
    let working = read_document(&args.working)?;
    let base = read_document(&args.base)?;

    let differ = ObjectDiffer::new(config);
    let root = differ.diff(&working, &base);
    tracing::debug!(nodes = root.len(), changed = root.has_changes(), "comparison finished");

    let node = match &args.path {
        Some(text) => {
            let path: Path = text.parse()?;
            root.child(&path)
                .ok_or_else(|| anyhow!("nothing was compared at {path}"))?
        }
        None => &root,
    };

    if !node.has_changes() && !args.all {
        return Ok("No changes.\n".to_string());
    }

    let report = match args.format {
        OutputFormat::Text => render::tree(node, args.all),
        OutputFormat::Paths => {
            let mut out = String::new();
            for change in node.changes() {
                out.push_str(&render::change_line(change));
                out.push('\n');
            }
            out
        }
    };
    Ok(report)
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

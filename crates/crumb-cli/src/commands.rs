use std::io::Write;

use anyhow::{bail, Context};
use colored::Colorize;
use crumb_path::{Crumb, Path};
use crumb_store::{Backend, FileStore, Store, StoreConfig};
use serde_json::json;

use crate::cli::*;

pub fn run_command(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    if let Command::Parse(args) = &cli.command {
        return cmd_parse(args, &cli.format, out);
    }
    let config = store_config(&cli)?;
    if let Command::List = &cli.command {
        return cmd_list(&config, &cli.format, out);
    }

    let store = config.open().context("opening store")?;
    match cli.command {
        Command::Get(args) => cmd_get(store.as_ref(), args, &cli.format, out),
        Command::Set(args) => cmd_set(store.as_ref(), args, out),
        Command::Delete(args) => {
            let path = parse_path(&args.path)?;
            store.delete(&path)?;
            writeln!(out, "{} Deleted {}", "✓".green(), path.to_string().bold())?;
            Ok(())
        }
        Command::Clear => {
            store.delete_all()?;
            writeln!(out, "{} Store cleared.", "✓".green().bold())?;
            Ok(())
        }
        Command::List | Command::Parse(_) => Ok(()),
    }
}

fn store_config(cli: &Cli) -> anyhow::Result<StoreConfig> {
    if let Some(file) = &cli.config {
        return StoreConfig::load(file)
            .with_context(|| format!("loading config {}", file.display()));
    }
    let root = cli.root.clone().unwrap_or_else(|| DEFAULT_ROOT.into());
    Ok(StoreConfig::file(root))
}

fn parse_path(text: &str) -> anyhow::Result<Path> {
    Ok(text.parse::<Path>()?)
}

fn cmd_get(
    store: &dyn Store,
    args: GetArgs,
    format: &OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let path = parse_path(&args.path)?;
    let bytes = store.read(&path)?;
    let text = std::str::from_utf8(&bytes).ok();
    match format {
        OutputFormat::Text => match text {
            Some(text) if !args.hex => writeln!(out, "{text}")?,
            _ => writeln!(out, "{}", hex::encode(&bytes))?,
        },
        OutputFormat::Json => {
            let doc = json!({
                "path": path.to_string(),
                "len": bytes.len(),
                "utf8": text,
                "hex": hex::encode(&bytes),
            });
            writeln!(out, "{doc}")?;
        }
    }
    Ok(())
}

fn cmd_set(store: &dyn Store, args: SetArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let path = parse_path(&args.path)?;
    let bytes = if args.json {
        let value: serde_json::Value =
            serde_json::from_str(&args.value).context("value is not valid JSON")?;
        serde_json::to_vec(&value)?
    } else {
        args.value.into_bytes()
    };
    store.write(&path, &bytes)?;
    writeln!(
        out,
        "{} Wrote {} bytes to {}",
        "✓".green(),
        bytes.len(),
        path.to_string().bold()
    )?;
    Ok(())
}

fn cmd_list(config: &StoreConfig, format: &OutputFormat, out: &mut impl Write) -> anyhow::Result<()> {
    let root = match (&config.backend, &config.root) {
        (Backend::File, Some(root)) => root,
        (backend, _) => bail!("list needs a file backend with a root, found {backend:?}"),
    };
    let paths = FileStore::new(root.clone()).paths()?;
    match format {
        OutputFormat::Text => {
            if paths.is_empty() {
                writeln!(out, "No values stored.")?;
            }
            for path in &paths {
                writeln!(out, "{}", path.to_string().cyan())?;
            }
        }
        OutputFormat::Json => {
            let names: Vec<String> = paths.iter().map(Path::to_string).collect();
            writeln!(out, "{}", json!(names))?;
        }
    }
    Ok(())
}

fn cmd_parse(args: &ParseArgs, format: &OutputFormat, out: &mut impl Write) -> anyhow::Result<()> {
    let path = parse_path(&args.path)?;
    match format {
        OutputFormat::Text => {
            writeln!(out, "Canonical: {}", path.to_string().bold())?;
            for (i, crumb) in path.iter().enumerate() {
                match crumb {
                    Crumb::Key(key) => writeln!(out, "  {i}: key {}", format!("{key:?}").green())?,
                    Crumb::Index(index) => writeln!(out, "  {i}: index {}", index.to_string().yellow())?,
                }
            }
        }
        OutputFormat::Json => {
            let doc = json!({
                "canonical": path.to_string(),
                "crumbs": path.crumbs(),
            });
            writeln!(out, "{doc}")?;
        }
    }
    Ok(())
}

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use eventpipe::cli::{Cli, Commands};
use eventpipe::{compile_asset, Document, DocumentSet, Registry, TraceSink};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Validate { file } => validate(&file),
        Commands::Run { file, input, trace } => run(&file, input.as_deref(), trace),
    }
}

/// Load an asset definition, accepting JSON or YAML by extension.
fn load_asset(path: &Path) -> Result<serde_json::Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yml") | Some("yaml") => serde_yaml::from_str(&text)
            .with_context(|| format!("invalid YAML in {}", path.display())),
        _ => serde_json::from_str(&text)
            .with_context(|| format!("invalid JSON in {}", path.display())),
    }
}

fn validate(file: &Path) -> Result<()> {
    let asset = load_asset(file)?;
    let registry = Registry::with_defaults();

    match compile_asset(&asset, &registry, &TraceSink::null()) {
        Ok(_) => {
            println!("{}: ok", file.display());
            Ok(())
        }
        Err(err) => anyhow::bail!("{}: {}", file.display(), err.render_chain()),
    }
}

fn run(file: &Path, input: Option<&Path>, trace: bool) -> Result<()> {
    let asset = load_asset(file)?;
    let registry = Registry::with_defaults();
    let tracer = if trace {
        TraceSink::new(|line| eprintln!("{line}"))
    } else {
        TraceSink::null()
    };

    let pipeline = compile_asset(&asset, &registry, &tracer)
        .map_err(|err| anyhow::anyhow!("{}: {}", file.display(), err.render_chain()))?;

    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let value: serde_json::Value = serde_json::from_str(&line)
            .with_context(|| format!("invalid document on line {}", number + 1))?;

        let mut docs = DocumentSet::new();
        let handle = docs.insert(Document::from_value(value));
        for surviving in pipeline.apply(&mut docs, vec![handle]) {
            serde_json::to_writer(&mut out, docs.get(surviving).root())?;
            out.write_all(b"\n")?;
        }
    }

    Ok(())
}

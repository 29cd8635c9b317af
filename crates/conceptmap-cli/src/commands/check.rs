//! Check command: validate a DSL file

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use conceptmap_core::{parse_dsl, ParseWarningKind};

use crate::output::{to_json, OutputFormat};
use crate::AppContext;

#[derive(Args)]
pub struct CheckArgs {
    /// DSL file to validate
    pub file: PathBuf,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: &CheckArgs, ctx: &AppContext) -> anyhow::Result<()> {
    tracing::info!("Checking {:?}", args.file);

    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let parsed = parse_dsl(&text);

    if ctx.format == OutputFormat::Json {
        println!("{}", to_json(&parsed)?);
    }

    if let Some(error) = parsed.error() {
        if ctx.format == OutputFormat::Table {
            eprintln!("error: {}:{}", args.file.display(), error);
        }
        anyhow::bail!("{} is not valid", args.file.display());
    }

    if ctx.format == OutputFormat::Table {
        println!(
            "{}: {} predicates, {} definitions, {} warnings",
            args.file.display(),
            parsed.predicates.len(),
            parsed.definitions.len(),
            parsed.warnings.len()
        );
        for warning in &parsed.warnings {
            let kind = match warning.kind {
                ParseWarningKind::OrphanedDefinition => "orphaned definition",
                ParseWarningKind::MissingDefinition => "missing definition",
            };
            println!("  warning ({}): {}:{}", kind, args.file.display(), warning);
        }
    }

    if args.strict && !parsed.warnings.is_empty() {
        anyhow::bail!(
            "{} has {} warnings",
            args.file.display(),
            parsed.warnings.len()
        );
    }

    Ok(())
}

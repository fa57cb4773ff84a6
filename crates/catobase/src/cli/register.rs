//! Register commands - Tag one file, or every matching file under a directory

use crate::cli::context::CliContext;
use crate::cli::error::HelpfulError;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RegisterArgs {
    pub path: PathBuf,
    pub categories: Vec<String>,
    pub snapshot: bool,
    pub json: bool,
}

#[derive(Debug, Clone)]
pub struct RegisterDirArgs {
    pub dir: PathBuf,
    pub pattern: String,
    pub keep_going: bool,
    pub json: bool,
}

pub fn run(args: RegisterArgs, ctx: &CliContext) -> anyhow::Result<()> {
    let registrar = ctx.registrar()?;
    registrar
        .register_file(&args.path, &args.categories, args.snapshot)
        .map_err(HelpfulError::from)?;

    if args.json {
        let payload = serde_json::json!({
            "path": args.path.display().to_string(),
            "categories": args.categories,
            "snapshot": args.snapshot,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!(
            "Registered {} [{}]",
            args.path.display(),
            args.categories.join(", ")
        );
    }
    Ok(())
}

pub fn run_dir(args: RegisterDirArgs, ctx: &CliContext) -> anyhow::Result<()> {
    let registrar = ctx.registrar()?;

    if !args.keep_going {
        let registered = registrar
            .register_files(&args.dir, &args.pattern)
            .map_err(|e| {
                HelpfulError::from(e).with_suggestion(
                    "TRY: --keep-going to skip files that fail and continue",
                )
            })?;

        if args.json {
            let payload = serde_json::json!({
                "registered": display_paths(&registered),
                "failures": [],
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        } else {
            print_registered(&registered);
        }
        return Ok(());
    }

    let report = registrar
        .register_files_lenient(&args.dir, &args.pattern)
        .map_err(HelpfulError::from)?;

    if args.json {
        let failures: Vec<_> = report
            .failures
            .iter()
            .map(|f| {
                serde_json::json!({
                    "path": f.path.display().to_string(),
                    "error": f.error.to_string(),
                })
            })
            .collect();
        let payload = serde_json::json!({
            "registered": display_paths(&report.registered),
            "failures": failures,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print_registered(&report.registered);
        if !report.failures.is_empty() {
            println!();
            println!("{} files failed:", report.failures.len());
            for failure in &report.failures {
                println!("  {}: {}", failure.path.display(), failure.error);
            }
        }
    }
    Ok(())
}

fn display_paths(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().map(|p| p.display().to_string()).collect()
}

fn print_registered(paths: &[PathBuf]) {
    if paths.is_empty() {
        println!("No matching files.");
        return;
    }
    for path in paths {
        println!("{}", path.display());
    }
    println!();
    println!("Registered {} files", paths.len());
}

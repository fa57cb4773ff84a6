//! Category command - Manage the reference category listing

use crate::cli::context::CliContext;
use crate::cli::error::HelpfulError;
use catobase_store::{create_category_listing, delete_category_entry, read_listing};
use clap::Subcommand;
use std::path::{Path, PathBuf};

/// Subcommands for category listings
#[derive(Subcommand, Debug, Clone)]
pub enum CategoryAction {
    /// Create a new listing (never overwrites an existing one)
    Create {
        /// Labels to write, one per line, in order
        #[arg(required = true)]
        labels: Vec<String>,
        /// Listing file (defaults to the configured reference listing)
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Remove every line equal to LABEL
    Delete {
        label: String,
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Show the labels in a listing
    List {
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
}

impl CategoryAction {
    pub fn wants_json(&self) -> bool {
        match self {
            CategoryAction::Create { json, .. }
            | CategoryAction::Delete { json, .. }
            | CategoryAction::List { json, .. } => *json,
        }
    }
}

pub fn run(action: CategoryAction, ctx: &CliContext) -> anyhow::Result<()> {
    match action {
        CategoryAction::Create { labels, file, json } => {
            create(&labels, &ctx.listing_path(file), json)
        }
        CategoryAction::Delete { label, file, json } => {
            delete(&label, &ctx.listing_path(file), json)
        }
        CategoryAction::List { file, json } => list(&ctx.listing_path(file), json),
    }
}

fn create(labels: &[String], path: &Path, json: bool) -> anyhow::Result<()> {
    create_category_listing(labels, path).map_err(HelpfulError::from)?;

    if json {
        print_listing_json(path, labels)?;
    } else {
        println!("Created {} with {} categories", path.display(), labels.len());
    }
    Ok(())
}

fn delete(label: &str, path: &Path, json: bool) -> anyhow::Result<()> {
    delete_category_entry(label, path).map_err(HelpfulError::from)?;
    let remaining = read_listing(path).map_err(HelpfulError::from)?;

    if json {
        print_listing_json(path, &remaining)?;
    } else {
        println!("Removed '{}' from {}", label, path.display());
        println!("{} categories remain", remaining.len());
    }
    Ok(())
}

fn list(path: &Path, json: bool) -> anyhow::Result<()> {
    let labels = read_listing(path).map_err(HelpfulError::from)?;

    if json {
        return print_listing_json(path, &labels);
    }

    if labels.is_empty() {
        println!("No categories in {}", path.display());
        println!();
        println!("Create a listing with:");
        println!("  catobase category create Books Movies Music");
        return Ok(());
    }

    for label in &labels {
        println!("{}", label);
    }
    Ok(())
}

fn print_listing_json(path: &Path, labels: &[String]) -> anyhow::Result<()> {
    let payload = serde_json::json!({
        "path": path.display().to_string(),
        "categories": labels,
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

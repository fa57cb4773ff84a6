//! Get command - Query the registry by path pattern and categories

use crate::cli::context::CliContext;
use crate::cli::error::HelpfulError;
use catobase_store::{CatobaseError, Record};

#[derive(Debug, Clone)]
pub struct GetArgs {
    pub pattern: String,
    pub categories: Vec<String>,
    /// Print whole records instead of paths
    pub long: bool,
    pub json: bool,
}

pub fn run(args: GetArgs, ctx: &CliContext) -> anyhow::Result<()> {
    let records = ctx
        .query()
        .find(&args.pattern, &args.categories)
        .map_err(|e| query_error(e, &args))?;

    if args.json {
        let output = if args.long {
            serde_json::to_string_pretty(&records)?
        } else {
            let paths: Vec<&str> = records.iter().map(|r| r.subject_path.as_str()).collect();
            serde_json::to_string_pretty(&paths)?
        };
        println!("{}", output);
        return Ok(());
    }

    for record in &records {
        if args.long {
            println!(
                "{}  [{}]  {}",
                record.subject_path,
                record.categories.join(", "),
                registered_label(record)
            );
        } else {
            println!("{}", record.subject_path);
        }
    }
    Ok(())
}

/// Describe the query only when the store error carries no context of its own.
fn query_error(err: CatobaseError, args: &GetArgs) -> HelpfulError {
    let helpful = HelpfulError::from(err);
    if helpful.context.is_some() {
        return helpful;
    }
    helpful.with_context(format!(
        "Query: pattern '{}', categories [{}]",
        args.pattern,
        args.categories.join(", ")
    ))
}

/// Registration time as `YYYY-MM-DD HH:MM:SS +HH:MM`, or the raw field if it does not parse.
fn registered_label(record: &Record) -> String {
    match record.registered_at() {
        Some(at) => at.format("%Y-%m-%d %H:%M:%S %:z").to_string(),
        None => record.timestamp.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    fn args() -> GetArgs {
        GetArgs {
            pattern: "file".to_string(),
            categories: vec!["Books".to_string()],
            long: false,
            json: false,
        }
    }

    #[test]
    fn test_query_error_keeps_existing_context() {
        let err = query_error(CatobaseError::RegistryNotFound(PathBuf::from(".catodb")), &args());

        assert_eq!(
            err.context.as_deref(),
            Some("The registry is created by an explicit setup step")
        );
        assert!(err.suggestions.iter().any(|s| s.contains("catobase init")));
    }

    #[test]
    fn test_query_error_describes_query_when_no_context() {
        let err = query_error(
            CatobaseError::io("failed to read registry", io::Error::new(io::ErrorKind::Other, "boom")),
            &args(),
        );

        assert_eq!(
            err.context.as_deref(),
            Some("Query: pattern 'file', categories [Books]")
        );
    }

    #[test]
    fn test_registered_label() {
        let parsed = Record::parse("/a|Books|2023-07-01T12:30:00Z").unwrap();
        assert_eq!(registered_label(&parsed), "2023-07-01 12:30:00 +00:00");

        let raw = Record::parse("/a|Books|yesterday").unwrap();
        assert_eq!(registered_label(&raw), "yesterday");
    }
}

//! Helpful error types for CLI commands
//!
//! Every error includes:
//! - What went wrong
//! - Context about the situation
//! - Suggestions for how to fix it

use catobase_store::CatobaseError;
use std::fmt;
use std::path::Path;

/// An error with helpful context and suggestions
#[derive(Debug)]
pub struct HelpfulError {
    /// The main error message
    pub message: String,
    /// Additional context about what was happening
    pub context: Option<String>,
    /// Suggestions for how to fix the error
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    /// Create a new helpful error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a suggestion for fixing the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add multiple suggestions
    pub fn with_suggestions(mut self, suggestions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.suggestions.extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    // === Common error constructors ===

    /// File does not exist
    pub fn file_not_found(path: &Path) -> Self {
        Self::new(format!("File not found: {}", path.display()))
            .with_context("Only existing files can be registered")
            .with_suggestions([
                format!("TRY: Check if the file exists: ls -la {}", path.display()),
                format!("TRY: Look for similar files: ls {}",
                    path.parent().map(|p| p.display().to_string()).unwrap_or_else(|| ".".to_string())),
            ])
    }

    /// Registry file has not been created
    pub fn registry_not_found(path: &Path) -> Self {
        Self::new(format!("Registry not found: {}", path.display()))
            .with_context("The registry is created by an explicit setup step")
            .with_suggestions([
                "TRY: catobase init".to_string(),
                "TRY: Point at an existing registry with --registry PATH".to_string(),
            ])
    }

    /// Category listing does not exist
    pub fn listing_not_found(path: &Path) -> Self {
        Self::new(format!("Category listing not found: {}", path.display()))
            .with_context("Registrations are checked against this listing")
            .with_suggestions([
                "TRY: catobase category create Books Movies Music".to_string(),
                "TRY: Point at an existing listing with --categories PATH".to_string(),
            ])
    }
}

impl From<CatobaseError> for HelpfulError {
    fn from(err: CatobaseError) -> Self {
        match &err {
            CatobaseError::RegistryNotFound(path) => HelpfulError::registry_not_found(path),
            CatobaseError::ListingNotFound(path) => HelpfulError::listing_not_found(path),
            CatobaseError::SubjectNotFound(path) => HelpfulError::file_not_found(path),
            CatobaseError::AlreadyExists(path) => HelpfulError::new(err.to_string())
                .with_context("Category listings are never overwritten")
                .with_suggestions([
                    format!("TRY: catobase category list --file {}", path.display()),
                    "TRY: Remove single labels with `catobase category delete LABEL`".to_string(),
                ]),
            CatobaseError::InvalidCategories { .. } => HelpfulError::new(err.to_string())
                .with_context("Every category must appear in the reference listing")
                .with_suggestion("TRY: catobase category list"),
            CatobaseError::InvalidLabel { .. } => HelpfulError::new(err.to_string())
                .with_context("Labels and paths are stored in a '|' and ',' delimited record")
                .with_suggestion("TRY: Rename the label or file without '|', ',' or line breaks"),
            CatobaseError::Pattern(_) => HelpfulError::new(err.to_string())
                .with_context("Patterns are regular expressions")
                .with_suggestions([
                    r"TRY: Examples: report, \.txt$, ^/data/.*2024".to_string(),
                    r"TRY: Escape literal dots and brackets: \. \[ \]".to_string(),
                ]),
            _ => HelpfulError::new(err.to_string()),
        }
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;

        if let Some(ctx) = &self.context {
            writeln!(f, "CONTEXT: {}", ctx)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            for suggestion in &self.suggestions {
                writeln!(f, "  {}", suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HelpfulError {}

/// Print an error as a JSON object on stdout.
pub fn print_json_error(err: &anyhow::Error) {
    let payload = match err.downcast_ref::<HelpfulError>() {
        Some(helpful) => serde_json::json!({
            "error": {
                "message": helpful.message,
                "context": helpful.context,
                "suggestions": helpful.suggestions,
            }
        }),
        None => serde_json::json!({
            "error": {
                "message": format!("{:#}", err),
                "context": null,
                "suggestions": [],
            }
        }),
    };
    match serde_json::to_string_pretty(&payload) {
        Ok(text) => println!("{}", text),
        Err(_) => eprintln!("{:?}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_helpful_error_display() {
        let err = HelpfulError::new("Something went wrong")
            .with_context("While processing data")
            .with_suggestion("Try again");

        let display = format!("{}", err);
        assert!(display.contains("ERROR: Something went wrong"));
        assert!(display.contains("CONTEXT: While processing data"));
        assert!(display.contains("Try again"));
    }

    #[test]
    fn test_registry_not_found_suggests_init() {
        let err: HelpfulError = CatobaseError::RegistryNotFound(PathBuf::from(".catodb")).into();

        let display = format!("{}", err);
        assert!(display.contains(".catodb"));
        assert!(display.contains("catobase init"));
    }

    #[test]
    fn test_invalid_categories_keeps_message() {
        let err: HelpfulError = CatobaseError::InvalidCategories {
            missing: vec!["Games".to_string()],
        }
        .into();

        assert_eq!(err.message, "some categories do not exist: Games");
        assert!(!err.suggestions.is_empty());
    }
}

//! Init command - Create the registry file and optionally a starter config

use crate::cli::context::CliContext;
use crate::cli::error::HelpfulError;
use catobase_store::config::CONFIG_FILE_NAME;
use catobase_store::Registry;

#[derive(Debug, Clone)]
pub struct InitArgs {
    /// Also write `catobase.toml` with the resolved paths
    pub write_config: bool,
    pub json: bool,
}

pub fn run(args: InitArgs, ctx: &CliContext) -> anyhow::Result<()> {
    let existed = ctx.registry().exists();
    let registry = Registry::init(&ctx.config.registry_path).map_err(|e| {
        HelpfulError::from(e)
            .with_context(format!("Registry path: {}", ctx.config.registry_path.display()))
            .with_suggestion("TRY: Ensure the directory exists and is writable")
    })?;

    let config_path = if args.write_config {
        let cwd = std::env::current_dir()?;
        let path = cwd.join(CONFIG_FILE_NAME);
        ctx.config.save(&path).map_err(HelpfulError::from)?;
        Some(path)
    } else {
        None
    };

    if args.json {
        let payload = serde_json::json!({
            "registry": registry.path().display().to_string(),
            "created": !existed,
            "config": config_path.as_ref().map(|p| p.display().to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if existed {
        println!("Registry already exists: {}", registry.path().display());
    } else {
        println!("Created registry: {}", registry.path().display());
    }
    if let Some(path) = config_path {
        println!("Wrote config: {}", path.display());
    }
    Ok(())
}

//! Command dispatch: maps parsed arguments to domain and service calls

use std::path::Path;

use tracing::{debug, instrument};

use crate::cli::args::{CamlCommands, Cli, Commands, ConfigCommands, TaxonomyCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::caml;
use crate::domain::{
    parse_taxonomy_field_values, replace_sp_tokens, script_editor_markup, TaxonomyValue,
    TokenPrefix, TreeNodeConvert,
};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::FileSystem;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };

    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("determine current directory", e))?,
    };
    let settings = Settings::load(Some(&project_dir))?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Caml { command } => cmd_caml(&container, command),
        Commands::Taxonomy { command } => cmd_taxonomy(&container, command),
        Commands::Tokens {
            text,
            custom,
            server_relative,
        } => cmd_tokens(&container, text, *custom, *server_relative),
        Commands::Webpart { title, content } => {
            output::info(&script_editor_markup(title, content));
            Ok(())
        }
        Commands::Config { command } => cmd_config(&container, &project_dir, command),
        // Handled in main before settings are loaded
        Commands::Completion { .. } => Ok(()),
    }
}

#[instrument(skip(container))]
fn cmd_caml(container: &ServiceContainer, command: &CamlCommands) -> CliResult<()> {
    let rendered = match command {
        CamlCommands::And { fragments } => caml::and(fragments),
        CamlCommands::Or { fragments } => caml::or(fragments),
        CamlCommands::Combine { op, fragments } => caml::combine(*op, fragments),
        CamlCommands::Condition {
            op,
            field,
            value,
            value_type,
        } => {
            let value_type = value_type
                .as_deref()
                .unwrap_or(&container.settings.caml.default_value_type);
            Some(caml::condition(op, field, value, Some(value_type)))
        }
        CamlCommands::IsNull { field } => Some(caml::is_null(field)),
        CamlCommands::IsNotNull { field } => Some(caml::is_not_null(field)),
        CamlCommands::ById { id } => Some(caml::filter_by_id(*id)),
        CamlCommands::ByLookup { field, id } => Some(caml::filter_by_lookup_id(field, *id)),
        CamlCommands::ViewFields { fields } => Some(caml::wrap_view_fields(fields)),
        CamlCommands::OrderBy { fields } => Some(caml::wrap_order_by(fields)),
    };

    match rendered {
        Some(xml) => output::info(&xml),
        None => output::warning("no fragments given, no expression produced"),
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_taxonomy(container: &ServiceContainer, command: &TaxonomyCommands) -> CliResult<()> {
    match command {
        TaxonomyCommands::Tree {
            term_set,
            store,
            selected,
            json,
        } => {
            let service = container.taxonomy_service(store.as_deref())?;
            let tree = service.get_term_tree(*term_set, *selected)?;
            debug!("tree depth: {}", tree.depth());
            if *json {
                let nested = serde_json::to_string_pretty(&tree.to_nested())
                    .map_err(|e| CliError::Usage(format!("serialize tree: {e}")))?;
                output::info(&nested);
            } else {
                output::info(&tree.to_tree_string());
            }
            Ok(())
        }
        TaxonomyCommands::Values { file } => {
            let content = container
                .fs
                .read_to_string(file)
                .map_err(|e| InfraError::io(format!("read {}", file.display()), e))?;
            let value: Option<TaxonomyValue> = serde_json::from_str(&content)
                .map_err(|e| CliError::InvalidArgs(format!("{}: {e}", file.display())))?;
            for label in parse_taxonomy_field_values(value.as_ref()) {
                output::info(&format!("{}\t{}", label.id, label.label));
            }
            Ok(())
        }
    }
}

fn cmd_tokens(
    container: &ServiceContainer,
    text: &str,
    custom: bool,
    server_relative: bool,
) -> CliResult<()> {
    let prefix = if custom {
        TokenPrefix::Custom
    } else {
        TokenPrefix::Standard
    };
    let ctx = &container.settings.page_context;
    if ctx.lacks_urls(server_relative) {
        let kind = if server_relative {
            "server-relative"
        } else {
            "absolute"
        };
        output::warning(&format!(
            "page_context has no {kind} URLs configured, tokens left as is"
        ));
    }
    output::info(&replace_sp_tokens(text, ctx, prefix, server_relative));
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    project_dir: &Path,
    command: &ConfigCommands,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            output::header("Config files");
            match global_config_path() {
                Some(p) => output::detail(&format!("global: {}", p.display())),
                None => output::detail("global: (no config directory)"),
            }
            output::detail(&format!("local:  {}", local_config_path(project_dir).display()));
        }
    }
    Ok(())
}

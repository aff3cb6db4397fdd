use backup_client_cli::records::STDIN_INPUT;
use backup_client_cli::resources::Resource;
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};
use query_expr::{SortOrder, Sorting};

#[derive(Parser)]
#[command(
    name = "client-cli",
    about = "Backup client CLI",
    version,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Pick which subcommand to use
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Filter, sort and print result records
    Show(ShowArgs),
    /// List the fields of a resource and their types
    Fields(FieldsArgs),
}

#[derive(Args)]
pub struct ShowArgs {
    /// Resource the records belong to, e.g., entries, metadata-changes, custom
    #[arg(value_parser = parse_resource)]
    pub resource: Resource,

    /// JSON file with an array of records; `-` reads from stdin
    #[arg(long, short = 'i', default_value = STDIN_INPUT)]
    pub input: String,

    /// JSON file with the field spec, required for the `custom` resource
    #[arg(long)]
    pub spec_file: Option<String>,

    #[command(flatten)]
    pub query: QueryArgs,

    /// Print the records as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct QueryArgs {
    /// Filter records, e.g.: 'size > 4k AND (file like /tmp OR hidden == true)'
    ///
    /// Operators: ==, !=, <, <=, >, >=, like.
    /// Aggregations: AND (and, &&), OR (or, ||); AND binds tighter than OR.
    #[arg(long, short = 'f', verbatim_doc_comment)]
    pub filter: Option<String>,

    /// Field to sort the records by
    #[arg(long, short = 'o')]
    pub order_by: Option<String>,

    /// Sort ordering, requires --order-by [default: desc]
    #[arg(long, value_parser = parse_ordering)]
    pub ordering: Option<SortOrder>,
}

#[derive(Args)]
pub struct FieldsArgs {
    /// Resource to describe
    #[arg(value_parser = parse_resource)]
    pub resource: Resource,

    /// JSON file with the field spec, required for the `custom` resource
    #[arg(long)]
    pub spec_file: Option<String>,
}

fn parse_resource(s: &str) -> Result<Resource, String> {
    s.parse()
}

fn parse_ordering(s: &str) -> Result<SortOrder, String> {
    s.parse().map_err(|e: query_expr::QueryError| e.to_string())
}

pub fn parse_args() -> Cli {
    let cli = Cli::parse();

    // Reject `--ordering` without `--order-by` as a usage error, before any input is read
    if let Commands::Show(args) = &cli.command {
        if let Err(e) =
            Sorting::from_options(args.query.order_by.as_deref(), args.query.ordering, None)
        {
            Cli::command()
                .error(ErrorKind::MissingRequiredArgument, e)
                .exit();
        }
    }

    cli
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_show_args() {
        let cli = Cli::try_parse_from([
            "client-cli",
            "-v",
            "show",
            "metadata-changes",
            "--input",
            "changes.json",
            "-f",
            "size > 4k",
            "-o",
            "size",
            "--ordering",
            "ASC",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Commands::Show(args) = cli.command else {
            panic!("Expected the show command");
        };
        assert_eq!(args.resource, Resource::MetadataChanges);
        assert_eq!(args.input, "changes.json");
        assert_eq!(args.query.filter.as_deref(), Some("size > 4k"));
        assert_eq!(args.query.order_by.as_deref(), Some("size"));
        assert_eq!(args.query.ordering, Some(SortOrder::Asc));
        assert!(!args.json);
    }

    #[test]
    fn test_parse_show_defaults_to_stdin() {
        let cli = Cli::try_parse_from(["client-cli", "show", "entries", "--json"]).unwrap();
        let Commands::Show(args) = cli.command else {
            panic!("Expected the show command");
        };
        assert_eq!(args.input, STDIN_INPUT);
        assert!(args.json);
        assert!(args.query.ordering.is_none());
    }

    #[test]
    fn test_parse_rejects_invalid_values() {
        assert!(Cli::try_parse_from(["client-cli", "show", "devices"]).is_err());
        assert!(
            Cli::try_parse_from(["client-cli", "show", "entries", "--ordering", "up"]).is_err()
        );
    }
}

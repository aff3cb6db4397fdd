use crate::argparse::ShowArgs;
use backup_client_cli::query_plan::QueryPlan;
use backup_client_cli::records::load_records;
use backup_client_cli::render::{render_json, render_table};
use backup_client_cli::resources::resolve_spec;
use backup_client_cli::CliError;
use log::info;

pub fn handle_show_command(args: ShowArgs) -> Result<(), Box<dyn std::error::Error>> {
    let spec = resolve_spec(args.resource, args.spec_file.as_deref())?;

    // Options are validated before reading any records
    let plan = QueryPlan::new(
        args.query.filter.as_deref(),
        args.query.order_by.as_deref(),
        args.query.ordering,
        spec.default_sorting.clone(),
    )
    .map_err(CliError::from)?;

    let records = load_records(&args.input)?;
    let total = records.len();
    let records = plan
        .apply(records, &spec.fields)
        .map_err(CliError::from)?;
    info!("Showing {} of {} {} records", records.len(), total, args.resource);

    if args.json {
        println!("{}", render_json(&records)?);
    } else {
        print!("{}", render_table(&records, &spec.fields));
    }

    Ok(())
}

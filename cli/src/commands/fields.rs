use crate::argparse::FieldsArgs;
use backup_client_cli::resources::resolve_spec;
use tabular::{Row, Table};

pub fn handle_fields_command(args: FieldsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let spec = resolve_spec(args.resource, args.spec_file.as_deref())?;

    #[allow(clippy::literal_string_with_formatting_args)]
    let mut table = Table::new("{:<}  {:<}")
        .with_row(Row::new().with_cell("field").with_cell("type"));
    for (field, field_type) in spec.fields.iter() {
        table.add_row(Row::new().with_cell(field).with_cell(field_type));
    }
    print!("{}", table);

    match spec.default_sorting {
        Some(sorting) => println!("\nDefault sorting: {}", sorting),
        None => println!("\nDefault sorting: none"),
    }

    Ok(())
}

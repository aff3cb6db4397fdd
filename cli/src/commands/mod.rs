mod fields;
mod show;

use crate::argparse::Commands;
pub use fields::handle_fields_command;
pub use show::handle_show_command;
use std::error::Error;

pub fn handle_command(command: Commands) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Show(args) => handle_show_command(args),
        Commands::Fields(args) => handle_fields_command(args),
    }
}

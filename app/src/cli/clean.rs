use std::path::PathBuf;

use modulo_lang_driver::Database;

#[derive(clap::Args)]
pub struct Args {
    /// Directory to clean; defaults to the current directory
    #[clap(value_parser, value_name = "DIR", default_value = ".")]
    dir: PathBuf,
}

pub fn exec(cmd: Args) -> Result<(), Vec<miette::Report>> {
    let db = Database::from_path(&cmd.dir);
    db.clean().map_err(|err| vec![miette::Report::new(err)])?;
    Ok(())
}

use std::path::{Path, PathBuf};

use modulo_lang_ast::ModuleName;
use modulo_lang_driver::Database;

#[derive(clap::Args)]
pub struct Args {
    #[clap(value_parser, value_name = "FILE")]
    filepath: PathBuf,
    /// Write a compiled object file next to the source
    #[clap(long)]
    emit_object: bool,
}

pub fn exec(cmd: Args) -> Result<(), Vec<miette::Report>> {
    let root = match cmd.filepath.parent() {
        Some(parent) if parent != Path::new("") => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let stem = cmd
        .filepath
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| vec![miette::miette!("Invalid file path: {}", cmd.filepath.display())])?;
    let module = ModuleName::from_string(stem);

    let mut db = Database::from_path(root);
    let outputs =
        db.load_module(&module).map_err(|err| vec![db.pretty_error(&module, err)])?;
    for line in outputs {
        println!("{line}");
    }
    if cmd.emit_object {
        db.write_object(&module).map_err(|err| vec![db.pretty_error(&module, err)])?;
    }
    println!("{} typechecked successfully!", cmd.filepath.display());
    Ok(())
}

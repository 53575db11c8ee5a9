use std::io::IsTerminal;

mod cli;

fn main() {
    miette::set_panic_hook();

    let result = cli::exec();

    // Output any errors
    if let Err(errors) = result {
        let mut stderr = std::io::stderr().lock();
        let colorize = std::io::stderr().is_terminal();
        modulo_lang_driver::render_reports_io(&mut stderr, &errors, colorize);
        std::process::exit(1);
    }
}

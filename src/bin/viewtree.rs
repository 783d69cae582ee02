use viewtree::{cli, logging};

fn main() {
    if let Err(err) = logging::init_logging() {
        eprintln!("warning: {err:#}");
    }
    if let Err(err) = cli::run_cli() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

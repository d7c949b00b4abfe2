use clap::Parser;
use huffcode::cli::{Cli, run};
use huffcode::log::init_subscriber;

fn main() {
    let cli = Cli::parse();
    init_subscriber(cli.log_level());

    match run(cli) {
        Ok(()) => {}
        Err(e) => println!("{e}"),
    }
}

use blockmode::cmd::Cli;
use clap::Parser;
use log::LevelFilter;

fn main() {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    if blockmode::log_error(cli.cmd.exe()).is_none() {
        std::process::exit(1);
    }
}

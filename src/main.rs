use clap::Parser;
use fern::colors::{Color, ColoredLevelConfig};
use log::error;
use mediakeep::cli::{self, Cli};

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose).expect("failed to initialize logging");

    if let Err(e) = cli::run(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let colors = ColoredLevelConfig::new()
        .debug(Color::BrightBlack)
        .info(Color::Green)
        .warn(Color::Yellow)
        .error(Color::Red);
    let level = if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Warn };
    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(std::time::SystemTime::now()),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

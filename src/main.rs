mod body;
mod config;
mod err;
mod http;
mod mime;
mod opt;
mod resolve;
mod routes;
mod tcp;

use clap::error::ErrorKind;
use clap::CommandFactory;

#[tokio::main]
async fn main() -> Result<(), err::DisplayError> {
    let options: opt::Options = clap::Parser::parse();

    env_logger::Builder::new()
        .filter_level(match options.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .init();

    let config = match config::Config::from_options(options) {
        Ok(config) => config,
        Err(errors) => opt::Options::command()
            .error(ErrorKind::ValueValidation, errors)
            .exit(),
    };

    log::debug!(
        "Configuration:\n\tHost: {:?}\n\tCache dir: {}\n\tDatabases dir: {}\n\tRoot: {}",
        config.addrs,
        config.roots.packages.display(),
        config.roots.databases.display(),
        config.roots.default.display(),
    );

    let listener = tcp::bind(&config.addrs).await?;
    log::info!("Serving on {}", listener.local_addr()?);

    let state = routes::State {
        roots: config.roots,
    };

    tokio::select! {
        result = http::run_simple_server(listener, state, routes::respond_to_request) => result?,
        result = tokio::signal::ctrl_c() => {
            result?;
            log::info!("Aborted by user.");
        }
    }

    log::info!("Stopped httpd.");

    Ok(())
}

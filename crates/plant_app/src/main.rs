use plant_app::app::{run, AppConfig};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid plantcare configuration: {err:#}");
            std::process::exit(1);
        }
    };
    if let Err(err) = run(config) {
        eprintln!("Failed to run plantcare: {err:#}");
        std::process::exit(1);
    }
}

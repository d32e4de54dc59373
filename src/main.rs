mod app;
mod cli;

use tracing_subscriber::EnvFilter;

fn main() {
    // Quiet unless RUST_LOG says otherwise
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    app::run(cli::parse());
}

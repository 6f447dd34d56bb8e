use anyhow::Result;
use clap::Parser;
use nlu_train::cli::{install_panic_hook, Cli};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nlu_train=info".parse()?),
        )
        .init();
    install_panic_hook();

    let cli = Cli::parse();
    cli.run()
}

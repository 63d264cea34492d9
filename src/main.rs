use clap::Parser;

fn main() -> anyhow::Result<()> {
    // Load .env early; ignore if missing.
    dotenvy::dotenv().ok();
    gapfill::cli::init_tracing();

    let cli = gapfill::cli::Cli::parse();
    gapfill::cli::run(cli)
}

//! sitedata - build-time content snapshots with a live API fallback.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use sitedata::{
    SiteDataConfig, StaticApi,
    cli::{Cli, Commands},
    data::{ArticleQuery, ResearcherQuery},
    generator, logger,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::set_quiet(cli.quiet);
    let config = load_config(&cli)?;

    // Single-threaded cooperative scheduling: fetches interleave at await points
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(run(&cli, &config))
}

/// Load and validate configuration: file, then environment, then CLI flags.
fn load_config(cli: &Cli) -> Result<SiteDataConfig> {
    let mut config = SiteDataConfig::load(&cli.config)?;
    config.apply_env(|key| std::env::var(key).ok());
    config.update_with_cli(cli);
    config.validate()?;
    Ok(config)
}

async fn run(cli: &Cli, config: &SiteDataConfig) -> Result<()> {
    let api = || StaticApi::from_config(config);

    match &cli.command {
        Commands::Generate => {
            generator::generate(config).await?;
        }
        Commands::Articles {
            featured,
            category,
            limit,
        } => {
            let query = ArticleQuery {
                featured: *featured,
                category: *category,
                limit: *limit,
            };
            print_json(&api().get_articles(&query).await)?;
        }
        Commands::Article { slug } => {
            let article = api().get_article_by_slug(slug).await?;
            print_json(&article)?;
        }
        Commands::Team => print_json(&api().get_team_members().await)?,
        Commands::Researchers {
            status,
            program,
            limit,
        } => {
            let query = ResearcherQuery {
                status: *status,
                program: program.clone(),
                limit: *limit,
            };
            print_json(&api().get_researchers(&query).await)?;
        }
        Commands::Tags => print_json(&api().get_tags().await)?,
        Commands::BuildInfo => print_json(&api().get_build_info().await)?,
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

mod report;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "feedback-cli")]
#[command(about = "Client feedback service command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Print the monthly per-project report and action plan
    Stats {
        /// Month to report on, formatted YYYY-MM
        #[arg(long)]
        month: String,

        /// Emit the same JSON document as `GET /api/stats`
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Create the feedback table if it does not exist
    Migrate,
    /// Check connectivity and print the server version
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = feedback_core::load_app_config()?;
    let pool = feedback_db::connect_pool(
        &config.database_url,
        feedback_db::PoolConfig::from_app_config(&config),
    )
    .await?;

    let result = run(&pool, cli.command).await;
    pool.close().await;
    result
}

async fn run(pool: &sqlx::PgPool, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Db {
            command: DbCommands::Migrate,
        } => {
            let applied = feedback_db::run_migrations(pool).await?;
            println!("schema ready ({applied} migration(s) applied)");
        }
        Commands::Db {
            command: DbCommands::Ping,
        } => {
            let version = feedback_db::server_version(pool).await?;
            let total = feedback_db::count_feedback(pool).await?;
            println!("{version}");
            println!("{total} feedback record(s) stored");
        }
        Commands::Stats { month, json } => {
            let report = feedback_db::get_monthly_report(pool, &month).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report::render_report(&report));
            }
        }
    }

    Ok(())
}

// command line interface

use crate::output::Output;
use crate::{Server, Store, Validation, data_summary};
use clap::{Parser, Subcommand};
use miette::Result;

#[derive(Parser)]
#[command(name = "finql", about = "Validated read-only SQL over a statement database")]
struct Cli {
    /// database connection url
    #[arg(long, short, env = "DATABASE_URL", global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// start as http server
    Serve {
        /// port number
        #[arg(long, short, default_value = "3000")]
        port: u16,

        /// host to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// validate and run one query
    Query {
        /// sql to run (select-only, gated)
        sql: String,

        /// print raw json instead of a table
        #[arg(long)]
        json: bool,
    },

    /// print the data summary
    Summary,

    /// print the introspected schema
    Schema,

    /// check a query against the gate without running it
    Validate {
        /// sql to check
        sql: String,
    },
}

pub async fn run() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host } => {
            let db = require_db(cli.db)?;
            Ok(Server::run(&db, &host, port).await?)
        }

        Commands::Query { sql, json } => {
            let query = match Validation::check(&sql) {
                Validation::Valid { query } => query,
                Validation::Invalid { reason, suggestion } => {
                    return Err(miette::miette!(help = suggestion, "{reason}"));
                }
            };

            let store = connect(cli.db).await?;
            let result = store.execute(&query).await?;

            if json {
                Output::raw(&result);
            } else {
                Output::pretty(&query, &result);
            }
            Ok(())
        }

        Commands::Summary => {
            let store = connect(cli.db).await?;
            let summary = data_summary(&store).await?;
            Output::summary(&summary);
            Ok(())
        }

        Commands::Schema => {
            let store = connect(cli.db).await?;
            let columns = store.schema().await?;
            Output::schema(&columns);
            Ok(())
        }

        Commands::Validate { sql } => match Validation::check(&sql) {
            Validation::Valid { .. } => {
                println!("ok");
                Ok(())
            }
            Validation::Invalid { reason, suggestion } => {
                Err(miette::miette!(help = suggestion, "{reason}"))
            }
        },
    }
}

fn require_db(db: Option<String>) -> Result<String> {
    db.ok_or_else(|| miette::miette!("database url required (--db or DATABASE_URL)"))
}

async fn connect(db: Option<String>) -> Result<Store> {
    let url = require_db(db)?;
    Ok(Store::connect(&url).await?)
}

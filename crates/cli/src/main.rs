use anyhow::Result;
use clap::{Parser, Subcommand};
use student_records_core::{
    CLIENT_QUERY_LIMIT, DEFAULT_HTTP_HOST, DEFAULT_HTTP_PORT, GRAPHQL_PATH, SortField,
    env_parse_with_default, env_string,
};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "student-records")]
#[command(about = "Student records manager with a GraphQL API", long_about = None)]
struct Cli {
    /// GraphQL endpoint for client commands [env: STUDENT_RECORDS_URL]
    #[arg(long, global = true)]
    url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the GraphQL server
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
        #[arg(short = 'H', long)]
        host: Option<String>,
        /// Keep records in memory instead of PostgreSQL (DATABASE_URL)
        #[arg(long)]
        memory: bool,
        /// Allowed CORS origin; repeatable. Any origin when omitted.
        #[arg(long = "cors-origin")]
        cors_origins: Vec<String>,
    },
    /// List students
    List {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long, default_value = "name")]
        sort_by: SortField,
        /// "desc" for descending, anything else ascending
        #[arg(long, default_value = "asc")]
        order: String,
        #[arg(short, long)]
        limit: Option<usize>,
        #[arg(long)]
        offset: Option<usize>,
    },
    Get {
        id: String,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        age: String,
        #[arg(long)]
        address: String,
    },
    /// Update the given fields of a student
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        age: Option<i32>,
        #[arg(long)]
        address: Option<String>,
    },
    Delete {
        id: String,
    },
    /// Interactive search: each stdin line is the current input, queried once it settles
    Search {
        #[arg(short, long, default_value_t = CLIENT_QUERY_LIMIT)]
        limit: usize,
    },
}

fn graphql_url(flag: Option<String>) -> String {
    flag.or_else(|| env_string("STUDENT_RECORDS_URL"))
        .unwrap_or_else(|| format!("http://{DEFAULT_HTTP_HOST}:{DEFAULT_HTTP_PORT}{GRAPHQL_PATH}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let url = graphql_url(cli.url);

    match cli.command {
        Commands::Serve { port, host, memory, mut cors_origins } => {
            let host = host
                .or_else(|| env_string("STUDENT_RECORDS_HOST"))
                .unwrap_or_else(|| DEFAULT_HTTP_HOST.to_owned());
            let port = port.unwrap_or_else(|| {
                env_parse_with_default("STUDENT_RECORDS_PORT", DEFAULT_HTTP_PORT)
            });
            if cors_origins.is_empty() {
                if let Some(raw) = env_string("STUDENT_RECORDS_CORS_ORIGINS") {
                    cors_origins = raw
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_owned)
                        .collect();
                }
            }
            commands::serve::run(host, port, memory, cors_origins).await?;
        },
        Commands::List { search, sort_by, order, limit, offset } => {
            commands::students::run_list(&url, search, sort_by, &order, limit, offset).await?;
        },
        Commands::Get { id } => commands::students::run_get(&url, &id).await?,
        Commands::Create { name, email, age, address } => {
            commands::students::run_create(&url, name, email, age, address).await?;
        },
        Commands::Update { id, name, email, age, address } => {
            commands::students::run_update(&url, &id, name, email, age, address).await?;
        },
        Commands::Delete { id } => commands::students::run_delete(&url, &id).await?,
        Commands::Search { limit } => commands::search::run(&url, limit).await?,
    }

    Ok(())
}

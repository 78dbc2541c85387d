use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use github_base::commands::validators;
use github_base::{
    GitHub, RequestOptions, commands::*, constants, constants::options as keys,
};
use reqwest::Method;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "github-base")]
#[command(about = "Send requests to the GitHub REST API")]
#[command(version)]
struct Cli {
    /// Options file (YAML); missing files are ignored
    #[arg(short, long, global = true, default_value_t = constants::config::DEFAULT_CONFIG_FILE.to_string())]
    config: String,

    /// Personal access token (overrides GITHUB_TOKEN and the options file)
    #[arg(long, global = true)]
    token: Option<String>,

    /// API base URL (overrides GITHUB_API_URL and the options file)
    #[arg(long, global = true)]
    apiurl: Option<String>,

    /// Print compact JSON instead of pretty-printed
    #[arg(long, global = true)]
    compact: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct RequestArgs {
    /// Option for this call: placeholder value or body field (repeatable)
    #[arg(short = 'o', long = "option", value_parser = validators::parse_key_value)]
    options: Vec<(String, Value)>,

    /// Query string pair (repeatable)
    #[arg(short = 'q', long = "query", value_parser = validators::parse_key_value)]
    query: Vec<(String, Value)>,

    /// Extra request header as name=value (repeatable)
    #[arg(short = 'H', long = "header", value_parser = validators::parse_key_value)]
    headers: Vec<(String, Value)>,

    /// JSON object merged into the call options
    #[arg(long)]
    data: Option<String>,

    /// Raw request payload, sent as-is
    #[arg(long)]
    body: Option<String>,

    /// Decode the response as JSON regardless of its content type
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a GET request
    Get {
        path: String,
        #[command(flatten)]
        args: RequestArgs,
    },
    /// Send a POST request
    Post {
        path: String,
        #[command(flatten)]
        args: RequestArgs,
    },
    /// Send a PUT request
    Put {
        path: String,
        #[command(flatten)]
        args: RequestArgs,
    },
    /// Send a PATCH request
    Patch {
        path: String,
        #[command(flatten)]
        args: RequestArgs,
    },
    /// Send a DELETE request
    Delete {
        path: String,
        #[command(flatten)]
        args: RequestArgs,
    },
    /// Fetch every page of a collection
    Paged {
        path: String,
        #[command(flatten)]
        args: RequestArgs,

        /// Fail when more than this many pages would be fetched
        #[arg(long)]
        max_pages: Option<usize>,

        /// Print pages as they arrive instead of one merged array
        #[arg(long)]
        stream: bool,
    },
    /// Print the request that would be sent, without sending it
    Resolve {
        /// HTTP method (get, post, put, patch, delete)
        #[arg(value_parser = validators::parse_method)]
        method: Method,
        path: String,
        #[command(flatten)]
        args: RequestArgs,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (method, path, args, paged) = match cli.command {
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "github-base",
                &mut std::io::stdout(),
            );
            return Ok(());
        }
        Commands::Get { path, args } => (Method::GET, path, args, None),
        Commands::Post { path, args } => (Method::POST, path, args, None),
        Commands::Put { path, args } => (Method::PUT, path, args, None),
        Commands::Patch { path, args } => (Method::PATCH, path, args, None),
        Commands::Delete { path, args } => (Method::DELETE, path, args, None),
        Commands::Paged {
            path,
            args,
            max_pages,
            stream,
        } => (Method::GET, path, args, Some((max_pages, stream))),
        Commands::Resolve { method, path, args } => {
            let context = build_context(&cli.config, cli.token, cli.apiurl, cli.compact, &args)?;
            validators::validate_path(&path)?;
            return ResolveCommand { method, path }.execute(&context).await;
        }
    };

    validators::validate_path(&path)?;
    let mut context = build_context(&cli.config, cli.token, cli.apiurl, cli.compact, &args)?;

    match paged {
        Some((max_pages, stream)) => {
            if let Some(max_pages) = max_pages {
                context.options.insert(keys::MAX_PAGES, max_pages);
            }
            PagedCommand { path, stream }.execute(&context).await
        }
        None => RequestCommand { method, path }.execute(&context).await,
    }
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "github_base=debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Instance options are layered file < environment < flags; call options
/// come from the subcommand's arguments.
fn build_context(
    config: &str,
    token: Option<String>,
    apiurl: Option<String>,
    compact: bool,
    args: &RequestArgs,
) -> Result<CommandContext> {
    validators::validate_payload_args(&args.data, &args.body)?;

    let mut instance = RequestOptions::load_if_exists(config)
        .with_context(|| format!("failed to load options from {}", config))?
        .merged_with(&RequestOptions::from_env());
    if let Some(token) = token {
        instance = instance.with_token(token);
    }
    if let Some(apiurl) = apiurl {
        instance = instance.with_apiurl(apiurl);
    }
    let github = GitHub::new(instance).context("invalid client options")?;

    Ok(CommandContext {
        github,
        options: call_options(args)?,
        compact,
    })
}

fn call_options(args: &RequestArgs) -> Result<RequestOptions> {
    let mut options = match &args.data {
        Some(data) => RequestOptions::from(validators::parse_data(data)?),
        None => RequestOptions::new(),
    };
    for (key, value) in &args.options {
        options.insert(key, value.clone());
    }
    for (name, value) in &args.query {
        options = options.with_query(name, value.clone());
    }
    for (name, value) in &args.headers {
        let value = match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        options = options.with_header(name, value);
    }
    if let Some(body) = &args.body {
        options = options.with_body(body.as_str());
    }
    if args.json {
        options = options.with_json(true);
    }
    Ok(options)
}

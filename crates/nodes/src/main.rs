//! `sora-nodes` -- command-line harness for the video-job nodes.
//!
//! Runs one node the way a node-graph host would and prints its output
//! (response envelope plus extracted value) as JSON on stdout.
//!
//! # Environment variables
//!
//! | Variable        | Required | Default                  | Description            |
//! |-----------------|----------|--------------------------|------------------------|
//! | `SORA_BASE_URL` | no       | `https://api.dyuapi.com` | API root               |
//! | `SORA_API_KEY`  | no       | --                       | Bearer token           |
//! | `RUST_LOG`      | no       | `sora_nodes=info`        | Log filter             |

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sora_nodes::config::CliConfig;
use sora_nodes::create::CreateVideoJob;
use sora_nodes::download::DownloadVideoResult;
use sora_nodes::output::NodeOutput;
use sora_nodes::registry::{self, NodeKind, CATEGORY};
use sora_nodes::status::GetVideoJobStatus;

#[derive(Debug, Parser)]
#[command(name = "sora-nodes", about = "Run Sora video-job nodes from the command line")]
struct Cli {
    /// API root; overrides SORA_BASE_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Bearer token; overrides SORA_API_KEY.
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Submit a video generation job.
    Create {
        #[arg(long)]
        prompt: String,
        #[arg(long)]
        endpoint: Option<String>,
        #[arg(long)]
        file_path: Option<String>,
        #[arg(long)]
        image_base64: Option<String>,
        #[arg(long)]
        filename: Option<String>,
        #[arg(long)]
        model: Option<String>,
        /// Send `trim=false`.
        #[arg(long)]
        no_trim: bool,
        #[arg(long)]
        extra_fields_json: Option<String>,
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Fetch (or poll) a job's status.
    Status {
        #[arg(long)]
        job_id: String,
        #[arg(long)]
        endpoint: Option<String>,
        #[arg(long)]
        poll: bool,
        #[arg(long)]
        poll_interval: Option<u64>,
        #[arg(long)]
        poll_timeout: Option<u64>,
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Save a finished job's video to a temp file.
    Download {
        #[arg(long)]
        job_id: String,
        #[arg(long)]
        endpoint: Option<String>,
        #[arg(long)]
        download_field: Option<String>,
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Run a node by registered name with a JSON object of inputs.
    Run {
        node: String,
        #[arg(default_value = "{}")]
        inputs: String,
    },
    /// List the registered nodes.
    List,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sora_nodes=info,sora_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = CliConfig::from_env();
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(api_key) = cli.api_key {
        config.api_key = api_key;
    }

    let output = match cli.command {
        Command::Create {
            prompt,
            endpoint,
            file_path,
            image_base64,
            filename,
            model,
            no_trim,
            extra_fields_json,
            timeout,
        } => {
            let defaults = CreateVideoJob::default();
            let node = CreateVideoJob {
                base_url: config.base_url,
                api_key: config.api_key,
                prompt,
                endpoint: endpoint.unwrap_or(defaults.endpoint),
                file_path: file_path.unwrap_or_default(),
                image_base64: image_base64.unwrap_or_default(),
                filename: filename.unwrap_or(defaults.filename),
                model: model.unwrap_or(defaults.model),
                trim: !no_trim,
                extra_fields_json: extra_fields_json.unwrap_or_default(),
                timeout: timeout.unwrap_or(defaults.timeout),
            };
            node.run().await
        }
        Command::Status {
            job_id,
            endpoint,
            poll,
            poll_interval,
            poll_timeout,
            timeout,
        } => {
            let defaults = GetVideoJobStatus::default();
            let node = GetVideoJobStatus {
                base_url: config.base_url,
                api_key: config.api_key,
                job_id,
                endpoint: endpoint.unwrap_or(defaults.endpoint),
                poll,
                poll_interval: poll_interval.unwrap_or(defaults.poll_interval),
                poll_timeout: poll_timeout.unwrap_or(defaults.poll_timeout),
                timeout: timeout.unwrap_or(defaults.timeout),
            };
            node.run().await
        }
        Command::Download {
            job_id,
            endpoint,
            download_field,
            timeout,
        } => {
            let defaults = DownloadVideoResult::default();
            let node = DownloadVideoResult {
                base_url: config.base_url,
                api_key: config.api_key,
                job_id,
                endpoint: endpoint.unwrap_or(defaults.endpoint),
                download_field: download_field.unwrap_or_default(),
                timeout: timeout.unwrap_or(defaults.timeout),
            };
            node.run().await
        }
        Command::Run { node, inputs } => {
            let inputs = match serde_json::from_str::<Value>(&inputs) {
                Ok(value) => with_connection_defaults(value, &config),
                Err(e) => {
                    tracing::error!(error = %e, "Node inputs must be a JSON object");
                    std::process::exit(2);
                }
            };
            registry::run_node(&node, inputs).await
        }
        Command::List => {
            for kind in NodeKind::ALL {
                println!(
                    "{}/{}\t-> (response, {})",
                    CATEGORY,
                    kind.name(),
                    kind.value_label()
                );
            }
            return;
        }
    };

    print_output(&output);
}

/// Fill `base_url` / `api_key` from the environment when the inputs
/// object leaves them out.
fn with_connection_defaults(mut inputs: Value, config: &CliConfig) -> Value {
    if let Value::Object(map) = &mut inputs {
        map.entry("base_url")
            .or_insert_with(|| Value::String(config.base_url.clone()));
        map.entry("api_key")
            .or_insert_with(|| Value::String(config.api_key.clone()));
    }
    inputs
}

fn print_output(output: &NodeOutput) {
    match serde_json::to_string_pretty(output) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!(error = %e, "Failed to serialize node output"),
    }
}

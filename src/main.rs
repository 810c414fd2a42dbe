use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use labclient::{
    validate_report_data, ClientConfig, ReportData, ReportLauncher, SystemBrowserHost,
    TestDataRetriever,
};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "labclient", version, about = "Lab backend client helpers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the absolute address of an API endpoint
    Url { endpoint: String },

    /// Fetch a test request's details and report their completeness
    Fetch {
        id: String,
        /// Exit non-zero when observations or strength results are missing
        #[arg(long)]
        strict: bool,
    },

    /// Open a report in the default browser with KEY=VALUE parameters
    Open {
        path: String,
        params: Vec<String>,
        #[arg(long, default_value = labclient::report::DEFAULT_REPORT_LABEL)]
        label: String,
        /// Parameters that must be present and not "N/A"
        #[arg(long = "require")]
        required: Vec<String>,
    },
}

fn parse_params(params: &[String]) -> anyhow::Result<ReportData> {
    let mut data = ReportData::new();
    for p in params {
        let (key, value) = p
            .split_once('=')
            .with_context(|| format!("parameter '{}' is not KEY=VALUE", p))?;
        data.push(key, value);
    }
    Ok(data)
}

fn as_object(data: &ReportData) -> Value {
    Value::Object(data.entries().iter().cloned().collect())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ClientConfig::from_env();

    match cli.command {
        Command::Url { endpoint } => {
            println!("{}", config.api.api_url(&endpoint));
        }
        Command::Fetch { id, strict } => {
            let retriever = TestDataRetriever::new(config)?;
            let bundle = retriever.fetch_complete_test_data(&id).await?;
            println!("{}", serde_json::to_string_pretty(&bundle)?);

            let check = bundle.completeness();
            if !check.complete {
                log::warn!("{}", check.message);
                if strict {
                    bail!("test request {} is incomplete: {}", id, check.message);
                }
            }
        }
        Command::Open { path, params, label, required } => {
            let data = parse_params(&params)?;
            let validation = validate_report_data(&as_object(&data), &required);
            if !validation.valid {
                bail!("missing report data: {}", validation.missing.join(", "));
            }

            let launcher = ReportLauncher::new(SystemBrowserHost::from_env());
            if !launcher.open_report(&path, &data, &label) {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("labclient: {:#}", e);
        std::process::exit(1);
    }
}

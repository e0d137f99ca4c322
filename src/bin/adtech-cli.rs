use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;

use adtech_server::config::AdtechConfig;
use adtech_server::measurement::{
    HeaderBuilder, KeyPiece, KeySide, SourceParams, TriggerQuery,
};
use adtech_server::reports::ReportKind;

#[derive(Parser)]
#[command(name = "adtech-cli")]
#[command(
    about = "Inspect the ad-tech demo server and its registration headers",
    long_about = None
)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8085")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    Source,
    Trigger,
}

impl From<Side> for KeySide {
    fn from(side: Side) -> Self {
        match side {
            Side::Source => KeySide::Source,
            Side::Trigger => KeySide::Trigger,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    EventLevel,
    EventLevelDebug,
    Aggregate,
    AggregateDebug,
    Verbose,
}

impl From<Kind> for ReportKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::EventLevel => ReportKind::EventLevel,
            Kind::EventLevelDebug => ReportKind::EventLevelDebug,
            Kind::Aggregate => ReportKind::Aggregate,
            Kind::AggregateDebug => ReportKind::AggregateDebug,
            Kind::Verbose => ReportKind::Verbose,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List reports received by the server
    Reports {
        #[arg(short, long, value_enum)]
        kind: Option<Kind>,
    },
    /// Clear the server's report log
    ClearReports,
    /// Compute an aggregation key piece
    KeyPiece {
        input: String,
        #[arg(short, long, value_enum, default_value = "source")]
        side: Side,
    },
    /// Print a source registration built with the default settings
    SourceHeader {
        #[arg(long)]
        debug_key: Option<String>,
    },
    /// Print a trigger registration built with the default settings
    TriggerHeader {
        #[arg(long)]
        conversion_type: String,
        #[arg(long)]
        product_category: String,
        #[arg(long)]
        purchase_value: Option<String>,
        #[arg(long)]
        prio_checkout: bool,
        #[arg(long)]
        purchase_id: Option<String>,
        #[arg(long)]
        dedup: bool,
        #[arg(long)]
        debug_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Reports { kind } => {
            let mut request = client.get(format!("{}/reports", cli.url));
            if let Some(kind) = kind {
                request = request.query(&[("kind", ReportKind::from(kind).as_str())]);
            }
            print_response(request.send().await?).await?;
        }
        Commands::ClearReports => {
            let res = client.delete(format!("{}/reports", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::KeyPiece { input, side } => {
            println!("{}", KeyPiece::generate(side.into(), &input));
        }
        Commands::SourceHeader { debug_key } => {
            let builder = HeaderBuilder::from_config(&AdtechConfig::default());
            let source = builder.build_source(&SourceParams { debug_key });
            println!("{}", serde_json::to_string_pretty(&source)?);
        }
        Commands::TriggerHeader {
            conversion_type,
            product_category,
            purchase_value,
            prio_checkout,
            purchase_id,
            dedup,
            debug_key,
        } => {
            let query = TriggerQuery {
                conversion_type: Some(conversion_type),
                product_category: Some(product_category),
                purchase_value,
                prio_checkout: prio_checkout.then(|| "true".to_string()),
                purchase_id,
                dedup: dedup.then(|| "true".to_string()),
            };
            let builder = HeaderBuilder::from_config(&AdtechConfig::default());
            let trigger = builder.build_trigger(&query.validate(debug_key)?)?;
            println!("{}", serde_json::to_string_pretty(&trigger)?);
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        let text = res.text().await.unwrap_or_default();
        return Err(format!("server returned status {status}: {text}").into());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

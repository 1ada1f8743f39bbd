use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use tracing_subscriber::EnvFilter;

use gh_issues_agent::models::{RunSummary, ScanReport};
use gh_issues_agent::pipeline::read_sources;
use gh_issues_agent::{
    Config, GitHubClient, HuggingFaceRegistry, IssueAgent, PdfLinkExtractor, PipelineConfig,
    Scanner,
};

#[derive(Parser, Debug)]
#[command(name = "gh-issues-agent")]
#[command(version = "0.1.0")]
#[command(about = "Find GitHub repositories cited in papers and ask them to publish model weights")]
#[command(group(ArgGroup::new("papers").required(true).args(["input", "url"])))]
struct Args {
    /// File with one paper PDF URL per line
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// A single paper PDF URL
    #[arg(short, long)]
    url: Option<String>,

    /// Post to these repository URLs instead of the extracted ones (repeatable)
    #[arg(long = "override-repo")]
    override_repos: Vec<String>,

    /// Extract and parse links only; post nothing
    #[arg(long)]
    dry_run: bool,

    /// Skip repositories whose weights are already on the Hugging Face Hub
    #[arg(long)]
    check_weights: bool,

    /// Output format (json, text)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Papers or issues processed at once (overrides CONCURRENCY_LIMIT)
    #[arg(long)]
    concurrency: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("gh_issues_agent=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    let args = Args::parse();

    let sources = match (&args.input, &args.url) {
        (Some(path), _) => read_sources(path)?,
        (None, Some(url)) => vec![url.clone()],
        (None, None) => anyhow::bail!("either --input or --url is required"),
    };

    let config = if args.dry_run {
        Config::for_scan()?
    } else {
        Config::from_env()?
    };

    let mut pipeline_config = PipelineConfig::from(&config);
    pipeline_config.override_repos = args.override_repos.clone();
    pipeline_config.show_progress = true;
    if let Some(limit) = args.concurrency {
        pipeline_config.concurrency_limit = limit.max(1);
    }

    let extractor = PdfLinkExtractor::new(config.http_timeout)?;
    let scanner = Scanner::new(extractor, pipeline_config);

    if args.dry_run {
        tracing::info!("Scanning {} papers (dry run)", sources.len());
        let report = scanner.scan(&sources).await;
        let output = match args.format.as_str() {
            "json" => serde_json::to_string_pretty(&report)?,
            _ => format_scan(&report),
        };
        write_output(&output, &args)?;

        if !sources.is_empty() && report.failed_sources.len() == sources.len() {
            anyhow::bail!("every paper failed to download or parse");
        }
        return Ok(());
    }

    let github = GitHubClient::from_config(&config)?;
    let mut agent = IssueAgent::new(scanner, github);
    if args.check_weights {
        agent = agent.with_registry(HuggingFaceRegistry::new(
            config.hf_api_url.clone(),
            config.http_timeout,
        )?);
    }

    tracing::info!("Processing {} papers", sources.len());
    let summary = agent.run(&sources).await;

    let output = match args.format.as_str() {
        "json" => serde_json::to_string_pretty(&summary)?,
        _ => format_summary(&summary),
    };
    write_output(&output, &args)?;

    if summary.is_total_failure() {
        anyhow::bail!("no work succeeded: every paper or every issue failed");
    }

    Ok(())
}

fn write_output(output: &str, args: &Args) -> anyhow::Result<()> {
    if let Some(ref path) = args.output {
        std::fs::write(path, output)?;
        tracing::info!("Output written to: {}", path.display());
    } else {
        println!("{}", output);
    }
    Ok(())
}

fn format_summary(summary: &RunSummary) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\nExtracted {} urls from {} papers\n",
        summary.extracted_links, summary.sources
    ));

    if !summary.failed_sources.is_empty() {
        output.push_str("\nPapers that could not be read:\n");
        for failure in &summary.failed_sources {
            output.push_str(&format!("  - {}: {}\n", failure.source, failure.error));
        }
    }

    if !summary.skipped.is_empty() {
        output.push_str("\nWeights already published (skipped):\n");
        for repo in &summary.skipped {
            output.push_str(&format!("  - {}\n", repo));
        }
    }

    if !summary.failed_issues.is_empty() {
        output.push_str("\nFailed to create issue:\n");
        for failure in &summary.failed_issues {
            let status = failure
                .status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "no response".to_string());
            output.push_str(&format!(
                "  - {} ({}): {}\n",
                failure.repo,
                status,
                failure.detail.as_deref().unwrap_or("")
            ));
        }
    }

    output.push_str("\nResults posted to Github. URLs:\n");
    for url in &summary.urls {
        output.push_str(&format!("{}\n", url));
    }

    output.push_str(&format!(
        "\nTotal success: {}, total failures: {}\n",
        summary.total_success, summary.total_failure
    ));
    output.push_str(&format!(
        "Finished at {} ({}s)\n",
        summary.finished_at.format("%Y-%m-%d %H:%M:%S UTC"),
        (summary.finished_at - summary.started_at).num_seconds()
    ));

    output
}

fn format_scan(report: &ScanReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("\nExtracted {} urls\n", report.links.len()));
    for link in &report.links {
        output.push_str(&format!("  {}\n", link));
    }

    output.push_str(&format!("\nRepositories ({}):\n", report.repos.len()));
    for repo in &report.repos {
        output.push_str(&format!("  {}\n", repo));
    }

    if !report.failed_sources.is_empty() {
        output.push_str("\nPapers that could not be read:\n");
        for failure in &report.failed_sources {
            output.push_str(&format!("  - {}: {}\n", failure.source, failure.error));
        }
    }

    output
}

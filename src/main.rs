//! `portsight` — score, rank, and simulate a project portfolio.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`portsight::config::load_config`]).
//! 3. Pick a data source: `--data`, `--api`, config `[source]`, or the demo portfolio.
//! 4. Fetch and validate the portfolio ([`portsight::source::load_portfolio`]).
//! 5. Run the engine for the requested subcommand ([`portsight::engine`]).
//! 6. Render the result as a terminal report, JSON, or PDF ([`portsight::report`]).

mod cli;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use colored::Colorize;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, ReportFormat};
use portsight::config::{load_config, Config};
use portsight::engine::heatmap::Heatmap;
use portsight::engine::portfolio::{aggregate, project_detail, project_rows, ProjectDetail};
use portsight::engine::ranking::{rank, sort_ranked, SortKey};
use portsight::engine::simulation::{simulate, SimulationInput, SimulationResult};
use portsight::engine::status::classify_status;
use portsight::models::{Decision, Portfolio, ProjectStatus};
use portsight::report;
use portsight::session::Session;
use portsight::source::demo::DemoSource;
use portsight::source::file::FileSource;
use portsight::source::http::HttpSource;
use portsight::source::{load_portfolio, DataSource};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // --pdf implies PDF format
    let report_format = match &cli.pdf {
        Some(_) => ReportFormat::Pdf,
        None => cli.report.clone(),
    };
    let command = cli.command.clone().unwrap_or(Command::Overview);

    let pdf_path = match report_format {
        ReportFormat::Pdf => {
            if !command.supports_pdf() {
                bail!(
                    "PDF output is available for overview, rank, and heatmap; use --report terminal or json with `{}`",
                    command.name()
                );
            }
            Some(
                cli.pdf
                    .clone()
                    .unwrap_or_else(|| PathBuf::from("portfolio-report.pdf")),
            )
        }
        _ => None,
    };
    let json = matches!(report_format, ReportFormat::Json);

    let working_dir = std::env::current_dir()?;
    let config = load_config(&working_dir, cli.config.as_deref())?;

    let choice = choose_source(&cli, &config);
    debug!(?choice, "data source selected");

    let (portfolio, origin) = match &choice {
        SourceChoice::File(path) => {
            let source = FileSource::open(path)?;
            (load_portfolio(&source, cli.quiet).await?, source.describe())
        }
        SourceChoice::Api(url) => {
            let session = Session::from_env(&config.source.token_env);
            let timeout = Duration::from_secs(config.source.timeout_secs);
            let source = HttpSource::new(url, session, timeout)?;
            (load_portfolio(&source, cli.quiet).await?, source.describe())
        }
        SourceChoice::Demo => {
            let source = DemoSource::new();
            (load_portfolio(&source, cli.quiet).await?, source.describe())
        }
    };

    if !cli.quiet {
        eprintln!(
            "  {} {} projects, {} risks from {}",
            "→".cyan(),
            portfolio.projects.len(),
            portfolio.risks.len(),
            origin
        );
    }

    match command {
        Command::Overview => {
            let overview = aggregate(&portfolio.projects);
            let ranked = rank(&portfolio.projects, &portfolio.risks, &config.ranking);
            if let Some(path) = &pdf_path {
                let heatmap = Heatmap::from_risks(&portfolio.open_risks());
                report::pdf::render(&overview, &ranked, &heatmap, &origin, path)?;
            } else if json {
                print_json(&OverviewView { overview: &overview, ranking: &ranked })?;
            } else {
                report::terminal::render_overview(&overview, &ranked, &origin, cli.verbose, cli.quiet);
            }
        }
        Command::Rank { sort } => {
            let key = SortKey::from(sort);
            let mut ranked = rank(&portfolio.projects, &portfolio.risks, &config.ranking);
            sort_ranked(&mut ranked, key);
            if let Some(path) = &pdf_path {
                let heatmap = Heatmap::from_risks(&portfolio.open_risks());
                report::pdf::render(&aggregate(&portfolio.projects), &ranked, &heatmap, &origin, path)?;
            } else if json {
                print_json(&ranked)?;
            } else {
                report::terminal::render_ranking(&ranked, key, cli.quiet);
            }
        }
        Command::Projects { search } => {
            let rows = project_rows(&portfolio.projects, search.as_deref());
            if json {
                print_json(&rows)?;
            } else {
                report::terminal::render_projects(&rows, search.as_deref(), cli.quiet);
            }
        }
        Command::Heatmap { all } => {
            let risks = if all {
                portfolio.risks.clone()
            } else {
                portfolio.open_risks()
            };
            let heatmap = Heatmap::from_risks(&risks);
            if let Some(path) = &pdf_path {
                let ranked = rank(&portfolio.projects, &portfolio.risks, &config.ranking);
                report::pdf::render(&aggregate(&portfolio.projects), &ranked, &heatmap, &origin, path)?;
            } else if json {
                print_json(&heatmap)?;
            } else {
                report::terminal::render_heatmap(&heatmap, cli.verbose, cli.quiet);
            }
        }
        Command::Project { id } => {
            let detail = detail_for(&portfolio, &id, &origin)?;
            let decisions: Vec<Decision> = portfolio.decisions_for(&id).cloned().collect();
            if json {
                print_json(&ProjectView { detail: &detail, decisions: &decisions })?;
            } else {
                report::terminal::render_project(&detail, &decisions, cli.quiet);
            }
        }
        Command::Simulate { id, budget, time, people } => {
            let detail = detail_for(&portfolio, &id, &origin)?;
            let input = SimulationInput {
                extra_budget_pct: budget as f64,
                extra_time_pct: time as f64,
                extra_people: people as f64,
            };
            let result = simulate(detail.project.health_score, &input);
            let view = SimulationView {
                project_id: &detail.project.id,
                project_name: &detail.project.name,
                input,
                current_status: detail.status,
                simulated_status: classify_status(result.simulated_health),
                result,
            };
            if json {
                print_json(&view)?;
            } else {
                report::terminal::render_simulation(&detail, &view.input, &view.result, cli.quiet);
            }
        }
        Command::Decisions { project } => {
            let decisions: Vec<Decision> = match &project {
                Some(id) => portfolio.decisions_for(id).cloned().collect(),
                None => portfolio.decisions.clone(),
            };
            if json {
                print_json(&decisions)?;
            } else {
                report::terminal::render_decisions(&decisions, cli.quiet);
            }
        }
    }

    Ok(())
}

#[derive(Debug)]
enum SourceChoice {
    File(PathBuf),
    Api(String),
    Demo,
}

/// `--data` wins over `--api`; both win over the config file; the demo
/// portfolio is the fallback.
fn choose_source(cli: &Cli, config: &Config) -> SourceChoice {
    if let Some(path) = &cli.data {
        return SourceChoice::File(path.clone());
    }
    if let Some(url) = &cli.api {
        return SourceChoice::Api(url.clone());
    }
    if let Some(path) = &config.source.file {
        return SourceChoice::File(path.clone());
    }
    if let Some(url) = &config.source.api_url {
        return SourceChoice::Api(url.clone());
    }
    SourceChoice::Demo
}

fn detail_for(portfolio: &Portfolio, id: &str, origin: &str) -> Result<ProjectDetail> {
    let Some(project) = portfolio.project(id) else {
        bail!("No project with id '{}' in {}", id, origin);
    };
    let risks: Vec<_> = portfolio.risks_for(id).cloned().collect();
    let trend = portfolio.trends.get(id).map(Vec::as_slice).unwrap_or_default();
    Ok(project_detail(project, &risks, trend))
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "portsight=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OverviewView<'a> {
    overview: &'a portsight::engine::portfolio::PortfolioOverview,
    ranking: &'a [portsight::engine::ranking::RankedProject],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectView<'a> {
    detail: &'a ProjectDetail,
    decisions: &'a [Decision],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulationView<'a> {
    project_id: &'a str,
    project_name: &'a str,
    input: SimulationInput,
    result: SimulationResult,
    current_status: ProjectStatus,
    simulated_status: ProjectStatus,
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use portsight::engine::ranking::SortKey;

#[derive(Parser, Debug)]
#[command(
    name = "portsight",
    about = "Score, rank, and simulate a portfolio of projects",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Dataset file (.json or .toml) to read projects and risks from
    #[arg(long, global = true, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Base URL of the dashboard API (token read from $PORTSIGHT_TOKEN by default)
    #[arg(long, global = true, value_name = "URL")]
    pub api: Option<String>,

    /// Config file [default: ./.portsight/config.toml, fallback ~/.config/portsight/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, global = true, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Write the portfolio PDF report; use without value to default to portfolio-report.pdf
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = "portfolio-report.pdf"
    )]
    pub pdf: Option<PathBuf>,

    /// Show every row (not just projects needing attention) and debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print summary lines
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Portfolio summary: status counts, average health, budget at risk
    Overview,
    /// Projects ranked by composite score
    Rank {
        /// Order rows by this key; ranks themselves never change
        #[arg(long, default_value = "rank", value_name = "KEY")]
        sort: SortArg,
    },
    /// Project list with budget and timeline usage
    Projects {
        /// Only list projects whose id or name contains this text (case-insensitive)
        #[arg(long, value_name = "TERM")]
        search: Option<String>,
    },
    /// 4×4 probability/impact heatmap of risks
    Heatmap {
        /// Include mitigated and closed risks
        #[arg(long)]
        all: bool,
    },
    /// Scores, usage metrics, risks, and trend for one project
    Project {
        /// Project id, e.g. P004
        id: String,
    },
    /// What-if simulation of extra budget, time, and people
    Simulate {
        /// Project id, e.g. P004
        id: String,
        /// Extra budget in percent (0–50, steps of 5)
        #[arg(long, default_value_t = 0, value_parser = parse_slider_pct)]
        budget: u32,
        /// Extra time in percent (0–50, steps of 5)
        #[arg(long, default_value_t = 0, value_parser = parse_slider_pct)]
        time: u32,
        /// Extra people (0–10)
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=10))]
        people: u32,
    },
    /// Portfolio board decision log
    Decisions {
        /// Only show decisions for this project
        #[arg(long, value_name = "ID")]
        project: Option<String>,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Overview => "overview",
            Command::Rank { .. } => "rank",
            Command::Projects { .. } => "projects",
            Command::Heatmap { .. } => "heatmap",
            Command::Project { .. } => "project",
            Command::Simulate { .. } => "simulate",
            Command::Decisions { .. } => "decisions",
        }
    }

    /// The PDF report covers the portfolio views only.
    pub fn supports_pdf(&self) -> bool {
        matches!(self, Command::Overview | Command::Rank { .. } | Command::Heatmap { .. })
    }
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
    Pdf,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SortArg {
    Rank,
    Health,
    Risk,
    Value,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Rank => SortKey::Rank,
            SortArg::Health => SortKey::Health,
            SortArg::Risk => SortKey::Risk,
            SortArg::Value => SortKey::Value,
        }
    }
}

/// Slider values for the simulator: `0..=50` in steps of 5.
fn parse_slider_pct(s: &str) -> Result<u32, String> {
    let value: u32 = s
        .parse()
        .map_err(|_| format!("`{}` is not a whole number", s))?;
    if value > 50 {
        return Err(format!("{} is outside 0..=50", value));
    }
    if value % 5 != 0 {
        return Err(format!("{} is not a multiple of 5", value));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slider_parser() {
        assert_eq!(parse_slider_pct("25"), Ok(25));
        assert_eq!(parse_slider_pct("0"), Ok(0));
        assert!(parse_slider_pct("55").is_err());
        assert!(parse_slider_pct("12").is_err());
        assert!(parse_slider_pct("-5").is_err());
    }

    #[test]
    fn test_parse_simulate() {
        let cli = Cli::try_parse_from([
            "portsight", "simulate", "P004", "--budget", "20", "--people", "3", "--quiet",
        ])
        .unwrap();
        assert!(cli.quiet);
        match cli.command {
            Some(Command::Simulate { id, budget, time, people }) => {
                assert_eq!(id, "P004");
                assert_eq!(budget, 20);
                assert_eq!(time, 0);
                assert_eq!(people, 3);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_people_out_of_range() {
        assert!(Cli::try_parse_from(["portsight", "simulate", "P004", "--people", "11"]).is_err());
    }

    #[test]
    fn test_pdf_default_path() {
        let cli = Cli::try_parse_from(["portsight", "--pdf"]).unwrap();
        assert_eq!(cli.pdf, Some(PathBuf::from("portfolio-report.pdf")));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_rank_sort() {
        let cli = Cli::try_parse_from(["portsight", "rank", "--sort", "risk"]).unwrap();
        match cli.command {
            Some(Command::Rank { sort }) => assert_eq!(SortKey::from(sort), SortKey::Risk),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_projects_search() {
        let cli = Cli::try_parse_from(["portsight", "projects", "--search", "erp"]).unwrap();
        match cli.command {
            Some(Command::Projects { search }) => assert_eq!(search.as_deref(), Some("erp")),
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::try_parse_from(["portsight", "projects"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Projects { search: None })));
    }

    #[test]
    fn test_pdf_only_for_portfolio_views() {
        let parse = |args: &[&str]| Cli::try_parse_from(args).unwrap().command.unwrap_or(Command::Overview);

        assert!(parse(&["portsight", "--pdf"]).supports_pdf());
        assert!(parse(&["portsight", "rank", "--sort", "health", "--pdf", "out.pdf"]).supports_pdf());
        assert!(parse(&["portsight", "heatmap", "--all", "--report", "pdf"]).supports_pdf());

        let simulate = parse(&["portsight", "simulate", "P004", "--budget", "20", "--pdf"]);
        assert!(!simulate.supports_pdf());
        assert_eq!(simulate.name(), "simulate");
        assert!(!parse(&["portsight", "project", "P004", "--pdf"]).supports_pdf());
        assert!(!parse(&["portsight", "decisions", "--pdf"]).supports_pdf());
        assert!(!parse(&["portsight", "projects", "--pdf"]).supports_pdf());
    }
}

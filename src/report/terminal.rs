use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::engine::heatmap::{cell_severity, CellPosition, Heatmap, BAND_LABELS, GRID_SIZE};
use crate::engine::portfolio::{PortfolioOverview, ProjectDetail, ProjectRow};
use crate::engine::ranking::{RankedProject, SortKey};
use crate::engine::scoring::risk_band;
use crate::engine::simulation::{SimulationInput, SimulationResult};
use crate::engine::status::classify_status;
use crate::models::{Decision, DecisionKind, ProjectStatus, RiskStatus, Severity};

/// Portfolio summary box followed by the projects that need attention.
/// `verbose` adds the full ranking.
pub fn render_overview(
    overview: &PortfolioOverview,
    ranked: &[RankedProject],
    origin: &str,
    verbose: bool,
    quiet: bool,
) {
    if quiet {
        println!(
            "Total: {}  Green: {}  Yellow: {}  Red: {}  Avg health: {}",
            overview.total_projects,
            overview.green_count.to_string().green(),
            overview.yellow_count.to_string().yellow(),
            overview.red_count.to_string().red(),
            overview.average_health,
        );
        return;
    }

    println!("\n {} v{}", "portsight".bold(), env!("CARGO_PKG_VERSION"));
    println!(" Portfolio: {}\n", origin);

    let dist = &overview.health_distribution;
    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Total projects  : {}", overview.total_projects));
    println!(
        " │  {:<48} │",
        format!("{}  Green         : {:>4}  ({}%)", "●".green(), overview.green_count, dist.green)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Yellow        : {:>4}  ({}%)", "●".yellow(), overview.yellow_count, dist.yellow)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Red           : {:>4}  ({}%)", "●".red(), overview.red_count, dist.red)
    );
    println!(" │  {:<48} │", format!("Average health  : {}", overview.average_health));
    println!(
        " │  {:<48} │",
        format!(
            "Budget at risk  : {}  ({} projects)",
            format_money(overview.budget_at_risk),
            overview.projects_at_risk
        )
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    let red: Vec<&RankedProject> = ranked.iter().filter(|r| r.status == ProjectStatus::Red).collect();
    if !red.is_empty() {
        println!(" {} Projects at risk:\n", "[RED]".red().bold());
        render_ranking_table(red);
        println!();
    }

    let yellow: Vec<&RankedProject> = ranked
        .iter()
        .filter(|r| r.status == ProjectStatus::Yellow)
        .collect();
    if !yellow.is_empty() {
        println!(" {} Projects to watch:\n", "[YELLOW]".yellow().bold());
        render_ranking_table(yellow);
        println!();
    }

    if verbose && !ranked.is_empty() {
        println!(" {} Full ranking:\n", "[ALL]".bold());
        render_ranking_table(ranked.iter().collect());
        println!();
    }
}

pub fn render_ranking(ranked: &[RankedProject], key: SortKey, quiet: bool) {
    if quiet {
        for row in ranked {
            println!("{}\t{}\t{:.1}", row.rank, row.project_id, row.composite_score);
        }
        return;
    }

    println!("\n {} {} projects, sorted by {}\n", "Ranking".bold(), ranked.len(), key);
    render_ranking_table(ranked.iter().collect());
    println!();
}

fn render_ranking_table(rows: Vec<&RankedProject>) {
    let mut table = new_table(&["#", "Project", "Name", "Status", "Priority", "Health", "Risk", "Value", "Score"]);

    for row in rows {
        let rank = if row.is_leader() {
            format!("👑 {}", row.rank)
        } else {
            row.rank.to_string()
        };
        let risk_color = severity_color(risk_band(row.risk_score));

        table.add_row(vec![
            Cell::new(rank).set_alignment(CellAlignment::Right),
            Cell::new(&row.project_id),
            Cell::new(&row.project_name),
            Cell::new(row.status.to_string()).fg(status_color(row.status)),
            Cell::new(row.strategic_priority.to_string()),
            Cell::new(format!("{:.0}", row.health_score)).set_alignment(CellAlignment::Right),
            Cell::new(row.risk_score)
                .fg(risk_color)
                .set_alignment(CellAlignment::Right),
            Cell::new(row.value_score).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}", row.composite_score))
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{}", table);
}

/// Project list with budget and timeline consumption. Usage above 100% is red.
pub fn render_projects(rows: &[ProjectRow], search: Option<&str>, quiet: bool) {
    if quiet {
        for row in rows {
            println!(
                "{}\t{}\t{}\t{}%\t{}%",
                row.project_id, row.status, row.health_score, row.budget_usage_pct, row.timeline_usage_pct
            );
        }
        return;
    }

    match search {
        Some(term) => println!("\n {} {} matching \"{}\"\n", "Projects".bold(), rows.len(), term),
        None => println!("\n {} {} total\n", "Projects".bold(), rows.len()),
    }
    if rows.is_empty() {
        println!(" No projects found.\n");
        return;
    }

    let mut table = new_table(&["Project", "Name", "Status", "Priority", "Health", "Budget used", "Timeline"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.project_id),
            Cell::new(&row.name),
            Cell::new(row.status.to_string()).fg(status_color(row.status)),
            Cell::new(row.strategic_priority.to_string()),
            Cell::new(format!("{:.0}", row.health_score)).set_alignment(CellAlignment::Right),
            usage_cell(row.budget_usage_pct),
            usage_cell(row.timeline_usage_pct),
        ]);
    }
    println!("{}", table);
    println!();
}

fn usage_cell(pct: u32) -> Cell {
    let cell = Cell::new(format!("{}%", pct)).set_alignment(CellAlignment::Right);
    if pct > 100 {
        cell.fg(Color::Red)
    } else {
        cell
    }
}

/// Impact runs top to bottom from Critical to Low, probability left to right.
pub fn render_heatmap(heatmap: &Heatmap, verbose: bool, quiet: bool) {
    let counts = heatmap.severity_counts();

    if quiet {
        let parts: Vec<String> = counts.iter().map(|(s, n)| format!("{}: {}", s, n)).collect();
        println!("Total: {}  {}", heatmap.total(), parts.join("  "));
        return;
    }

    println!("\n {} {} risks\n", "Risk heatmap".bold(), heatmap.total());

    let mut header = vec![Cell::new("Impact \\ Probability").add_attribute(Attribute::Bold)];
    header.extend(
        BAND_LABELS
            .iter()
            .map(|l| Cell::new(l).add_attribute(Attribute::Bold).set_alignment(CellAlignment::Center)),
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for row in 0..GRID_SIZE {
        let mut cells = vec![Cell::new(BAND_LABELS[GRID_SIZE - 1 - row]).add_attribute(Attribute::Bold)];
        for col in 0..GRID_SIZE {
            let severity = cell_severity(CellPosition { row, col });
            let (count, members) = match heatmap.cell(row, col) {
                Some(cell) => (cell.count, cell.project_ids.join(", ")),
                None => (0, String::new()),
            };
            let text = if verbose && count > 0 {
                format!("{}\n{}", count, members)
            } else {
                count.to_string()
            };
            let mut cell = Cell::new(text)
                .fg(severity_color(severity))
                .set_alignment(CellAlignment::Center);
            if count > 0 {
                cell = cell.add_attribute(Attribute::Bold);
            }
            cells.push(cell);
        }
        table.add_row(cells);
    }

    println!("{}", table);

    let legend: Vec<String> = counts
        .iter()
        .map(|(s, n)| format!("{} {}", severity_label(*s), n))
        .collect();
    println!(" {}\n", legend.join("   "));
}

pub fn render_project(detail: &ProjectDetail, decisions: &[Decision], quiet: bool) {
    let p = &detail.project;

    if quiet {
        println!(
            "{}\t{}\thealth {}\trisk {}\tvalue {}",
            p.id,
            detail.status,
            p.health_score,
            detail.risk_score,
            detail.value_score
        );
        return;
    }

    println!("\n {} {}  {}", p.id.bold(), p.name.bold(), status_label(detail.status));
    if !p.description.is_empty() {
        println!(" {}", p.description.dimmed());
    }
    println!();

    let mut table = new_table(&["Metric", "Value"]);
    table.add_row(vec![
        Cell::new("Health"),
        Cell::new(format!("{:.0} ({})", p.health_score, detail.health_tier)),
    ]);
    table.add_row(vec![Cell::new("Strategic priority"), Cell::new(p.strategic_priority.to_string())]);
    table.add_row(vec![
        Cell::new("Risk score"),
        Cell::new(format!("{} ({})", detail.risk_score, detail.risk_band)).fg(severity_color(detail.risk_band)),
    ]);
    table.add_row(vec![Cell::new("Value score"), Cell::new(detail.value_score)]);
    table.add_row(vec![
        Cell::new("Budget used"),
        Cell::new(format!(
            "{} of {} ({}%)",
            format_money(p.budget_used),
            format_money(p.budget),
            detail.budget_usage_pct
        )),
    ]);
    table.add_row(vec![
        Cell::new("Timeline used"),
        Cell::new(format!(
            "{:.0} of {:.0} days ({}%)",
            p.timeline_used, p.timeline, detail.timeline_usage_pct
        )),
    ]);
    table.add_row(vec![
        Cell::new("Delay"),
        Cell::new(format!("{:.0} days ({}%)", p.delay_days, detail.delay_pct)),
    ]);
    table.add_row(vec![
        Cell::new("Cost overrun"),
        Cell::new(format!("{} ({}%)", format_money(p.cost_overrun), detail.cost_overrun_pct)),
    ]);
    if let Some(trend) = &detail.trend {
        table.add_row(vec![
            Cell::new("Trend"),
            Cell::new(format!(
                "{} over {} periods ({:.0} → {:.0}, {:+.0})",
                trend.direction, trend.periods, trend.first, trend.last, trend.change
            )),
        ]);
    }
    println!("{}", table);

    if !p.recommendation.is_empty() {
        println!("\n {} {}", "Recommendation:".bold(), p.recommendation);
    }

    if !detail.risks.is_empty() {
        println!("\n {} {} open of {}\n", "Risks".bold(), detail.open_risks, detail.risks.len());
        let mut risks = new_table(&["Id", "Title", "Severity", "P", "I", "Status", "Mitigation"]);
        for risk in &detail.risks {
            let status = Cell::new(risk.status.to_string());
            let status = if risk.status == RiskStatus::Open { status } else { status.fg(Color::DarkGrey) };
            risks.add_row(vec![
                Cell::new(&risk.id),
                Cell::new(&risk.title),
                Cell::new(risk.severity.to_string()).fg(severity_color(risk.severity)),
                Cell::new(format!("{:.0}", risk.probability)).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.0}", risk.impact)).set_alignment(CellAlignment::Right),
                status,
                Cell::new(&risk.mitigation_plan),
            ]);
        }
        println!("{}", risks);
    }

    if !decisions.is_empty() {
        println!("\n {}\n", "Decisions".bold());
        render_decision_table(decisions);
    }
    println!();
}

pub fn render_simulation(
    detail: &ProjectDetail,
    input: &SimulationInput,
    result: &SimulationResult,
    quiet: bool,
) {
    let before = classify_status(result.current_health);
    let after = classify_status(result.simulated_health);

    if quiet {
        println!(
            "{}\t{:.0} -> {:.0}\t{:+.0}",
            detail.project.id, result.current_health, result.simulated_health, result.delta
        );
        return;
    }

    println!(
        "\n {} {} {}\n",
        "Simulation".bold(),
        detail.project.id.bold(),
        detail.project.name
    );
    println!(
        "  Extra budget {}%   extra time {}%   extra people {}",
        input.extra_budget_pct, input.extra_time_pct, input.extra_people
    );
    println!(
        "  Health {:.0} {} {:.0}  ({})",
        result.current_health,
        "→".cyan(),
        result.simulated_health,
        format!("{:+.0}", result.delta).green()
    );
    if before == after {
        println!("  Status stays {}\n", status_label(after));
    } else {
        println!("  Status {} {} {}\n", status_label(before), "→".cyan(), status_label(after));
    }
}

pub fn render_decisions(decisions: &[Decision], quiet: bool) {
    if quiet {
        for d in decisions {
            println!("{}\t{}\t{}\t{}", d.date, d.project_id, d.decision, d.decided_by);
        }
        return;
    }

    println!("\n {} {} entries\n", "Decision log".bold(), decisions.len());
    if decisions.is_empty() {
        println!(" No decisions recorded.\n");
        return;
    }
    render_decision_table(decisions);
    println!();
}

fn render_decision_table(decisions: &[Decision]) {
    let mut table = new_table(&["Date", "Project", "Decision", "Reason", "Decided by"]);
    for d in decisions {
        let project = if d.project_name.is_empty() {
            d.project_id.clone()
        } else {
            format!("{} {}", d.project_id, d.project_name)
        };
        table.add_row(vec![
            Cell::new(&d.date),
            Cell::new(project),
            Cell::new(d.decision.to_string())
                .fg(decision_color(d.decision))
                .set_alignment(CellAlignment::Center),
            Cell::new(&d.reason),
            Cell::new(&d.decided_by),
        ]);
    }
    println!("{}", table);
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    table
}

fn status_color(status: ProjectStatus) -> Color {
    match status {
        ProjectStatus::Green => Color::Green,
        ProjectStatus::Yellow => Color::Yellow,
        ProjectStatus::Red => Color::Red,
    }
}

fn status_label(status: ProjectStatus) -> ColoredString {
    match status {
        ProjectStatus::Green => status.to_string().green().bold(),
        ProjectStatus::Yellow => status.to_string().yellow().bold(),
        ProjectStatus::Red => status.to_string().red().bold(),
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Low => Color::Green,
        Severity::Medium => Color::Yellow,
        Severity::High => Color::DarkYellow,
        Severity::Critical => Color::Red,
    }
}

fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Low => severity.to_string().green(),
        Severity::Medium => severity.to_string().yellow(),
        Severity::High => severity.to_string().bright_red(),
        Severity::Critical => severity.to_string().red().bold(),
    }
}

fn decision_color(kind: DecisionKind) -> Color {
    match kind {
        DecisionKind::Continue => Color::Green,
        DecisionKind::Pause => Color::Yellow,
        DecisionKind::Replan => Color::Cyan,
        DecisionKind::Stop => Color::Red,
    }
}

/// `$1,234,567` style, whole units.
pub(crate) fn format_money(amount: f64) -> String {
    let whole = amount.abs().round() as u64;
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if amount < 0.0 {
        format!("-${}", out)
    } else {
        format!("${}", out)
    }
}

use std::path::Path;

use anyhow::{Context, Result};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Rgb,
};

use crate::engine::heatmap::{cell_severity, CellPosition, Heatmap, BAND_LABELS, GRID_SIZE};
use crate::engine::portfolio::PortfolioOverview;
use crate::engine::ranking::RankedProject;
use crate::models::{ProjectStatus, Severity};
use crate::report::terminal::format_money;

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 18.0;
const T_END: f32 = PAGE_W - MARGIN;
const COVER_HDR_H: f32 = 72.0; // gradient header height on cover page

// ── Palette ───────────────────────────────────────────────────────────────────
const BG:           (f32, f32, f32) = (1.00, 1.00, 1.00);
const PANEL:        (f32, f32, f32) = (1.00, 1.00, 1.00);
const PANEL_ALT:    (f32, f32, f32) = (0.95, 0.96, 0.99);
const PANEL_BORDER: (f32, f32, f32) = (0.85, 0.87, 0.92);
const ACCENT_BLU:   (f32, f32, f32) = (0.20, 0.46, 0.95);
const ACCENT_TEAL:  (f32, f32, f32) = (0.09, 0.62, 0.66);
const TEXT_PRI:     (f32, f32, f32) = (0.07, 0.08, 0.14);
const TEXT_SEC:     (f32, f32, f32) = (0.36, 0.40, 0.52);
const TEXT_MUT:     (f32, f32, f32) = (0.58, 0.63, 0.72);
const WHITE:        (f32, f32, f32) = (1.00, 1.00, 1.00);
const WHITE_DIM:    (f32, f32, f32) = (0.82, 0.89, 1.00);

const GREEN_BG:  (f32, f32, f32) = (0.90, 0.98, 0.92);
const GREEN_FG:  (f32, f32, f32) = (0.07, 0.52, 0.22);
const YELLOW_BG: (f32, f32, f32) = (1.00, 0.95, 0.87);
const YELLOW_FG: (f32, f32, f32) = (0.70, 0.40, 0.02);
const ORANGE_BG: (f32, f32, f32) = (1.00, 0.90, 0.82);
const ORANGE_FG: (f32, f32, f32) = (0.85, 0.33, 0.05);
const RED_BG:    (f32, f32, f32) = (1.00, 0.91, 0.91);
const RED_FG:    (f32, f32, f32) = (0.76, 0.09, 0.13);

const R_PANEL: f32 = 2.5;
const R_BADGE: f32 = 1.5;

// ── Public entry point ────────────────────────────────────────────────────────

/// Render the portfolio PDF: cover with stat cards, ranking table pages, and
/// the risk heatmap.
pub fn render(
    overview: &PortfolioOverview,
    ranked: &[RankedProject],
    heatmap: &Heatmap,
    origin: &str,
    output_path: &Path,
) -> Result<()> {
    let doc = build(overview, ranked, heatmap, origin)?;

    let bytes = doc.save_to_bytes()?;
    std::fs::write(output_path, &bytes)
        .with_context(|| format!("Failed to write PDF to {}", output_path.display()))?;

    println!("PDF report written to: {}", output_path.display());
    Ok(())
}

fn build(
    overview: &PortfolioOverview,
    ranked: &[RankedProject],
    heatmap: &Heatmap,
    origin: &str,
) -> Result<PdfDocumentReference> {
    let doc = PdfDocument::empty("Portfolio Health Report");
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
    };

    add_cover_page(&doc, &fonts, overview, origin);
    add_ranking_pages(&doc, &fonts, ranked);
    add_heatmap_page(&doc, &fonts, heatmap);

    Ok(doc)
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

// ── Cover page ────────────────────────────────────────────────────────────────

fn add_cover_page(doc: &PdfDocumentReference, fonts: &Fonts, overview: &PortfolioOverview, origin: &str) {
    let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Cover");
    let layer = doc.get_page(page_idx).get_layer(layer_idx);
    let (font_r, font_b) = (&fonts.regular, &fonts.bold);

    fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);

    let hdr_bot = PAGE_H - COVER_HDR_H;
    fill_gradient_h(&layer, 0.0, hdr_bot, PAGE_W, COVER_HDR_H, ACCENT_BLU, ACCENT_TEAL, 28);

    set_color(&layer, WHITE_DIM);
    layer.use_text(
        format!("portsight v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(PAGE_W - MARGIN - 30.0), Mm(PAGE_H - 10.5), font_r,
    );

    set_color(&layer, WHITE);
    layer.use_text("Portfolio Health", 28.0, Mm(MARGIN), Mm(PAGE_H - 26.0), font_b);
    set_color(&layer, WHITE_DIM);
    layer.use_text("Report", 28.0, Mm(MARGIN), Mm(PAGE_H - 41.0), font_b);

    // Source chip
    let chip_y = hdr_bot - 18.0;
    let chip_h = 12.0f32;
    let chip_w = 106.0f32;
    fill_rounded_rect(&layer, MARGIN, chip_y, chip_w, chip_h, R_BADGE, PANEL);
    stroke_rounded_rect(&layer, MARGIN, chip_y, chip_w, chip_h, R_BADGE, PANEL_BORDER);
    fill_rect(&layer, MARGIN, chip_y, 2.5, chip_h, ACCENT_BLU);

    set_color(&layer, TEXT_MUT);
    layer.use_text("SOURCE", 6.0, Mm(MARGIN + 5.0), Mm(chip_y + chip_h - 3.8), font_b);
    set_color(&layer, TEXT_PRI);
    layer.use_text(truncate(origin, 40), 9.5, Mm(MARGIN + 5.0), Mm(chip_y + 2.8), font_b);

    set_color(&layer, TEXT_SEC);
    layer.use_text(
        format!("Generated  {}", today()),
        9.0, Mm(MARGIN), Mm(chip_y - 8.0), font_r,
    );

    let rule_y = chip_y - 16.5;
    draw_hline(&layer, MARGIN, T_END, rule_y, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text("OVERVIEW", 6.5, Mm(MARGIN), Mm(rule_y - 7.0), font_b);

    // Two rows of three stat cards
    let card_h = 26.0f32;
    let gap = 4.0f32;
    let card_w = (T_END - MARGIN - gap * 2.0) / 3.0;
    let first_row_y = rule_y - 38.0;

    let cards: [(&str, String, (f32, f32, f32)); 6] = [
        ("TOTAL PROJECTS", overview.total_projects.to_string(), ACCENT_BLU),
        ("GREEN", overview.green_count.to_string(), GREEN_FG),
        ("YELLOW", overview.yellow_count.to_string(), YELLOW_FG),
        ("RED", overview.red_count.to_string(), RED_FG),
        ("AVERAGE HEALTH", overview.average_health.to_string(), ACCENT_TEAL),
        ("BUDGET AT RISK", format_money(overview.budget_at_risk), RED_FG),
    ];

    for (i, (label, value, accent)) in cards.iter().enumerate() {
        let cx = MARGIN + (card_w + gap) * (i % 3) as f32;
        let cy = first_row_y - (card_h + gap) * (i / 3) as f32;
        draw_stat_card(&layer, cx, cy, card_w, card_h, label, value, *accent, font_r, font_b);
    }

    // Health distribution bar
    let dist_y = first_row_y - (card_h + gap) - 20.0;
    draw_hline(&layer, MARGIN, T_END, dist_y, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text("HEALTH DISTRIBUTION", 6.5, Mm(MARGIN), Mm(dist_y - 7.0), font_b);

    let bar_y = dist_y - 18.0;
    let bar_w = T_END - MARGIN;
    let dist = &overview.health_distribution;
    let mut x = MARGIN;
    if overview.total_projects == 0 {
        fill_rect(&layer, MARGIN, bar_y, bar_w, 6.0, PANEL_ALT);
    }
    for (pct, color) in [(dist.green, GREEN_FG), (dist.yellow, YELLOW_FG), (dist.red, RED_FG)] {
        let w = bar_w * pct as f32 / 100.0;
        if w > 0.0 {
            fill_rect(&layer, x, bar_y, w.min(T_END - x), 6.0, color);
            x += w;
        }
    }
    let legend = [
        ("Green", dist.green, GREEN_FG),
        ("Yellow", dist.yellow, YELLOW_FG),
        ("Red", dist.red, RED_FG),
    ];
    for (i, (name, pct, color)) in legend.iter().enumerate() {
        let lx = MARGIN + i as f32 * 40.0;
        fill_rounded_rect(&layer, lx, bar_y - 7.0, 2.5, 2.5, 1.25, *color);
        set_color(&layer, TEXT_SEC);
        layer.use_text(format!("{} {}%", name, pct), 8.0, Mm(lx + 4.5), Mm(bar_y - 7.0), font_r);
    }

    // What's in this report
    let section_y = bar_y - 18.0;
    draw_hline(&layer, MARGIN, T_END, section_y, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text("WHAT'S IN THIS REPORT", 6.5, Mm(MARGIN), Mm(section_y - 7.5), font_b);

    let items = [
        ("Project Ranking", "Projects ranked by composite value, risk, and health score"),
        ("Risk Heatmap", "Risks grouped by probability and impact"),
    ];
    for (j, (title, desc)) in items.iter().enumerate() {
        let iy = section_y - 15.0 - j as f32 * 10.0;
        fill_rounded_rect(&layer, MARGIN, iy + 2.0, 2.0, 2.0, 1.0, ACCENT_BLU);
        set_color(&layer, TEXT_PRI);
        layer.use_text(*title, 8.5, Mm(MARGIN + 5.0), Mm(iy + 2.0), font_b);
        set_color(&layer, TEXT_SEC);
        layer.use_text(*desc, 8.0, Mm(MARGIN + 5.0), Mm(iy - 3.5), font_r);
    }

    draw_footer(&layer, font_r);
    layer.use_text(today(), 7.5, Mm(T_END - 22.0), Mm(15.0), font_r);
}

#[allow(clippy::too_many_arguments)]
fn draw_stat_card(
    layer: &PdfLayerReference,
    x: f32, y: f32, w: f32, h: f32,
    label: &str,
    value: &str,
    accent: (f32, f32, f32),
    font_r: &IndirectFontRef,
    font_b: &IndirectFontRef,
) {
    fill_rounded_rect(layer, x, y, w, h, R_BADGE, PANEL);
    stroke_rounded_rect(layer, x, y, w, h, R_BADGE, PANEL_BORDER);

    fill_rect(layer, x, y + h - 2.0, w, 2.0, accent);

    // Long values (money) get a smaller size so they stay inside the card
    let size = if value.len() > 8 { 14.0 } else { 20.0 };
    set_color(layer, accent);
    layer.use_text(value, size, Mm(x + 5.0), Mm(y + h * 0.38), font_b);

    set_color(layer, TEXT_MUT);
    layer.use_text(label, 6.5, Mm(x + 5.0), Mm(y + 3.5), font_r);
}

// ── Ranking table pages ───────────────────────────────────────────────────────

fn add_ranking_pages(doc: &PdfDocumentReference, fonts: &Fonts, ranked: &[RankedProject]) {
    const ROW_H: f32 = 7.0;
    const HDR_Y: f32 = 268.5;
    const FIRST_Y: f32 = 259.5;
    const BOT_MARGIN: f32 = 25.0;
    const ROWS_PER_PAGE: usize = ((FIRST_Y - BOT_MARGIN) / ROW_H) as usize;

    let (font_r, font_b) = (&fonts.regular, &fonts.bold);

    //  #  ID  NAME  STATUS  PRIORITY  HEALTH  RISK  VALUE  SCORE
    let col_x = [0.0, 9.0, 26.0, 84.0, 106.0, 128.0, 141.0, 154.0, 166.0].map(|x| MARGIN + x);
    let headers = ["#", "ID", "NAME", "STATUS", "PRIORITY", "HEALTH", "RISK", "VALUE", "SCORE"];

    // An empty ranking still gets one page with the header row
    let chunks: Vec<&[RankedProject]> = if ranked.is_empty() {
        vec![ranked]
    } else {
        ranked.chunks(ROWS_PER_PAGE).collect()
    };

    for (page_no, chunk) in chunks.iter().enumerate() {
        let (pi, li) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Ranking");
        let layer = doc.get_page(pi).get_layer(li);

        fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
        fill_gradient_h(&layer, 0.0, PAGE_H - 2.5, PAGE_W, 2.5, ACCENT_BLU, ACCENT_TEAL, 21);

        set_color(&layer, TEXT_PRI);
        layer.use_text("Project Ranking", 14.0, Mm(MARGIN), Mm(282.5), font_b);
        set_color(&layer, TEXT_MUT);
        layer.use_text(
            format!("Page {} of {}", page_no + 1, chunks.len()),
            8.0, Mm(T_END - 20.0), Mm(283.0), font_r,
        );
        draw_hline(&layer, MARGIN, T_END, 277.5, PANEL_BORDER);

        fill_rounded_rect(&layer, MARGIN, HDR_Y - 7.5, T_END - MARGIN, 9.5, R_BADGE, PANEL);
        stroke_rounded_rect(&layer, MARGIN, HDR_Y - 7.5, T_END - MARGIN, 9.5, R_BADGE, PANEL_BORDER);
        set_color(&layer, TEXT_MUT);
        for (i, h) in headers.iter().enumerate() {
            layer.use_text(*h, 7.0, Mm(col_x[i] + 1.5), Mm(HDR_Y - 4.0), font_b);
        }

        if chunk.is_empty() {
            set_color(&layer, TEXT_SEC);
            layer.use_text("No projects", 9.0, Mm(MARGIN + 1.5), Mm(FIRST_Y - 4.0), font_r);
        }

        let mut cur_y = FIRST_Y;
        for (i, row) in chunk.iter().enumerate() {
            if i % 2 == 0 {
                fill_rect(&layer, MARGIN, cur_y - ROW_H + 1.5, T_END - MARGIN, ROW_H, PANEL_ALT);
            }
            let text_y = cur_y - 4.0;

            if row.is_leader() {
                fill_rounded_rect(&layer, col_x[0] + 0.5, text_y - 1.2, 7.0, 4.5, R_BADGE, ACCENT_BLU);
                set_color(&layer, WHITE);
            } else {
                set_color(&layer, TEXT_SEC);
            }
            layer.use_text(row.rank.to_string(), 8.0, Mm(col_x[0] + 1.5), Mm(text_y), font_b);

            set_color(&layer, TEXT_PRI);
            layer.use_text(row.project_id.as_str(), 8.0, Mm(col_x[1] + 1.5), Mm(text_y), font_b);
            layer.use_text(truncate(&row.project_name, 30), 8.0, Mm(col_x[2] + 1.5), Mm(text_y), font_r);

            let (status_fg, status_bg) = status_colors(row.status);
            fill_rounded_rect(&layer, col_x[3] + 1.0, text_y - 1.2, 17.0, 4.5, R_BADGE, status_bg);
            set_color(&layer, status_fg);
            layer.use_text(row.status.to_string(), 7.0, Mm(col_x[3] + 2.5), Mm(text_y), font_b);

            set_color(&layer, TEXT_SEC);
            layer.use_text(row.strategic_priority.to_string(), 7.5, Mm(col_x[4] + 1.5), Mm(text_y), font_r);
            layer.use_text(format!("{:.0}", row.health_score), 8.0, Mm(col_x[5] + 1.5), Mm(text_y), font_r);
            layer.use_text(row.risk_score.to_string(), 8.0, Mm(col_x[6] + 1.5), Mm(text_y), font_r);
            layer.use_text(row.value_score.to_string(), 8.0, Mm(col_x[7] + 1.5), Mm(text_y), font_r);
            set_color(&layer, TEXT_PRI);
            layer.use_text(format!("{:.1}", row.composite_score), 8.0, Mm(col_x[8] + 1.5), Mm(text_y), font_b);

            draw_hline(&layer, MARGIN, T_END, cur_y - ROW_H + 1.5, PANEL_BORDER);
            cur_y -= ROW_H;
        }

        draw_footer(&layer, font_r);
    }
}

// ── Heatmap page ──────────────────────────────────────────────────────────────

fn add_heatmap_page(doc: &PdfDocumentReference, fonts: &Fonts, heatmap: &Heatmap) {
    const LABEL_W: f32 = 26.0;
    const CELL_H: f32 = 34.0;
    const GRID_TOP: f32 = 252.0;
    const MEMBERS_WRAP: usize = 22;
    const MEMBERS_MAX_LINES: usize = 3;

    let (font_r, font_b) = (&fonts.regular, &fonts.bold);
    let (pi, li) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Heatmap");
    let layer = doc.get_page(pi).get_layer(li);

    fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
    fill_gradient_h(&layer, 0.0, PAGE_H - 2.5, PAGE_W, 2.5, ACCENT_BLU, ACCENT_TEAL, 21);

    set_color(&layer, TEXT_PRI);
    layer.use_text("Risk Heatmap", 14.0, Mm(MARGIN), Mm(282.5), font_b);
    set_color(&layer, TEXT_MUT);
    layer.use_text(
        format!("{} risks", heatmap.total()),
        8.0, Mm(T_END - 24.0), Mm(283.0), font_r,
    );
    draw_hline(&layer, MARGIN, T_END, 277.5, PANEL_BORDER);

    let grid_x = MARGIN + LABEL_W;
    let cell_w = (T_END - grid_x) / GRID_SIZE as f32;

    // Column labels (probability, low to high)
    set_color(&layer, TEXT_MUT);
    for (col, label) in BAND_LABELS.iter().enumerate() {
        layer.use_text(*label, 7.0, Mm(grid_x + col as f32 * cell_w + 2.0), Mm(GRID_TOP + 3.0), font_b);
    }
    layer.use_text("IMPACT", 6.5, Mm(MARGIN), Mm(GRID_TOP + 3.0), font_b);

    for row in 0..GRID_SIZE {
        let y = GRID_TOP - (row + 1) as f32 * CELL_H;

        set_color(&layer, TEXT_SEC);
        layer.use_text(
            BAND_LABELS[GRID_SIZE - 1 - row],
            8.0, Mm(MARGIN), Mm(y + CELL_H / 2.0), font_b,
        );

        for col in 0..GRID_SIZE {
            let x = grid_x + col as f32 * cell_w;
            let (fg, bg) = severity_colors(cell_severity(CellPosition { row, col }));

            fill_rounded_rect(&layer, x + 0.8, y + 0.8, cell_w - 1.6, CELL_H - 1.6, R_PANEL, bg);

            let Some(cell) = heatmap.cell(row, col) else { continue };
            set_color(&layer, if cell.count > 0 { fg } else { TEXT_MUT });
            layer.use_text(cell.count.to_string(), 18.0, Mm(x + 4.0), Mm(y + CELL_H - 11.0), font_b);

            let mut lines = wrap_text(&cell.project_ids.join(", "), MEMBERS_WRAP);
            if lines.len() > MEMBERS_MAX_LINES {
                lines.truncate(MEMBERS_MAX_LINES);
                if let Some(last) = lines.last_mut() {
                    last.push_str("...");
                }
            }
            set_color(&layer, TEXT_SEC);
            for (j, line) in lines.iter().enumerate() {
                layer.use_text(line.as_str(), 6.5, Mm(x + 4.0), Mm(y + CELL_H - 17.0 - j as f32 * 3.5), font_r);
            }
        }
    }

    let grid_bot = GRID_TOP - GRID_SIZE as f32 * CELL_H;
    set_color(&layer, TEXT_MUT);
    layer.use_text("PROBABILITY", 6.5, Mm(grid_x), Mm(grid_bot - 6.0), font_b);

    // Legend: risks per cell severity
    let legend_y = grid_bot - 20.0;
    draw_hline(&layer, MARGIN, T_END, legend_y + 6.0, PANEL_BORDER);
    for (i, (severity, count)) in heatmap.severity_counts().iter().enumerate() {
        let lx = MARGIN + i as f32 * 44.0;
        let (fg, bg) = severity_colors(*severity);
        fill_rounded_rect(&layer, lx, legend_y - 1.5, 40.0, 6.5, R_BADGE, bg);
        set_color(&layer, fg);
        layer.use_text(format!("{}  {}", severity, count), 7.5, Mm(lx + 3.0), Mm(legend_y), font_b);
    }

    draw_footer(&layer, font_r);
}

fn status_colors(status: ProjectStatus) -> ((f32, f32, f32), (f32, f32, f32)) {
    match status {
        ProjectStatus::Green => (GREEN_FG, GREEN_BG),
        ProjectStatus::Yellow => (YELLOW_FG, YELLOW_BG),
        ProjectStatus::Red => (RED_FG, RED_BG),
    }
}

fn severity_colors(severity: Severity) -> ((f32, f32, f32), (f32, f32, f32)) {
    match severity {
        Severity::Low => (GREEN_FG, GREEN_BG),
        Severity::Medium => (YELLOW_FG, YELLOW_BG),
        Severity::High => (ORANGE_FG, ORANGE_BG),
        Severity::Critical => (RED_FG, RED_BG),
    }
}

fn draw_footer(layer: &PdfLayerReference, font_r: &IndirectFontRef) {
    draw_hline(layer, MARGIN, T_END, 22.0, PANEL_BORDER);
    set_color(layer, TEXT_MUT);
    layer.use_text(
        format!("Generated by portsight v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(MARGIN), Mm(15.0), font_r,
    );
}

// ── Drawing helpers ───────────────────────────────────────────────────────────

fn set_color(layer: &PdfLayerReference, (r, g, b): (f32, f32, f32)) {
    layer.set_fill_color(Color::Rgb(Rgb { r, g, b, icc_profile: None }));
}

fn fill_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32,
             (r, g, b): (f32, f32, f32)) {
    layer.set_fill_color(Color::Rgb(Rgb { r, g, b, icc_profile: None }));
    layer.add_polygon(Polygon {
        rings: vec![vec![
            (Point::new(Mm(x),     Mm(y)),     false),
            (Point::new(Mm(x + w), Mm(y)),     false),
            (Point::new(Mm(x + w), Mm(y + h)), false),
            (Point::new(Mm(x),     Mm(y + h)), false),
        ]],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_fill_color(Color::Rgb(Rgb { r: 0.0, g: 0.0, b: 0.0, icc_profile: None }));
}

/// Clockwise polygon ring approximating a rounded rectangle, 8 segments per
/// corner.
fn rounded_rect_ring(x: f32, y: f32, w: f32, h: f32, r: f32) -> Vec<(Point, bool)> {
    let r = r.min(w / 2.0).min(h / 2.0);
    const SEGS: usize = 8;
    let mut pts = Vec::with_capacity(4 * (SEGS + 1));

    let corners = [
        (x + w - r, y + r,     270.0f32, 360.0f32),
        (x + w - r, y + h - r, 0.0f32,   90.0f32),
        (x + r,     y + h - r, 90.0f32,  180.0f32),
        (x + r,     y + r,     180.0f32, 270.0f32),
    ];

    for (cx, cy, start, end) in &corners {
        for i in 0..=SEGS {
            let t = i as f32 / SEGS as f32;
            let angle = (start + (end - start) * t).to_radians();
            pts.push((
                Point::new(Mm(cx + r * angle.cos()), Mm(cy + r * angle.sin())),
                false,
            ));
        }
    }
    pts
}

fn fill_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32,
                     r: f32, (cr, cg, cb): (f32, f32, f32)) {
    layer.set_fill_color(Color::Rgb(Rgb { r: cr, g: cg, b: cb, icc_profile: None }));
    layer.add_polygon(Polygon {
        rings: vec![rounded_rect_ring(x, y, w, h, r)],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_fill_color(Color::Rgb(Rgb { r: 0.0, g: 0.0, b: 0.0, icc_profile: None }));
}

fn stroke_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32,
                       r: f32, (cr, cg, cb): (f32, f32, f32)) {
    layer.set_outline_color(Color::Rgb(Rgb { r: cr, g: cg, b: cb, icc_profile: None }));
    layer.set_outline_thickness(0.4);
    layer.add_polygon(Polygon {
        rings: vec![rounded_rect_ring(x, y, w, h, r)],
        mode: PaintMode::Stroke,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_outline_color(Color::Rgb(Rgb { r: 0.0, g: 0.0, b: 0.0, icc_profile: None }));
    layer.set_outline_thickness(1.0);
}

fn draw_hline(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32,
              (r, g, b): (f32, f32, f32)) {
    layer.set_outline_color(Color::Rgb(Rgb { r, g, b, icc_profile: None }));
    layer.set_outline_thickness(0.3);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    });
    layer.set_outline_color(Color::Rgb(Rgb { r: 0.0, g: 0.0, b: 0.0, icc_profile: None }));
    layer.set_outline_thickness(1.0);
}

/// Left-to-right gradient made of `steps` vertical strips.
#[allow(clippy::too_many_arguments)]
fn fill_gradient_h(
    layer: &PdfLayerReference,
    x: f32, y: f32, w: f32, h: f32,
    from: (f32, f32, f32),
    to: (f32, f32, f32),
    steps: usize,
) {
    let step_w = w / steps as f32;
    for i in 0..steps {
        let t = i as f32 / (steps - 1).max(1) as f32;
        let color = (
            from.0 + (to.0 - from.0) * t,
            from.1 + (to.1 - from.1) * t,
            from.2 + (to.2 - from.2) * t,
        );
        // Overlap strips slightly to prevent rounding gaps
        fill_rect(layer, x + i as f32 * step_w, y, step_w + 0.6, h, color);
    }
}

// ── Text helpers ──────────────────────────────────────────────────────────────

/// Builtin PDF fonts are WinAnsi only, so the ellipsis is spelled out.
fn truncate(s: &str, max: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() > max {
        format!("{}...", chars[..max.saturating_sub(3)].iter().collect::<String>())
    } else {
        s.to_string()
    }
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    if text.len() <= max_chars {
        return vec![text.to_string()];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

// ── Date helper ───────────────────────────────────────────────────────────────

fn today() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let (y, m, d) = civil_from_days((secs / 86_400) as i64);
    format!("{:04}-{:02}-{:02}", y, m, d)
}

/// Days since 1970-01-01 to a proleptic Gregorian `(year, month, day)`.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

//! 4×4 probability/impact heatmap.
//!
//! Each axis is split into four bands of width 25 over `[0, 100]`. Rows are
//! inverted impact bands (row 0 holds the highest impact) and columns are
//! probability bands, lowest on the left.

use serde::Serialize;

use crate::engine::clamp_percent;
use crate::models::{Risk, Severity};

pub const GRID_SIZE: usize = 4;

/// Axis labels shared by rows and columns, indexed by band.
pub const BAND_LABELS: [&str; GRID_SIZE] = ["Low", "Medium", "High", "Critical"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

/// Band index for a single axis value. `100` lands in band 3, not 4.
pub fn band(value: f64) -> usize {
    let band = (clamp_percent(value) / 25.0).floor() as usize;
    band.min(GRID_SIZE - 1)
}

pub fn bucket(probability: f64, impact: f64) -> CellPosition {
    CellPosition {
        row: GRID_SIZE - 1 - band(impact),
        col: band(probability),
    }
}

/// Severity of a grid cell from `row + col`:
/// `0..=2` LOW, `3..=4` MEDIUM, `5` HIGH, `6` CRITICAL.
pub fn cell_severity(position: CellPosition) -> Severity {
    match position.row + position.col {
        0..=2 => Severity::Low,
        3..=4 => Severity::Medium,
        5 => Severity::High,
        _ => Severity::Critical,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    pub count: usize,
    pub project_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    /// `cells[row][col]`
    pub cells: Vec<Vec<HeatmapCell>>,
}

impl Heatmap {
    pub fn empty() -> Self {
        Heatmap {
            cells: vec![vec![HeatmapCell::default(); GRID_SIZE]; GRID_SIZE],
        }
    }

    /// Group risks into cells. Each risk adds one to its cell count and its
    /// project id to the cell's member list (duplicates kept, in input order).
    pub fn from_risks(risks: &[Risk]) -> Self {
        let mut heatmap = Heatmap::empty();
        for risk in risks {
            let pos = bucket(risk.probability, risk.impact);
            let cell = &mut heatmap.cells[pos.row][pos.col];
            cell.count += 1;
            cell.project_ids.push(risk.project_id.clone());
        }
        heatmap
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&HeatmapCell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    pub fn total(&self) -> usize {
        self.cells.iter().flatten().map(|c| c.count).sum()
    }

    /// Risk counts per cell severity, in `LOW, MEDIUM, HIGH, CRITICAL` order.
    pub fn severity_counts(&self) -> [(Severity, usize); 4] {
        let mut counts = [
            (Severity::Low, 0),
            (Severity::Medium, 0),
            (Severity::High, 0),
            (Severity::Critical, 0),
        ];
        for (row, cells) in self.cells.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let severity = cell_severity(CellPosition { row, col });
                counts[severity as usize].1 += cell.count;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskStatus;

    fn risk(project_id: &str, probability: f64, impact: f64) -> Risk {
        Risk {
            id: format!("{}-{}-{}", project_id, probability, impact),
            project_id: project_id.to_string(),
            title: String::new(),
            severity: Severity::Low,
            probability,
            impact,
            status: RiskStatus::Open,
            mitigation_plan: String::new(),
        }
    }

    #[test]
    fn test_bucket_stays_in_grid() {
        for p in (0..=100).step_by(5) {
            for i in (0..=100).step_by(5) {
                let pos = bucket(p as f64, i as f64);
                assert!(pos.row < GRID_SIZE && pos.col < GRID_SIZE, "p={p} i={i}");
            }
        }
    }

    #[test]
    fn test_bucket_corners() {
        assert_eq!(bucket(100.0, 100.0), CellPosition { row: 0, col: 3 });
        assert_eq!(bucket(0.0, 0.0), CellPosition { row: 3, col: 0 });
        assert_eq!(bucket(24.9, 25.0), CellPosition { row: 2, col: 0 });
        assert_eq!(bucket(-10.0, 180.0), CellPosition { row: 0, col: 0 });
    }

    #[test]
    fn test_cell_severity_boundaries() {
        let sev = |row, col| cell_severity(CellPosition { row, col });
        assert_eq!(sev(0, 0), Severity::Low);
        assert_eq!(sev(1, 1), Severity::Low);
        assert_eq!(sev(0, 2), Severity::Low);
        assert_eq!(sev(0, 3), Severity::Medium);
        assert_eq!(sev(2, 2), Severity::Medium);
        assert_eq!(sev(2, 3), Severity::High);
        assert_eq!(sev(3, 3), Severity::Critical);
    }

    #[test]
    fn test_from_risks_groups_members() {
        let risks = vec![
            risk("P001", 20.0, 15.0),
            risk("P004", 45.0, 50.0),
            risk("P006", 70.0, 80.0),
            risk("P003", 50.0, 40.0),
            risk("P002", 30.0, 25.0),
        ];
        let heatmap = Heatmap::from_risks(&risks);
        assert_eq!(heatmap.total(), 5);

        let top = heatmap.cell(0, 2).unwrap();
        assert_eq!(top.count, 1);
        assert_eq!(top.project_ids, vec!["P006".to_string()]);

        // (45, 50) → row 1, col 1; (30, 25) → row 2, col 1
        assert_eq!(heatmap.cell(1, 1).unwrap().project_ids, vec!["P004".to_string()]);
        assert_eq!(heatmap.cell(2, 1).unwrap().project_ids, vec!["P002".to_string()]);
        assert_eq!(heatmap.cell(2, 2).unwrap().project_ids, vec!["P003".to_string()]);
        assert_eq!(heatmap.cell(3, 0).unwrap().count, 1);
        assert!(heatmap.cell(4, 0).is_none());
    }

    #[test]
    fn test_severity_counts() {
        let risks = vec![risk("A", 100.0, 0.0), risk("B", 100.0, 0.0), risk("C", 0.0, 100.0)];
        let counts = Heatmap::from_risks(&risks).severity_counts();
        assert_eq!(counts[3], (Severity::Critical, 2));
        assert_eq!(counts[0], (Severity::Low, 1));
    }

    #[test]
    fn test_empty_heatmap() {
        let heatmap = Heatmap::from_risks(&[]);
        assert_eq!(heatmap.total(), 0);
        assert_eq!(heatmap.cells.len(), GRID_SIZE);
    }
}

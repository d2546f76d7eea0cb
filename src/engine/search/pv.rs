//! Score formatting and per-depth info reporting.

use log::info;

use crate::core::moves::format_line;
use crate::engine::eval::Score;
use crate::engine::tt::TranspositionTable;

use super::types::DepthReport;

pub(crate) fn format_score(score: &Score) -> String {
    match score.mate_distance() {
        Some(plies) if score.terminal > 0 => format!("win in {}", plies),
        Some(plies) => format!("loss in {}", plies),
        None => format!("material {} visibility {:.2}", score.material, score.visibility),
    }
}

pub(super) fn report_info(tt: &TranspositionTable, report: &DepthReport) {
    let millis = report.elapsed.as_millis();
    let nps = if millis > 0 {
        (report.nodes as u128 * 1000) / millis
    } else {
        0
    };
    info!(
        "depth {} score {} nodes {} nps {} time {} entries {} pv {}",
        report.depth,
        format_score(&report.score),
        report.nodes,
        nps,
        millis,
        tt.len(),
        format_line(&report.principal_variation)
    );
}

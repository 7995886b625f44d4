//! Human-readable recommendation report.

use std::io::Write;

use shelter_gap::{AnalysisSnapshot, SeverityLevel};

use crate::CliError;

/// Print the ranked recommendations as a table.
pub(crate) fn write_report(
    writer: &mut dyn Write,
    snapshot: &AnalysisSnapshot,
) -> Result<(), CliError> {
    render(writer, snapshot).map_err(CliError::WriteReport)
}

fn render(writer: &mut dyn Write, snapshot: &AnalysisSnapshot) -> std::io::Result<()> {
    let quality = snapshot.quality();
    writeln!(
        writer,
        "{} shelters, {} demand points ({} and {} rows dropped)",
        snapshot.shelters().len(),
        snapshot.demand_points().len(),
        quality.shelters.rows_dropped(),
        quality.demand.rows_dropped(),
    )?;
    let recommendations = snapshot.recommendations();
    if recommendations.is_empty() {
        return writeln!(writer, "no pressure areas found; nothing to recommend");
    }
    writeln!(
        writer,
        "{:>4}  {:<11}  {:>7}  {:<21}  {:<8}  {:>9}  {:>6}",
        "rank", "priority", "cluster", "location", "severity", "distance", "need"
    )?;
    for (rank, recommendation) in recommendations.iter().enumerate() {
        let scored = &recommendation.scored;
        let location = format!(
            "{:.5}, {:.5}",
            recommendation.recommended_lat(),
            recommendation.recommended_lon()
        );
        let distance = if scored.coverage_vacuum {
            "no cover".to_owned()
        } else {
            format!("{:.2} km", scored.distance_to_nearest_shelter_km)
        };
        writeln!(
            writer,
            "{:>4}  {:<11}  {:>7}  {:<21}  {:<8}  {:>9}  {:>6.1}",
            rank + 1,
            recommendation.priority.as_str(),
            recommendation.cluster_id(),
            location,
            SeverityLevel::classify(scored.avg_severity_index()).as_str(),
            distance,
            recommendation.need_score(),
        )?;
    }
    Ok(())
}

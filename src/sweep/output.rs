use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::sweep::{SweepResults, SweepRow, SweepSummary};

/// Round a float to n decimal places.
fn truncate(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Write all rows to a CSV file.
pub fn write_csv(rows: &[SweepRow], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "rank",
        "id",
        "carbs",
        "gi",
        "protein",
        "fat",
        "fiber",
        "meal_time",
        "context",
        "ir_score",
        "wave_minutes",
        "peak_value",
        "shape",
        "auc",
        "score",
    ])?;

    for (i, row) in rows.iter().enumerate() {
        wtr.write_record([
            (i + 1).to_string(),
            row.id.clone(),
            format!("{:.1}", row.carbs),
            format!("{:.0}", row.gi),
            format!("{:.1}", row.protein),
            format!("{:.1}", row.fat),
            format!("{:.1}", row.fiber),
            row.meal_time.clone(),
            row.context.to_string(),
            format!("{:.3}", row.ir_score),
            row.wave_minutes.to_string(),
            format!("{:.2}", row.peak_value),
            row.shape.label().to_string(),
            format!("{:.3}", row.auc),
            row.score.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the summary and the top `k` rows to a JSON file.
pub fn write_summary_json(results: &SweepResults, k: usize, path: &Path) -> Result<()> {
    let s = &results.summary;
    let json = serde_json::json!({
        "summary": {
            "count": s.count,
            "meanWaveMinutes": truncate(s.mean_wave_minutes, 1),
            "minWaveMinutes": s.min_wave_minutes,
            "maxWaveMinutes": s.max_wave_minutes,
            "meanScore": truncate(s.mean_score, 1),
            "meanPeak": truncate(s.mean_peak, 3),
            "shapes": {
                "spike": s.spikes,
                "balanced": s.balanced,
                "prolonged": s.prolonged,
            },
        },
        "top": results.rows.iter().take(k).map(|r| {
            serde_json::json!({
                "id": r.id,
                "mealTime": r.meal_time,
                "context": r.context,
                "waveMinutes": r.wave_minutes,
                "peakValue": r.peak_value,
                "shape": r.shape.label(),
                "score": r.score,
            })
        }).collect::<Vec<_>>(),
    });

    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string_pretty(&json)?.as_bytes())?;
    Ok(())
}

/// Print top-k rows to stdout.
pub fn print_topk(rows: &[SweepRow], k: usize) {
    println!("\n=== Top {} Scenarios (by score) ===\n", k.min(rows.len()));

    for (i, row) in rows.iter().take(k).enumerate() {
        println!(
            "#{}: {} score={} wave={}min peak={:.2} {} [{}]",
            i + 1,
            row.id,
            row.score,
            row.wave_minutes,
            row.peak_value,
            row.shape.label(),
            row.context
        );
        println!(
            "    C:{:.1} GI:{:.0} P:{:.1} F:{:.1} Fi:{:.1} at {} IR={:.2}",
            row.carbs, row.gi, row.protein, row.fat, row.fiber, row.meal_time, row.ir_score
        );
    }
    println!();
}

pub fn print_summary(summary: &SweepSummary) {
    println!("=== Sweep Summary ({} scenarios) ===", summary.count);
    println!(
        "Wave: mean {:.1} min, range {}-{} min",
        summary.mean_wave_minutes, summary.min_wave_minutes, summary.max_wave_minutes
    );
    println!(
        "Score: mean {:.1}   Peak: mean {:.2}",
        summary.mean_score, summary.mean_peak
    );
    println!(
        "Shapes: {} spike, {} balanced, {} prolonged",
        summary.spikes, summary.balanced, summary.prolonged
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::WaveShape;
    use tempfile::NamedTempFile;

    fn row(id: &str, score: u32) -> SweepRow {
        SweepRow {
            id: id.to_string(),
            carbs: 50.0,
            gi: 60.0,
            protein: 20.0,
            fat: 10.0,
            fiber: 4.0,
            meal_time: "12:00".to_string(),
            context: "none",
            ir_score: 1.06,
            wave_minutes: 170,
            peak_value: 0.8,
            shape: WaveShape::Balanced,
            auc: 0.41,
            score,
        }
    }

    #[test]
    fn test_write_csv() {
        let file = NamedTempFile::new().unwrap();
        write_csv(&[row("a", 90), row("b", 70)], file.path()).unwrap();

        let mut rdr = csv::Reader::from_path(file.path()).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(headers.len(), 15);
        let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[1][1], "b");
        assert_eq!(&records[0][12], "balanced");
    }

    #[test]
    fn test_write_summary_json() {
        let rows = vec![row("a", 90), row("b", 70), row("c", 50)];
        let results = SweepResults {
            summary: SweepSummary::of(&rows),
            rows,
        };
        let file = NamedTempFile::new().unwrap();
        write_summary_json(&results, 2, file.path()).unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["summary"]["count"], 3);
        assert_eq!(value["summary"]["meanScore"], 70.0);
        assert_eq!(value["top"].as_array().unwrap().len(), 2);
    }
}

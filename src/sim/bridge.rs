use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::graph_utils::ids::RemoteId;
use crate::remote::RemoteStore;
use crate::remote::types::SimStep;

// Reused cyclically when a run produces more series than colours
pub const SERIES_PALETTE: [&str; 5] =
    ["#2563eb", "#16a34a", "#dc2626", "#9333ea", "#ea580c"];

// The time axis is synthesized client-side; a series with this name in the
// payload would collide and is skipped
const TIME_KEY: &str = "time";

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStyle {
    pub name: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimePoint {
    /// 1-based step index; response order defines time, not any payload field.
    pub time: u32,
    pub values: SimStep,
}

/// Plot-ready reshaping of a simulation response.
#[derive(Debug, Clone, PartialEq)]
pub struct SimDataset {
    pub points: Vec<TimePoint>,
    pub series: Vec<SeriesStyle>,
}

/// Submit a simulation request for the project and reshape the ordered step
/// maps into a dataset. Any failure (including an empty result) is an error;
/// callers log it and draw nothing.
pub async fn run_simulation<R: RemoteStore>(
    remote: &R,
    project_id: RemoteId,
    steps: u32,
) -> Result<SimDataset> {
    let raw = remote.simulate(project_id, steps).await?;
    if raw.is_empty() {
        bail!("simulation for project {} returned no steps", project_id);
    }

    // Series set comes from the first step's keys, styled in first-seen order
    let series: Vec<SeriesStyle> = raw[0]
        .keys()
        .filter(|k| k.as_str() != TIME_KEY)
        .enumerate()
        .map(|(i, name)| SeriesStyle {
            name: name.clone(),
            color: SERIES_PALETTE[i % SERIES_PALETTE.len()],
        })
        .collect();

    let points = raw
        .into_iter()
        .enumerate()
        .map(|(idx, values)| TimePoint { time: idx as u32 + 1, values })
        .collect();

    Ok(SimDataset { points, series })
}

/// Write the dataset as CSV: a time column followed by one column per series.
/// Steps missing a series value leave the cell empty.
pub fn export_dataset_csv(dataset: &SimDataset, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec![TIME_KEY.to_string()];
    header.extend(dataset.series.iter().map(|s| s.name.clone()));
    wtr.write_record(&header)?;

    for point in &dataset.points {
        let mut row = vec![point.time.to_string()];
        for s in &dataset.series {
            row.push(point.values.get(&s.name).map(|v| v.to_string()).unwrap_or_default());
        }
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

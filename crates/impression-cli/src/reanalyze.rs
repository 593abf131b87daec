//! Bulk re-analysis of stored reviews
//!
//! Reads JSON-lines review records, re-runs the analysis on every record
//! that matches the rating filter and reports how many records changed.
//! Records are analysed concurrently but written back in input order.
//! A record that fails (unparseable line, panicked task) is logged, counted
//! and passed through untouched.

use futures::stream::{self, StreamExt};
use impression_cache::AnalysisCache;
use impression_core::{AnalysisResult, ImpressionTag, Result, Subcategory};
use impression_engine::{is_complex, ReviewAnalyzer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// How many subcategories the tag statistics list
const TOP_SUBCATEGORIES: usize = 10;

/// A stored review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default)]
    pub text: String,
    pub rating: u8,
    #[serde(default)]
    pub tags: Vec<ImpressionTag>,
    #[serde(default)]
    pub sentiment_score: Option<f32>,
    #[serde(default)]
    pub tags_complex: bool,
}

#[derive(Debug, Clone)]
pub struct ReanalyzeOptions {
    pub input: PathBuf,
    /// Destination of the rewritten records; stdout when `None`
    pub output: Option<PathBuf>,
    /// Only re-analyse records with this rating
    pub rating: Option<u8>,
    /// Report changes without writing anything
    pub dry_run: bool,
    pub concurrency: usize,
}

impl ReanalyzeOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            rating: None,
            dry_run: false,
            concurrency: num_cpus::get(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReanalyzeReport {
    /// Records matching the rating filter
    pub total: usize,
    pub processed: usize,
    /// Records whose tags or score changed
    pub updated: usize,
    pub changed_tags: usize,
    pub changed_score: usize,
    pub skipped_empty: usize,
    pub failed: usize,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_stats: Option<TagStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TagStats {
    pub avg_tags_per_record: f64,
    /// Most frequent subcategories, by display name
    pub top_subcategories: Vec<(String, usize)>,
}

impl TagStats {
    fn from_records<'a>(records: impl IntoIterator<Item = &'a ReviewRecord>) -> Self {
        let mut record_count = 0usize;
        let mut tag_count = 0usize;
        let mut by_subcategory: HashMap<Subcategory, usize> = HashMap::new();

        for record in records {
            record_count += 1;
            tag_count += record.tags.len();
            for tag in &record.tags {
                *by_subcategory.entry(tag.subcategory).or_default() += 1;
            }
        }

        let mut top: Vec<(Subcategory, usize)> = by_subcategory.into_iter().collect();
        top.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        top.truncate(TOP_SUBCATEGORIES);

        Self {
            avg_tags_per_record: if record_count == 0 {
                0.0
            } else {
                tag_count as f64 / record_count as f64
            },
            top_subcategories: top
                .into_iter()
                .map(|(subcategory, count)| (subcategory.name().to_string(), count))
                .collect(),
        }
    }
}

/// Outcome of one input line
enum Line {
    /// Outside the filter, empty text or failed; written back unchanged
    Untouched(String),
    Reanalyzed(ReviewRecord),
}

/// Re-run the analysis over `options.input`.
///
/// Outside a dry run, results go through the cache with a forced refresh,
/// so cached entries are updated along the way.
pub async fn reanalyze(
    cache: Arc<AnalysisCache>,
    options: &ReanalyzeOptions,
) -> Result<ReanalyzeReport> {
    let content = tokio::fs::read_to_string(&options.input).await?;
    let mut report = ReanalyzeReport {
        dry_run: options.dry_run,
        ..Default::default()
    };

    let lines: Vec<(usize, String)> = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| (index, line.to_string()))
        .collect();
    let raws: Vec<String> = lines.iter().map(|(_, raw)| raw.clone()).collect();

    let outcomes: Vec<Line> = stream::iter(lines)
        .map(|(index, raw)| {
            let cache = cache.clone();
            let (rating_filter, dry_run) = (options.rating, options.dry_run);
            tokio::spawn(
                async move { process_line(&cache, index, raw, rating_filter, dry_run).await },
            )
        })
        .buffered(options.concurrency.max(1))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .enumerate()
        .map(|(position, joined)| match joined {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("Record task {} failed: {}", position, e);
                Processed::Failed(raws[position].clone())
            }
        })
        .map(|processed| processed.tally(&mut report))
        .collect();

    let reanalyzed = outcomes.iter().filter_map(|line| match line {
        Line::Reanalyzed(record) => Some(record),
        Line::Untouched(_) => None,
    });

    if !options.dry_run {
        report.tag_stats = Some(TagStats::from_records(reanalyzed));
        write_lines(options, &outcomes).await?;
    }

    tracing::info!(
        "Re-analysis finished: {} records, {} updated ({} tags, {} scores), {} empty, {} failed",
        report.total,
        report.updated,
        report.changed_tags,
        report.changed_score,
        report.skipped_empty,
        report.failed
    );
    Ok(report)
}

/// Per-line result before it is counted
enum Processed {
    Filtered(String),
    Empty(String),
    Failed(String),
    Done {
        record: ReviewRecord,
        tags_changed: bool,
        score_changed: bool,
    },
}

impl Processed {
    fn tally(self, report: &mut ReanalyzeReport) -> Line {
        match self {
            Self::Filtered(raw) => Line::Untouched(raw),
            Self::Empty(raw) => {
                report.total += 1;
                report.skipped_empty += 1;
                Line::Untouched(raw)
            }
            Self::Failed(raw) => {
                report.total += 1;
                report.failed += 1;
                Line::Untouched(raw)
            }
            Self::Done {
                record,
                tags_changed,
                score_changed,
            } => {
                report.total += 1;
                report.processed += 1;
                if tags_changed {
                    report.changed_tags += 1;
                }
                if score_changed {
                    report.changed_score += 1;
                }
                if tags_changed || score_changed {
                    report.updated += 1;
                }
                Line::Reanalyzed(record)
            }
        }
    }
}

async fn process_line(
    cache: &AnalysisCache,
    index: usize,
    raw: String,
    rating_filter: Option<u8>,
    dry_run: bool,
) -> Processed {
    let mut record: ReviewRecord = match serde_json::from_str(&raw) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!("Skipping record at line {}: {}", index + 1, e);
            return Processed::Failed(raw);
        }
    };

    if rating_filter.is_some_and(|rating| rating != record.rating) {
        return Processed::Filtered(raw);
    }
    if record.text.trim().is_empty() {
        return Processed::Empty(raw);
    }

    // A dry run leaves the cache alone too
    let result = if dry_run {
        cache.analyzer().analyze(&record.text, record.rating).await
    } else {
        cache.get_or_compute(&record.text, record.rating, true).await
    };
    let tags_changed = result.tags != record.tags;
    let score_changed =
        record.sentiment_score.map(round_score) != Some(round_score(result.sentiment_score));

    apply(&mut record, result);
    Processed::Done {
        record,
        tags_changed,
        score_changed,
    }
}

fn apply(record: &mut ReviewRecord, result: AnalysisResult) {
    record.tags_complex = is_complex(record.rating, &result.tags);
    record.tags = result.tags;
    record.sentiment_score = Some(result.sentiment_score);
}

fn round_score(score: f32) -> i32 {
    (score * 100.0).round() as i32
}

async fn write_lines(options: &ReanalyzeOptions, lines: &[Line]) -> Result<()> {
    let mut buffer = String::new();
    for line in lines {
        match line {
            Line::Untouched(raw) => buffer.push_str(raw),
            Line::Reanalyzed(record) => buffer.push_str(&serde_json::to_string(record)?),
        }
        buffer.push('\n');
    }

    match &options.output {
        Some(path) => {
            tokio::fs::write(path, buffer).await?;
            tracing::info!("Wrote {} records to {}", lines.len(), path.display());
        }
        None => print!("{}", buffer),
    }
    Ok(())
}

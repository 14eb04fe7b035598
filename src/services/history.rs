use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::Utc;

use crate::models::{AnalyticsSummary, CheckRecord, FiberCount, Grade, GradeResult, GradingInput};

/// History survives only as long as the process; no persistence by design.
const DEFAULT_CAPACITY: usize = 50;

/// Mock factor from the original dashboard: 2.4 kg CO2 per high-grade choice.
const CARBON_KG_PER_HIGH_GRADE: f64 = 2.4;

/// Fiber keywords grouped for the "most scanned fibers" ranking, so
/// "Organic Cotton" and "Egyptian Cotton" both count as Cotton.
const FIBER_KEYWORDS: [&str; 8] = [
    "Cotton",
    "Linen",
    "Hemp",
    "Polyester",
    "Nylon",
    "Silk",
    "Tencel",
    "Wool",
];

/// Ephemeral in-memory log of completed grading attempts, newest first.
pub struct HistoryLog {
    records: Mutex<VecDeque<CheckRecord>>,
    capacity: usize,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn record(&self, input: &GradingInput, result: &GradeResult) {
        let record = CheckRecord {
            input_text: input.text_value().map(|s| s.to_string()),
            had_image: input.image_data().is_some(),
            result: result.clone(),
            checked_at: Utc::now(),
        };

        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        if records.len() == self.capacity {
            records.pop_back();
        }
        records.push_front(record);
    }

    pub fn recent(&self) -> Vec<CheckRecord> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn analytics(&self) -> AnalyticsSummary {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        summarize(records.iter())
    }
}

fn summarize<'a>(records: impl Iterator<Item = &'a CheckRecord> + Clone) -> AnalyticsSummary {
    let total_checks = records.clone().count();

    let average_score = if total_checks == 0 {
        0
    } else {
        let sum: u32 = records.clone().map(|r| r.result.score as u32).sum();
        (sum as f64 / total_checks as f64).round() as u8
    };

    let high_grade_count = records
        .clone()
        .filter(|r| matches!(r.result.grade, Grade::A | Grade::B))
        .count();

    let carbon_saved_kg =
        (high_grade_count as f64 * CARBON_KG_PER_HIGH_GRADE * 10.0).round() / 10.0;

    let mut counts: Vec<FiberCount> = Vec::new();
    for record in records {
        let composition = record.result.composition_analysis.to_lowercase();
        for keyword in FIBER_KEYWORDS {
            if composition.contains(&keyword.to_lowercase()) {
                match counts.iter_mut().find(|c| c.name == keyword) {
                    Some(entry) => entry.count += 1,
                    None => counts.push(FiberCount {
                        name: keyword.to_string(),
                        count: 1,
                    }),
                }
            }
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count).then(a.name.cmp(&b.name)));
    counts.truncate(5);

    AnalyticsSummary {
        total_checks,
        average_score,
        high_grade_count,
        carbon_saved_kg,
        top_fibers: counts,
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new()
    }
}

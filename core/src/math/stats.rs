use crate::math::masked::MaskedArray;

/// Summary of the unmasked part of a measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskedStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

pub struct StatsHelper;

impl StatsHelper {
    /// Min/max/mean/median over unmasked samples, `None` when everything is masked.
    pub fn summarize(values: &MaskedArray) -> Option<MaskedStats> {
        let mut kept = values.compressed();
        if kept.is_empty() {
            return None;
        }
        kept.sort_by(|a, b| a.total_cmp(b));

        let count = kept.len();
        let mean = kept.iter().sum::<f64>() / count as f64;
        let median = if count % 2 == 1 {
            kept[count / 2]
        } else {
            (kept[count / 2 - 1] + kept[count / 2]) / 2.0
        };

        Some(MaskedStats {
            min: kept[0],
            max: kept[count - 1],
            mean,
            median,
        })
    }

    /// Share of masked samples in percent; an empty array counts as fully masked.
    pub fn masked_percent(values: &MaskedArray) -> f64 {
        let total = values.mask.len();
        if total == 0 {
            return 100.0;
        }
        values.masked_count() as f64 / total as f64 * 100.0
    }
}

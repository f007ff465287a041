use log::debug;

/// Fixed number of equal-width buckets spanning `[min, max]`.
pub const BUCKET_COUNT: u64 = 40;

/// Which result list a record set came from. Picks the duration field and
/// the axis wording: traces carry `trace_duration`, spans `elapsed_time`,
/// both in microseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    Trace,
    Span,
}

impl ListKind {
    pub fn duration_label(self) -> &'static str {
        match self {
            ListKind::Trace => "trace duration",
            ListKind::Span => "elapsed time",
        }
    }
}

/// One contiguous duration sub-range. Half-open `[range_start, range_end)`
/// except for the last bucket, which also owns `max` itself.
#[derive(Clone, Debug)]
pub struct Bucket {
    range_start: u64,
    range_end: u64,
    members: Vec<usize>,
}

impl Bucket {
    pub fn range_start(&self) -> u64 {
        self.range_start
    }

    pub fn range_end(&self) -> u64 {
        self.range_end
    }

    /// Indices into the source list, in original order.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn count(&self) -> usize {
        self.members.len()
    }
}

/// Result of selecting a duration range.
///
/// `Unfiltered` is the whole `[min, max]` range: the caller should show the
/// full list. This exists so library code never has to interpret the empty
/// vector that [`DurationHistogram::filter_by_range`] returns for the same
/// case.
#[derive(Debug, PartialEq, Eq)]
pub enum Selection<'a, R> {
    Unfiltered,
    Filtered(Vec<&'a R>),
}

/// A fixed-cardinality histogram over the durations of a record list,
/// plus an exact range filter over the same list.
///
/// Built once per list snapshot and read-only afterwards; hand it a new
/// list by building a new model.
pub struct DurationHistogram<R> {
    records: Vec<R>,
    durations: Vec<u64>,
    min: u64,
    max: u64,
    step: u64,
    buckets: Vec<Bucket>,
    labels: Vec<String>,
    counts: Vec<Option<u64>>,
}

impl<R> DurationHistogram<R> {
    /// Bucket the given records by duration. Returns `None` for an empty
    /// list; callers skip rendering entirely in that case.
    ///
    /// `duration_of` must be a pure accessor returning the record's
    /// duration in microseconds. Values are taken as-is, the caller
    /// guarantees they are meaningful.
    pub fn build(records: Vec<R>, duration_of: impl Fn(&R) -> u64) -> Option<Self> {
        if records.is_empty() {
            return None;
        }
        let _span = tracing::debug_span!("duration_histogram_build").entered();

        let durations: Vec<u64> = records.iter().map(&duration_of).collect();
        let mut min = u64::MAX;
        let mut max = 0u64;
        for &duration in &durations {
            min = min.min(duration);
            max = max.max(duration);
        }

        let step = (max - min).div_ceil(BUCKET_COUNT);

        let mut buckets = Vec::new();
        if step == 0 {
            // All durations are equal; walking by a zero step would never
            // terminate. Collapse to a single bucket.
            buckets.push(Bucket {
                range_start: min,
                range_end: min,
                members: Vec::new(),
            });
        } else {
            let mut current = min;
            while current < max {
                buckets.push(Bucket {
                    range_start: current,
                    range_end: current + step,
                    members: Vec::new(),
                });
                current += step;
            }
        }

        let last = buckets.len() - 1;
        for (index, &duration) in durations.iter().enumerate() {
            let slot = if step == 0 {
                0
            } else {
                // The maximum duration would index one past the end; clamp
                // so the top edge belongs to the last bucket.
                (((duration - min) / step) as usize).min(last)
            };
            buckets[slot].members.push(index);
        }

        let labels = buckets
            .iter()
            .map(|bucket| format!("{}-{}", bucket.range_start, bucket.range_end))
            .collect();
        let counts = buckets
            .iter()
            .map(|bucket| {
                let count = bucket.members.len() as u64;
                (count > 0).then_some(count)
            })
            .collect();

        debug!(
            "duration histogram: {} records, {} buckets, min={min} max={max} step={step}",
            records.len(),
            buckets.len(),
        );

        Some(Self {
            records,
            durations,
            min,
            max,
            step,
            buckets,
            labels,
            counts,
        })
    }

    pub fn min_duration(&self) -> u64 {
        self.min
    }

    pub fn max_duration(&self) -> u64 {
        self.max
    }

    pub fn bucket_step(&self) -> u64 {
        self.step
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// The source list the model was built from, in original order.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `"start-end"` label per bucket, parallel to [`Self::series_counts`].
    pub fn x_axis_labels(&self) -> &[String] {
        &self.labels
    }

    /// Per-bucket record counts; `None` where a bucket is empty so charts
    /// can render a gap instead of a zero-height bar.
    pub fn series_counts(&self) -> &[Option<u64>] {
        &self.counts
    }

    /// Select records with duration in `[start, end]` inclusive.
    ///
    /// Scans the original list rather than reusing bucket membership, so
    /// the result is exact even though bucketing is approximate.
    pub fn select(&self, start: u64, end: u64) -> Selection<'_, R> {
        if start == self.min && end == self.max {
            return Selection::Unfiltered;
        }
        Selection::Filtered(
            self.records
                .iter()
                .zip(&self.durations)
                .filter(|&(_, &duration)| start <= duration && duration <= end)
                .map(|(record, _)| record)
                .collect(),
        )
    }
}

impl<R: Clone> DurationHistogram<R> {
    /// The original component's filtering contract: records with duration
    /// in `[start, end]` inclusive, in original order.
    ///
    /// Selecting the full `[min, max]` range returns an *empty* list as a
    /// sentinel for "no filter active, show everything". Callers that want
    /// the distinction spelled out should use [`Self::select`].
    pub fn filter_by_range(&self, start: u64, end: u64) -> Vec<R> {
        match self.select(start, end) {
            Selection::Unfiltered => Vec::new(),
            Selection::Filtered(matches) => matches.into_iter().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq)]
    struct Rec {
        id: usize,
        duration: u64,
    }

    fn records(durations: &[u64]) -> Vec<Rec> {
        durations
            .iter()
            .enumerate()
            .map(|(id, &duration)| Rec { id, duration })
            .collect()
    }

    fn build(durations: &[u64]) -> DurationHistogram<Rec> {
        DurationHistogram::build(records(durations), |rec| rec.duration)
            .expect("non-empty list must build")
    }

    #[test]
    fn empty_list_builds_nothing() {
        assert!(DurationHistogram::<Rec>::build(Vec::new(), |rec| rec.duration).is_none());
    }

    #[test]
    fn buckets_partition_the_input() {
        let model = build(&[100, 200, 300, 900, 120, 120, 899, 900]);

        let mut seen: Vec<usize> = model
            .buckets()
            .iter()
            .flat_map(|bucket| bucket.members().iter().copied())
            .collect();
        assert_eq!(seen.len(), model.len(), "no record dropped or duplicated");
        seen.sort_unstable();
        assert_eq!(seen, (0..model.len()).collect::<Vec<_>>());
    }

    #[test]
    fn max_duration_lands_in_the_last_bucket() {
        let model = build(&[100, 200, 300, 900]);
        let last = model.buckets().last().unwrap();
        assert!(last.members().contains(&3), "max record is in the last bucket");
    }

    #[test]
    fn interior_boundaries_are_half_open() {
        // step = ceil(800/40) = 20; 120 sits exactly on the 100-120/120-140
        // boundary and must belong to the higher bucket.
        let model = build(&[100, 120, 900]);
        assert_eq!(model.bucket_step(), 20);
        assert_eq!(model.buckets()[0].members(), &[0]);
        assert_eq!(model.buckets()[1].members(), &[1]);
    }

    #[test]
    fn never_more_than_forty_buckets() {
        for durations in [
            vec![0, 1],
            vec![0, 39],
            vec![0, 40],
            vec![0, 41],
            vec![0, 1000000],
            (0..500).map(|n| n * 7 + 13).collect::<Vec<u64>>(),
        ] {
            let model = build(&durations);
            assert!(
                model.buckets().len() as u64 <= BUCKET_COUNT,
                "{} buckets for {durations:?}",
                model.buckets().len(),
            );
        }
    }

    #[test]
    fn degenerate_all_equal_list() {
        let model = build(&[70, 70, 70]);
        assert_eq!(model.min_duration(), 70);
        assert_eq!(model.max_duration(), 70);
        assert_eq!(model.bucket_step(), 0);
        assert_eq!(model.buckets().len(), 1);
        assert_eq!(model.buckets()[0].count(), 3);
    }

    #[test]
    fn single_record_list() {
        let model = build(&[50]);
        assert_eq!(model.min_duration(), 50);
        assert_eq!(model.max_duration(), 50);
        assert_eq!(model.buckets().len(), 1);
        // Full-range selection is the "show all" sentinel even here.
        assert!(model.filter_by_range(50, 50).is_empty());
        assert_eq!(model.select(50, 50), Selection::Unfiltered);
    }

    #[test]
    fn four_record_scenario() {
        let model = build(&[100, 200, 300, 900]);
        assert_eq!(model.min_duration(), 100);
        assert_eq!(model.max_duration(), 900);
        assert_eq!(model.bucket_step(), 20);

        let narrowed = model.filter_by_range(100, 300);
        assert_eq!(
            narrowed.iter().map(|rec| rec.duration).collect::<Vec<_>>(),
            vec![100, 200, 300],
        );

        assert!(model.filter_by_range(100, 900).is_empty(), "sentinel");
    }

    #[test]
    fn filter_preserves_original_order() {
        let model = build(&[500, 100, 400, 100, 900]);
        let ids: Vec<usize> = model
            .filter_by_range(100, 500)
            .iter()
            .map(|rec| rec.id)
            .collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn unmatched_range_is_empty_but_filtered() {
        let model = build(&[100, 200, 900]);
        match model.select(310, 320) {
            Selection::Filtered(matches) => assert!(matches.is_empty()),
            Selection::Unfiltered => panic!("partial range must not be the sentinel"),
        }
    }

    #[test]
    fn labels_and_counts_line_up() {
        let model = build(&[100, 200, 300, 900]);
        let labels = model.x_axis_labels();
        let counts = model.series_counts();
        assert_eq!(labels.len(), model.buckets().len());
        assert_eq!(counts.len(), labels.len());
        assert_eq!(labels[0], "100-120");
        assert_eq!(counts[0], Some(1));
        // 900 is alone at the top; everything between 340 and 880 is a gap.
        assert!(counts[12].is_none());
        assert_eq!(counts.last().unwrap(), &Some(1));
    }
}

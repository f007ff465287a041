use eframe::egui::{self, Ui};
use log::debug;

use crate::format::fmt_duration_us;
use crate::model::{DurationHistogram, ListKind};
use crate::widgets::{DurationChart, RangeSlider};

/// Chart-plus-slider filtering component for a trace or span result list.
///
/// Owns the histogram model derived from the current list. Hand it a new
/// list with [`set_records`](Self::set_records) whenever the source list
/// changes; the model is rebuilt from scratch, never patched.
pub struct DurationFilter<R> {
    kind: ListKind,
    model: Option<DurationHistogram<R>>,
    start: u64,
    end: u64,
    dirty: bool,
    last_reported: Option<(u64, u64)>,
}

impl<R> DurationFilter<R> {
    pub fn new(kind: ListKind) -> Self {
        Self {
            kind,
            model: None,
            start: 0,
            end: 0,
            dirty: false,
            last_reported: None,
        }
    }

    pub fn kind(&self) -> ListKind {
        self.kind
    }

    /// Replace the source list. An empty list drops the model entirely;
    /// nothing is rendered until a non-empty list arrives.
    pub fn set_records(&mut self, records: Vec<R>, duration_of: impl Fn(&R) -> u64) {
        self.model = DurationHistogram::build(records, duration_of);
        if let Some(model) = &self.model {
            self.start = model.min_duration();
            self.end = model.max_duration();
        } else {
            debug!("duration filter: empty {} list, no model", self.kind.duration_label());
        }
        self.dirty = false;
        self.last_reported = None;
    }

    pub fn model(&self) -> Option<&DurationHistogram<R>> {
        self.model.as_ref()
    }

    /// Current slider selection, inclusive.
    pub fn selection(&self) -> Option<(u64, u64)> {
        self.model.as_ref().map(|_| (self.start, self.end))
    }
}

impl<R: Clone> DurationFilter<R> {
    /// Draw the chart and slider.
    ///
    /// Returns the filtered list once a slider gesture settles on a new
    /// selection, and `None` on every other frame. The returned list keeps
    /// the original component's contract: an empty list for the full-range
    /// selection means "no filter active, show everything".
    pub fn show(&mut self, ui: &mut Ui) -> Option<Vec<R>> {
        let Some(model) = &self.model else {
            return None;
        };

        let mut emitted = None;
        ui.vertical(|ui| {
            ui.horizontal(|ui| {
                ui.label(self.kind.duration_label());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(format!(
                        "{} .. {}",
                        fmt_duration_us(self.start),
                        fmt_duration_us(self.end),
                    ));
                });
            });

            ui.add(DurationChart::new(model).selection(self.start, self.end));

            let slider = ui.add(
                RangeSlider::new(
                    &mut self.start,
                    &mut self.end,
                    model.min_duration(),
                    model.max_duration(),
                )
                .step(model.bucket_step()),
            );

            if slider.changed() {
                self.dirty = true;
            }

            // Report once the gesture settles rather than per dragged frame;
            // every report is a fresh scan of the un-bucketed list.
            if self.dirty && !slider.dragged() {
                self.dirty = false;
                let selection = (self.start, self.end);
                if self.last_reported != Some(selection) {
                    self.last_reported = Some(selection);
                    let filtered = model.filter_by_range(self.start, self.end);
                    debug!(
                        "duration filter: [{}, {}] -> {} records",
                        self.start,
                        self.end,
                        filtered.len(),
                    );
                    emitted = Some(filtered);
                }
            }
        });

        emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq)]
    struct Rec {
        duration: u64,
    }

    fn filter_with(durations: &[u64]) -> DurationFilter<Rec> {
        let mut filter = DurationFilter::new(ListKind::Trace);
        filter.set_records(
            durations.iter().map(|&duration| Rec { duration }).collect(),
            |rec| rec.duration,
        );
        filter
    }

    #[test]
    fn empty_list_builds_no_model() {
        let filter = filter_with(&[]);
        assert!(filter.model().is_none());
        assert!(filter.selection().is_none());
    }

    #[test]
    fn new_list_resets_the_selection_to_the_full_range() {
        let mut filter = filter_with(&[100, 200, 300, 900]);
        assert_eq!(filter.selection(), Some((100, 900)));

        filter.set_records(vec![Rec { duration: 10 }, Rec { duration: 20 }], |rec| {
            rec.duration
        });
        assert_eq!(filter.selection(), Some((10, 20)));
    }

    #[test]
    fn replacing_with_an_empty_list_drops_the_model() {
        let mut filter = filter_with(&[100, 200]);
        filter.set_records(Vec::new(), |rec| rec.duration);
        assert!(filter.model().is_none());
    }
}

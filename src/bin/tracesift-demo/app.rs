// Demo shell around the duration filter: fakes the console's trace/span
// endpoints with generated data and shows the filtered list in a table.

use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use egui_extras::{Column, TableBuilder};
use log::info;
use parking_lot::RwLock;

use tracesift::format::fmt_duration_us;
use tracesift::{DurationFilter, ListKind};

const SERVICES: [&str; 6] = [
    "api-gateway",
    "checkout",
    "inventory",
    "payment",
    "search",
    "user-profile",
];

const SPAN_NAMES: [&str; 5] = [
    "HTTP GET",
    "db.query",
    "cache.lookup",
    "rpc.call",
    "template.render",
];

#[derive(Clone, Debug)]
pub struct TraceRecord {
    pub trace_id: String,
    pub root_service: String,
    pub root_span_name: String,
    pub trace_duration: u64,
    pub span_count: u32,
}

#[derive(Clone, Debug)]
pub struct SpanRecord {
    pub span_id: String,
    pub service_name: String,
    pub span_name: String,
    pub elapsed_time: u64,
}

// splitmix64; keeps the generated lists deterministic across runs.
fn mix(mut seed: u64) -> u64 {
    seed = seed.wrapping_add(0x9e3779b97f4a7c15);
    seed = (seed ^ (seed >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    seed = (seed ^ (seed >> 27)).wrapping_mul(0x94d049bb133111eb);
    seed ^ (seed >> 31)
}

fn sample_traces() -> Vec<TraceRecord> {
    (0..400u64)
        .map(|i| {
            let noise = mix(i);
            // Mostly fast traces with a long slow tail.
            let duration = 80 + noise % 3_000 + if noise % 13 == 0 { noise % 400_000 } else { 0 };
            TraceRecord {
                trace_id: format!("{:016x}", mix(i ^ 0xace5)),
                root_service: SERVICES[(noise % SERVICES.len() as u64) as usize].to_owned(),
                root_span_name: SPAN_NAMES[(noise / 7 % SPAN_NAMES.len() as u64) as usize]
                    .to_owned(),
                trace_duration: duration,
                span_count: (2 + noise % 40) as u32,
            }
        })
        .collect()
}

fn sample_spans() -> Vec<SpanRecord> {
    (0..900u64)
        .map(|i| {
            let noise = mix(i ^ 0x51a9);
            let duration = 15 + noise % 900 + if noise % 31 == 0 { noise % 60_000 } else { 0 };
            SpanRecord {
                span_id: format!("{:016x}", mix(i ^ 0xbeef)),
                service_name: SERVICES[(noise % SERVICES.len() as u64) as usize].to_owned(),
                span_name: SPAN_NAMES[(noise / 11 % SPAN_NAMES.len() as u64) as usize].to_owned(),
                elapsed_time: duration,
            }
        })
        .collect()
}

type Loaded<R> = Arc<RwLock<Option<Vec<R>>>>;

pub struct DemoApp {
    kind: ListKind,
    traces: Loaded<TraceRecord>,
    spans: Loaded<SpanRecord>,
    trace_filter: DurationFilter<TraceRecord>,
    span_filter: DurationFilter<SpanRecord>,
    // None means "no filter active, show the full list" (the component's
    // empty-list sentinel, resolved at this boundary).
    trace_view: Option<Vec<TraceRecord>>,
    span_view: Option<Vec<SpanRecord>>,
}

impl DemoApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let traces: Loaded<TraceRecord> = Arc::new(RwLock::new(None));
        let spans: Loaded<SpanRecord> = Arc::new(RwLock::new(None));

        // Stand-in for the listTrace/listSpan endpoints.
        let ctx = cc.egui_ctx.clone();
        let traces_slot = traces.clone();
        let spans_slot = spans.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(400));
            *traces_slot.write() = Some(sample_traces());
            ctx.request_repaint();
            std::thread::sleep(Duration::from_millis(250));
            *spans_slot.write() = Some(sample_spans());
            ctx.request_repaint();
            info!("sample trace and span lists ready");
        });

        Self {
            kind: ListKind::Trace,
            traces,
            spans,
            trace_filter: DurationFilter::new(ListKind::Trace),
            span_filter: DurationFilter::new(ListKind::Span),
            trace_view: None,
            span_view: None,
        }
    }

    fn trace_table(ui: &mut egui::Ui, records: &[TraceRecord]) {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(140.0))
            .column(Column::auto().at_least(110.0))
            .column(Column::remainder())
            .column(Column::auto().at_least(90.0))
            .column(Column::auto().at_least(60.0))
            .header(24.0, |mut header| {
                for head in ["trace id", "service", "root span", "duration", "spans"] {
                    header.col(|ui| {
                        ui.strong(head);
                    });
                }
            })
            .body(|body| {
                body.rows(20.0, records.len(), |mut row| {
                    let record = &records[row.index()];
                    row.col(|ui| {
                        ui.monospace(&record.trace_id);
                    });
                    row.col(|ui| {
                        ui.label(&record.root_service);
                    });
                    row.col(|ui| {
                        ui.label(&record.root_span_name);
                    });
                    row.col(|ui| {
                        ui.monospace(fmt_duration_us(record.trace_duration));
                    });
                    row.col(|ui| {
                        ui.label(record.span_count.to_string());
                    });
                });
            });
    }

    fn span_table(ui: &mut egui::Ui, records: &[SpanRecord]) {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(140.0))
            .column(Column::auto().at_least(110.0))
            .column(Column::remainder())
            .column(Column::auto().at_least(90.0))
            .header(24.0, |mut header| {
                for head in ["span id", "service", "span", "elapsed"] {
                    header.col(|ui| {
                        ui.strong(head);
                    });
                }
            })
            .body(|body| {
                body.rows(20.0, records.len(), |mut row| {
                    let record = &records[row.index()];
                    row.col(|ui| {
                        ui.monospace(&record.span_id);
                    });
                    row.col(|ui| {
                        ui.label(&record.service_name);
                    });
                    row.col(|ui| {
                        ui.label(&record.span_name);
                    });
                    row.col(|ui| {
                        ui.monospace(fmt_duration_us(record.elapsed_time));
                    });
                });
            });
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Feed freshly fetched lists to the filters exactly once.
        if self.trace_filter.model().is_none() {
            if let Some(list) = self.traces.read().clone() {
                self.trace_filter
                    .set_records(list, |record| record.trace_duration);
            }
        }
        if self.span_filter.model().is_none() {
            if let Some(list) = self.spans.read().clone() {
                self.span_filter
                    .set_records(list, |record| record.elapsed_time);
            }
        }

        egui::TopBottomPanel::top("kind_switch").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("tracesift");
                ui.separator();
                ui.selectable_value(&mut self.kind, ListKind::Trace, "traces");
                ui.selectable_value(&mut self.kind, ListKind::Span, "spans");
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.kind {
            ListKind::Trace => {
                let Some(model) = self.trace_filter.model() else {
                    ui.add(egui::widgets::Spinner::new());
                    return;
                };
                let total = model.len();

                if let Some(filtered) = self.trace_filter.show(ui) {
                    self.trace_view = (!filtered.is_empty()).then_some(filtered);
                }

                let model = self.trace_filter.model().expect("model checked above");
                let records = self.trace_view.as_deref().unwrap_or(model.records());
                ui.weak(format!("{} of {total} traces", records.len()));
                ui.separator();
                Self::trace_table(ui, records);
            }
            ListKind::Span => {
                let Some(model) = self.span_filter.model() else {
                    ui.add(egui::widgets::Spinner::new());
                    return;
                };
                let total = model.len();

                if let Some(filtered) = self.span_filter.show(ui) {
                    self.span_view = (!filtered.is_empty()).then_some(filtered);
                }

                let model = self.span_filter.model().expect("model checked above");
                let records = self.span_view.as_deref().unwrap_or(model.records());
                ui.weak(format!("{} of {total} spans", records.len()));
                ui.separator();
                Self::span_table(ui, records);
            }
        });
    }
}

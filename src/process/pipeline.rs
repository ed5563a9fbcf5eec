// src/process/pipeline.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::process::images::ImageSource;
use crate::process::report::RunReport;
use crate::process::steps::RecordProcessor;
use crate::record::RecordSet;

/// Every step the processor knows, in the order they normally run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    SkuTrim,
    NameNormalize,
    DescriptionTable,
    DescriptionMsrpToken,
    PiecesTable,
    PiecesRaw,
    PriceRound,
    ImagesResolve,
}

impl StepKind {
    pub const ALL: [StepKind; 8] = [
        StepKind::SkuTrim,
        StepKind::NameNormalize,
        StepKind::DescriptionTable,
        StepKind::DescriptionMsrpToken,
        StepKind::PiecesTable,
        StepKind::PiecesRaw,
        StepKind::PriceRound,
        StepKind::ImagesResolve,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StepKind::SkuTrim => "sku_trim",
            StepKind::NameNormalize => "name_normalize",
            StepKind::DescriptionTable => "description_table",
            StepKind::DescriptionMsrpToken => "description_msrp_token",
            StepKind::PiecesTable => "pieces_table",
            StepKind::PiecesRaw => "pieces_raw",
            StepKind::PriceRound => "price_round",
            StepKind::ImagesResolve => "images_resolve",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepToggle {
    pub step: StepKind,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl StepToggle {
    pub fn on(step: StepKind) -> Self {
        Self {
            step,
            enabled: true,
        }
    }

    pub fn off(step: StepKind) -> Self {
        Self {
            step,
            enabled: false,
        }
    }
}

/// Default step list: the structured pieces table rather than the raw
/// append, MSRP token rewriting and image lookup off.
pub fn default_steps() -> Vec<StepToggle> {
    vec![
        StepToggle::on(StepKind::SkuTrim),
        StepToggle::on(StepKind::NameNormalize),
        StepToggle::on(StepKind::DescriptionTable),
        StepToggle::off(StepKind::DescriptionMsrpToken),
        StepToggle::on(StepKind::PiecesTable),
        StepToggle::off(StepKind::PiecesRaw),
        StepToggle::on(StepKind::PriceRound),
        StepToggle::off(StepKind::ImagesResolve),
    ]
}

/// An ordered, declared list of steps with on/off flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    steps: Vec<StepToggle>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(default_steps())
    }
}

impl Pipeline {
    pub fn new(steps: Vec<StepToggle>) -> Self {
        let enabled = |kind: StepKind| steps.iter().any(|t| t.enabled && t.step == kind);
        if enabled(StepKind::PiecesTable) && enabled(StepKind::PiecesRaw) {
            warn!("both pieces_table and pieces_raw are enabled; Piece will be appended twice");
        }
        Self { steps }
    }

    pub fn enabled_steps(&self) -> impl Iterator<Item = StepKind> + '_ {
        self.steps.iter().filter(|t| t.enabled).map(|t| t.step)
    }

    /// Run every enabled step in order. Each step finishes over the whole
    /// record set before the next starts; a fatal error stops the run.
    #[instrument(level = "info", skip_all, fields(records = records.len()))]
    pub fn run<S: ImageSource>(
        &self,
        processor: &RecordProcessor<S>,
        mut records: RecordSet,
    ) -> Result<(RecordSet, RunReport)> {
        let mut report = RunReport {
            records: records.len(),
            ..RunReport::default()
        };

        for toggle in &self.steps {
            if !toggle.enabled {
                report.steps_skipped.push(toggle.step);
                continue;
            }
            let warnings_before = report.warnings.len();
            let (next, applied) = processor.apply(toggle.step, records, &mut report)?;
            records = next;
            if applied {
                report.steps_run.push(toggle.step);
            } else {
                report.steps_skipped.push(toggle.step);
            }
            info!(
                step = %toggle.step,
                applied,
                warnings = report.warnings.len() - warnings_before,
                "step finished"
            );
        }

        Ok((records, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;
    use crate::process::report::Warning;
    use crate::process::steps::tests::{processor, sample};
    use crate::record::Record;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
        }
    }

    fn warnings_from(build: impl FnOnce() -> Pipeline) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt::Subscriber::builder()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        tracing::subscriber::with_default(subscriber, build);
        logs.text()
    }

    #[test]
    fn default_order_matches_all() {
        let kinds: Vec<_> = default_steps().iter().map(|t| t.step).collect();
        assert_eq!(kinds, StepKind::ALL.to_vec());
    }

    #[test]
    fn steps_deserialize_from_yaml() {
        let yaml = "- step: sku_trim\n- step: pieces_raw\n  enabled: false\n";
        let steps: Vec<StepToggle> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            steps,
            vec![StepToggle::on(StepKind::SkuTrim), StepToggle::off(StepKind::PiecesRaw)]
        );
    }

    #[test]
    fn both_piece_variants_warn_at_construction() {
        let both = warnings_from(|| {
            Pipeline::new(vec![
                StepToggle::on(StepKind::PiecesTable),
                StepToggle::on(StepKind::PiecesRaw),
            ])
        });
        assert!(both.contains("both pieces_table and pieces_raw are enabled"));

        let one = warnings_from(|| {
            Pipeline::new(vec![
                StepToggle::on(StepKind::PiecesTable),
                StepToggle::off(StepKind::PiecesRaw),
            ])
        });
        assert!(one.is_empty());
    }

    #[test]
    fn run_reports_which_steps_ran() -> anyhow::Result<()> {
        init_test_logging();
        let pipeline = Pipeline::new(vec![
            StepToggle::on(StepKind::SkuTrim),
            StepToggle::off(StepKind::NameNormalize),
            StepToggle::on(StepKind::ImagesResolve),
            StepToggle::on(StepKind::PriceRound),
        ]);
        let records = vec![Record::new()
            .with("SKU", " S1 ")
            .with("Regular price", "12.5")];

        let (out, report) = pipeline.run(&processor(), records)?;

        assert_eq!(out[0].get_text("SKU"), Some("S1"));
        assert_eq!(report.steps_run, vec![StepKind::SkuTrim, StepKind::PriceRound]);
        assert_eq!(
            report.steps_skipped,
            vec![StepKind::NameNormalize, StepKind::ImagesResolve]
        );
        assert_eq!(
            report.warnings,
            vec![Warning::MissingColumn {
                step: StepKind::ImagesResolve,
                column: "Images".into()
            }]
        );
        Ok(())
    }

    #[test]
    fn default_pipeline_end_to_end() -> anyhow::Result<()> {
        init_test_logging();
        let (out, report) = Pipeline::default().run(&processor(), sample())?;
        let r = &out[0];
        assert_eq!(r.get_text("SKU"), Some("SR-1"));
        assert_eq!(r.get_text("Name"), Some("Mulberry Silk Yarn MSRP USD 12"));
        let desc = r.get_text("Description").unwrap();
        assert!(desc.starts_with("<div class=\"product-description\">Soft yarn.</div>"));
        assert!(desc.contains("<td class=\"label\">Fiber</td>"));
        assert!(desc.ends_with(
            "<tr><td>5</td><td>#A12</td></tr>\n<tr><td>3</td><td></td></tr>\n</table></div>"
        ));
        assert_eq!(r.get("Regular price"), Some(&crate::record::Value::Number(12.0)));
        assert_eq!(out[1].get("Regular price"), Some(&crate::record::Value::Number(3.0)));
        assert_eq!(
            out[1].get_text("Description"),
            Some(
                "<div class=\"product-description\">No price here</div>\
                 <div class=\"product-description\"></div>"
            )
        );
        assert_eq!(report.missing_marker_count(), 1);
        assert_eq!(report.steps_run.len(), 5);
        Ok(())
    }

    #[test]
    fn fatal_price_error_stops_the_run() {
        let pipeline = Pipeline::new(vec![StepToggle::on(StepKind::PriceRound)]);
        let records = vec![Record::new().with("SKU", "X").with("Regular price", "call us")];
        assert!(pipeline.run(&processor(), records).is_err());
    }
}

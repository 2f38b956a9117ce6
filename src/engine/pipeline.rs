use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::{
    round_to, ChartUpdate, DecisionUpdate, MetricsSnapshot, PipelineConfig, PipelineEvent,
    RawBatch, Temperatures,
};
use crate::engine::calibration::{BaselineCalibrator, BaselineProfile, CalibrationStep};
use crate::engine::decision::{DecisionEngine, Reading};
use crate::engine::state::PipelineState;
use crate::engine::window::{progress, SignalWindow, WindowOutcome};
use crate::observability::{MetricsCollector, PipelineMonitor, StageMetrics};
use crate::registry;
use crate::signal::{EcgFilter, HrvCalculator, HrvMetrics, PeakDetector};

struct Stages {
    window: Arc<StageMetrics>,
    filter: Arc<StageMetrics>,
    detector: Arc<StageMetrics>,
    hrv: Arc<StageMetrics>,
    calibration: Arc<StageMetrics>,
    decision: Arc<StageMetrics>,
}

impl Stages {
    fn register(collector: &mut MetricsCollector) -> Self {
        Self {
            window: collector.stage("window"),
            filter: collector.stage("filter"),
            detector: collector.stage("detector"),
            hrv: collector.stage("hrv"),
            calibration: collector.stage("calibration"),
            decision: collector.stage("decision"),
        }
    }
}

/// Per-session processing context: windowing, filtering, peak detection, HRV,
/// calibration and decisions, fed one batch at a time in arrival order.
pub struct Pipeline {
    config: PipelineConfig,
    window: SignalWindow,
    filter: EcgFilter,
    detector: Box<dyn PeakDetector>,
    hrv: HrvCalculator,
    calibrator: BaselineCalibrator,
    decision: DecisionEngine,
    state: PipelineState,
    latest: MetricsSnapshot,
    collector: MetricsCollector,
    stages: Stages,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let detector = registry::create_detector(&config.detector)?;
        Self::with_detector(config, detector)
    }

    pub fn from_json(config: Value) -> Result<Self> {
        Self::new(PipelineConfig::from_json(config)?)
    }

    /// Builds a pipeline around an explicit detector instead of the registry one.
    pub fn with_detector(config: PipelineConfig, detector: Box<dyn PeakDetector>) -> Result<Self> {
        let filter = EcgFilter::design(&config.filter, config.sample_rate_hz)
            .context("Failed to design ECG filter")?;

        let mut collector = MetricsCollector::new();
        let stages = Stages::register(&mut collector);

        info!(
            detector = detector.id(),
            sample_rate_hz = config.sample_rate_hz,
            window = ?config.window,
            "pipeline created"
        );

        Ok(Self {
            window: SignalWindow::new(config.window),
            filter,
            detector,
            hrv: HrvCalculator::new(config.hrv.pnn_threshold_ms),
            calibrator: BaselineCalibrator::new(config.calibration.samples),
            decision: DecisionEngine::from_config(&config.decision),
            state: PipelineState::default(),
            latest: MetricsSnapshot::default(),
            collector,
            stages,
            config,
        })
    }

    /// Runs one batch through every stage and returns the events it produced,
    /// in emission order. Never fails; degraded input yields placeholder output.
    pub fn process_batch(&mut self, batch: RawBatch) -> Vec<PipelineEvent> {
        let mut events = Vec::new();

        let temps = Temperatures::resolve(
            batch.temp1,
            batch.temp2,
            self.config.temperature.disconnected_sentinel,
        );
        if !temps.connected {
            debug!(seq = batch.sequence_id, "temperature probe disconnected");
        }

        let start = self.stages.window.start_processing();
        let outcome = self.window.push(&batch.ecg);
        self.stages.window.finish_processing(start);

        let window = match outcome {
            WindowOutcome::Accumulating { have, need } => {
                self.stages.window.record_degraded();
                self.on_accumulating(have, need, &batch, &temps, &mut events);
                return events;
            }
            WindowOutcome::Restarted => {
                info!("fixed window complete, restarting cycle");
                self.latest.progress = 0;
                events.push(PipelineEvent::status("Window complete, restarting cycle..."));
                events.push(chart(&batch, &temps, 0.0));
                return events;
            }
            WindowOutcome::Ready(window) => window,
        };

        if let PipelineState::Accumulating { .. } = self.state {
            self.transition(PipelineState::Calibrating {
                collected: 0,
                required: self.calibrator.required(),
            });
        }

        let metrics = self.analyse(&window);
        let hr = metrics.bpm;

        info!(
            seq = batch.sequence_id,
            hr,
            temp_avg = temps.average,
            temp1 = temps.temp1,
            temp2 = temps.temp2,
            "batch analysed"
        );

        if hr <= 0.0 {
            events.push(chart(&batch, &temps, 0.0));
            if !self.calibrator.is_frozen() {
                events.push(PipelineEvent::status(
                    "Invalid reading. Adjust electrodes or wait...",
                ));
            }
            self.publish_metrics(&metrics, &temps, &mut events);
            return events;
        }

        if !self.calibrator.is_frozen() {
            self.calibrate(hr, &batch, &temps, &mut events);
        } else {
            self.decide(hr, &batch, &temps, &mut events);
        }

        self.publish_metrics(&metrics, &temps, &mut events);
        events
    }

    /// Progress status plus a zero-bpm chart. No HR has been computed yet, so
    /// the "Invalid reading" status is reserved for analysed windows.
    fn on_accumulating(
        &mut self,
        have: usize,
        need: usize,
        batch: &RawBatch,
        temps: &Temperatures,
        events: &mut Vec<PipelineEvent>,
    ) {
        let pct = progress(have, need);
        debug!(have, need, "accumulating samples");

        let text = format!("Accumulating ECG data... {}/{} samples", have, need);
        if let PipelineState::Accumulating { .. } = self.state {
            self.transition(PipelineState::Accumulating { progress: pct });
            self.latest.status = text.clone();
        }
        self.latest.progress = pct;

        events.push(PipelineEvent::status(text));
        events.push(chart(batch, temps, 0.0));
    }

    /// Filter, detect and measure one window. Disconnected electrodes (no
    /// positive sample) skip straight to zero metrics.
    fn analyse(&self, window: &[f64]) -> HrvMetrics {
        let fs = self.config.sample_rate_hz;

        if !window.iter().any(|&s| s > 0.0) {
            warn!(len = window.len(), "ECG window has no positive samples, electrodes disconnected");
            self.stages.detector.record_degraded();
            self.stages.hrv.record_degraded();
            return HrvMetrics::zero();
        }

        let start = self.stages.filter.start_processing();
        let filtered = self.filter.apply(window);
        self.stages.filter.finish_processing(start);
        if filtered.fell_back {
            self.stages.filter.record_degraded();
        }

        let start = self.stages.detector.start_processing();
        let peaks = self.detector.find_peaks(&filtered.samples, fs);
        self.stages.detector.finish_processing(start);
        debug!(peaks = peaks.len(), detector = self.detector.id(), "peaks detected");

        let start = self.stages.hrv.start_processing();
        let metrics = self.hrv.compute(&peaks, fs);
        self.stages.hrv.finish_processing(start);
        if !metrics.has_heart_rate() {
            debug!(peaks = peaks.len(), "not enough peaks for a heart rate");
            self.stages.hrv.record_degraded();
        }

        metrics
    }

    fn calibrate(
        &mut self,
        hr: f64,
        batch: &RawBatch,
        temps: &Temperatures,
        events: &mut Vec<PipelineEvent>,
    ) {
        let start = self.stages.calibration.start_processing();
        let step = self.calibrator.observe(hr, temps.average);
        self.stages.calibration.finish_processing(start);

        match step {
            CalibrationStep::Collecting {
                collected,
                required,
            } => {
                self.transition(PipelineState::Calibrating {
                    collected,
                    required,
                });
                events.push(PipelineEvent::status(format!(
                    "Calculating baseline... {}/{}",
                    collected, required
                )));
            }
            CalibrationStep::Established { profile, required } => {
                self.transition(PipelineState::Calibrating {
                    collected: required,
                    required,
                });
                events.push(PipelineEvent::status(format!(
                    "Calculating baseline... {}/{}",
                    required, required
                )));
                self.transition(PipelineState::Analyzing { decisions: 0 });
                events.push(PipelineEvent::status(format!(
                    "Baseline established: {:.1} bpm, {:.1} °C. Analyzing...",
                    profile.hr_baseline, profile.temp_baseline
                )));
            }
            CalibrationStep::Rejected | CalibrationStep::Frozen => {
                self.stages.calibration.record_degraded();
            }
        }

        events.push(chart(batch, temps, hr));
    }

    fn decide(
        &mut self,
        hr: f64,
        batch: &RawBatch,
        temps: &Temperatures,
        events: &mut Vec<PipelineEvent>,
    ) {
        let reading = Reading {
            hr,
            temps: *temps,
            timestamp: batch.timestamp,
        };

        let start = self.stages.decision.start_processing();
        let record = self.decision.evaluate(&reading, self.calibrator.profile());
        self.stages.decision.finish_processing(start);

        info!(verdict = %record.verdict, reasons = ?record.reasons, "decision");

        if let PipelineState::Analyzing { decisions } = self.state {
            self.transition(PipelineState::Analyzing {
                decisions: decisions + 1,
            });
        }

        events.push(PipelineEvent::Decision(DecisionUpdate {
            record: record.rounded(),
            ecg_data: batch.ecg.clone(),
        }));
    }

    fn publish_metrics(
        &mut self,
        metrics: &HrvMetrics,
        temps: &Temperatures,
        events: &mut Vec<PipelineEvent>,
    ) {
        self.latest = MetricsSnapshot {
            bpm: round_to(metrics.bpm, 1),
            sdnn: round_to(metrics.sdnn, 2),
            rmssd: round_to(metrics.rmssd, 2),
            pnn50: round_to(metrics.pnn50, 2),
            temp1: round_to(temps.temp1, 1),
            temp2: round_to(temps.temp2, 1),
            status: self.status_text(),
            progress: 100,
        };
        events.push(PipelineEvent::MetricsUpdate(self.latest.clone()));
    }

    fn status_text(&self) -> String {
        match &self.state {
            PipelineState::Accumulating { .. } => "Accumulating".to_string(),
            PipelineState::Calibrating {
                collected,
                required,
            } => format!("Calibrating {}/{}", collected, required),
            PipelineState::Analyzing { .. } => "Analyzing".to_string(),
        }
    }

    fn transition(&mut self, next: PipelineState) {
        if !self.state.can_transition_to(&next) {
            warn!(
                from = self.state.name(),
                to = next.name(),
                "ignoring invalid state transition"
            );
            return;
        }
        if self.state.name() != next.name() {
            info!(from = self.state.name(), to = next.name(), "pipeline state changed");
        }
        self.state = next;
    }

    pub fn baseline(&self) -> &BaselineProfile {
        self.calibrator.profile()
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Metrics of the most recently analysed window.
    pub fn latest_metrics(&self) -> &MetricsSnapshot {
        &self.latest
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn detector_id(&self) -> &str {
        self.detector.id()
    }

    pub fn monitor(&self) -> PipelineMonitor {
        PipelineMonitor::new(self.collector.clone())
    }
}

fn chart(batch: &RawBatch, temps: &Temperatures, bpm: f64) -> PipelineEvent {
    PipelineEvent::ChartUpdate(ChartUpdate {
        ecg_data: batch.ecg.clone(),
        temp1: round_to(temps.temp1, 1),
        temp2: round_to(temps.temp2, 1),
        bpm: round_to(bpm, 1),
    })
}

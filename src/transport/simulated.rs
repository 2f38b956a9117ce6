use anyhow::Result;
use async_trait::async_trait;

use crate::core::{RawBatch, TEMP_DISCONNECTED};

use super::BatchSource;

/// Resting level added to every sample so a connected lead never reads flat
/// zero.
const BASELINE_OFFSET: f64 = 0.5;

/// (amplitude, offset from R in seconds, width in seconds) of each wave.
const PQRST: [(f64, f64, f64); 5] = [
    (0.05, -0.16, 0.025), // P
    (-0.08, -0.035, 0.008), // Q
    (1.5, 0.0, 0.02), // R
    (-0.12, 0.035, 0.01), // S
    (0.06, 0.25, 0.05), // T
];

/// Deterministic single-lead ECG and skin temperature generator.
///
/// Heart rate can change mid-stream without a phase jump. Disconnected
/// electrodes produce flat zero ECG; disconnected probes report
/// [`TEMP_DISCONNECTED`].
pub struct SimulatedSensor {
    sample_rate: f64,
    batch_size: usize,
    bpm: f64,
    temp1: f64,
    temp2: f64,
    phase: f64,
    electrodes_connected: bool,
    probes_connected: bool,
    max_batches: Option<u64>,
    generated: u64,
}

impl SimulatedSensor {
    pub fn new(sample_rate: f64, batch_size: usize) -> Self {
        Self {
            sample_rate,
            batch_size,
            bpm: 72.0,
            temp1: 33.0,
            temp2: 33.0,
            phase: 0.0,
            electrodes_connected: true,
            probes_connected: true,
            max_batches: None,
            generated: 0,
        }
    }

    pub fn with_bpm(mut self, bpm: f64) -> Self {
        self.bpm = bpm;
        self
    }

    pub fn with_temperatures(mut self, temp1: f64, temp2: f64) -> Self {
        self.temp1 = temp1;
        self.temp2 = temp2;
        self
    }

    /// Stop after `n` batches when used as a [`BatchSource`].
    pub fn with_max_batches(mut self, n: u64) -> Self {
        self.max_batches = Some(n);
        self
    }

    pub fn set_bpm(&mut self, bpm: f64) {
        self.bpm = bpm;
    }

    pub fn set_temperatures(&mut self, temp1: f64, temp2: f64) {
        self.temp1 = temp1;
        self.temp2 = temp2;
    }

    pub fn set_electrodes_connected(&mut self, connected: bool) {
        self.electrodes_connected = connected;
    }

    pub fn set_probes_connected(&mut self, connected: bool) {
        self.probes_connected = connected;
    }

    pub fn generated(&self) -> u64 {
        self.generated
    }

    /// Produces the next batch unconditionally.
    pub fn generate(&mut self) -> RawBatch {
        let period_s = 60.0 / self.bpm;
        let step = self.bpm / 60.0 / self.sample_rate;

        let mut ecg = Vec::with_capacity(self.batch_size);
        for _ in 0..self.batch_size {
            let sample = (BASELINE_OFFSET + beat_at((self.phase - 0.5) * period_s, period_s))
                .max(0.0);
            ecg.push(if self.electrodes_connected { sample } else { 0.0 });

            self.phase += step;
            if self.phase >= 1.0 {
                self.phase -= 1.0;
            }
        }

        self.generated += 1;

        let (temp1, temp2) = if self.probes_connected {
            (self.temp1, self.temp2)
        } else {
            (TEMP_DISCONNECTED, TEMP_DISCONNECTED)
        };
        RawBatch::new(ecg, temp1, temp2)
    }
}

/// Waveform value `t` seconds from the nearest R wave, including the tails of
/// the neighbouring beats.
fn beat_at(t: f64, period_s: f64) -> f64 {
    [-period_s, 0.0, period_s]
        .iter()
        .map(|shift| {
            PQRST
                .iter()
                .map(|&(amp, offset, width)| {
                    let z = (t + shift - offset) / width;
                    amp * (-0.5 * z * z).exp()
                })
                .sum::<f64>()
        })
        .sum()
}

#[async_trait]
impl BatchSource for SimulatedSensor {
    async fn next_batch(&mut self) -> Result<Option<RawBatch>> {
        if self.max_batches.is_some_and(|max| self.generated >= max) {
            return Ok(None);
        }
        Ok(Some(self.generate()))
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_r_wave_dominates() {
        let r = beat_at(0.0, 0.8);
        let t = beat_at(0.25, 0.8);
        let p = beat_at(-0.16, 0.8);
        assert!(r > 1.4);
        assert!(t < 0.1 && p < 0.1);
    }

    #[test]
    fn test_waveform_is_positive() {
        let mut sensor = SimulatedSensor::new(333.0, 333);
        let batch = sensor.generate();
        assert_eq!(batch.ecg.len(), 333);
        assert!(batch.ecg.iter().all(|&s| s > 0.0));
    }
}

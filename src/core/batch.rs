use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Temperature value the probes report when unplugged.
pub const TEMP_DISCONNECTED: f64 = -127.0;

/// One delivery from the sensor: a run of ECG samples plus both skin temperatures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBatch {
    #[serde(rename = "DatosECG")]
    pub ecg: Vec<f64>,

    #[serde(rename = "DatosTemp1")]
    pub temp1: f64,

    #[serde(rename = "DatosTemp2")]
    pub temp2: f64,

    /// Arrival time in milliseconds since epoch, stamped by the transport
    #[serde(default)]
    pub timestamp: u64,

    /// Arrival order assigned by the transport
    #[serde(default)]
    pub sequence_id: u64,
}

impl RawBatch {
    pub fn new(ecg: Vec<f64>, temp1: f64, temp2: f64) -> Self {
        Self {
            ecg,
            temp1,
            temp2,
            timestamp: 0,
            sequence_id: 0,
        }
    }

    /// Stamp arrival order and wall-clock time.
    pub fn stamped(mut self, sequence_id: u64) -> Self {
        self.sequence_id = sequence_id;
        self.timestamp = now_millis();
        self
    }
}

/// Resolved temperature pair for one batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Temperatures {
    pub temp1: f64,
    pub temp2: f64,
    pub average: f64,
    pub connected: bool,
}

impl Temperatures {
    /// If either probe reports the sentinel, every output is forced to zero and
    /// nothing is averaged.
    pub fn resolve(temp1: f64, temp2: f64, sentinel: f64) -> Self {
        let unplugged = |t: f64| (t - sentinel).abs() < 1e-6;
        if unplugged(temp1) || unplugged(temp2) {
            return Self {
                temp1: 0.0,
                temp2: 0.0,
                average: 0.0,
                connected: false,
            };
        }

        Self {
            temp1,
            temp2,
            average: (temp1 + temp2) / 2.0,
            connected: true,
        }
    }
}

pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

use crate::core::RawBatch;

use super::TransportError;

impl RawBatch {
    /// Decodes `{"DatosECG": [...], "DatosTemp1": t1, "DatosTemp2": t2}`.
    /// Missing fields and non-finite values are rejected here so the pipeline
    /// only ever sees well-formed batches.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, TransportError> {
        let batch: RawBatch = serde_json::from_slice(bytes)?;
        batch.check_finite()?;
        Ok(batch)
    }

    fn check_finite(&self) -> Result<(), TransportError> {
        if let Some(index) = self.ecg.iter().position(|v| !v.is_finite()) {
            return Err(TransportError::NonFiniteSample { index });
        }
        if !self.temp1.is_finite() || !self.temp2.is_finite() {
            return Err(TransportError::NonFiniteTemperature);
        }
        Ok(())
    }
}

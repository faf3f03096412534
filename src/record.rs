//! Machine point records carried inside generated QR codes

use crate::error::{Error, Result};
use crate::qr::QrPayload;
use serde::{Deserialize, Serialize};

/// Name of the machine encoded when nothing else is requested.
pub const DEFAULT_MACHINE_NAME: &str = "Machine 1";

/// Points awarded by the default machine.
pub const DEFAULT_POINTS: i64 = 100;

/// A machine and the number of points a scan of its code is worth.
///
/// Serialized as compact JSON with the field order `machineName`, `points`,
/// which is what the mobile scanner expects to find in the code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineRecord {
    /// Human readable machine name
    pub machine_name: String,
    /// Points credited per scan
    pub points: i64,
}

impl MachineRecord {
    /// Create a new record
    pub fn new(machine_name: impl Into<String>, points: i64) -> Self {
        Self {
            machine_name: machine_name.into(),
            points,
        }
    }

    /// Render the record as the payload text placed in the QR code
    pub fn to_payload_text(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Record(e.to_string()))
    }

    /// Render the record as a QR payload
    pub fn to_payload(&self) -> Result<QrPayload> {
        Ok(QrPayload::from_string(self.to_payload_text()?))
    }

    /// Parse payload text back into a record.
    ///
    /// Accepts the JSON form produced by [`MachineRecord::to_payload_text`] as
    /// well as the older single-quoted mapping form
    /// (`{'machineName': 'Machine 1', 'points': 100}`).
    pub fn from_payload(text: &str) -> Result<Self> {
        match serde_json::from_str(text) {
            Ok(record) => Ok(record),
            Err(first) => {
                let normalized = text.replace('\'', "\"");
                serde_json::from_str(&normalized)
                    .map_err(|_| Error::Record(format!("Unrecognised payload '{text}': {first}")))
            }
        }
    }
}

impl Default for MachineRecord {
    fn default() -> Self {
        Self::new(DEFAULT_MACHINE_NAME, DEFAULT_POINTS)
    }
}

impl TryFrom<&QrPayload> for MachineRecord {
    type Error = Error;

    fn try_from(payload: &QrPayload) -> Result<Self> {
        let text = payload
            .as_str()
            .ok_or_else(|| Error::Record("Payload is not valid UTF-8".to_string()))?;
        Self::from_payload(text)
    }
}

use navcore::{DisplayChannel, Snapshot, WindUnits};
use serde::{Deserialize, Serialize};

/// One instrument-panel slot as served to presentation clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayReading {
    pub index: usize,
    pub channel: DisplayChannel,
    pub units: WindUnits,
    pub value: Option<f64>,
}

impl DisplayReading {
    /// `None` when `index` names no display slot.
    pub fn from_snapshot(snapshot: &Snapshot, index: usize, units: WindUnits) -> Option<Self> {
        let channel = DisplayChannel::from_index(index)?;
        Some(Self {
            index,
            channel,
            units,
            value: snapshot.channel(channel, units),
        })
    }
}

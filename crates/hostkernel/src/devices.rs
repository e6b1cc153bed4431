use std::collections::BTreeMap;

use types::device::KEY_STATES_LEN;

/// Backing state for `/dev/input`.
#[derive(Debug, Clone)]
pub struct Keyboard {
    pub states: [u8; KEY_STATES_LEN],
    /// Snapshot reads are cut to this many bytes when set.
    pub snapshot_limit: Option<usize>,
}

impl Default for Keyboard {
    fn default() -> Self {
        Self {
            states: [0; KEY_STATES_LEN],
            snapshot_limit: None,
        }
    }
}

impl Keyboard {
    pub fn set(&mut self, scancode: u8, pressed: bool) {
        self.states[scancode as usize] = pressed as u8;
    }

    /// Copies the current snapshot into `out`; returns the bytes copied.
    pub fn snapshot(&self, out: &mut [u8]) -> usize {
        let limit = self.snapshot_limit.unwrap_or(KEY_STATES_LEN);
        let n = out.len().min(KEY_STATES_LEN).min(limit);
        out[..n].copy_from_slice(&self.states[..n]);
        n
    }
}

/// Backing state for `/dev/gpu`, with key changes queued against frame
/// numbers so scripted input lands at a reproducible point.
#[derive(Debug, Clone, Default)]
pub struct Display {
    pub frames: u64,
    pub last_frame: Option<Vec<u8>>,
    pub frame_bytes: u64,
    scheduled: BTreeMap<u64, Vec<(u8, bool)>>,
}

impl Display {
    pub fn schedule(&mut self, frame: u64, scancode: u8, pressed: bool) {
        self.scheduled.entry(frame).or_default().push((scancode, pressed));
    }

    /// Stores a presented frame and returns the key changes now due.
    pub fn present(&mut self, frame: &[u8]) -> Vec<(u8, bool)> {
        self.frames += 1;
        self.frame_bytes += frame.len() as u64;
        self.last_frame = Some(frame.to_vec());
        let later = self.scheduled.split_off(&(self.frames + 1));
        let due = std::mem::replace(&mut self.scheduled, later);
        due.into_values().flatten().collect()
    }
}

//! Keyboard and display bridge.
//!
//! The keyboard device hands out whole state snapshots. The bridge keeps
//! the previous snapshot and turns differences into press/release edges.

use types::device::{DISPLAY_DEVICE, INPUT_DEVICE, KEY_STATES_LEN};
use types::keys::{self, scancode};
use types::{KeyEvent, OpenFlags};

use crate::syscall::{Syscalls, Trap};

pub const KEY_QUEUE_CAPACITY: usize = 32;

/// Logical key for a raw scancode, `None` for keys the application ignores.
pub fn scancode_to_key(code: u8) -> Option<u8> {
    let key = match code {
        scancode::ENTER => keys::KEY_ENTER,
        scancode::ESC => keys::KEY_ESCAPE,
        scancode::LEFT => keys::KEY_LEFTARROW,
        scancode::RIGHT => keys::KEY_RIGHTARROW,
        scancode::UP => keys::KEY_UPARROW,
        scancode::DOWN => keys::KEY_DOWNARROW,
        scancode::LEFTCTRL => keys::KEY_FIRE,
        scancode::SPACE => keys::KEY_USE,
        scancode::LEFTSHIFT | scancode::RIGHTSHIFT => keys::KEY_RSHIFT,
        scancode::LEFTALT => keys::KEY_RALT,
        scancode::TAB => keys::KEY_TAB,
        scancode::F1..=scancode::F10 => keys::KEY_F1 + (code - scancode::F1),
        scancode::F11 => keys::KEY_F11,
        scancode::F12 => keys::KEY_F12,
        scancode::BACKSPACE => keys::KEY_BACKSPACE,
        scancode::PAUSE => keys::KEY_PAUSE,
        scancode::MINUS => keys::KEY_MINUS,
        scancode::EQUAL => keys::KEY_EQUALS,
        scancode::Y => b'y',
        scancode::N => b'n',
        _ => return None,
    };
    Some(key)
}

/// Fixed-size ring of edge events. A push onto a full queue overwrites the
/// oldest unread entry.
#[derive(Debug, Clone)]
pub struct KeyQueue<const N: usize> {
    events: [KeyEvent; N],
    read: usize,
    write: usize,
}

impl<const N: usize> Default for KeyQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> KeyQueue<N> {
    pub const fn new() -> Self {
        Self {
            events: [KeyEvent::new(false, 0); N],
            read: 0,
            write: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.write.wrapping_sub(self.read)
    }

    pub fn is_empty(&self) -> bool {
        self.read == self.write
    }

    pub fn push(&mut self, event: KeyEvent) {
        if self.len() == N {
            self.read = self.read.wrapping_add(1);
        }
        self.events[self.write % N] = event;
        self.write = self.write.wrapping_add(1);
    }

    pub fn pop(&mut self) -> Option<KeyEvent> {
        if self.is_empty() {
            return None;
        }
        let event = self.events[self.read % N];
        self.read = self.read.wrapping_add(1);
        Some(event)
    }

    pub fn clear(&mut self) {
        self.read = 0;
        self.write = 0;
    }
}

pub struct InputBridge {
    input_fd: Option<usize>,
    display_fd: Option<usize>,
    prev: [u8; KEY_STATES_LEN],
    queue: KeyQueue<KEY_QUEUE_CAPACITY>,
}

impl Default for InputBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBridge {
    pub const fn new() -> Self {
        Self {
            input_fd: None,
            display_fd: None,
            prev: [0; KEY_STATES_LEN],
            queue: KeyQueue::new(),
        }
    }

    /// Opens both devices and clears the snapshot. A device that fails to
    /// open is simply left out.
    pub fn open_devices<T: Trap + ?Sized>(&mut self, sys: &mut T) {
        self.prev = [0; KEY_STATES_LEN];
        let fd = sys.open(INPUT_DEVICE, OpenFlags::RDONLY);
        self.input_fd = (fd >= 0).then_some(fd as usize);
        let fd = sys.open(DISPLAY_DEVICE, OpenFlags::WRONLY);
        self.display_fd = (fd >= 0).then_some(fd as usize);
    }

    pub fn has_input(&self) -> bool {
        self.input_fd.is_some()
    }

    pub fn has_display(&self) -> bool {
        self.display_fd.is_some()
    }

    /// Writes one frame in a single transfer, then polls the keyboard.
    pub fn present<T: Trap + ?Sized>(&mut self, sys: &mut T, frame: &[u8]) {
        if let Some(fd) = self.display_fd {
            sys.write(fd, frame);
        }
        self.poll(sys);
    }

    /// Reads one snapshot and queues its edges; returns how many.
    pub fn poll<T: Trap + ?Sized>(&mut self, sys: &mut T) -> usize {
        let Some(fd) = self.input_fd else {
            return 0;
        };
        let mut states = [0u8; KEY_STATES_LEN];
        let r = sys.read(fd, &mut states);
        if r <= 0 {
            return 0;
        }
        let n = (r as usize).min(KEY_STATES_LEN);
        self.apply_snapshot(&states[..n])
    }

    /// Diffs `states` against the previous snapshot, index by index.
    pub fn apply_snapshot(&mut self, states: &[u8]) -> usize {
        let mut queued = 0;
        for (code, (&now, prev)) in states.iter().zip(self.prev.iter_mut()).enumerate() {
            if now == *prev {
                continue;
            }
            *prev = now;
            if let Some(key) = scancode_to_key(code as u8) {
                self.queue.push(KeyEvent::new(now != 0, key));
                queued += 1;
            }
        }
        queued
    }

    pub fn next_key(&mut self) -> Option<KeyEvent> {
        self.queue.pop()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Empties the queue and forgets the snapshot; descriptors stay open.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.prev = [0; KEY_STATES_LEN];
    }
}

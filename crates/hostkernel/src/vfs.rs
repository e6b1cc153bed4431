//! Flat file namespace and the descriptor table.

use std::collections::{BTreeMap, HashMap};

use types::OpenFlags;
use types::sys_call::{STDERR, STDIN, STDOUT};

use crate::errno::{EACCES, EBADF, EMFILE, ENOENT};

pub const INPUT_PATH: &str = "/dev/input";
pub const DISPLAY_PATH: &str = "/dev/gpu";
pub const MAX_DESCRIPTORS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Input,
    Display,
}

/// What a descriptor refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Stdin,
    Console,
    Device(Device),
    File {
        name: String,
        pos: usize,
        flags: OpenFlags,
    },
}

#[derive(Debug)]
pub struct Vfs {
    files: HashMap<String, Vec<u8>>,
    descriptors: BTreeMap<usize, Node>,
    pub devices_enabled: bool,
    /// Caps every file read at this many bytes.
    pub read_limit: Option<usize>,
}

impl Default for Vfs {
    fn default() -> Self {
        Self::new()
    }
}

impl Vfs {
    pub fn new() -> Self {
        let descriptors = BTreeMap::from([
            (STDIN, Node::Stdin),
            (STDOUT, Node::Console),
            (STDERR, Node::Console),
        ]);
        Self {
            files: HashMap::new(),
            descriptors,
            devices_enabled: true,
            read_limit: None,
        }
    }

    pub fn insert(&mut self, name: &str, data: Vec<u8>) {
        self.files.insert(name.trim_start_matches('/').to_string(), data);
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<u8>> {
        self.files.remove(name.trim_start_matches('/'))
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name.trim_start_matches('/')).map(Vec::as_slice)
    }

    pub fn node(&self, fd: usize) -> Option<&Node> {
        self.descriptors.get(&fd)
    }

    /// Descriptors beyond the three standard streams.
    pub fn open_descriptors(&self) -> usize {
        self.descriptors.keys().filter(|&&fd| fd > STDERR).count()
    }

    fn next_fd(&self) -> Option<usize> {
        (STDERR + 1..MAX_DESCRIPTORS).find(|fd| !self.descriptors.contains_key(fd))
    }

    pub fn open(&mut self, path: &str, flags: OpenFlags) -> isize {
        let node = match path {
            INPUT_PATH | DISPLAY_PATH if !self.devices_enabled => return ENOENT,
            INPUT_PATH => Node::Device(Device::Input),
            DISPLAY_PATH => Node::Device(Device::Display),
            _ => {
                let name = path.trim_start_matches('/');
                if name.is_empty() {
                    return ENOENT;
                }
                match self.files.get_mut(name) {
                    Some(data) => {
                        if flags.contains(OpenFlags::TRUNC) && flags.writable() {
                            data.clear();
                        }
                    }
                    None if flags.contains(OpenFlags::CREATE) => {
                        self.files.insert(name.to_string(), Vec::new());
                    }
                    None => return ENOENT,
                }
                Node::File {
                    name: name.to_string(),
                    pos: 0,
                    flags,
                }
            }
        };
        let Some(fd) = self.next_fd() else {
            return EMFILE;
        };
        self.descriptors.insert(fd, node);
        fd as isize
    }

    pub fn close(&mut self, fd: usize) -> isize {
        match self.descriptors.remove(&fd) {
            Some(_) => 0,
            None => EBADF,
        }
    }

    pub fn read_file(&mut self, fd: usize, out: &mut [u8]) -> isize {
        let limit = self.read_limit.unwrap_or(usize::MAX);
        let Some(Node::File { name, pos, flags }) = self.descriptors.get_mut(&fd) else {
            return EBADF;
        };
        if !flags.readable() {
            return EACCES;
        }
        let Some(data) = self.files.get(name.as_str()) else {
            return ENOENT;
        };
        let start = (*pos).min(data.len());
        let n = out.len().min(data.len() - start).min(limit);
        out[..n].copy_from_slice(&data[start..start + n]);
        *pos = start + n;
        n as isize
    }

    pub fn write_file(&mut self, fd: usize, bytes: &[u8]) -> isize {
        let Some(Node::File { name, pos, flags }) = self.descriptors.get_mut(&fd) else {
            return EBADF;
        };
        if !flags.writable() {
            return EACCES;
        }
        let Some(data) = self.files.get_mut(name.as_str()) else {
            return ENOENT;
        };
        let end = *pos + bytes.len();
        if data.len() < end {
            data.resize(end, 0);
        }
        data[*pos..end].copy_from_slice(bytes);
        *pos = end;
        bytes.len() as isize
    }
}

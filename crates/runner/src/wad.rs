//! Just enough of the WAD container to build a test asset and list one.

use anyhow::{bail, Result};

pub const HEADER_LEN: usize = 12;
pub const DIR_ENTRY_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lump {
    pub name: String,
    pub data: Vec<u8>,
}

impl Lump {
    pub fn new(name: &str, data: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            data,
        }
    }
}

/// Header, lump bodies, then the directory.
pub fn build(kind: &[u8; 4], lumps: &[Lump]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    out.extend_from_slice(kind);
    out.extend_from_slice(&(lumps.len() as i32).to_le_bytes());
    out.extend_from_slice(&0i32.to_le_bytes());

    let mut directory = Vec::with_capacity(lumps.len() * DIR_ENTRY_LEN);
    for lump in lumps {
        if lump.name.len() > 8 {
            bail!("lump name longer than 8 bytes: {}", lump.name);
        }
        let offset = out.len() as i32;
        out.extend_from_slice(&lump.data);
        directory.extend_from_slice(&offset.to_le_bytes());
        directory.extend_from_slice(&(lump.data.len() as i32).to_le_bytes());
        let mut name = [0u8; 8];
        name[..lump.name.len()].copy_from_slice(lump.name.as_bytes());
        directory.extend_from_slice(&name);
    }

    let table = out.len() as i32;
    out[8..12].copy_from_slice(&table.to_le_bytes());
    out.extend_from_slice(&directory);
    Ok(out)
}

/// A small IWAD with a palette, a map marker and a couple of map lumps.
pub fn synthesize() -> Result<Vec<u8>> {
    let playpal: Vec<u8> = (0..256u32)
        .flat_map(|i| [i as u8, (255 - i) as u8, (i * 7 % 256) as u8])
        .collect();
    let things: Vec<u8> = (0..10u16)
        .flat_map(|i| {
            let mut thing = [0u8; 10];
            thing[0..2].copy_from_slice(&(i * 64).to_le_bytes());
            thing[2..4].copy_from_slice(&(i * 32).to_le_bytes());
            thing[6..8].copy_from_slice(&1u16.to_le_bytes());
            thing
        })
        .collect();
    let vertexes: Vec<u8> = (0..64u8).collect();
    build(
        b"IWAD",
        &[
            Lump::new("PLAYPAL", playpal),
            Lump::new("E1M1", Vec::new()),
            Lump::new("THINGS", things),
            Lump::new("VERTEXES", vertexes),
        ],
    )
}

pub fn read_i32(bytes: &[u8]) -> i32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[..4]);
    i32::from_le_bytes(word)
}

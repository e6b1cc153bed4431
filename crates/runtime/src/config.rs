//! Fixed process parameters.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Argument list handed to the application's `main`.
    pub argv: [&'static str; 3],
    pub width: usize,
    pub height: usize,
    /// File name suffixes (without the dot) that are cached whole at open.
    pub cached_extensions: &'static [&'static str],
    /// Bytes read per call while filling a cache.
    pub cache_chunk: usize,
    /// Scratch size used to skip forward through uncached files.
    pub skip_chunk: usize,
}

impl Config {
    pub const DEFAULT: Config = Config {
        argv: ["doom", "-iwad", "doom1.wad"],
        width: 640,
        height: 400,
        cached_extensions: &["wad"],
        cache_chunk: 64 * 1024,
        skip_chunk: 512,
    };

    pub fn frame_bytes(&self) -> usize {
        types::device::frame_bytes(self.width, self.height)
    }

    /// Case-insensitive suffix match against `cached_extensions`.
    pub fn is_cached_name(&self, name: &[u8]) -> bool {
        self.cached_extensions.iter().any(|ext| {
            let ext = ext.as_bytes();
            name.len() > ext.len()
                && name[name.len() - ext.len() - 1] == b'.'
                && name[name.len() - ext.len()..].eq_ignore_ascii_case(ext)
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}

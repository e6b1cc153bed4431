use core::fmt;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A syscall came back negative; carries the raw code.
    Transport(isize),
    /// Every file slot is in use.
    TableFull,
    /// The base name does not fit a handle's name buffer.
    NameTooLong,
    /// The handle does not name an open slot.
    BadHandle,
    /// A reopen failed; the handle has no descriptor behind it.
    Detached,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transport(code) => write!(f, "syscall failed with {}", code),
            Error::TableFull => write!(f, "file table full"),
            Error::NameTooLong => write!(f, "file name too long"),
            Error::BadHandle => write!(f, "bad file handle"),
            Error::Detached => write!(f, "file handle detached"),
        }
    }
}

impl core::error::Error for Error {}

/// Maps a raw syscall result onto `Result`, keeping non-negative values.
pub(crate) fn check(ret: isize) -> Result<usize> {
    if ret < 0 {
        Err(Error::Transport(ret))
    } else {
        Ok(ret as usize)
    }
}

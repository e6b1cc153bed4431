use bitflags::bitflags;

bitflags! {
    /// Open flags as the kernel reads them from the second `open` argument.
    ///
    /// Read-only is the absence of both access bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OpenFlags: u32 {
        const WRONLY = 1 << 0;
        const RDWR = 1 << 1;
        const CREATE = 1 << 9;
        const TRUNC = 1 << 10;
    }
}

impl OpenFlags {
    pub const RDONLY: Self = Self::empty();

    pub fn readable(&self) -> bool {
        !self.contains(Self::WRONLY) || self.contains(Self::RDWR)
    }

    pub fn writable(&self) -> bool {
        self.intersects(Self::WRONLY | Self::RDWR)
    }
}

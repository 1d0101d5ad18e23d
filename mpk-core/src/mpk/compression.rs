use serde::Serialize;

/// Compression code of an entry. Only `Stored` is ever written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    #[default]
    Stored,
    Unknown(u32),
}

impl Compression {
    pub fn code(self) -> u32 {
        match self {
            Compression::Stored => 0,
            Compression::Unknown(code) => code,
        }
    }

    pub fn is_stored(self) -> bool {
        self == Compression::Stored
    }
}

impl From<u32> for Compression {
    fn from(value: u32) -> Self {
        match value {
            0 => Compression::Stored,
            code => Compression::Unknown(code),
        }
    }
}

impl Serialize for Compression {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u32(self.code())
    }
}

/// What to do with entries whose compression code is not `Stored`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompressionPolicy {
    /// Fail before anything is extracted.
    #[default]
    Reject,
    /// Write the stored bytes verbatim.
    Passthrough,
}

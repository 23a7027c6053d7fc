//! backend/descriptor.rs
//! Backend identities and the static metadata of optional backends.
//!
//! Design notes:
//! - `BackendId` is a closed set with stable wire ids (mirrored in frame headers).
//! - Built-in ids are always linked; optional ids depend on a Cargo feature.
//! - A descriptor only exists for optional backends; priority breaks ties under
//!   auto resolution and must be distinct within one registry.

use std::fmt;
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

use crate::constants::{backend_ids, priorities};

/// FFI-safe enum for backend identifiers.
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, TryFromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendId {
    Store   = backend_ids::STORE,
    Zstd    = backend_ids::ZSTD,
    Lz4     = backend_ids::LZ4,
    Deflate = backend_ids::DEFLATE,
    Gzip    = backend_ids::GZIP,
    Brotli  = backend_ids::BROTLI,
}

impl BackendId {
    pub const ALL: [BackendId; 6] = [
        BackendId::Store,
        BackendId::Zstd,
        BackendId::Lz4,
        BackendId::Deflate,
        BackendId::Gzip,
        BackendId::Brotli,
    ];

    pub const BUILTIN: [BackendId; 3] = [BackendId::Store, BackendId::Deflate, BackendId::Gzip];

    pub fn name(self) -> &'static str {
        match self {
            BackendId::Store   => "store",
            BackendId::Zstd    => "zstd",
            BackendId::Lz4     => "lz4",
            BackendId::Deflate => "deflate",
            BackendId::Gzip    => "gzip",
            BackendId::Brotli  => "brotli",
        }
    }

    /// File extension conventionally used for a raw stream of this backend.
    pub fn file_extension(self) -> &'static str {
        match self {
            BackendId::Store   => "",
            BackendId::Zstd    => ".zst",
            BackendId::Lz4     => ".lz4",
            BackendId::Deflate => ".deflate",
            BackendId::Gzip    => ".gz",
            BackendId::Brotli  => ".br",
        }
    }

    /// Library (crate) the backend is implemented by.
    pub fn library(self) -> &'static str {
        match self {
            BackendId::Store => "std",
            BackendId::Zstd => "zstd",
            BackendId::Lz4 => "lz4_flex",
            BackendId::Deflate | BackendId::Gzip => "flate2",
            BackendId::Brotli => "brotli",
        }
    }

    /// Cargo feature that links the backend, `None` for built-ins.
    pub fn feature(self) -> Option<&'static str> {
        match self {
            BackendId::Zstd => Some("zstd"),
            BackendId::Lz4 => Some("lz4"),
            BackendId::Brotli => Some("brotli"),
            BackendId::Store | BackendId::Deflate | BackendId::Gzip => None,
        }
    }

    pub fn is_builtin(self) -> bool {
        self.feature().is_none()
    }

    /// Whether the backend's library was compiled into this build.
    pub fn is_linked(self) -> bool {
        match self {
            BackendId::Zstd => cfg!(feature = "zstd"),
            BackendId::Lz4 => cfg!(feature = "lz4"),
            BackendId::Brotli => cfg!(feature = "brotli"),
            BackendId::Store | BackendId::Deflate | BackendId::Gzip => true,
        }
    }

    pub fn from_name(name: &str) -> Option<BackendId> {
        BackendId::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static metadata for one optional backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BackendDescriptor {
    pub id: BackendId,
    /// Library symbol the probe resolves before declaring the backend usable.
    pub marker: &'static str,
    pub priority: u16,
}

impl BackendDescriptor {
    pub const fn new(id: BackendId, marker: &'static str, priority: u16) -> Self {
        Self { id, marker, priority }
    }

    /// Descriptor for `id` with its default marker and priority.
    /// Returns `None` for built-in ids.
    pub fn default_for(id: BackendId) -> Option<Self> {
        match id {
            BackendId::Zstd => Some(Self::new(id, "zstd::stream::write::Encoder", priorities::ZSTD)),
            BackendId::Lz4 => Some(Self::new(id, "lz4_flex::frame::FrameEncoder", priorities::LZ4)),
            BackendId::Brotli => Some(Self::new(id, "brotli::Decompressor", priorities::BROTLI)),
            BackendId::Store | BackendId::Deflate | BackendId::Gzip => None,
        }
    }
}

/// Default optional backends, ordered by descending priority.
pub fn list_backends() -> Vec<BackendDescriptor> {
    let mut out: Vec<BackendDescriptor> = BackendId::ALL
        .into_iter()
        .filter_map(BackendDescriptor::default_for)
        .collect();
    sort_by_priority(&mut out);
    out
}

/// Descending priority, id as a deterministic tiebreak.
pub(crate) fn sort_by_priority(descriptors: &mut [BackendDescriptor]) {
    descriptors.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));
}

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::descriptor::Descriptor;
use crate::error::{EngineError, Result};

/// Decoded torrent metainfo, the minimal slice of BEP 3 the pipeline needs.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Metainfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announce: Option<String>,
    pub info: Info,
}

/// The `info` dictionary of a descriptor.
///
/// `name` doubles as the payload file name the engine writes inside the
/// destination directory; for cache descriptors it is the staging name
/// `cache_{prefix}_{suffix}` baked in when the torrent was generated.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Info {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    pub name: String,
    #[serde(rename = "piece length")]
    pub piece_length: u64,
    #[serde(with = "serde_bytes")]
    pub pieces: Vec<u8>,
}

impl Metainfo {
    /// SHA-1 of the re-encoded `info` dictionary.
    ///
    /// Advisory, used for logging; re-encoding is canonical for the fields
    /// we model, but `None` is returned rather than a panic if encoding
    /// fails.
    pub fn info_hash(&self) -> Option<[u8; 20]> {
        let encoded = serde_bencode::to_bytes(&self.info).ok()?;
        Some(Sha1::digest(&encoded).into())
    }
}

/// A decoded transfer: the raw descriptor plus its parsed metainfo.
///
/// Decoding happens once, before the engine is invoked, so a malformed
/// descriptor never reaches the transfer step. The engine borrows the job
/// for the duration of one `download` call.
#[derive(Clone, Debug)]
pub struct TransferJob {
    descriptor: Descriptor,
    metainfo: Metainfo,
}

impl TransferJob {
    /// Parse a raw descriptor. Fails with [`EngineError::BadDescriptor`]
    /// on anything that is not a well-formed metainfo dictionary.
    pub fn decode(descriptor: Descriptor) -> Result<Self> {
        let metainfo: Metainfo = serde_bencode::from_bytes(descriptor.as_bytes())
            .map_err(|e| EngineError::BadDescriptor(e.to_string()))?;
        Ok(Self {
            descriptor,
            metainfo,
        })
    }

    pub fn descriptor(&self) -> &Descriptor { &self.descriptor }

    pub fn metainfo(&self) -> &Metainfo { &self.metainfo }

    /// File name the engine writes inside the destination directory.
    pub fn payload_name(&self) -> &str { &self.metainfo.info.name }
}

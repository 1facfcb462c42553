use bytes::Bytes;

/// Raw descriptor bytes fetched from the object store.
///
/// An owned buffer with an explicit length. Descriptors are binary bencode
/// and routinely contain embedded NUL bytes; nothing may treat them as
/// null-terminated text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Descriptor {
    bytes: Bytes,
}

impl Descriptor {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize { self.bytes.len() }

    pub fn is_empty(&self) -> bool { self.bytes.is_empty() }

    pub fn as_bytes(&self) -> &[u8] { &self.bytes }
}

impl From<Bytes> for Descriptor {
    fn from(bytes: Bytes) -> Self { Self::new(bytes) }
}

impl From<Vec<u8>> for Descriptor {
    fn from(bytes: Vec<u8>) -> Self { Self::new(bytes) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_explicit_length_with_embedded_nuls() {
        let descriptor = Descriptor::new(vec![b'd', 0, 0, b'e']);
        assert_eq!(descriptor.len(), 4);
        assert_eq!(descriptor.as_bytes(), b"d\x00\x00e");
    }
}

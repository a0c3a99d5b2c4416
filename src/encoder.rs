use bytes::{BufMut, Bytes, BytesMut};

use crate::pkid::Pkid;

/// A reusable buffer for building store keys.
///
/// Keys in this store are flat concatenations of fixed-width fields behind a
/// one-byte namespace prefix, so the encoder only ever appends: a prefix byte,
/// then Pkids. There are no separators; field boundaries come from widths.
///
/// `KeyEncoder` is reusable; call `clear()` between keys.
pub struct KeyEncoder {
    buf: BytesMut,
}

impl KeyEncoder {
    /// Create a new encoder with a capacity hint.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(cap),
        }
    }

    /// Reset the internal buffer so the encoder can be reused.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Convert the accumulated buffer into an immutable `Bytes`.
    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }

    /// Copy the current contents out, leaving the encoder usable.
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(&self.buf)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Append a single byte, normally a namespace prefix.
    #[inline(always)]
    pub fn push_byte(&mut self, b: u8) {
        self.buf.put_u8(b);
    }

    /// Append the 33 raw bytes of a Pkid and return the width written.
    #[inline(always)]
    pub fn encode_pkid_into(&mut self, id: &Pkid) -> usize {
        self.buf.extend_from_slice(id.as_bytes());
        Pkid::LEN
    }
}

use std::fmt;

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A 33-byte account identifier.
///
/// Pkids are plain values: copied, compared byte for byte, and ordered the
/// same way the store orders the keys that embed them.
///
/// ```
/// use edgescan::Pkid;
/// let a = Pkid::from_bytes([0x01; Pkid::LEN]);
/// assert_eq!(a.to_hex_string().len(), 2 * Pkid::LEN);
/// assert_eq!(Pkid::try_from(&a.as_bytes()[..]).unwrap(), a);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pkid([u8; PKID_LEN]);

const PKID_LEN: usize = 33;

impl Pkid {
    /// Width of a Pkid in bytes.
    pub const LEN: usize = PKID_LEN;

    #[inline]
    pub const fn from_bytes(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }

    /// Lowercase hex, the form used in output and diagnostics.
    #[inline]
    pub fn to_hex_string(&self) -> String {
        hex::encode(self.0)
    }
}

impl TryFrom<&[u8]> for Pkid {
    type Error = usize;

    /// Fails with the offending length when `bytes` is not exactly 33 bytes.
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        <[u8; Self::LEN]>::try_from(bytes)
            .map(Self)
            .map_err(|_| bytes.len())
    }
}

impl fmt::Debug for Pkid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pkid({})", self.to_hex_string())
    }
}

impl fmt::Display for Pkid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_string())
    }
}

// serde only derives for arrays up to 32 elements, so Pkid goes over the wire
// as a length-checked byte string.
impl Serialize for Pkid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for Pkid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_bytes(PkidVisitor)
    }
}

struct PkidVisitor;

impl<'de> Visitor<'de> for PkidVisitor {
    type Value = Pkid;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes", Pkid::LEN)
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Pkid, E> {
        Pkid::try_from(v).map_err(|len| E::invalid_length(len, &self))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Pkid, A::Error> {
        let mut out = [0u8; Pkid::LEN];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = seq
                .next_element()?
                .ok_or_else(|| <A::Error as de::Error>::invalid_length(i, &self))?;
        }
        if seq.next_element::<u8>()?.is_some() {
            return Err(de::Error::invalid_length(Pkid::LEN + 1, &self));
        }
        Ok(Pkid(out))
    }
}

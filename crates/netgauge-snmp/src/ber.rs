//! Minimal BER (X.690) primitives for SNMP messages.
//!
//! Definite lengths only. Integers are two's complement, big-endian, in the
//! fewest octets that preserve the sign.

use bytes::{BufMut, BytesMut};

use crate::error::{malformed, SnmpError, SnmpResult};

pub const TAG_INTEGER: u8 = 0x02;
pub const TAG_OCTET_STRING: u8 = 0x04;
pub const TAG_NULL: u8 = 0x05;
pub const TAG_OID: u8 = 0x06;
pub const TAG_SEQUENCE: u8 = 0x30;

// Application types (RFC 2578).
pub const TAG_IP_ADDRESS: u8 = 0x40;
pub const TAG_COUNTER32: u8 = 0x41;
pub const TAG_GAUGE32: u8 = 0x42;
pub const TAG_TIMETICKS: u8 = 0x43;
pub const TAG_COUNTER64: u8 = 0x46;

// Varbind exceptions (RFC 3416).
pub const TAG_NO_SUCH_OBJECT: u8 = 0x80;
pub const TAG_NO_SUCH_INSTANCE: u8 = 0x81;
pub const TAG_END_OF_MIB_VIEW: u8 = 0x82;

// PDU types.
pub const TAG_GET_REQUEST: u8 = 0xa0;
pub const TAG_GET_RESPONSE: u8 = 0xa2;

/// Write a definite length in short or long form.
pub fn put_length(buf: &mut BytesMut, len: usize) {
    if len < 0x80 {
        buf.put_u8(len as u8);
    } else {
        let bytes = (len as u64).to_be_bytes();
        let skip = bytes.iter().take_while(|b| **b == 0).count();
        let significant = &bytes[skip..];
        buf.put_u8(0x80 | significant.len() as u8);
        buf.put_slice(significant);
    }
}

/// Write a complete tag-length-value triple.
pub fn put_tlv(buf: &mut BytesMut, tag: u8, content: &[u8]) {
    buf.put_u8(tag);
    put_length(buf, content.len());
    buf.put_slice(content);
}

/// Minimal two's complement encoding of a signed integer.
pub fn integer_bytes(value: i64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let mut start = 0;
    while start < bytes.len() - 1 {
        let (b, next) = (bytes[start], bytes[start + 1]);
        let redundant = (b == 0x00 && next & 0x80 == 0) || (b == 0xff && next & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    bytes[start..].to_vec()
}

/// Encoding of an unsigned application value (Counter32, Counter64, ...).
///
/// A leading zero octet is added when the high bit would otherwise read as
/// a sign.
pub fn unsigned_bytes(value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let skip = bytes
        .iter()
        .take_while(|b| **b == 0)
        .count()
        .min(bytes.len() - 1);
    let mut out = Vec::with_capacity(bytes.len() + 1);
    if bytes[skip] & 0x80 != 0 {
        out.push(0);
    }
    out.extend_from_slice(&bytes[skip..]);
    out
}

pub fn decode_integer(content: &[u8]) -> SnmpResult<i64> {
    if content.is_empty() || content.len() > 8 {
        return Err(malformed(format!("integer of {} octets", content.len())));
    }
    let mut value: i64 = if content[0] & 0x80 != 0 { -1 } else { 0 };
    for b in content {
        value = (value << 8) | i64::from(*b);
    }
    Ok(value)
}

/// Decode an unsigned application value.
///
/// Some agents omit the sign octet on large Counter32 values; the raw bits
/// are taken as unsigned either way.
pub fn decode_unsigned(content: &[u8]) -> SnmpResult<u64> {
    let digits = match content {
        [0, rest @ ..] if !rest.is_empty() => rest,
        _ => content,
    };
    if digits.is_empty() || digits.len() > 8 {
        return Err(malformed(format!("unsigned of {} octets", content.len())));
    }
    Ok(digits.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
}

/// Cursor over a buffer of consecutive TLVs.
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Read the next TLV, returning its tag and content.
    pub fn read_tlv(&mut self) -> SnmpResult<(u8, &'a [u8])> {
        let tag = self.byte()?;
        let len = self.length()?;
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.buf.len())
            .ok_or_else(|| malformed(format!("tag 0x{tag:02x} claims {len} octets past the end")))?;
        let content = &self.buf[self.pos..end];
        self.pos = end;
        Ok((tag, content))
    }

    /// Read the next TLV and require a specific tag.
    pub fn expect(&mut self, expected: u8) -> SnmpResult<&'a [u8]> {
        let (found, content) = self.read_tlv()?;
        if found != expected {
            return Err(SnmpError::UnexpectedTag { expected, found });
        }
        Ok(content)
    }

    fn byte(&mut self) -> SnmpResult<u8> {
        let b = *self
            .buf
            .get(self.pos)
            .ok_or_else(|| malformed("truncated message"))?;
        self.pos += 1;
        Ok(b)
    }

    fn length(&mut self) -> SnmpResult<usize> {
        let first = self.byte()?;
        if first & 0x80 == 0 {
            return Ok(usize::from(first));
        }
        let octets = usize::from(first & 0x7f);
        if octets == 0 || octets > std::mem::size_of::<usize>() {
            return Err(malformed(format!("unsupported length form 0x{first:02x}")));
        }
        let mut len = 0usize;
        for _ in 0..octets {
            len = (len << 8) | usize::from(self.byte()?);
        }
        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_and_long_lengths() {
        let mut buf = BytesMut::new();
        put_length(&mut buf, 5);
        put_length(&mut buf, 200);
        put_length(&mut buf, 0x1234);
        assert_eq!(&buf[..], &[0x05, 0x81, 0xc8, 0x82, 0x12, 0x34]);
    }

    #[test]
    fn integers_are_minimal() {
        assert_eq!(integer_bytes(0), vec![0x00]);
        assert_eq!(integer_bytes(127), vec![0x7f]);
        assert_eq!(integer_bytes(128), vec![0x00, 0x80]);
        assert_eq!(integer_bytes(256), vec![0x01, 0x00]);
        assert_eq!(integer_bytes(-1), vec![0xff]);
        assert_eq!(integer_bytes(-129), vec![0xff, 0x7f]);
    }

    #[test]
    fn integers_decode_with_sign() {
        for v in [0, 1, 127, 128, 255, 65_535, -1, -128, -129, i64::MAX, i64::MIN] {
            assert_eq!(decode_integer(&integer_bytes(v)).unwrap(), v);
        }
        assert!(decode_integer(&[]).is_err());
    }

    #[test]
    fn unsigned_gets_sign_octet() {
        assert_eq!(unsigned_bytes(0), vec![0x00]);
        assert_eq!(unsigned_bytes(0x7f), vec![0x7f]);
        assert_eq!(unsigned_bytes(0xffff_ffff), vec![0x00, 0xff, 0xff, 0xff, 0xff]);
        assert_eq!(unsigned_bytes(u64::MAX).len(), 9);
    }

    #[test]
    fn unsigned_accepts_missing_sign_octet() {
        assert_eq!(decode_unsigned(&[0xff, 0xff, 0xff, 0xff]).unwrap(), 0xffff_ffff);
        assert_eq!(decode_unsigned(&unsigned_bytes(u64::MAX)).unwrap(), u64::MAX);
        assert_eq!(decode_unsigned(&[0x00]).unwrap(), 0);
    }

    #[test]
    fn reader_walks_tlvs() {
        let buf = [0x02, 0x01, 0x05, 0x04, 0x02, b'o', b'k'];
        let mut reader = Reader::new(&buf);
        assert_eq!(reader.expect(TAG_INTEGER).unwrap(), &[0x05]);
        assert_eq!(reader.read_tlv().unwrap(), (TAG_OCTET_STRING, &b"ok"[..]));
        assert!(reader.is_empty());
    }

    #[test]
    fn reader_rejects_overrun() {
        let buf = [0x04, 0x05, b'a'];
        let err = Reader::new(&buf).read_tlv().unwrap_err();
        assert!(matches!(err, SnmpError::Malformed(_)));
    }

    #[test]
    fn reader_reports_wrong_tag() {
        let buf = [0x05, 0x00];
        let err = Reader::new(&buf).expect(TAG_SEQUENCE).unwrap_err();
        assert!(matches!(
            err,
            SnmpError::UnexpectedTag {
                expected: TAG_SEQUENCE,
                found: TAG_NULL
            }
        ));
    }
}

//! SNMPv2c message model and codec.
//!
//! ```text
//! Message ::= SEQUENCE { version INTEGER, community OCTET STRING, pdu }
//! pdu     ::= [tag] { request-id, error-status, error-index,
//!                     SEQUENCE OF SEQUENCE { name OID, value } }
//! ```

use bytes::{Bytes, BytesMut};

use crate::ber::*;
use crate::error::{malformed, SnmpError, SnmpResult};
use crate::oid::Oid;

/// Version field value for SNMPv2c.
pub const VERSION_2C: i64 = 1;

/// A varbind value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    OctetString(Vec<u8>),
    Null,
    ObjectIdentifier(Oid),
    IpAddress([u8; 4]),
    Counter32(u32),
    Gauge32(u32),
    TimeTicks(u32),
    Counter64(u64),
    NoSuchObject,
    NoSuchInstance,
    EndOfMibView,
    Other { tag: u8, content: Vec<u8> },
}

impl Value {
    /// Numeric reading suitable for rate computation.
    pub fn as_counter(&self) -> Option<u64> {
        match self {
            Value::Counter64(v) => Some(*v),
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) => Some(u64::from(*v)),
            Value::Integer(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Whether this is one of the v2 exception values.
    pub fn is_exception(&self) -> bool {
        matches!(
            self,
            Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::OctetString(_) => "OCTET STRING",
            Value::Null => "NULL",
            Value::ObjectIdentifier(_) => "OBJECT IDENTIFIER",
            Value::IpAddress(_) => "IpAddress",
            Value::Counter32(_) => "Counter32",
            Value::Gauge32(_) => "Gauge32",
            Value::TimeTicks(_) => "TimeTicks",
            Value::Counter64(_) => "Counter64",
            Value::NoSuchObject => "noSuchObject",
            Value::NoSuchInstance => "noSuchInstance",
            Value::EndOfMibView => "endOfMibView",
            Value::Other { .. } => "unknown type",
        }
    }

    fn encode(&self, buf: &mut BytesMut) {
        match self {
            Value::Integer(v) => put_tlv(buf, TAG_INTEGER, &integer_bytes(*v)),
            Value::OctetString(s) => put_tlv(buf, TAG_OCTET_STRING, s),
            Value::Null => put_tlv(buf, TAG_NULL, &[]),
            Value::ObjectIdentifier(oid) => put_tlv(buf, TAG_OID, &oid.encode()),
            Value::IpAddress(ip) => put_tlv(buf, TAG_IP_ADDRESS, ip),
            Value::Counter32(v) => put_tlv(buf, TAG_COUNTER32, &unsigned_bytes(u64::from(*v))),
            Value::Gauge32(v) => put_tlv(buf, TAG_GAUGE32, &unsigned_bytes(u64::from(*v))),
            Value::TimeTicks(v) => put_tlv(buf, TAG_TIMETICKS, &unsigned_bytes(u64::from(*v))),
            Value::Counter64(v) => put_tlv(buf, TAG_COUNTER64, &unsigned_bytes(*v)),
            Value::NoSuchObject => put_tlv(buf, TAG_NO_SUCH_OBJECT, &[]),
            Value::NoSuchInstance => put_tlv(buf, TAG_NO_SUCH_INSTANCE, &[]),
            Value::EndOfMibView => put_tlv(buf, TAG_END_OF_MIB_VIEW, &[]),
            Value::Other { tag, content } => put_tlv(buf, *tag, content),
        }
    }

    fn decode(tag: u8, content: &[u8]) -> SnmpResult<Self> {
        let value = match tag {
            TAG_INTEGER => Value::Integer(decode_integer(content)?),
            TAG_OCTET_STRING => Value::OctetString(content.to_vec()),
            TAG_NULL => Value::Null,
            TAG_OID => Value::ObjectIdentifier(Oid::decode(content)?),
            TAG_IP_ADDRESS => Value::IpAddress(
                content
                    .try_into()
                    .map_err(|_| malformed(format!("IpAddress of {} octets", content.len())))?,
            ),
            TAG_COUNTER32 => Value::Counter32(decode_u32(content)?),
            TAG_GAUGE32 => Value::Gauge32(decode_u32(content)?),
            TAG_TIMETICKS => Value::TimeTicks(decode_u32(content)?),
            TAG_COUNTER64 => Value::Counter64(decode_unsigned(content)?),
            TAG_NO_SUCH_OBJECT => Value::NoSuchObject,
            TAG_NO_SUCH_INSTANCE => Value::NoSuchInstance,
            TAG_END_OF_MIB_VIEW => Value::EndOfMibView,
            other => Value::Other {
                tag: other,
                content: content.to_vec(),
            },
        };
        Ok(value)
    }
}

fn decode_u32(content: &[u8]) -> SnmpResult<u32> {
    u32::try_from(decode_unsigned(content)?).map_err(|_| malformed("32-bit value out of range"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PduKind {
    GetRequest,
    GetResponse,
}

impl PduKind {
    pub fn tag(&self) -> u8 {
        match self {
            PduKind::GetRequest => TAG_GET_REQUEST,
            PduKind::GetResponse => TAG_GET_RESPONSE,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            TAG_GET_REQUEST => Some(PduKind::GetRequest),
            TAG_GET_RESPONSE => Some(PduKind::GetResponse),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarBind {
    pub oid: Oid,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pdu {
    pub kind: PduKind,
    pub request_id: i32,
    pub error_status: i64,
    pub error_index: i64,
    pub varbinds: Vec<VarBind>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub version: i64,
    pub community: Vec<u8>,
    pub pdu: Pdu,
}

impl Message {
    /// A v2c GetRequest for a single OID.
    pub fn get_request(community: &str, request_id: i32, oid: Oid) -> Self {
        Self {
            version: VERSION_2C,
            community: community.as_bytes().to_vec(),
            pdu: Pdu {
                kind: PduKind::GetRequest,
                request_id,
                error_status: 0,
                error_index: 0,
                varbinds: vec![VarBind {
                    oid,
                    value: Value::Null,
                }],
            },
        }
    }

    pub fn encode(&self) -> Bytes {
        let mut varbinds = BytesMut::new();
        for vb in &self.pdu.varbinds {
            let mut inner = BytesMut::new();
            put_tlv(&mut inner, TAG_OID, &vb.oid.encode());
            vb.value.encode(&mut inner);
            put_tlv(&mut varbinds, TAG_SEQUENCE, &inner);
        }

        let mut pdu = BytesMut::new();
        put_tlv(&mut pdu, TAG_INTEGER, &integer_bytes(i64::from(self.pdu.request_id)));
        put_tlv(&mut pdu, TAG_INTEGER, &integer_bytes(self.pdu.error_status));
        put_tlv(&mut pdu, TAG_INTEGER, &integer_bytes(self.pdu.error_index));
        put_tlv(&mut pdu, TAG_SEQUENCE, &varbinds);

        let mut body = BytesMut::new();
        put_tlv(&mut body, TAG_INTEGER, &integer_bytes(self.version));
        put_tlv(&mut body, TAG_OCTET_STRING, &self.community);
        put_tlv(&mut body, self.pdu.kind.tag(), &pdu);

        let mut out = BytesMut::with_capacity(body.len() + 4);
        put_tlv(&mut out, TAG_SEQUENCE, &body);
        out.freeze()
    }

    pub fn decode(buf: &[u8]) -> SnmpResult<Self> {
        let mut outer = Reader::new(buf);
        let mut body = Reader::new(outer.expect(TAG_SEQUENCE)?);
        if !outer.is_empty() {
            return Err(malformed("trailing octets after message"));
        }

        let version = decode_integer(body.expect(TAG_INTEGER)?)?;
        let community = body.expect(TAG_OCTET_STRING)?.to_vec();
        let (tag, pdu_content) = body.read_tlv()?;
        let kind = PduKind::from_tag(tag).ok_or(SnmpError::UnexpectedTag {
            expected: TAG_GET_RESPONSE,
            found: tag,
        })?;

        let mut pdu = Reader::new(pdu_content);
        let request_id = decode_integer(pdu.expect(TAG_INTEGER)?)?;
        let request_id =
            i32::try_from(request_id).map_err(|_| malformed("request-id out of range"))?;
        let error_status = decode_integer(pdu.expect(TAG_INTEGER)?)?;
        let error_index = decode_integer(pdu.expect(TAG_INTEGER)?)?;

        let mut list = Reader::new(pdu.expect(TAG_SEQUENCE)?);
        let mut varbinds = Vec::new();
        while !list.is_empty() {
            let mut vb = Reader::new(list.expect(TAG_SEQUENCE)?);
            let oid = Oid::decode(vb.expect(TAG_OID)?)?;
            let (tag, content) = vb.read_tlv()?;
            varbinds.push(VarBind {
                oid,
                value: Value::decode(tag, content)?,
            });
        }

        Ok(Self {
            version,
            community,
            pdu: Pdu {
                kind,
                request_id,
                error_status,
                error_index,
                varbinds,
            },
        })
    }
}

/// RFC 3416 name for an error-status code.
pub fn error_status_name(status: i64) -> &'static str {
    match status {
        0 => "noError",
        1 => "tooBig",
        2 => "noSuchName",
        3 => "badValue",
        4 => "readOnly",
        5 => "genErr",
        6 => "noAccess",
        16 => "authorizationError",
        _ => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sys_uptime() -> Oid {
        "1.3.6.1.2.1.1.3.0".parse().unwrap()
    }

    #[test]
    fn get_request_wire_format() {
        let msg = Message::get_request("public", 1, sys_uptime());
        let expected: &[u8] = &[
            0x30, 0x26, // message
            0x02, 0x01, 0x01, // version 2c
            0x04, 0x06, b'p', b'u', b'b', b'l', b'i', b'c', // community
            0xa0, 0x19, // GetRequest
            0x02, 0x01, 0x01, // request-id
            0x02, 0x01, 0x00, // error-status
            0x02, 0x01, 0x00, // error-index
            0x30, 0x0e, 0x30, 0x0c, // varbind list, varbind
            0x06, 0x08, 0x2b, 0x06, 0x01, 0x02, 0x01, 0x01, 0x03, 0x00, // name
            0x05, 0x00, // NULL
        ];
        assert_eq!(&msg.encode()[..], expected);
    }

    #[test]
    fn decodes_counter64_response() {
        let oid: Oid = "1.3.6.1.2.1.31.1.1.1.6.15".parse().unwrap();
        let response = Message {
            version: VERSION_2C,
            community: b"public".to_vec(),
            pdu: Pdu {
                kind: PduKind::GetResponse,
                request_id: 4242,
                error_status: 0,
                error_index: 0,
                varbinds: vec![VarBind {
                    oid: oid.clone(),
                    value: Value::Counter64(9_876_543_210_123),
                }],
            },
        };
        let decoded = Message::decode(&response.encode()).unwrap();
        assert_eq!(decoded, response);
        assert_eq!(
            decoded.pdu.varbinds[0].value.as_counter(),
            Some(9_876_543_210_123)
        );
    }

    #[test]
    fn decodes_hand_built_counter32_response() {
        // GetResponse, request-id 7, ifInOctets.5 = Counter32 3_000_000_000.
        let buf: &[u8] = &[
            0x30, 0x2d, 0x02, 0x01, 0x01, 0x04, 0x06, b'p', b'u', b'b', b'l', b'i', b'c', 0xa2,
            0x20, 0x02, 0x01, 0x07, 0x02, 0x01, 0x00, 0x02, 0x01, 0x00, 0x30, 0x15, 0x30, 0x13,
            0x06, 0x0a, 0x2b, 0x06, 0x01, 0x02, 0x01, 0x02, 0x02, 0x01, 0x0a, 0x05, 0x41, 0x05,
            0x00, 0xb2, 0xd0, 0x5e, 0x00,
        ];
        let msg = Message::decode(buf).unwrap();
        assert_eq!(msg.pdu.kind, PduKind::GetResponse);
        assert_eq!(msg.pdu.request_id, 7);
        assert_eq!(msg.pdu.varbinds[0].oid.to_string(), "1.3.6.1.2.1.2.2.1.10.5");
        assert_eq!(msg.pdu.varbinds[0].value, Value::Counter32(3_000_000_000));
    }

    #[test]
    fn exception_values_are_not_counters() {
        for v in [Value::NoSuchObject, Value::NoSuchInstance, Value::EndOfMibView] {
            assert!(v.is_exception());
            assert_eq!(v.as_counter(), None);
        }
        assert_eq!(Value::OctetString(b"eth0".to_vec()).as_counter(), None);
        assert_eq!(Value::Integer(-5).as_counter(), None);
        assert_eq!(Value::Gauge32(12).as_counter(), Some(12));
    }

    #[test]
    fn rejects_unknown_pdu() {
        let mut bytes = Message::get_request("public", 1, sys_uptime()).encode().to_vec();
        // Swap GetRequest for a SetRequest tag.
        bytes[13] = 0xa3;
        let err = Message::decode(&bytes).unwrap_err();
        assert!(matches!(err, SnmpError::UnexpectedTag { found: 0xa3, .. }));
    }

    #[test]
    fn rejects_truncated_message() {
        let bytes = Message::get_request("public", 1, sys_uptime()).encode();
        assert!(Message::decode(&bytes[..bytes.len() - 3]).is_err());
    }

    #[test]
    fn error_status_names() {
        assert_eq!(error_status_name(2), "noSuchName");
        assert_eq!(error_status_name(99), "error");
    }
}

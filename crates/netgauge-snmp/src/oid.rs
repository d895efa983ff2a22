use std::fmt;
use std::str::FromStr;

use crate::error::{malformed, SnmpError, SnmpResult};

/// An object identifier such as `1.3.6.1.2.1.31.1.1.1.6.15`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Oid(Vec<u32>);

impl Oid {
    pub fn arcs(&self) -> &[u32] {
        &self.0
    }

    /// BER content octets (without tag and length).
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.0.len() + 4);
        // Parsing guarantees at least two arcs.
        let first = u64::from(self.0[0]) * 40 + u64::from(self.0[1]);
        put_base128(&mut out, first);
        for arc in &self.0[2..] {
            put_base128(&mut out, u64::from(*arc));
        }
        out
    }

    pub fn decode(content: &[u8]) -> SnmpResult<Self> {
        if content.is_empty() {
            return Err(malformed("empty oid"));
        }
        let mut subids = Vec::new();
        let mut acc: u64 = 0;
        let mut pending = false;
        for b in content {
            acc = (acc << 7) | u64::from(b & 0x7f);
            if acc > u64::from(u32::MAX) + 80 {
                return Err(malformed("oid sub-identifier overflow"));
            }
            pending = b & 0x80 != 0;
            if !pending {
                subids.push(acc);
                acc = 0;
            }
        }
        if pending {
            return Err(malformed("oid ends mid sub-identifier"));
        }

        let first = subids[0];
        let (a, b) = match first {
            0..=39 => (0, first),
            40..=79 => (1, first - 40),
            _ => (2, first - 80),
        };
        let mut arcs = Vec::with_capacity(subids.len() + 1);
        arcs.push(a as u32);
        arcs.push(u32::try_from(b).map_err(|_| malformed("oid second arc overflow"))?);
        for subid in &subids[1..] {
            arcs.push(u32::try_from(*subid).map_err(|_| malformed("oid arc overflow"))?);
        }
        Ok(Oid(arcs))
    }
}

fn put_base128(out: &mut Vec<u8>, mut value: u64) {
    let mut groups = vec![(value & 0x7f) as u8];
    value >>= 7;
    while value > 0 {
        groups.push((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
    out.extend(groups.iter().rev());
}

impl FromStr for Oid {
    type Err = SnmpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('.');
        let arcs = trimmed
            .split('.')
            .map(|part| part.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| SnmpError::InvalidOid(s.to_string()))?;

        let valid = arcs.len() >= 2 && arcs[0] <= 2 && (arcs[0] == 2 || arcs[1] < 40);
        if !valid {
            return Err(SnmpError::InvalidOid(s.to_string()));
        }
        Ok(Oid(arcs))
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arc) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{arc}")?;
        }
        Ok(())
    }
}

//! MAC address type with lenient parsing and canonical formatting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseError;

/// A 48-bit link-layer address.
///
/// Parsing accepts `:` or `-` separators, either letter case, and octets
/// written with a single hex digit (as BSD `arp` prints them). Formatting
/// always yields the canonical form: lowercase, colon-separated, two digits
/// per octet.
///
/// ```
/// use lanscan_core::MacAddress;
///
/// let mac: MacAddress = "AC:DE:48:0:1:2".parse().unwrap();
/// assert_eq!(mac.to_string(), "ac:de:48:00:01:02");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub const fn new(bytes: [u8; 6]) -> Self {
        MacAddress(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Returns true if the locally-administered bit (0x02 of the first
    /// octet) is set. Equivalently, the second hex digit is one of
    /// `2`, `6`, `a`, `e`.
    pub const fn is_locally_administered(&self) -> bool {
        self.0[0] & 0x02 != 0
    }

    /// The organizationally unique identifier, formatted `xx:xx:xx`.
    pub fn oui(&self) -> String {
        format!("{:02x}:{:02x}:{:02x}", self.0[0], self.0[1], self.0[2])
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

impl FromStr for MacAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sep = if s.contains('-') { '-' } else { ':' };
        let parts: Vec<&str> = s.split(sep).collect();
        if parts.len() != 6 {
            return Err(ParseError::invalid_mac(
                s,
                format!("expected 6 octets, found {}", parts.len()),
            ));
        }

        let mut bytes = [0u8; 6];
        for (i, part) in parts.iter().enumerate() {
            if part.is_empty() || part.len() > 2 || !part.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ParseError::invalid_mac(s, format!("bad octet '{part}'")));
            }
            bytes[i] = u8::from_str_radix(part, 16)
                .map_err(|e| ParseError::invalid_mac(s, e.to_string()))?;
        }

        Ok(MacAddress(bytes))
    }
}

impl TryFrom<String> for MacAddress {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.to_string()
    }
}

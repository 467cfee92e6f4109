//! MAC manufacturer lookup and privacy-bit detection.
//!
//! The OUI table ships as a data file (`data/oui.txt`) embedded at compile
//! time and parsed once per process on first use.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use lanscan_core::types::{PRIVATE_MANUFACTURER, UNKNOWN_MANUFACTURER};
use lanscan_core::MacAddress;

const BUILTIN_OUI_DATA: &str = include_str!("../data/oui.txt");

static BUILTIN: Lazy<VendorTable> = Lazy::new(|| VendorTable::from_data(BUILTIN_OUI_DATA));

/// Immutable OUI prefix → manufacturer mapping.
///
/// Keys are lowercase `xx:xx:xx` prefixes.
#[derive(Debug, Clone, Default)]
pub struct VendorTable {
    entries: HashMap<String, String>,
}

impl VendorTable {
    /// The table embedded in the binary.
    pub fn builtin() -> &'static VendorTable {
        &BUILTIN
    }

    /// Build a table from `prefix<TAB>manufacturer` lines.
    ///
    /// Blank lines and `#` comments are skipped, as are lines whose prefix
    /// is not three hex octets. Later duplicates overwrite earlier ones.
    pub fn from_data(data: &str) -> Self {
        let mut entries = HashMap::new();

        for line in data.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((prefix, name)) = line.split_once(char::is_whitespace) else {
                continue;
            };
            let prefix = prefix.to_lowercase();
            let name = name.trim();
            if !is_oui_prefix(&prefix) || name.is_empty() {
                tracing::warn!(line = %line, "Skipping malformed OUI table line");
                continue;
            }
            entries.insert(prefix, name.to_string());
        }

        Self { entries }
    }

    /// Look up a manufacturer by `xx:xx:xx` prefix (any case).
    pub fn lookup(&self, prefix: &str) -> Option<&str> {
        self.entries
            .get(&prefix.to_lowercase())
            .map(String::as_str)
    }

    pub fn lookup_mac(&self, mac: &MacAddress) -> Option<&str> {
        self.lookup(&mac.oui())
    }

    /// Three-tier manufacturer resolution: table hit, else the private
    /// placeholder for locally-administered addresses, else "Unknown".
    pub fn manufacturer_for(&self, mac: &MacAddress) -> String {
        if let Some(name) = self.lookup_mac(mac) {
            name.to_string()
        } else if mac.is_locally_administered() {
            PRIVATE_MANUFACTURER.to_string()
        } else {
            UNKNOWN_MANUFACTURER.to_string()
        }
    }
}

fn is_oui_prefix(s: &str) -> bool {
    let parts: Vec<&str> = s.split(':').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| p.len() == 2 && p.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Resolve the manufacturer of `mac` from the built-in table.
///
/// Returns `None` for unknown prefixes and for strings that are not a MAC.
pub fn resolve_vendor(mac: &str) -> Option<&'static str> {
    let mac: MacAddress = mac.parse().ok()?;
    VendorTable::builtin().lookup_mac(&mac)
}

/// True when the second hex digit of the first octet is `2`, `6`, `a`, or
/// `e` (the locally-administered bit). Strings that are not a MAC are not
/// private.
pub fn is_private_mac(mac: &str) -> bool {
    mac.parse::<MacAddress>()
        .map(|m| m.is_locally_administered())
        .unwrap_or(false)
}

//! ARP table text parsing.
//!
//! `arp -a` prints one entry per line, but the shape differs by platform.
//! Each known shape is a [`LineFormat`]; formats are tried in order and the
//! first match classifies the line. Every line ends up as one of
//! [`LineOutcome::Entry`], [`LineOutcome::Dropped`] (recognized but not a
//! device), or [`LineOutcome::Unrecognized`].

use std::net::Ipv4Addr;

use once_cell::sync::Lazy;
use regex::Regex;

use lanscan_core::MacAddress;

/// One usable row of the ARP cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCacheEntry {
    pub ip: Ipv4Addr,
    pub mac: MacAddress,
    pub interface_name: String,
    pub complete: bool,
}

/// Why a recognized line produced no entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Resolution never finished; the MAC column holds a placeholder.
    Incomplete,
    /// 224.x or 239.x: protocol artifacts, not devices.
    Multicast,
    /// IP or MAC column failed to parse.
    MalformedAddress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Entry(RawCacheEntry),
    Dropped(DropReason),
    Unrecognized,
}

/// A platform-specific line shape.
pub struct LineFormat {
    pub name: &'static str,
    pattern: Regex,
    incomplete_marker: &'static str,
}

impl LineFormat {
    fn new(name: &'static str, pattern: &str, incomplete_marker: &'static str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("Invalid regex pattern"),
            incomplete_marker,
        }
    }

    /// Classify `line`, or `None` if this format does not recognize it.
    pub fn classify(&self, line: &str) -> Option<LineOutcome> {
        let caps = self.pattern.captures(line)?;
        let mac_text = &caps["mac"];

        if mac_text == self.incomplete_marker {
            return Some(LineOutcome::Dropped(DropReason::Incomplete));
        }

        let Ok(ip) = caps["ip"].parse::<Ipv4Addr>() else {
            return Some(LineOutcome::Dropped(DropReason::MalformedAddress));
        };
        if is_multicast_artifact(ip) {
            return Some(LineOutcome::Dropped(DropReason::Multicast));
        }

        let Ok(mac) = mac_text.parse::<MacAddress>() else {
            return Some(LineOutcome::Dropped(DropReason::MalformedAddress));
        };

        Some(LineOutcome::Entry(RawCacheEntry {
            ip,
            mac,
            interface_name: caps["iface"].to_string(),
            complete: true,
        }))
    }
}

/// BSD/macOS: `? (192.168.1.10) at ac:de:48:0:11:22 on en0 ifscope [ethernet]`
const BSD_PATTERN: &str = r"^\S+\s+\((?P<ip>\d{1,3}(?:\.\d{1,3}){3})\)\s+at\s+(?P<mac>\(incomplete\)|[0-9A-Fa-f:]+)\s+on\s+(?P<iface>\S+)(?:\s.*)?$";

/// Linux net-tools: `router (192.168.1.1) at aa:bb:cc:dd:ee:ff [ether] on eth0`
const LINUX_PATTERN: &str = r"^\S+\s+\((?P<ip>\d{1,3}(?:\.\d{1,3}){3})\)\s+at\s+(?P<mac><incomplete>|[0-9A-Fa-f:]+)(?:\s+\[\w+\])?(?:\s+PERM)?\s+on\s+(?P<iface>\S+)\s*$";

static FORMATS: Lazy<Vec<LineFormat>> = Lazy::new(|| {
    vec![
        LineFormat::new("bsd", BSD_PATTERN, "(incomplete)"),
        LineFormat::new("linux", LINUX_PATTERN, "<incomplete>"),
    ]
});

/// The known line formats, in the order they are tried.
pub fn formats() -> &'static [LineFormat] {
    &FORMATS
}

fn is_multicast_artifact(ip: Ipv4Addr) -> bool {
    matches!(ip.octets()[0], 224 | 239)
}

/// Classify a single line against every known format.
pub fn parse_line(line: &str) -> LineOutcome {
    let line = line.trim();
    formats()
        .iter()
        .find_map(|f| f.classify(line))
        .unwrap_or(LineOutcome::Unrecognized)
}

/// Per-call tally of what the parser saw.
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    pub entries: Vec<RawCacheEntry>,
    pub incomplete: usize,
    pub multicast: usize,
    pub malformed: usize,
    pub unrecognized: Vec<String>,
}

/// Parse raw ARP output, keeping counts of dropped and unrecognized lines.
/// Blank lines are ignored. Entry order follows input order.
pub fn parse_arp_table_detailed(text: &str) -> ParseReport {
    let mut report = ParseReport::default();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            LineOutcome::Entry(entry) => report.entries.push(entry),
            LineOutcome::Dropped(DropReason::Incomplete) => report.incomplete += 1,
            LineOutcome::Dropped(DropReason::Multicast) => report.multicast += 1,
            LineOutcome::Dropped(DropReason::MalformedAddress) => report.malformed += 1,
            LineOutcome::Unrecognized => {
                tracing::debug!(line = %line.trim(), "Unrecognized ARP table line");
                report.unrecognized.push(line.trim().to_string());
            }
        }
    }

    report
}

/// Parse raw ARP output into usable entries. Never fails.
pub fn parse_arp_table(text: &str) -> Vec<RawCacheEntry> {
    parse_arp_table_detailed(text).entries
}

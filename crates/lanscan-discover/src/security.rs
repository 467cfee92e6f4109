//! Rule-based security flagging of discovered devices.
//!
//! Rules inspect the resolved manufacturer only and are evaluated in order;
//! the first match flags the device. Devices matching no rule are left out
//! of the report.

use lanscan_core::types::{
    Device, FlaggedDevice, RiskCounts, RiskLevel, SecurityReport, PRIVATE_MANUFACTURER,
    UNKNOWN_MANUFACTURER,
};

#[derive(Debug, Clone, Copy)]
enum ManufacturerMatch {
    Contains(&'static str),
    Exactly(&'static str),
}

impl ManufacturerMatch {
    fn matches(self, manufacturer: &str) -> bool {
        match self {
            Self::Contains(needle) => manufacturer.contains(needle),
            Self::Exactly(value) => manufacturer == value,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    matcher: ManufacturerMatch,
    risk: RiskLevel,
    reason: &'static str,
}

const RULES: &[Rule] = &[
    Rule {
        matcher: ManufacturerMatch::Contains("Xiaomi"),
        risk: RiskLevel::Medium,
        reason: "may phone home to external servers",
    },
    Rule {
        matcher: ManufacturerMatch::Contains("China"),
        risk: RiskLevel::High,
        reason: "manufacturer requires verification",
    },
    Rule {
        matcher: ManufacturerMatch::Exactly(PRIVATE_MANUFACTURER),
        risk: RiskLevel::Low,
        reason: "identity obscured by randomization",
    },
    Rule {
        matcher: ManufacturerMatch::Exactly(UNKNOWN_MANUFACTURER),
        risk: RiskLevel::Medium,
        reason: "unrecognized manufacturer",
    },
];

/// Static advice attached to every report.
pub const RECOMMENDATIONS: &[&str] = &[
    "Move IoT and unverified devices to an isolated guest or IoT network",
    "Review unknown devices and remove any you do not recognize",
    "Keep device firmware up to date",
    "Disable UPnP on the router unless it is required",
    "Use WPA3 (or WPA2-AES) with a strong passphrase",
];

/// Flag a single device, or `None` if no rule applies.
pub fn flag_device(device: &Device) -> Option<FlaggedDevice> {
    let manufacturer = device.manufacturer.as_deref()?;
    let rule = RULES.iter().find(|r| r.matcher.matches(manufacturer))?;

    Some(FlaggedDevice {
        device: device.clone(),
        flag_reason: rule.reason.to_string(),
        risk_level: rule.risk,
    })
}

/// Classify `devices`, returning the flagged subset with counts and the
/// standard recommendations.
pub fn classify(devices: &[Device]) -> SecurityReport {
    let flagged: Vec<FlaggedDevice> = devices.iter().filter_map(flag_device).collect();

    let mut by_risk = RiskCounts::default();
    for f in &flagged {
        match f.risk_level {
            RiskLevel::High => by_risk.high += 1,
            RiskLevel::Medium => by_risk.medium += 1,
            RiskLevel::Low => by_risk.low += 1,
        }
    }

    SecurityReport {
        total_devices: devices.len() as u32,
        flagged_count: flagged.len() as u32,
        by_risk,
        flagged,
        recommendations: RECOMMENDATIONS.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::Ipv4Addr;

    use chrono::Utc;

    fn device(last_octet: u8, manufacturer: Option<&str>) -> Device {
        Device {
            ip: Ipv4Addr::new(192, 168, 1, last_octet),
            mac: format!("00:00:01:00:00:{last_octet:02x}").parse().unwrap(),
            manufacturer: manufacturer.map(String::from),
            hostname: None,
            last_seen: Utc::now(),
        }
    }

    #[test]
    fn test_rule_levels() {
        let cases = [
            ("Xiaomi Communications", RiskLevel::Medium, "may phone home to external servers"),
            ("Tuya Smart (China)", RiskLevel::High, "manufacturer requires verification"),
            (PRIVATE_MANUFACTURER, RiskLevel::Low, "identity obscured by randomization"),
            (UNKNOWN_MANUFACTURER, RiskLevel::Medium, "unrecognized manufacturer"),
        ];

        for (manufacturer, risk, reason) in cases {
            let flagged = flag_device(&device(1, Some(manufacturer))).unwrap();
            assert_eq!(flagged.risk_level, risk, "{manufacturer}");
            assert_eq!(flagged.flag_reason, reason);
        }
    }

    #[test]
    fn test_xiaomi_rule_precedes_china_rule() {
        let flagged = flag_device(&device(1, Some("Xiaomi (Beijing, China)"))).unwrap();
        assert_eq!(flagged.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_placeholders_match_exactly() {
        assert!(flag_device(&device(1, Some("Unknown Corp"))).is_none());
        assert!(flag_device(&device(1, Some("Apple"))).is_none());
        assert!(flag_device(&device(1, None)).is_none());
    }

    #[test]
    fn test_classify_counts() {
        let devices = vec![
            device(1, Some("Apple")),
            device(2, Some("Xiaomi Communications")),
            device(3, Some("Hangzhou Hikvision Digital Technology (China)")),
            device(4, Some(UNKNOWN_MANUFACTURER)),
            device(5, Some(PRIVATE_MANUFACTURER)),
        ];
        let report = classify(&devices);

        assert_eq!(report.total_devices, 5);
        assert_eq!(report.flagged_count, 4);
        assert_eq!(
            report.by_risk,
            RiskCounts {
                high: 1,
                medium: 2,
                low: 1
            }
        );
        assert_eq!(report.recommendations.len(), RECOMMENDATIONS.len());
    }

    #[test]
    fn test_classify_empty() {
        let report = classify(&[]);
        assert_eq!(report.flagged_count, 0);
        assert!(report.flagged.is_empty());
        assert!(!report.recommendations.is_empty());
    }
}

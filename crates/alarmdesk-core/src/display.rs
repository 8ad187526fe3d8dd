// ── Alarm display formatter ──
//
// Pure functions deriving labels and colors from an `AlarmRecord`.
// Catalog lookups that miss are configuration defects and panic.

use std::fmt;

use crate::model::{AlarmRecord, AlarmSeverity, AlarmStatus, DisplayUser};

// ── Color ────────────────────────────────────────────────────────────

/// A display color, either fixed RGB or HSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Rgb(u8, u8, u8),
    /// Hue in degrees `0..360`, saturation and lightness in percent.
    Hsl { hue: u16, saturation: u8, lightness: u8 },
}

impl Color {
    /// Convert to 8-bit RGB for terminals.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Rgb(r, g, b) => (r, g, b),
            Self::Hsl {
                hue,
                saturation,
                lightness,
            } => {
                let s = f64::from(saturation.min(100)) / 100.0;
                let l = f64::from(lightness.min(100)) / 100.0;
                let h = f64::from(hue % 360) / 60.0;

                let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
                let x = c * (1.0 - (h % 2.0 - 1.0).abs());
                let m = l - c / 2.0;

                let (r, g, b) = match h as u8 {
                    0 => (c, x, 0.0),
                    1 => (x, c, 0.0),
                    2 => (0.0, c, x),
                    3 => (0.0, x, c),
                    4 => (x, 0.0, c),
                    _ => (c, 0.0, x),
                };
                let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
                (channel(r), channel(g), channel(b))
            }
        }
    }

    /// CSS notation: `#rrggbb` or `hsl(h, s%, l%)`.
    pub fn to_css(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            Self::Hsl {
                hue,
                saturation,
                lightness,
            } => write!(f, "hsl({hue}, {saturation}%, {lightness}%)"),
        }
    }
}

// ── Translations ─────────────────────────────────────────────────────

/// Resolves translation keys to display strings.
pub trait Translations: Send + Sync {
    fn translate(&self, key: &str) -> Option<String>;
}

/// Built-in English catalog covering every key the alarm table uses.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishCatalog;

impl Translations for EnglishCatalog {
    fn translate(&self, key: &str) -> Option<String> {
        let text = match key {
            "alarm.severity-CRITICAL" => "Critical",
            "alarm.severity-MAJOR" => "Major",
            "alarm.severity-MINOR" => "Minor",
            "alarm.severity-WARNING" => "Warning",
            "alarm.severity-INDETERMINATE" => "Indeterminate",
            "alarm.search-status.ACTIVE_UNACK" => "Active Unacknowledged",
            "alarm.search-status.ACTIVE_ACK" => "Active Acknowledged",
            "alarm.search-status.CLEARED_UNACK" => "Cleared Unacknowledged",
            "alarm.search-status.CLEARED_ACK" => "Cleared Acknowledged",
            "alarm.search-status.ANY" => "Any",
            "alarm.search-status.ACTIVE" => "Active",
            "alarm.search-status.CLEARED" => "Cleared",
            "alarm.search-status.ACK" => "Acknowledged",
            "alarm.search-status.UNACK" => "Unacknowledged",
            "alarm.created-time" => "Created time",
            "alarm.originator" => "Originator",
            "alarm.type" => "Type",
            "alarm.severity" => "Severity",
            "alarm.assignee" => "Assignee",
            "alarm.status" => "Status",
            "alarm.unassigned" => "Unassigned",
            "alarm.details" => "Details",
            "alarm.assign" => "Assign",
            _ => return None,
        };
        Some(text.to_owned())
    }
}

/// Look up `key`, panicking on a miss.
pub fn translate_required(catalog: &dyn Translations, key: &str) -> String {
    catalog
        .translate(key)
        .unwrap_or_else(|| panic!("translation catalog has no entry for `{key}`"))
}

pub fn severity_key(severity: AlarmSeverity) -> String {
    format!("alarm.severity-{severity}")
}

pub fn status_key(status: AlarmStatus) -> String {
    format!("alarm.search-status.{status}")
}

// ── Severity / status ────────────────────────────────────────────────

pub fn severity_label(record: &AlarmRecord, catalog: &dyn Translations) -> String {
    translate_required(catalog, &severity_key(record.severity))
}

pub fn severity_color(record: &AlarmRecord) -> Color {
    severity_color_of(record.severity)
}

pub fn severity_color_of(severity: AlarmSeverity) -> Color {
    match severity {
        AlarmSeverity::Critical => Color::Rgb(0xff, 0x00, 0x00),
        AlarmSeverity::Major => Color::Rgb(0xff, 0xa5, 0x00),
        AlarmSeverity::Minor => Color::Rgb(0xff, 0xca, 0x3d),
        AlarmSeverity::Warning => Color::Rgb(0xab, 0xab, 0x00),
        AlarmSeverity::Indeterminate => Color::Rgb(0x00, 0x80, 0x00),
    }
}

pub fn status_label(record: &AlarmRecord, catalog: &dyn Translations) -> String {
    translate_required(catalog, &status_key(record.status))
}

// ── Assignee ─────────────────────────────────────────────────────────

/// "First Last" from the non-empty name parts, else the email verbatim.
/// Empty when the alarm is unassigned.
pub fn assignee_display_name(record: &AlarmRecord) -> String {
    record
        .assignee
        .as_ref()
        .map(|a| display_name(&a.display_user()))
        .unwrap_or_default()
}

/// Upper-cased initials of the assignee, empty when nothing is known.
pub fn assignee_initials(record: &AlarmRecord) -> String {
    record
        .assignee
        .as_ref()
        .map(|a| initials(&a.display_user()))
        .unwrap_or_default()
}

/// Avatar background derived from the assignee display name.
pub fn avatar_color(record: &AlarmRecord) -> Color {
    string_to_hsl(&assignee_display_name(record), 40, 60)
}

pub fn display_name(user: &DisplayUser) -> String {
    if !user.has_name() {
        return user.email.clone();
    }
    [user.first_name.as_str(), user.last_name.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn initials(user: &DisplayUser) -> String {
    let first_char = |s: &str| s.chars().next();
    let chars: Vec<char> = if user.has_name() {
        [first_char(&user.first_name), first_char(&user.last_name)]
            .into_iter()
            .flatten()
            .collect()
    } else {
        first_char(&user.email).into_iter().collect()
    };
    chars.into_iter().flat_map(char::to_uppercase).collect()
}

// ── Hashing ──────────────────────────────────────────────────────────

/// Stable string hash: `hash = unit + (hash << 5) - hash` over UTF-16 code
/// units, with the shift applied to the low 32 bits.
pub fn string_hash(text: &str) -> i64 {
    text.encode_utf16().fold(0_i64, |hash, unit| {
        #[allow(clippy::cast_possible_truncation)]
        let shifted = i64::from((hash as i32).wrapping_shl(5));
        i64::from(unit).wrapping_add(shifted).wrapping_sub(hash)
    })
}

/// Map `text` to a hue in `0..360` with fixed saturation and lightness.
pub fn string_to_hsl(text: &str, saturation: u8, lightness: u8) -> Color {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let hue = string_hash(text).rem_euclid(360) as u16;
    Color::Hsl {
        hue,
        saturation,
        lightness,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Assignee, EntityId, EntityType};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;
    use uuid::Uuid;

    fn record(assignee: Option<(&str, &str, &str)>) -> AlarmRecord {
        AlarmRecord {
            id: Uuid::from_u128(1),
            created_time: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
            originator: EntityId::new(EntityType::Device, Uuid::from_u128(2)),
            originator_name: Some("Thermostat A".into()),
            originator_label: None,
            customer_id: None,
            alarm_type: "High Temperature".into(),
            severity: AlarmSeverity::Critical,
            status: AlarmStatus::ActiveUnack,
            start_time: None,
            end_time: None,
            ack_time: None,
            clear_time: None,
            assignee: assignee.map(|(first, last, email)| Assignee {
                id: Uuid::from_u128(3),
                first_name: Some(first.to_owned()),
                last_name: Some(last.to_owned()),
                email: Some(email.to_owned()),
            }),
            details: None,
        }
    }

    struct EmptyCatalog;

    impl Translations for EmptyCatalog {
        fn translate(&self, _key: &str) -> Option<String> {
            None
        }
    }

    #[test]
    fn every_severity_has_label_and_color() {
        for severity in AlarmSeverity::iter() {
            let r = AlarmRecord {
                severity,
                ..record(None)
            };
            assert!(!severity_label(&r, &EnglishCatalog).is_empty());
            assert!(!severity_color(&r).to_css().is_empty());
        }
    }

    #[test]
    fn every_status_has_label() {
        for status in AlarmStatus::iter() {
            let r = AlarmRecord {
                status,
                ..record(None)
            };
            assert!(!status_label(&r, &EnglishCatalog).is_empty());
        }
        let r = AlarmRecord {
            status: AlarmStatus::ClearedAck,
            ..record(None)
        };
        assert_eq!(status_label(&r, &EnglishCatalog), "Cleared Acknowledged");
    }

    #[test]
    #[should_panic(expected = "alarm.severity-CRITICAL")]
    fn catalog_miss_panics() {
        let _ = severity_label(&record(None), &EmptyCatalog);
    }

    #[test]
    fn severity_colors_render_as_css() {
        assert_eq!(severity_color_of(AlarmSeverity::Critical).to_css(), "#ff0000");
        assert_eq!(severity_color_of(AlarmSeverity::Major).to_css(), "#ffa500");
        assert_eq!(severity_color_of(AlarmSeverity::Indeterminate).to_css(), "#008000");
    }

    #[test]
    fn display_name_joins_present_parts() {
        assert_eq!(assignee_display_name(&record(Some(("Ada", "Lovelace", "ada@x.com")))), "Ada Lovelace");
        assert_eq!(assignee_display_name(&record(Some(("Ada", "", "ada@x.com")))), "Ada");
        assert_eq!(assignee_display_name(&record(Some(("", "Hopper", "g@x.com")))), "Hopper");
        assert_eq!(assignee_display_name(&record(Some(("", "", "a@x.com")))), "a@x.com");
        assert_eq!(assignee_display_name(&record(None)), "");
    }

    #[test]
    fn initials_from_names_or_email() {
        assert_eq!(assignee_initials(&record(Some(("Ada", "Lovelace", "")))), "AL");
        assert_eq!(assignee_initials(&record(Some(("ada", "", "")))), "A");
        assert_eq!(assignee_initials(&record(Some(("", "", "bob@x.com")))), "B");
        assert_eq!(assignee_initials(&record(Some(("", "", "")))), "");
        assert_eq!(assignee_initials(&record(None)), "");
    }

    #[test]
    fn missing_name_fields_degrade_to_email() {
        let mut r = record(None);
        r.assignee = Some(Assignee {
            id: Uuid::from_u128(9),
            first_name: None,
            last_name: None,
            email: Some("ops@x.com".into()),
        });
        assert_eq!(assignee_display_name(&r), "ops@x.com");
        assert_eq!(assignee_initials(&r), "O");
    }

    #[test]
    fn string_hash_matches_known_values() {
        assert_eq!(string_hash(""), 0);
        assert_eq!(string_to_hsl("", 40, 60).to_css(), "hsl(0, 40%, 60%)");
        assert_eq!(string_to_hsl("Ada Lovelace", 40, 60).to_css(), "hsl(307, 40%, 60%)");
        assert_eq!(string_to_hsl("Ada", 40, 60).to_css(), "hsl(142, 40%, 60%)");
        assert_eq!(string_to_hsl("bob@x.com", 40, 60).to_css(), "hsl(328, 40%, 60%)");
        assert_eq!(string_to_hsl("Grace Hopper", 40, 60).to_css(), "hsl(44, 40%, 60%)");
    }

    #[test]
    fn avatar_color_is_pure() {
        let ada = record(Some(("Ada", "Lovelace", "")));
        let grace = record(Some(("Grace", "Hopper", "")));
        assert_eq!(avatar_color(&ada), avatar_color(&ada));
        assert_ne!(avatar_color(&ada), avatar_color(&grace));
        assert!(matches!(
            avatar_color(&ada),
            Color::Hsl {
                saturation: 40,
                lightness: 60,
                ..
            }
        ));
    }

    #[test]
    fn hsl_converts_to_rgb() {
        let gray_red = Color::Hsl {
            hue: 0,
            saturation: 40,
            lightness: 60,
        };
        assert_eq!(gray_red.to_rgb(), (194, 112, 112));
        assert_eq!(Color::Rgb(1, 2, 3).to_rgb(), (1, 2, 3));
        let green = Color::Hsl {
            hue: 120,
            saturation: 100,
            lightness: 25,
        };
        assert_eq!(green.to_rgb(), (0, 128, 0));
    }
}

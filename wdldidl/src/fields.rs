//! Conversion tolérante des champs texte DIDL-Lite

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Valeur typée, ou texte brut quand la conversion échoue
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<T> {
    Typed(T),
    Raw(String),
}

impl<T: FromStr> FieldValue<T> {
    /// Conversion via `FromStr`, espaces ignorés
    pub fn parse(raw: &str) -> Self {
        Self::parse_with(raw, |s| s.parse().ok())
    }
}

impl<T> FieldValue<T> {
    pub fn parse_with<F>(raw: &str, f: F) -> Self
    where
        F: FnOnce(&str) -> Option<T>,
    {
        match f(raw.trim()) {
            Some(value) => FieldValue::Typed(value),
            None => FieldValue::Raw(raw.to_string()),
        }
    }

    pub fn typed(&self) -> Option<&T> {
        match self {
            FieldValue::Typed(value) => Some(value),
            FieldValue::Raw(_) => None,
        }
    }

    pub fn into_typed(self) -> Option<T> {
        match self {
            FieldValue::Typed(value) => Some(value),
            FieldValue::Raw(_) => None,
        }
    }

    pub fn is_typed(&self) -> bool {
        matches!(self, FieldValue::Typed(_))
    }
}

impl<T: fmt::Display> fmt::Display for FieldValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Typed(value) => value.fmt(f),
            FieldValue::Raw(raw) => f.write_str(raw),
        }
    }
}

/// Parse une durée DIDL `H+:MM:SS[.F+]` (ex: `0:03:45.000`)
///
/// La forme fractionnaire `F0/F1` n'est pas gérée.
pub fn parse_didl_duration(raw: &str) -> Option<Duration> {
    let mut parts = raw.split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds = parts.next()?;
    if parts.next().is_some() || minutes >= 60 {
        return None;
    }

    let (secs, fraction) = match seconds.split_once('.') {
        Some((secs, fraction)) => (secs, Some(fraction)),
        None => (seconds, None),
    };
    let secs: u64 = secs.parse().ok()?;
    if secs >= 60 {
        return None;
    }

    let nanos = match fraction {
        None => 0,
        Some(f) if !f.is_empty() && f.len() <= 9 && f.bytes().all(|b| b.is_ascii_digit()) => {
            let value: u32 = f.parse().ok()?;
            value * 10u32.pow(9 - f.len() as u32)
        }
        Some(_) => return None,
    };

    // Un nombre d'heures démesuré retombe sur le texte brut
    let total = hours.checked_mul(3600)?.checked_add(minutes * 60 + secs)?;
    Some(Duration::new(total, nanos))
}

/// Parse une résolution `LARGEURxHAUTEUR` (ex: `1920x1080`)
pub fn parse_resolution(raw: &str) -> Option<(u32, u32)> {
    let (width, height) = raw.split_once(|c: char| c == 'x' || c == 'X')?;
    Some((width.trim().parse().ok()?, height.trim().parse().ok()?))
}

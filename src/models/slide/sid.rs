use std::fmt;

use crate::models::record::RecordStore;

use super::registry::SlideRegistry;
use super::types::{Sid, Slide, SlideError, SlideKind};

/// Plain decimal digits without sign or leading zeros, so a SID has exactly
/// one spelling and scoped overlays can compare SID strings.
fn is_canonical_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) && (id == "0" || !id.starts_with('0'))
}

impl Sid {
    /// Parse `"<key>-<id>"` or `"<key>"`. Any other segment count is malformed,
    /// as are empty segments and non-numeric ids.
    pub fn parse(sid: &str) -> Result<Sid, SlideError> {
        let malformed = || SlideError::Malformed(sid.to_string());
        let segments: Vec<&str> = sid.split('-').collect();
        match segments.as_slice() {
            [key] if !key.is_empty() => Ok(Sid::Function {
                key: key.to_string(),
            }),
            [key, id] if !key.is_empty() => {
                if !is_canonical_id(id) {
                    return Err(malformed());
                }
                let id = id.parse::<i64>().map_err(|_| malformed())?;
                Ok(Sid::Model {
                    key: key.to_string(),
                    id,
                })
            }
            _ => Err(malformed()),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Sid::Model { key, .. } | Sid::Function { key } => key,
        }
    }
}

impl fmt::Display for Sid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sid::Model { key, id } => write!(f, "{key}-{id}"),
            Sid::Function { key } => write!(f, "{key}"),
        }
    }
}

/// Resolve a SID to its slide.
///
/// Model SIDs fetch the record and convert it; function SIDs invoke the
/// registered resolver. A SID whose shape does not match the registered kind
/// is malformed.
pub fn resolve(
    registry: &SlideRegistry,
    records: &dyn RecordStore,
    sid: &str,
) -> Result<Slide, SlideError> {
    let parsed = Sid::parse(sid)?;
    let descriptor = registry
        .lookup(parsed.key())
        .ok_or_else(|| SlideError::NotFound(format!("key '{}'", parsed.key())))?;

    match (&parsed, &descriptor.kind) {
        (Sid::Model { id, .. }, SlideKind::Model { model }) => {
            let record = records
                .fetch(model.name, *id)?
                .ok_or_else(|| SlideError::NotFound(format!("{} {id}", model.name)))?;
            Ok((model.to_slide)(&record))
        }
        (Sid::Function { .. }, SlideKind::Function { resolver, .. }) => Ok((**resolver)()),
        _ => Err(SlideError::Malformed(sid.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bare_key() {
        assert_eq!(
            Sid::parse("agenda").unwrap(),
            Sid::Function { key: "agenda".into() }
        );
    }

    #[test]
    fn parse_model_sid() {
        let sid = Sid::parse("motion-42").unwrap();
        assert_eq!(sid, Sid::Model { key: "motion".into(), id: 42 });
        assert_eq!(sid.to_string(), "motion-42");
    }

    #[test]
    fn parse_round_trips_canonical_ids() {
        for sid in ["motion-0", "motion-7", "item-9223372036854775807"] {
            assert_eq!(Sid::parse(sid).unwrap().to_string(), sid);
        }
    }

    #[test]
    fn parse_rejects_bad_segment_counts() {
        for bad in ["", "a-b-c", "motion-1-2", "-", "--", "-5", "motion-", "motion-abc"] {
            assert!(
                matches!(Sid::parse(bad), Err(SlideError::Malformed(_))),
                "{bad:?} should be malformed"
            );
        }
    }

    #[test]
    fn parse_rejects_alternate_id_spellings() {
        for bad in ["motion-+7", "motion-007", "motion- 7", "motion-7 ", "motion-٧"] {
            assert!(
                matches!(Sid::parse(bad), Err(SlideError::Malformed(_))),
                "{bad:?} should be malformed"
            );
        }
    }
}

//! Raw envelope → [`Notification`].

use crate::bus::{PayloadValue, RawEnvelope};

use super::error::DecodeError;
use super::types::Notification;

/// Decodes a raw envelope.
///
/// Shapes follow the Thumbnailer1 signals:
/// - `Ready(u handle, as uris)`
/// - `Error(u handle, as uris, i code, s message)`
/// - `Finished(u handle)`
///
/// Trailing arguments beyond the expected shape are ignored. Every other
/// signal name (including `Started`) decodes to [`Notification::Unknown`].
pub fn decode(envelope: &RawEnvelope) -> Result<Notification, DecodeError> {
    let args = Args {
        kind: &envelope.kind,
        payload: &envelope.payload,
    };

    match envelope.kind.as_str() {
        "Ready" => Ok(Notification::Ready {
            handle: args.u32(0)?,
            uris: args.strings(1)?,
        }),
        "Error" => Ok(Notification::Error {
            handle: args.u32(0)?,
            uris: args.strings(1)?,
            code: args.i32(2)?,
            message: args.string(3)?,
        }),
        "Finished" => Ok(Notification::Finished {
            handle: args.u32(0)?,
        }),
        other => Ok(Notification::Unknown {
            kind: other.to_string(),
        }),
    }
}

struct Args<'a> {
    kind: &'a str,
    payload: &'a [PayloadValue],
}

impl Args<'_> {
    fn get(&self, index: usize, expected: &'static str) -> Result<&PayloadValue, DecodeError> {
        self.payload
            .get(index)
            .ok_or_else(|| DecodeError::MissingField {
                kind: self.kind.to_string(),
                index,
                expected,
            })
    }

    fn wrong_type(&self, index: usize, expected: &'static str, found: &PayloadValue) -> DecodeError {
        DecodeError::WrongType {
            kind: self.kind.to_string(),
            index,
            expected,
            found: found.type_name(),
        }
    }

    fn u32(&self, index: usize) -> Result<u32, DecodeError> {
        match self.get(index, "u32")? {
            PayloadValue::U32(n) => Ok(*n),
            other => Err(self.wrong_type(index, "u32", other)),
        }
    }

    fn i32(&self, index: usize) -> Result<i32, DecodeError> {
        match self.get(index, "i32")? {
            PayloadValue::I32(n) => Ok(*n),
            other => Err(self.wrong_type(index, "i32", other)),
        }
    }

    fn string(&self, index: usize) -> Result<String, DecodeError> {
        match self.get(index, "string")? {
            PayloadValue::Str(s) => Ok(s.clone()),
            other => Err(self.wrong_type(index, "string", other)),
        }
    }

    fn strings(&self, index: usize) -> Result<Vec<String>, DecodeError> {
        match self.get(index, "string array")? {
            PayloadValue::StrArray(items) => Ok(items.clone()),
            other => Err(self.wrong_type(index, "string array", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ready() {
        let notification = decode(&RawEnvelope::ready(7, &["file:///tmp/a.png"])).unwrap();
        assert_eq!(
            notification,
            Notification::Ready {
                handle: 7,
                uris: vec!["file:///tmp/a.png".to_string()],
            }
        );
    }

    #[test]
    fn test_decode_error() {
        let envelope = RawEnvelope::error(3, &["file:///tmp/a.xyz"], -1, "No thumbnailer");
        match decode(&envelope).unwrap() {
            Notification::Error {
                handle,
                code,
                message,
                uris,
            } => {
                assert_eq!(handle, 3);
                assert_eq!(code, -1);
                assert_eq!(message, "No thumbnailer");
                assert_eq!(uris.len(), 1);
            }
            other => panic!("expected Error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_finished() {
        assert_eq!(
            decode(&RawEnvelope::finished(9)).unwrap(),
            Notification::Finished { handle: 9 }
        );
    }

    #[test]
    fn test_decode_unknown_kind_is_passed_through() {
        assert_eq!(
            decode(&RawEnvelope::started(1)).unwrap(),
            Notification::Unknown {
                kind: "Started".to_string()
            }
        );
        let odd = RawEnvelope::new("PropertiesChanged", vec![]);
        assert!(matches!(
            decode(&odd).unwrap(),
            Notification::Unknown { .. }
        ));
    }

    #[test]
    fn test_decode_error_missing_message() {
        let envelope = RawEnvelope::new(
            "Error",
            vec![
                PayloadValue::U32(3),
                PayloadValue::StrArray(vec![]),
                PayloadValue::I32(1),
            ],
        );
        let err = decode(&envelope).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingField {
                kind: "Error".to_string(),
                index: 3,
                expected: "string",
            }
        );
    }

    #[test]
    fn test_decode_wrong_handle_type() {
        let envelope = RawEnvelope::new(
            "Ready",
            vec![
                PayloadValue::Str("7".to_string()),
                PayloadValue::StrArray(vec![]),
            ],
        );
        let err = decode(&envelope).unwrap_err();
        assert!(matches!(err, DecodeError::WrongType { index: 0, .. }));
        assert_eq!(err.kind(), "Ready");
        assert_eq!(err.to_string(), "Ready: argument 0 should be u32, got string");
    }

    #[test]
    fn test_decode_empty_finished_payload() {
        let err = decode(&RawEnvelope::new("Finished", vec![])).unwrap_err();
        assert!(matches!(err, DecodeError::MissingField { index: 0, .. }));
    }

    #[test]
    fn test_decode_tolerates_trailing_arguments() {
        let mut envelope = RawEnvelope::finished(4);
        envelope.payload.push(PayloadValue::Str("extra".to_string()));
        assert_eq!(
            decode(&envelope).unwrap(),
            Notification::Finished { handle: 4 }
        );
    }
}

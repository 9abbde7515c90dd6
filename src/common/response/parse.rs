// src/common/response/parse.rs

use super::Reading;

use crate::common::error::FormatError;
use crate::common::status::ChannelStatus;

use alloc::string::ToString;

const FIELD_COUNT: usize = 4;

/// Splits a measurement payload on whitespace and decodes both channels.
///
/// Fields 0 and 2 are the values for channel one and two, fields 1 and 3 the
/// matching status tokens. Either every field decodes or nothing is returned.
pub fn parse_reading(payload: &str) -> Result<Reading, FormatError> {
    let mut fields = [""; FIELD_COUNT];
    let mut found = 0;
    for field in payload.split_whitespace() {
        if found < FIELD_COUNT {
            fields[found] = field;
        }
        found += 1;
    }
    if found != FIELD_COUNT {
        return Err(FormatError::ImproperFieldCount { found, payload: payload.to_string() });
    }

    let [value_one, status_one, value_two, status_two] = fields;
    Ok(Reading {
        channel_one: ChannelStatus::decode(value_one, status_one)?,
        channel_two: ChannelStatus::decode(value_two, status_two)?,
    })
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::status::decode_status;
    use alloc::format;
    use proptest::prelude::*;

    #[test]
    fn test_parse_valid_reading() {
        let reading = parse_reading("1.2e-03 128 3.4e-04 10A").unwrap();
        assert_eq!(reading.channel_one.value, 1.2e-3);
        assert_eq!(reading.channel_one.flags(), decode_status("128").unwrap());
        assert_eq!(reading.channel_two.value, 3.4e-4);
        assert_eq!(reading.channel_two.flags(), decode_status("10A").unwrap());
    }

    #[test]
    fn test_parse_tolerates_extra_whitespace() {
        let reading = parse_reading("  -5.5E-9\t088   0 000 \r\n").unwrap();
        assert_eq!(reading.channel_one.value, -5.5e-9);
        assert_eq!(reading.channel_two.value, 0.0);
    }

    #[test]
    fn test_wrong_field_counts() {
        for payload in ["", "1.0", "1.0 128 2.0", "1.0 128 2.0 128 extra"] {
            match parse_reading(payload) {
                Err(FormatError::ImproperFieldCount { found, payload: p }) => {
                    assert_eq!(found, payload.split_whitespace().count());
                    assert_eq!(p, payload);
                }
                other => panic!("unexpected result for {:?}: {:?}", payload, other),
            }
        }
    }

    #[test]
    fn test_bad_value_fails_whole_reading() {
        assert_eq!(
            parse_reading("1.2e-03 128 nope 128"),
            Err(FormatError::InvalidValue("nope".into()))
        );
    }

    #[test]
    fn test_bad_status_fails_whole_reading() {
        assert!(matches!(
            parse_reading("1.2e-03 128 3.4e-04 1Z8"),
            Err(FormatError::InvalidStatusDigit { digit: 'Z', .. })
        ));
        assert!(matches!(
            parse_reading("1.2e-03 28 3.4e-04 10"),
            Err(FormatError::StatusTooShort(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_values_roundtrip(
            one in any::<f64>().prop_filter("finite", |v| v.is_finite()),
            two in any::<f64>().prop_filter("finite", |v| v.is_finite()),
            status_one in 0u16..0x1000,
            status_two in 0u16..0x1000,
        ) {
            let payload = format!("{:e} {:03X} {:e} {:03X}", one, status_one, two, status_two);
            let reading = parse_reading(&payload).unwrap();
            prop_assert_eq!(reading.channel_one.value, one);
            prop_assert_eq!(reading.channel_two.value, two);
        }

        #[test]
        fn prop_wrong_field_count_never_parses(
            fields in prop::collection::vec("[0-9A-F]{3}", 0..10usize)
                .prop_filter("not four", |f| f.len() != 4),
        ) {
            let payload = fields.join(" ");
            let is_field_count_error = matches!(
                parse_reading(&payload),
                Err(FormatError::ImproperFieldCount { .. })
            );
            prop_assert!(is_field_count_error);
        }
    }
}

//! Generation of human-readable transaction business ids.

use time::OffsetDateTime;

/// The studio prefix carried by every transaction business id.
const BUSINESS_ID_PREFIX: &str = "TRTAJOKI-";

/// Build a business id from the given wall-clock time.
///
/// The id is the studio prefix followed by the timestamp as fourteen digits
/// (`YYYYMMDDHHMMSS`). Two transactions created within the same second get
/// the same id; the unique constraint on the column turns that collision
/// into an error the client can resolve by resubmitting.
pub fn generate_business_id(now: OffsetDateTime) -> String {
    format!(
        "{BUSINESS_ID_PREFIX}{:04}{:02}{:02}{:02}{:02}{:02}",
        now.year(),
        u8::from(now.month()),
        now.day(),
        now.hour(),
        now.minute(),
        now.second(),
    )
}

#[cfg(test)]
mod business_id_tests {
    use time::macros::datetime;

    use super::generate_business_id;

    #[test]
    fn formats_prefix_and_fourteen_digit_timestamp() {
        let id = generate_business_id(datetime!(2025-12-01 09:30:05 +7));

        assert_eq!(id, "TRTAJOKI-20251201093005");
    }

    #[test]
    fn pads_single_digit_components() {
        let id = generate_business_id(datetime!(2025-01-02 03:04:05 UTC));

        assert_eq!(id, "TRTAJOKI-20250102030405");
    }
}

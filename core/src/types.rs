//! Shared primitive types used across the generator.

/// A kiosk identifier: always four digits, zero-padded ("0042").
pub type KioskId = String;

/// A registered user: fixed three-digit prefix plus six digits.
pub type UserId = String;

/// A four-character PIN. Kept as a string so leading zeros survive.
pub type Pin = String;

/// Dispensed volume in millilitres.
pub type VolumeMl = u32;

/// Format a numeric kiosk ID the way it appears on disk.
pub fn format_kiosk_id(raw: u16) -> KioskId {
    format!("{raw:04}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kiosk_ids_are_zero_padded() {
        assert_eq!(format_kiosk_id(7), "0007");
        assert_eq!(format_kiosk_id(9999), "9999");
    }
}

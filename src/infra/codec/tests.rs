//! Writer edge cases: sentinels, rounding, bounds.
use super::*;

#[test]
/// Raw fields are laid out little-endian in declaration order.
fn test_raw_fields_little_endian() {
    let mut buffer = [0u8; 8];
    let mut writer = PayloadWriter::new(&mut buffer);
    writer.u8(0x12).unwrap();
    writer.u16(0x3456).unwrap();
    writer.u32(0x789A_BCDE).unwrap();
    assert_eq!(writer.len(), 7);
    assert_eq!(buffer[..7], [0x12, 0x56, 0x34, 0xDE, 0xBC, 0x9A, 0x78]);
}

#[test]
/// Scaled unsigned fields round to the nearest raw step.
fn test_u16_udouble_rounds() {
    let mut buffer = [0u8; 2];
    let mut writer = PayloadWriter::new(&mut buffer);
    // 1500 rpm at 0.25 rpm/bit -> 6000
    writer.u16_udouble(1500.0, 0.25).unwrap();
    assert_eq!(buffer, 6000u16.to_le_bytes());
}

#[test]
/// The not-available sentinel maps to the all-ones encoding per width.
fn test_not_available_encodings() {
    let mut buffer = [0u8; 10];
    let mut writer = PayloadWriter::new(&mut buffer);
    writer.u16_udouble(DOUBLE_NA, 0.01).unwrap();
    writer.i16_double(DOUBLE_NA, 0.01).unwrap();
    writer.u32_udouble(DOUBLE_NA, 1.0).unwrap();
    assert_eq!(buffer[..2], [0xFF, 0xFF]);
    assert_eq!(buffer[2..4], [0xFF, 0x7F]);
    assert_eq!(buffer[4..8], [0xFF, 0xFF, 0xFF, 0xFF]);
}

#[test]
/// NaN and infinities are treated as not available, never encoded raw.
fn test_non_finite_is_not_available() {
    assert!(!is_available(f64::NAN));
    assert!(!is_available(f64::INFINITY));
    assert!(!is_available(f64::NEG_INFINITY));
    assert!(!is_available(DOUBLE_NA));
    assert!(is_available(0.0));
    assert!(is_available(-40.0));
}

#[test]
/// Values that do not fit the raw width map to the out-of-range encoding.
fn test_out_of_range_encodings() {
    let mut buffer = [0u8; 6];
    let mut writer = PayloadWriter::new(&mut buffer);
    // 70000 at resolution 1.0 does not fit 16 bits.
    writer.u16_udouble(70000.0, 1.0).unwrap();
    // Negative value on an unsigned field.
    writer.u16_udouble(-5.0, 1.0).unwrap();
    // Far negative value on a signed field.
    writer.i16_double(-40000.0, 1.0).unwrap();
    assert_eq!(buffer[..2], [0xFE, 0xFF]);
    assert_eq!(buffer[2..4], [0xFE, 0xFF]);
    assert_eq!(buffer[4..6], [0xFE, 0x7F]);
}

#[test]
/// Signed scaling rounds half away from zero in both directions.
fn test_i16_double_signed_rounding() {
    let mut buffer = [0u8; 4];
    let mut writer = PayloadWriter::new(&mut buffer);
    writer.i16_double(12.6, 0.01).unwrap();
    writer.i16_double(-12.6, 0.01).unwrap();
    assert_eq!(buffer[..2], 1260i16.to_le_bytes());
    assert_eq!(buffer[2..4], (-1260i16).to_le_bytes());
}

#[test]
/// Reserved filler writes 0xFF and advances the cursor.
fn test_reserved_fill() {
    let mut buffer = [0u8; 4];
    let mut writer = PayloadWriter::new(&mut buffer);
    writer.u8(0x01).unwrap();
    writer.reserved(3).unwrap();
    assert_eq!(buffer, [0x01, 0xFF, 0xFF, 0xFF]);
}

#[test]
/// Writing past the end of the buffer is rejected with the missing size.
fn test_buffer_too_small() {
    let mut buffer = [0u8; 3];
    let mut writer = PayloadWriter::new(&mut buffer);
    writer.u16(0xABCD).unwrap();
    assert!(matches!(
        writer.u16(0x1234),
        Err(crate::error::EncodeError::BufferTooSmall {
            needed: 2,
            available: 1
        })
    ));
}

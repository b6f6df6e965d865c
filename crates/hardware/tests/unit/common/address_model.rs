//! # Address Model Tests
//!
//! Verifies how `LineGeometry` decomposes addresses into line index and offset,
//! which offsets name a word, and which values fit in one.

use mesi_core::common::{
    Address, AddressError, DEFAULT_LINE_SIZE, DEFAULT_WORD_SIZE, LineGeometry, LineIndex,
    LineOffset, ValueError,
};
use rstest::rstest;

/// The default geometry is the reference 0x200-unit line of 8-unit words.
#[test]
fn default_geometry_matches_reference_constants() {
    let g = LineGeometry::default();
    assert_eq!(g.line_size(), DEFAULT_LINE_SIZE);
    assert_eq!(g.word_size(), DEFAULT_WORD_SIZE);
    assert_eq!(g.words_per_line(), 64);
}

/// Splitting an address yields `addr / line_size` and `addr % line_size`.
#[rstest]
#[case(0x0, 0, 0x0)]
#[case(0xa0, 0, 0xa0)]
#[case(0x1f8, 0, 0x1f8)]
#[case(0x200, 1, 0x0)]
#[case(0x4a8, 2, 0xa8)]
fn split_divides_by_line_size(#[case] addr: u64, #[case] line: u64, #[case] offset: u64) {
    let g = LineGeometry::default();
    assert_eq!(g.split(Address(addr)), (LineIndex(line), LineOffset(offset)));
    assert_eq!(g.line_of(Address(addr)), LineIndex(line));
    assert_eq!(g.offset_of(Address(addr)), LineOffset(offset));
}

/// Aligned offsets map to consecutive word slots, including the last word of the line.
#[rstest]
#[case(0x0, 0)]
#[case(0x8, 1)]
#[case(0xa0, 20)]
#[case(0x1f8, 63)]
fn aligned_offsets_name_a_word(#[case] offset: u64, #[case] index: usize) {
    assert_eq!(
        LineGeometry::default().word_index(LineOffset(offset)),
        Ok(index)
    );
}

/// Offsets that are not a multiple of the word size are rejected.
#[rstest]
#[case(0x1)]
#[case(0x7)]
#[case(0xa4)]
#[case(0x1ff)]
fn misaligned_offsets_are_rejected(#[case] offset: u64) {
    assert_eq!(
        LineGeometry::default().word_index(LineOffset(offset)),
        Err(AddressError::Misaligned {
            offset,
            word_size: 8
        })
    );
}

/// An aligned offset at or past the line size is out of range.
#[test]
fn offset_past_line_end_is_out_of_range() {
    let g = LineGeometry::default();
    assert_eq!(
        g.word_index(LineOffset(0x200)),
        Err(AddressError::OutOfRange {
            offset: 0x200,
            line_size: 0x200
        })
    );
}

/// Inconsistent geometries cannot be constructed.
#[rstest]
#[case(0, 8)]
#[case(0x200, 0)]
#[case(0x200, 65)]
#[case(0x200, 7)]
fn inconsistent_geometry_is_rejected(#[case] line_size: u64, #[case] word_size: u32) {
    assert_eq!(LineGeometry::new(line_size, word_size), None);
}

/// A geometry with a single word per line is valid.
#[test]
fn single_word_line_is_valid() {
    let g = LineGeometry::new(64, 64).unwrap();
    assert_eq!(g.words_per_line(), 1);
    assert_eq!(g.word_index(LineOffset(0)), Ok(0));
}

/// Values must be below `2^word_size`.
#[rstest]
#[case(8, 255, true)]
#[case(8, 256, false)]
#[case(16, 65_535, true)]
#[case(16, 65_536, false)]
#[case(64, u64::MAX, true)]
fn value_range_follows_word_size(#[case] word_size: u32, #[case] value: u64, #[case] ok: bool) {
    let g = LineGeometry::new(u64::from(word_size) * 4, word_size).unwrap();
    let expected = if ok {
        Ok(())
    } else {
        Err(ValueError { value, word_size })
    };
    assert_eq!(g.check_value(value), expected);
}

/// Addresses display as hexadecimal.
#[test]
fn address_display_is_hex() {
    assert_eq!(Address(0xa0).to_string(), "0xa0");
    assert_eq!(LineIndex(2).to_string(), "line 0x2");
}

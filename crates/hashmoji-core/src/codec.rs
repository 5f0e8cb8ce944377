//! Byte ⇄ symbol mapping through a [`SymbolAlphabet`].
//!
//! Encoding maps each byte to `alphabet[byte % len]`. Decoding maps each
//! symbol's alphabet index to `index % 256`. The two are only mutual
//! inverses while the alphabet has at least 256 symbols; for smaller
//! alphabets several bytes share a symbol and decoding is a best-effort
//! lookup, never a reconstruction.

use crate::alphabet::SymbolAlphabet;
use crate::digest::hex_decode;
use crate::error::{CoreError, Result};

/// Number of leading digest bytes shown as symbols.
pub const DEFAULT_SYMBOL_COUNT: usize = 4;

/// Encodes the first `count` bytes of `bytes` as symbols.
///
/// Encodes `min(count, bytes.len())` bytes; never fails.
#[must_use]
pub fn encode(bytes: &[u8], alphabet: &SymbolAlphabet, count: usize) -> String {
    let len = alphabet.len();
    bytes
        .iter()
        .take(count)
        .filter_map(|&b| alphabet.get(usize::from(b) % len))
        .collect()
}

/// Decodes a symbol sequence back into one byte per symbol.
///
/// # Errors
///
/// Returns [`CoreError::UnknownSymbol`] for the first symbol that is not in
/// the alphabet.
pub fn decode(symbols: &str, alphabet: &SymbolAlphabet) -> Result<Vec<u8>> {
    symbols
        .chars()
        .enumerate()
        .map(|(position, symbol)| {
            alphabet
                .position(symbol)
                .map(|index| (index % 256) as u8)
                .ok_or(CoreError::UnknownSymbol { symbol, position })
        })
        .collect()
}

/// Like [`decode`], but returns `None` instead of an error.
///
/// Pasting back something that is not a symbol sequence is an expected
/// outcome for callers, not a fault.
#[must_use]
pub fn try_decode(symbols: &str, alphabet: &SymbolAlphabet) -> Option<Vec<u8>> {
    decode(symbols, alphabet).ok()
}

/// Converts a symbol sequence to uppercase hex, two characters per symbol.
///
/// This is the representation the identity authority accepts in its
/// `emoji_sequence` field.
///
/// # Errors
///
/// Returns [`CoreError::UnknownSymbol`] if any symbol is not in the alphabet.
pub fn symbols_to_hex(symbols: &str, alphabet: &SymbolAlphabet) -> Result<String> {
    let bytes = decode(symbols, alphabet)?;
    Ok(hex::encode_upper(bytes))
}

/// Converts a hex payload to symbols, one symbol per payload byte.
///
/// # Errors
///
/// Returns [`CoreError::InvalidHex`] if `hex` is not valid hex.
pub fn hex_to_symbols(hex: &str, alphabet: &SymbolAlphabet) -> Result<String> {
    let bytes = hex_decode(hex.trim())?;
    Ok(encode(&bytes, alphabet, bytes.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::Digest;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn small_alphabet() -> SymbolAlphabet {
        SymbolAlphabet::from_ranges(&[0x1F600..=0x1F604]).unwrap()
    }

    #[test]
    fn encode_takes_first_count_bytes() {
        let alphabet = SymbolAlphabet::global();
        let encoded = encode(&[0, 1, 2, 3, 4, 5], alphabet, 4);
        let expected: String = (0..4).filter_map(|i| alphabet.get(i)).collect();
        assert_eq!(encoded, expected);
        assert_eq!(encoded.chars().count(), 4);
    }

    #[test]
    fn encode_short_input_uses_available_bytes() {
        let alphabet = SymbolAlphabet::global();
        assert_eq!(encode(&[7], alphabet, 4).chars().count(), 1);
        assert_eq!(encode(&[], alphabet, 4), "");
        assert_eq!(encode(&[1, 2, 3], alphabet, 0), "");
    }

    #[test]
    fn encode_wraps_modulo_alphabet_size() {
        let alphabet = small_alphabet();
        assert_eq!(encode(&[0, 5, 10], &alphabet, 3), "\u{1F600}\u{1F600}\u{1F600}");
        assert_eq!(encode(&[6], &alphabet, 1), "\u{1F601}");
    }

    #[test]
    fn encode_is_deterministic_for_digest() {
        let digest = Digest::compute(b"hello");
        let alphabet = SymbolAlphabet::global();
        let a = encode(digest.as_bytes(), alphabet, DEFAULT_SYMBOL_COUNT);
        let b = encode(digest.as_bytes(), alphabet, DEFAULT_SYMBOL_COUNT);
        assert_eq!(a, b);
    }

    #[test]
    fn hello_maps_leading_digest_bytes() {
        // sha256("hello") starts 2c f2 4d ba
        let alphabet = SymbolAlphabet::global();
        let digest = Digest::compute(b"hello");
        let expected: String = [0x2c_usize, 0xf2, 0x4d, 0xba]
            .iter()
            .filter_map(|&i| alphabet.get(i % alphabet.len()))
            .collect();
        assert_eq!(encode(digest.as_bytes(), alphabet, 4), expected);
    }

    #[test]
    fn decode_inverts_encode_for_large_alphabet() {
        let alphabet = SymbolAlphabet::global();
        let bytes = [0x00, 0x7f, 0x80, 0xff];
        let encoded = encode(&bytes, alphabet, bytes.len());
        assert_eq!(decode(&encoded, alphabet).unwrap(), bytes.to_vec());
    }

    #[test]
    fn decode_is_lossy_for_small_alphabet() {
        let alphabet = small_alphabet();
        let encoded = encode(&[7], &alphabet, 1);
        assert_eq!(decode(&encoded, &alphabet).unwrap(), vec![2]);
    }

    #[test]
    fn decode_reports_unknown_symbol() {
        let alphabet = SymbolAlphabet::global();
        let first = alphabet.get(0).unwrap();
        let input = format!("{first}a");
        match decode(&input, alphabet) {
            Err(CoreError::UnknownSymbol { symbol, position }) => {
                assert_eq!(symbol, 'a');
                assert_eq!(position, 1);
            }
            other => panic!("expected unknown symbol, got {other:?}"),
        }
        assert_eq!(try_decode(&input, alphabet), None);
    }

    #[test]
    fn decode_empty_is_empty() {
        assert_eq!(decode("", SymbolAlphabet::global()).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn symbols_to_hex_is_uppercase() {
        let alphabet = SymbolAlphabet::global();
        let symbols = encode(&[0xab, 0x01], alphabet, 2);
        assert_eq!(symbols_to_hex(&symbols, alphabet).unwrap(), "AB01");
    }

    #[test]
    fn hex_to_symbols_encodes_whole_payload() {
        let alphabet = SymbolAlphabet::global();
        let symbols = hex_to_symbols("00010203040506", alphabet).unwrap();
        assert_eq!(symbols.chars().count(), 7);
        assert_eq!(symbols_to_hex(&symbols, alphabet).unwrap(), "00010203040506");
    }

    #[test]
    fn hex_to_symbols_rejects_bad_hex() {
        let alphabet = SymbolAlphabet::global();
        assert!(matches!(
            hex_to_symbols("not hex", alphabet),
            Err(CoreError::InvalidHex(_))
        ));
    }

    proptest! {
        #[test]
        fn encode_never_exceeds_count(
            bytes in proptest::collection::vec(any::<u8>(), 0..64),
            count in 0usize..80,
        ) {
            let alphabet = SymbolAlphabet::global();
            let encoded = encode(&bytes, alphabet, count);
            prop_assert_eq!(encoded.chars().count(), count.min(bytes.len()));
            prop_assert!(encoded.chars().all(|c| alphabet.contains(c)));
        }
    }
}

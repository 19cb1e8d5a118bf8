//! UTF-8 text kernels.

use crate::error::DemopyError;

/// Reverses the Unicode scalar values of a UTF-8 buffer into `output`.
///
/// Each encoded char is copied as a unit to its mirrored position, so the result
/// is valid UTF-8 of exactly `input.len()` bytes. Grapheme clusters made of
/// several chars (combining marks, ZWJ sequences) are not kept together.
///
/// Returns the number of bytes written.
pub fn reverse_utf8_into(input: &[u8], output: &mut [u8]) -> Result<usize, DemopyError> {
    let text = std::str::from_utf8(input).map_err(|_| DemopyError::InvalidUtf8)?;
    let len = input.len();
    if output.len() < len {
        return Err(DemopyError::BufferTooSmall);
    }

    for (start, ch) in text.char_indices() {
        let width = ch.len_utf8();
        let dest = len - start - width;
        output[dest..dest + width].copy_from_slice(&input[start..start + width]);
    }

    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reverse(s: &str) -> String {
        let mut out = vec![0u8; s.len()];
        let written = reverse_utf8_into(s.as_bytes(), &mut out).unwrap();
        String::from_utf8(out[..written].to_vec()).unwrap()
    }

    #[test]
    fn test_reverse_ascii_and_empty() {
        assert_eq!(reverse("hello"), "olleh");
        assert_eq!(reverse("a"), "a");
        assert_eq!(reverse(""), "");
    }

    #[test]
    fn test_reverse_keeps_multibyte_chars_intact() {
        assert_eq!(reverse("héllo"), "olléh");
        assert_eq!(reverse("日本語"), "語本日");
        assert_eq!(reverse("a🦀b"), "b🦀a");
    }

    #[test]
    fn test_rejects_invalid_utf8() {
        let mut out = [0u8; 2];
        let result = reverse_utf8_into(&[0xC3, 0x28], &mut out);
        assert!(matches!(result, Err(DemopyError::InvalidUtf8)));
    }

    #[test]
    fn test_rejects_short_output() {
        let mut out = [0u8; 2];
        let result = reverse_utf8_into(b"abc", &mut out);
        assert!(matches!(result, Err(DemopyError::BufferTooSmall)));
    }
}

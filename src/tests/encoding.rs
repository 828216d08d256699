use super::{decode_lossless, TextEncoding};
use crate::error::Error;

#[test]
fn test_utf8_is_preferred() {
    let (text, enc) = TextEncoding::detect("\"name\" \"Zoë\"\n".as_bytes()).unwrap();
    assert_eq!(enc, TextEncoding::Utf8);
    assert!(text.contains("Zoë"));
}

#[test]
fn test_falls_back_to_windows_1252() {
    // 0xE9 alone is invalid UTF-8 but is 'é' in Windows-1252, 0x80 is the euro sign
    let bytes = b"\"name\" \"Ren\xe9 \x80\"\n";
    let (text, enc) = TextEncoding::detect(bytes).unwrap();
    assert_eq!(enc, TextEncoding::Windows1252);
    assert_eq!(text, "\"name\" \"René €\"\n");
}

#[test]
fn test_undefined_windows_1252_byte_is_fatal() {
    let bytes = b"\"k\" \"\x81\"\n";
    let err = TextEncoding::detect(bytes).unwrap_err();
    assert!(matches!(err, Error::Encoding { .. }), "got {err:?}");
}

#[test]
fn test_windows_1252_encode_restores_bytes() {
    let bytes: Vec<u8> = (0x20..=0xFF)
        .filter(|b| ![0x81, 0x8D, 0x8F, 0x90, 0x9D].contains(b))
        .collect();
    let text = TextEncoding::Windows1252.decode(&bytes).unwrap();
    let mut out = Vec::new();
    TextEncoding::Windows1252.encode(&text, &mut out).unwrap();
    assert_eq!(out, bytes);
}

#[test]
fn test_unrepresentable_char_cannot_be_encoded() {
    let mut out = Vec::new();
    let err = TextEncoding::Windows1252
        .encode("日本", &mut out)
        .unwrap_err();
    assert!(matches!(err, Error::Encoding { .. }));
}

#[test]
fn test_binary_strings_fall_back_to_latin1() {
    assert_eq!(decode_lossless(b"plain".to_vec()), "plain");
    assert_eq!(decode_lossless(vec![b'a', 0xFF, 0x81]), "a\u{FF}\u{81}");
}

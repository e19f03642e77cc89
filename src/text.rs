use encoding_rs::{SHIFT_JIS, UTF_8, WINDOWS_1252};

/// How the bytes of text meta events (track names) are decoded
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextEncoding {
    /// UTF-8 if the bytes are valid UTF-8, Shift_JIS otherwise
    #[default]
    Auto,
    /// UTF-8, invalid sequences replaced
    Utf8,
    /// Shift_JIS, as written by Japanese sequencers
    ShiftJis,
    /// Windows-1252, a superset of Latin-1
    Latin1,
}

impl TextEncoding {
    /// Decode text bytes. Trailing NUL padding is dropped.
    pub fn decode(&self, bytes: &[u8]) -> String {
        let end = bytes.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
        let bytes = &bytes[..end];
        let encoding = match self {
            Self::Auto => {
                let (text, had_errors) = UTF_8.decode_without_bom_handling(bytes);
                if !had_errors {
                    return text.into_owned();
                }
                SHIFT_JIS
            }
            Self::Utf8 => UTF_8,
            Self::ShiftJis => SHIFT_JIS,
            Self::Latin1 => WINDOWS_1252,
        };
        let (text, _) = encoding.decode_without_bom_handling(bytes);
        text.into_owned()
    }
}

#[test]
fn auto_prefers_utf8() {
    assert_eq!(TextEncoding::Auto.decode("ドラム".as_bytes()), "ドラム");
}

#[test]
fn auto_falls_back_to_shift_jis() {
    // "ドラム" in Shift_JIS
    let bytes = [0x83, 0x68, 0x83, 0x89, 0x83, 0x80];
    assert_eq!(TextEncoding::Auto.decode(&bytes), "ドラム");
    assert_eq!(TextEncoding::ShiftJis.decode(&bytes), "ドラム");
}

#[test]
fn latin1_and_padding() {
    assert_eq!(TextEncoding::Latin1.decode(&[b'C', 0xE9, 0, 0]), "Cé");
    assert_eq!(TextEncoding::Utf8.decode(&[0, 0]), "");
}

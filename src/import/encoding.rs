use encoding_rs::{GBK, UTF_8};
use log::{debug, warn};
use std::fmt;

const REPLACEMENT: char = '\u{FFFD}';

/// Encodings tried in order when decoding an import file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Gbk,
}

impl TextEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Gbk => "gbk",
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub encoding: TextEncoding,
    /// The chosen decoder hit byte sequences it could not map.
    pub malformed: bool,
}

/// Decode raw file bytes.
///
/// UTF-8 first (a leading BOM is dropped). Any replacement character in the
/// result sends the same bytes through GBK instead; there is no third try.
pub fn decode(bytes: &[u8]) -> Decoded {
    let (text, _) = UTF_8.decode_with_bom_removal(bytes);
    if !text.contains(REPLACEMENT) {
        debug!("decoded {} bytes as utf-8", bytes.len());
        return Decoded {
            text: text.into_owned(),
            encoding: TextEncoding::Utf8,
            malformed: false,
        };
    }

    debug!("utf-8 decode produced replacement characters, retrying as gbk");
    let (text, malformed) = GBK.decode_without_bom_handling(bytes);
    if malformed {
        warn!("gbk decode also hit malformed sequences");
    }
    Decoded {
        text: text.into_owned(),
        encoding: TextEncoding::Gbk,
        malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gbk_bytes(s: &str) -> Vec<u8> {
        let (bytes, _, unmappable) = GBK.encode(s);
        assert!(!unmappable);
        bytes.into_owned()
    }

    #[test]
    fn test_plain_utf8() {
        let decoded = decode("name,address\nMüller,München".as_bytes());
        assert_eq!(decoded.encoding, TextEncoding::Utf8);
        assert_eq!(decoded.text, "name,address\nMüller,München");
        assert!(!decoded.malformed);
    }

    #[test]
    fn test_utf8_bom_is_dropped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"name,address");
        let decoded = decode(&bytes);
        assert_eq!(decoded.text, "name,address");
    }

    #[test]
    fn test_falls_back_to_gbk() {
        let bytes = gbk_bytes("姓名,地址\n张三,北京市海淀区");
        let decoded = decode(&bytes);
        assert_eq!(decoded.encoding, TextEncoding::Gbk);
        assert_eq!(decoded.text, "姓名,地址\n张三,北京市海淀区");
        assert!(!decoded.malformed);
    }

    #[test]
    fn test_garbage_reports_malformed() {
        let decoded = decode(&[0x81, 0x20, 0xFF, 0xFF]);
        assert_eq!(decoded.encoding, TextEncoding::Gbk);
        assert!(decoded.malformed);
    }

    #[test]
    fn test_empty_input() {
        let decoded = decode(&[]);
        assert_eq!(decoded.encoding, TextEncoding::Utf8);
        assert!(decoded.text.is_empty());
    }
}

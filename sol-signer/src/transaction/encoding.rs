//! Text encodings for serialized transaction payloads

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How a binary payload is carried as text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadEncoding {
    /// Lowercase hexadecimal
    Hex,
    /// Standard padded base64
    #[default]
    Base64,
}

impl PayloadEncoding {
    /// Encode bytes as text
    pub fn encode(&self, bytes: &[u8]) -> String {
        match self {
            Self::Hex => hex::encode(bytes),
            Self::Base64 => general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Decode text back into bytes
    pub fn decode(&self, text: &str) -> Result<Vec<u8>> {
        let text = text.trim();
        match self {
            Self::Hex => hex::decode(text.strip_prefix("0x").unwrap_or(text))
                .map_err(|e| Error::Encoding(format!("invalid hex payload: {}", e))),
            Self::Base64 => general_purpose::STANDARD
                .decode(text)
                .map_err(|e| Error::Encoding(format!("invalid base64 payload: {}", e))),
        }
    }
}

impl FromStr for PayloadEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(Self::Hex),
            "base64" => Ok(Self::Base64),
            other => Err(Error::NotSupported(format!("payload encoding {}", other))),
        }
    }
}

impl fmt::Display for PayloadEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hex => f.write_str("hex"),
            Self::Base64 => f.write_str("base64"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(PayloadEncoding::Hex.encode(&[0x01, 0xab]), "01ab");
        assert_eq!(PayloadEncoding::Hex.decode("0x01AB\n").unwrap(), vec![0x01, 0xab]);
        assert!(matches!(PayloadEncoding::Hex.decode("zz"), Err(Error::Encoding(_))));
    }

    #[test]
    fn test_base64() {
        assert_eq!(PayloadEncoding::Base64.encode(b"sol"), "c29s");
        assert_eq!(PayloadEncoding::Base64.decode("c29s").unwrap(), b"sol".to_vec());
        assert!(PayloadEncoding::Base64.decode("c2*s").is_err());
    }

    #[test]
    fn test_parse_name() {
        assert_eq!("HEX".parse::<PayloadEncoding>().unwrap(), PayloadEncoding::Hex);
        assert_eq!(PayloadEncoding::Base64.to_string(), "base64");
        assert!("base58".parse::<PayloadEncoding>().is_err());
    }
}

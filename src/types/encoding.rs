//! # Text Encoding
//!
//! The native component exchanges plain byte strings. Depending on how it
//! was built (and on its `CodificacaoResposta` setting) those bytes are UTF-8
//! or ANSI/Latin-1.

use std::ffi::CString;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ffi::error::{BoletoError, BoletoResult};

/// Encoding used to marshal text to and from the native component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    #[default]
    Utf8,
    Latin1,
}

impl TextEncoding {
    /// Encode `value` as a NUL-terminated native string
    pub fn encode(self, parameter: &str, value: &str) -> BoletoResult<CString> {
        let bytes = match self {
            Self::Utf8 => value.as_bytes().to_vec(),
            Self::Latin1 => value
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c)).map_err(|_| BoletoError::InvalidParameter {
                        parameter: parameter.to_string(),
                        reason: format!("character {c:?} has no Latin-1 encoding"),
                    })
                })
                .collect::<BoletoResult<Vec<u8>>>()?,
        };

        CString::new(bytes).map_err(|_| BoletoError::InvalidParameter {
            parameter: parameter.to_string(),
            reason: "contains an interior NUL byte".to_string(),
        })
    }

    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
        }
    }
}

impl FromStr for TextEncoding {
    type Err = BoletoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "latin1" | "latin-1" | "iso-8859-1" | "ansi" => Ok(Self::Latin1),
            other => Err(BoletoError::InvalidParameter {
                parameter: "encoding".to_string(),
                reason: format!("unknown encoding {other:?}"),
            }),
        }
    }
}

//! Output selector for `Boleto_IncluirTitulos`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What the native component does with titles right after including them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputKind {
    /// Only queue the titles
    #[default]
    None,
    Pdf,
    Printer,
    Email,
}

impl OutputKind {
    /// Selector understood by the native side
    pub fn as_code(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Pdf => "P",
            Self::Printer => "I",
            Self::Email => "E",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "" => Some(Self::None),
            "P" => Some(Self::Pdf),
            "I" => Some(Self::Printer),
            "E" => Some(Self::Email),
            _ => None,
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

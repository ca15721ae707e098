//! Tagged values returned by typed variable reads.
//!
//! Debuggers print values as text. The shapes handled here:
//!
//! - `4096`, `-1`, `0x20500000`
//! - `$3 = 0x20500000` (value history prefix)
//! - `(bm_protocol_header *) 0x20500000 <bm_buffer>` (cast and symbol annotation)
//! - `{header_length = 32, ...}` (aggregate, reported as composite)

use super::SessionError;

/// A value read from the target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableValue {
    /// A scalar that converts losslessly to a wide signed integer
    Scalar(i128),
    /// An aggregate (struct/array) value, kept as printed
    Composite(String),
}

impl VariableValue {
    /// Parse the debugger's textual rendering of a value
    pub fn parse(text: &str) -> Result<Self, SessionError> {
        let mut rest = text.trim();

        if rest.starts_with('$') {
            if let Some((_, value)) = rest.split_once(" = ") {
                rest = value.trim_start();
            }
        }

        if rest.starts_with('{') {
            return Ok(Self::Composite(rest.to_string()));
        }

        if rest.starts_with('(') {
            let close = rest
                .find(')')
                .ok_or_else(|| SessionError::new(format!("unterminated cast in value '{}'", text)))?;
            rest = rest[close + 1..].trim_start();
        }

        if rest.ends_with('>') {
            if let Some(idx) = rest.find(" <") {
                rest = rest[..idx].trim_end();
            }
        }

        parse_integer(rest)
            .map(Self::Scalar)
            .ok_or_else(|| SessionError::new(format!("value '{}' is not an integer", text.trim())))
    }

    /// Returns the scalar value, if any
    pub fn as_scalar(&self) -> Option<i128> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::Composite(_) => None,
        }
    }

    /// Returns true for aggregate values
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Composite(_))
    }
}

/// Parse a decimal or `0x` hexadecimal integer with an optional sign
fn parse_integer(text: &str) -> Option<i128> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(d) => (true, d),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let magnitude = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        u128::from_str_radix(hex, 16).ok()?
    } else if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        digits.parse::<u128>().ok()?
    } else {
        return None;
    };

    let value = i128::try_from(magnitude).ok()?;
    Some(if negative { -value } else { value })
}

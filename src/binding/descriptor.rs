// Author: Dustin Pilgrim
// License: MIT

use once_cell::sync::Lazy;
use regex::Regex;

use crate::IclError;

/// Annotation that marks a field as a positional block parameter.
pub const PARAM_ANNOTATION: &str = ".param";

static ENV_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^env\(([A-Za-z_][A-Za-z0-9_]*)\)$").expect("env segment pattern is valid")
});

/// Resolved metadata for one record field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Document key the field binds to. Empty for parameter fields.
    pub key: String,
    pub is_param: bool,
    /// Decimal places used when writing floats.
    pub float_precision: Option<usize>,
    /// Environment variable written as `env(NAME)` in place of the value.
    pub env_default: Option<String>,
}

/// Parse a field annotation such as `"port"`, `"ratio.2"`,
/// `"home,env(HOME)"` or `".param"`.
///
/// Segments after the key that are not recognised are ignored.
pub fn parse_descriptor(raw: &str) -> Result<FieldDescriptor, IclError> {
    if raw == PARAM_ANNOTATION {
        return Ok(FieldDescriptor {
            is_param: true,
            ..Default::default()
        });
    }

    let mut segments = raw.split(',');
    let head = segments.next().unwrap_or_default().trim();
    let invalid = || IclError::InvalidKey {
        key: head.to_string(),
    };

    let (key, float_precision) = match head.split_once('.') {
        Some((key, digits)) => {
            let precision: usize = digits.parse().map_err(|_| invalid())?;
            if precision < 1 || key.is_empty() {
                return Err(invalid());
            }
            (key, Some(precision))
        }
        None => (head, None),
    };

    if key.is_empty() {
        return Err(invalid());
    }

    let env_default = segments.find_map(|segment| {
        ENV_SEGMENT
            .captures(segment.trim())
            .map(|caps| caps[1].to_string())
    });

    Ok(FieldDescriptor {
        key: key.to_string(),
        is_param: false,
        float_precision,
        env_default,
    })
}

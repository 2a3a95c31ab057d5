//! RFC 6901 JSON pointer removal.

use serde_json::Value;

use crate::error::NormalizeError;

/// Removes the value a JSON pointer refers to.
///
/// Returns `Ok(true)` when something was removed and `Ok(false)` when the
/// pointer does not resolve. The root pointer `""` is rejected because it
/// would remove the whole document.
///
/// # Errors
///
/// Returns an error if the pointer does not start with `/`.
pub fn remove_pointer(doc: &mut Value, pointer: &str) -> Result<bool, NormalizeError> {
    let Some((parent, token)) = pointer.rsplit_once('/') else {
        return Err(NormalizeError::InvalidPointer {
            pointer: pointer.to_string(),
        });
    };
    if !pointer.starts_with('/') {
        return Err(NormalizeError::InvalidPointer {
            pointer: pointer.to_string(),
        });
    }

    let token = unescape(token);
    let removed = match doc.pointer_mut(parent) {
        Some(Value::Object(map)) => map.remove(&token).is_some(),
        Some(Value::Array(items)) => match token.parse::<usize>() {
            Ok(index) if index < items.len() => {
                items.remove(index);
                true
            }
            _ => false,
        },
        _ => false,
    };

    Ok(removed)
}

/// Decodes `~1` and `~0` escapes in a reference token.
fn unescape(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

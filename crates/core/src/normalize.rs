//! Text normalization for slide labels.

/// Normalize a name or USN for display: upper case, otherwise untouched.
///
/// Idempotent, so already-normalized values pass through unchanged.
pub fn normalize_label(text: &str) -> String {
    text.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_cases() {
        assert_eq!(normalize_label("ann lee"), "ANN LEE");
        assert_eq!(normalize_label("1rv20cs001"), "1RV20CS001");
    }

    #[test]
    fn test_idempotent() {
        for input in ["bo kim", "Émile Zola", "straße", ""] {
            let once = normalize_label(input);
            assert_eq!(normalize_label(&once), once);
        }
    }

    #[test]
    fn test_keeps_spacing() {
        assert_eq!(normalize_label("  ann  lee "), "  ANN  LEE ");
    }
}

//! Fixed-width text layout helpers shared by the receipt formatter and the
//! EOD report renderer. Both documents must align labels and values the
//! same way, so the routine lives here exactly once.

// =============================================================================
// Alignment
// =============================================================================

/// Renders a `label: value` line at the given width: the label (with a
/// trailing colon) is right-padded with `fill` to `width - value.len()`
/// columns, then the value is appended flush right.
///
/// ```rust
/// use storepro_core::layout::align;
///
/// assert_eq!(align("Cash", "$12.11", 20, ' '), "Cash:         $12.11");
/// assert_eq!(align("Total", "$5.00", 12, '.'), "Total:.$5.00");
/// ```
///
/// A label too long for the width is emitted unpadded; the line simply
/// overflows rather than truncating sale data.
pub fn align(label: &str, value: &str, width: usize, fill: char) -> String {
    let mut line = format!("{label}:");
    let target = width.saturating_sub(value.chars().count());
    while line.chars().count() < target {
        line.push(fill);
    }
    line.push_str(value);
    line
}

/// Centers text within the width (no trailing padding).
pub fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let mut line = " ".repeat((width - len) / 2);
    line.push_str(text);
    line
}

/// A full-width ruler line, e.g. `----------------`.
pub fn ruler(width: usize, fill: char) -> String {
    std::iter::repeat(fill).take(width).collect()
}

/// Greedy word wrap. Words longer than the width get a line of their own.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

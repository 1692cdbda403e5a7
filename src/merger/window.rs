use std::ops::Range;

/// Frames `[(len - window) / 2, (len - window) / 2 + window)`, or `None` when the sequence is
/// shorter than the window.
pub fn centered_window(len: usize, window: usize) -> Option<Range<usize>> {
    let start = len.checked_sub(window)? / 2;
    Some(start..start + window)
}

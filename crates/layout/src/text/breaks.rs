use unicode_linebreak::{BreakOpportunity, linebreaks};

/// Byte offsets inside `text` where a line may end, in ascending order.
///
/// Each offset points after the characters that precede the break, so trailing
/// spaces stay with the first part. The end of the text is not included.
pub fn break_opportunities(text: &str) -> Vec<usize> {
    linebreaks(text)
        .filter(|(idx, op)| {
            *idx < text.len() && matches!(op, BreakOpportunity::Mandatory | BreakOpportunity::Allowed)
        })
        .map(|(idx, _)| idx)
        .collect()
}

/// Splits `text` into its unbreakable segments, trailing spaces included.
pub fn segments(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for idx in break_opportunities(text) {
        out.push(&text[start..idx]);
        start = idx;
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

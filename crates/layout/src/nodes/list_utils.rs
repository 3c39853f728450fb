use crate::style::ComputedStyle;
use quire_style::list::ListStyleType;

/// The numbering style actually used at `depth`. Nested decimal lists cycle
/// through decimal, lower-alpha and lower-roman.
pub fn effective_style_type(style_type: ListStyleType, depth: usize) -> ListStyleType {
    if depth == 0 || style_type != ListStyleType::Decimal {
        return style_type;
    }
    match depth % 3 {
        1 => ListStyleType::LowerAlpha,
        2 => ListStyleType::LowerRoman,
        _ => ListStyleType::Decimal,
    }
}

/// Marker label for the item numbered `index` (1-based) at nesting `depth`.
pub fn get_marker_text(style: &ComputedStyle, index: usize, depth: usize) -> String {
    match effective_style_type(style.list.style_type, depth) {
        ListStyleType::Disc => "•".to_string(),
        ListStyleType::Circle => "◦".to_string(),
        ListStyleType::Square => "▪".to_string(),
        ListStyleType::Decimal => format!("{}.", index),
        ListStyleType::LowerAlpha => format!("{}.", to_alpha(index)),
        ListStyleType::UpperAlpha => format!("{}.", to_alpha(index).to_uppercase()),
        ListStyleType::LowerRoman => format!("{}.", to_roman(index)),
        ListStyleType::UpperRoman => format!("{}.", to_roman(index).to_uppercase()),
        ListStyleType::None => String::new(),
    }
}

/// Bijective base-26: 1 → a, 26 → z, 27 → aa.
pub fn to_alpha(n: usize) -> String {
    if n == 0 {
        return "a".to_string();
    }
    let mut letters = Vec::new();
    let mut num = n;
    while num > 0 {
        num -= 1;
        letters.push((b'a' + (num % 26) as u8) as char);
        num /= 26;
    }
    letters.iter().rev().collect()
}

pub fn to_roman(n: usize) -> String {
    const VALUES: [(usize, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut num = n;
    let mut result = String::new();
    for (value, symbol) in VALUES {
        while num >= value {
            result.push_str(symbol);
            num -= value;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_numbering_wraps_after_z() {
        assert_eq!(to_alpha(1), "a");
        assert_eq!(to_alpha(26), "z");
        assert_eq!(to_alpha(27), "aa");
        assert_eq!(to_alpha(28), "ab");
    }

    #[test]
    fn roman_numbering() {
        assert_eq!(to_roman(4), "iv");
        assert_eq!(to_roman(1994), "mcmxciv");
        assert_eq!(to_roman(0), "");
    }

    #[test]
    fn nested_decimal_lists_alternate() {
        let mut style = ComputedStyle::default();
        style.list.style_type = ListStyleType::Decimal;
        assert_eq!(get_marker_text(&style, 3, 0), "3.");
        assert_eq!(get_marker_text(&style, 3, 1), "c.");
        assert_eq!(get_marker_text(&style, 3, 2), "iii.");
        style.list.style_type = ListStyleType::Square;
        assert_eq!(get_marker_text(&style, 3, 1), "▪");
    }
}

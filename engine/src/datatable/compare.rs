use std::cmp::Ordering;

/// How cells of one column are compared during a single sort call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareMode {
    Numeric,
    Text,
}

impl CompareMode {
    /// Pick the mode for a column: numeric only when every cell yields a number.
    ///
    /// Deciding once per sort keeps the comparator a total order even when a
    /// column mixes numbers and text, which a per-pair decision would not.
    pub fn for_cells<'a>(cells: impl IntoIterator<Item = &'a str>) -> Self {
        let mut saw_any = false;
        for cell in cells {
            saw_any = true;
            if numeric_value(cell).is_none() {
                return CompareMode::Text;
            }
        }
        if saw_any {
            CompareMode::Numeric
        } else {
            CompareMode::Text
        }
    }

    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            CompareMode::Numeric => match (numeric_value(a), numeric_value(b)) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => locale_compare(a, b),
            },
            CompareMode::Text => locale_compare(a, b),
        }
    }
}

/// Numeric reading of a cell.
///
/// Every character that is not a digit, `-` or `.` is dropped, then the
/// longest leading float is parsed: `"$1,200.50"` reads as `1200.5`, `"12-3"`
/// as `12`, `"N/A"` as nothing.
pub fn numeric_value(cell: &str) -> Option<f64> {
    let stripped: String = cell
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-' || *c == '.')
        .collect();
    parse_float_prefix(&stripped)
}

fn parse_float_prefix(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    s[..end].parse::<f64>().ok()
}

/// Case-insensitive ordering with lowercase-first tie breaking.
///
/// Approximates the root collation browsers use for `localeCompare`: letters
/// compare by their lowercase form first, and only identical-when-folded
/// strings fall back to a case-sensitive comparison where `a` sorts before `A`.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));

    folded.then_with(|| {
        a.chars()
            .map(invert_case)
            .cmp(b.chars().map(invert_case))
    })
}

fn invert_case(c: char) -> char {
    if c.is_lowercase() {
        c.to_uppercase().next().unwrap_or(c)
    } else if c.is_uppercase() {
        c.to_lowercase().next().unwrap_or(c)
    } else {
        c
    }
}

// src/core/sanitize.rs
use serde::Serialize;

/// Collapse runs of whitespace into one space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Utilisation figure as the portal prints it: `12.34% (123/1000)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Ratio {
    pub used: u64,
    pub total: u64,
    pub percent: f64,
}

/// Parse a utilisation cell. Accepts the counts in parentheses and the
/// percentage on either side of them.
pub fn parse_ratio(s: &str) -> Option<Ratio> {
    let open = s.find('(')?;
    let close = open + s[open..].find(')')?;
    let (used, total) = s[open + 1..close].split_once('/')?;
    let used = used.trim().parse().ok()?;
    let total = total.trim().parse().ok()?;

    let pct_at = s.find('%')?;
    let head = &s[..pct_at];
    let start = head
        .rfind(|c: char| !(c.is_ascii_digit() || c == '.'))
        .map(|i| i + head[i..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(0);
    let percent = head[start..].parse().ok()?;

    Some(Ratio { used, total, percent })
}

/// Address cell of a CIDR row: `"203.0.113.0/24\n\t\t(allocation)"` → `"203.0.113.0/24"`.
pub fn address_before_paren(s: &str) -> String {
    let head = s.split('(').next().unwrap_or("");
    normalize_ws(head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_percent_first() {
        let r = parse_ratio("87.50% (224/256)").unwrap();
        assert_eq!((r.used, r.total), (224, 256));
        assert!((r.percent - 87.5).abs() < 1e-9);
    }

    #[test]
    fn ratio_counts_first() {
        let r = parse_ratio("(1/4) 25%").unwrap();
        assert_eq!((r.used, r.total), (1, 4));
        assert!((r.percent - 25.0).abs() < 1e-9);
    }

    #[test]
    fn ratio_rejects_noise() {
        assert_eq!(parse_ratio("-"), None);
        assert_eq!(parse_ratio("50% (a/b)"), None);
        assert_eq!(parse_ratio("(1/2)"), None);
    }

    #[test]
    fn address_cell() {
        assert_eq!(address_before_paren("\n\t\t203.0.113.0/24\n\t(割振)"), "203.0.113.0/24");
        assert_eq!(address_before_paren("  a   b "), "a b");
    }
}

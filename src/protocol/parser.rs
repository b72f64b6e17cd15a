//! Data port announcement parsing

/// Parses the client's decimal port announcement.
///
/// Surrounding whitespace and NUL padding are ignored. Anything that is not
/// a port number yields 0, which callers treat as an aborted session.
pub fn parse_data_port(raw: &[u8]) -> u16 {
    String::from_utf8_lossy(raw)
        .trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .parse()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_padded_ports() {
        assert_eq!(parse_data_port(b"30021"), 30021);
        assert_eq!(parse_data_port(b"1024\0\0"), 1024);
        assert_eq!(parse_data_port(b"65535\n"), 65535);
    }

    #[test]
    fn garbage_yields_zero() {
        assert_eq!(parse_data_port(b""), 0);
        assert_eq!(parse_data_port(b"abc"), 0);
        assert_eq!(parse_data_port(b"-5"), 0);
        assert_eq!(parse_data_port(b"70000"), 0);
        assert_eq!(parse_data_port(b"12ab"), 0);
        assert_eq!(parse_data_port(b"30021x"), 0);
    }
}

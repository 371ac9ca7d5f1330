//! Identifier quoting for generated Cypher.

/// Words that must be back-tick quoted when used as names.
const RESERVED: &[&str] = &[
    "ALL", "AND", "AS", "ASC", "BY", "CALL", "CASE", "CONSTRAINT", "CONTAINS", "CREATE",
    "DELETE", "DESC", "DETACH", "DISTINCT", "DROP", "ELSE", "END", "ENDS", "EXISTS", "FALSE",
    "FOR", "IN", "INDEX", "IS", "KEY", "LIMIT", "MATCH", "MERGE", "NODE", "NOT", "NULL", "ON",
    "OPTIONAL", "OR", "ORDER", "REMOVE", "REQUIRE", "RETURN", "SET", "SKIP", "STARTS", "THEN",
    "TRUE", "UNION", "UNIQUE", "UNWIND", "WHEN", "WHERE", "WITH", "XOR", "YIELD",
];

/// ASCII letter or `_` first, then letters, digits or `_`.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_reserved(s: &str) -> bool {
    RESERVED.iter().any(|kw| kw.eq_ignore_ascii_case(s))
}

/// Return `s` unchanged if it is a plain identifier, otherwise quote it
/// in back-ticks with embedded back-ticks doubled.
pub fn escape_identifier(s: &str) -> String {
    if is_valid_identifier(s) && !is_reserved(s) {
        s.to_string()
    } else {
        format!("`{}`", s.replace('`', "``"))
    }
}

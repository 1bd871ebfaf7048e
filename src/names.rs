//! Encoding-name normalization.
//!
//! The converter backend recognizes the hyphenated Unicode transformation
//! format names ("UTF-8", "UTF-16LE") but rejects the equally common
//! non-hyphenated spellings. This module rewrites those spellings to their
//! canonical forms before they reach the backend; it is a pure string-level
//! compatibility shim and performs no transcoding of its own.

/// Rewrite a non-hyphenated UTF variant name to its canonical hyphenated
/// form, passing every other name through unchanged.
///
/// The "UTF" prefix and an `LE`/`BE` suffix match case-insensitively; the
/// digit group must match exactly. Names that already carry the hyphen, or
/// that continue with anything but a recognized digit group, come back
/// untouched — the function is total and never fails.
///
/// ```rust
/// use recode::names::normalize;
///
/// assert_eq!(normalize("UTF8"), "UTF-8");
/// assert_eq!(normalize("utf16le"), "UTF-16LE");
/// assert_eq!(normalize("UTF-8"), "UTF-8");
/// assert_eq!(normalize("UTF99"), "UTF99");
/// ```
pub fn normalize(name: &str) -> &str {
    let Some(prefix) = name.get(..3) else {
        return name;
    };
    if !prefix.eq_ignore_ascii_case("UTF") || name.len() < 4 {
        return name;
    }

    let rest = &name[3..];
    match rest.as_bytes()[0] {
        b'1' => {
            let s = &rest[1..];
            if s == "6" {
                "UTF-16"
            } else if s.eq_ignore_ascii_case("6LE") {
                "UTF-16LE"
            } else if s.eq_ignore_ascii_case("6BE") {
                "UTF-16BE"
            } else {
                name
            }
        }
        b'3' => {
            let s = &rest[1..];
            if s == "2" {
                "UTF-32"
            } else if s.eq_ignore_ascii_case("2LE") {
                "UTF-32LE"
            } else if s.eq_ignore_ascii_case("2BE") {
                "UTF-32BE"
            } else {
                name
            }
        }
        b'7' if rest.len() == 1 => "UTF-7",
        b'8' if rest.len() == 1 => "UTF-8",
        _ => name,
    }
}

//! Note annotation scanning
//!
//! Database entries carry a free-form note. A tag is written as `<Name>` on
//! any line of that note and matched case-insensitively.

/// Check if a note contains `<tag>` on any of its lines
pub fn has_tag(note: &str, tag: &str) -> bool {
    let needle = format!("<{}>", tag.to_ascii_uppercase());
    note.lines()
        .any(|line| line.to_ascii_uppercase().contains(&needle))
}

/// Collect every tag found in a note, uppercased and in order of appearance
pub fn tags(note: &str) -> Vec<String> {
    let mut found = Vec::new();
    for line in note.lines() {
        let mut rest = line;
        while let Some(start) = rest.find('<') {
            let after = &rest[start + 1..];
            match after.find('>') {
                Some(end) => {
                    let inner = after[..end].trim();
                    if !inner.is_empty() && !inner.contains('<') {
                        found.push(inner.to_ascii_uppercase());
                    }
                    rest = &after[end + 1..];
                }
                None => break,
            }
        }
    }
    found
}

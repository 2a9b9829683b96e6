/// Extensions whose leading dot survives sanitizing, so image asset names keep them.
const EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg"];

const SEPARATOR: char = '_';

pub const DEFAULT_RESERVED_KEYWORDS: &[&str] = &["char"];

/// Turns display text into a lowercase identifier token.
///
/// Runs of non-alphanumeric characters collapse into one `_`, except a `.`
/// that starts a known file extension. A result equal to a reserved keyword
/// gets leading `_`s until it no longer is one.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    reserved: Vec<String>,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_RESERVED_KEYWORDS.iter().map(|s| s.to_string()).collect())
    }
}

impl Sanitizer {
    pub fn new(reserved: Vec<String>) -> Self {
        let reserved = reserved
            .iter()
            .map(|k| sanitize_token(k))
            .filter(|k| !k.is_empty())
            .collect();
        Self { reserved }
    }

    pub fn sanitize(&self, input: &str) -> String {
        let mut out = sanitize_token(input);
        while self.is_reserved(&out) {
            out.insert(0, SEPARATOR);
        }
        out
    }

    pub fn is_reserved(&self, token: &str) -> bool {
        self.reserved.iter().any(|k| k == token)
    }
}

/// Sanitizes with the default reserved keyword list.
pub fn sanitize(input: &str) -> String {
    Sanitizer::default().sanitize(input)
}

fn sanitize_token(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_sep = false;

    for (i, ch) in input.char_indices() {
        if ch == '.' && starts_extension(&input[i + ch.len_utf8()..]) {
            out.push('.');
            last_sep = false;
            continue;
        }

        // Lowercasing can expand to combining marks; those count as separators.
        for lower in ch.to_lowercase() {
            if lower.is_alphanumeric() {
                out.push(lower);
                last_sep = false;
            } else if !last_sep {
                out.push(SEPARATOR);
                last_sep = true;
            }
        }
    }

    out
}

fn starts_extension(rest: &str) -> bool {
    EXTENSIONS.iter().any(|ext| {
        rest.get(..ext.len())
            .map(|head| head.eq_ignore_ascii_case(ext))
            .unwrap_or(false)
            && !rest[ext.len()..]
                .chars()
                .next()
                .map(char::is_alphanumeric)
                .unwrap_or(false)
    })
}

//! File-name safety for user-supplied names.

/// Characters Windows refuses in file names. Names containing them are rejected upstream.
pub const FORBIDDEN_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

const DOCUMENT_PREFIX: &str = "Αποδειξη";

/// First forbidden character in `s`, if any.
pub fn find_forbidden(s: &str) -> Option<char> {
    s.chars().find(|c| FORBIDDEN_CHARS.contains(c))
}

/// Whitespace runs become `_`; forbidden and control characters are dropped.
pub fn sanitize_component(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| !FORBIDDEN_CHARS.contains(c) && !c.is_control())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// `Αποδειξη-<number>-<payer>.<extension>`, deterministic for a given number and payer.
pub fn document_file_name(receipt_number: u64, payer: &str, extension: &str) -> String {
    let payer = sanitize_component(payer);
    if payer.is_empty() {
        format!("{DOCUMENT_PREFIX}-{receipt_number}.{extension}")
    } else {
        format!("{DOCUMENT_PREFIX}-{receipt_number}-{payer}.{extension}")
    }
}

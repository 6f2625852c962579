use unicode_normalization::UnicodeNormalization;

/// Render text in the canonical form stored by the catalog.
///
/// The input is NFC-normalized and lowercased, then every whitespace
/// separated word gets an uppercase first character. Words are rejoined
/// with single spaces, so `"  the   BEATLES "` becomes `"The Beatles"`.
///
/// Every write path runs names through here, which is what lets
/// `"sia"` and `"Sia"` collapse onto the same dimension row.
pub fn format_text(input: &str) -> String {
    let lowered = input.nfc().collect::<String>().to_lowercase();

    lowered
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

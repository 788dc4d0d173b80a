//! Input sanitization
//!
//! Escapes HTML-significant characters in untrusted client text before it is
//! stored in history or broadcast to other clients.

/// Escape the HTML-significant characters in `input`.
///
/// Replaces `&`, `<`, `>` and `"` with their entity equivalents. Ampersand is
/// escaped first so already-produced entities are not escaped twice within a
/// single pass.
pub fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

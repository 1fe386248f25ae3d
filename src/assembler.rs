/*!
 * Document assembly.
 *
 * The final document is the concatenation of the current translation of
 * every batch in ascending id order. Assembly is deterministic: the same
 * set of results always yields byte-identical output.
 */

/// Assembles batch translations into one document.
pub struct Assembler;

impl Assembler {
    /// Join batch translations in ascending id order, separated by blank
    /// lines. Empty parts are skipped.
    pub fn assemble(mut parts: Vec<(u32, String)>) -> String {
        parts.sort_by_key(|(id, _)| *id);
        let mut document = String::new();
        for (_, text) in parts {
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            if !document.is_empty() {
                document.push_str("\n\n");
            }
            document.push_str(text);
        }
        if !document.is_empty() {
            document.push('\n');
        }
        document
    }
}

/// Rewrites an attachment filename so it is safe on any filesystem:
/// every character that is not alphanumeric becomes an underscore.
/// The result has the same number of characters as the input.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

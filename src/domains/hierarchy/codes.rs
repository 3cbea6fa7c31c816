/// Derivation of level codes for newly created entities.
///
/// A derived code is the parent's code plus a short uppercased prefix of
/// the new entity's name, e.g. district "KLA" + county "Nakawa" =>
/// "KLA-NAK". Callers may always supply an explicit code instead.

const PREFIX_LEN: usize = 3;

/// Uppercased alphanumeric prefix of a name
pub fn name_prefix(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(PREFIX_LEN)
        .collect::<String>()
        .to_uppercase()
}

/// Derive a child code from the parent's code and the child's name
pub fn derive_code(parent_code: &str, name: &str) -> String {
    let prefix = name_prefix(name);
    if prefix.is_empty() {
        parent_code.to_string()
    } else {
        format!("{}-{}", parent_code, prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_prefix() {
        assert_eq!(name_prefix("Nakawa"), "NAK");
        assert_eq!(name_prefix("st. Peter"), "STP");
        assert_eq!(name_prefix("Ki"), "KI");
        assert_eq!(name_prefix("---"), "");
    }

    #[test]
    fn test_derive_code() {
        assert_eq!(derive_code("KLA", "Nakawa"), "KLA-NAK");
        assert_eq!(derive_code("UG-KLA", "Kisenyi Central"), "UG-KLA-KIS");
        assert_eq!(derive_code("KLA", "--"), "KLA");
    }
}

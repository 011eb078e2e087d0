use playpen_snippet::SnippetId;
use rand::Rng;

/// Length of generated snippet ids (~103 bits over a base-36 alphabet).
pub const SNIPPET_ID_LEN: usize = 20;

/// Generate a short lowercase alphanumeric id.
pub fn generate_id(len: usize) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

pub fn generate_snippet_id() -> SnippetId {
    SnippetId::try_from(generate_id(SNIPPET_ID_LEN))
        .unwrap_or_else(|_| unreachable!("generated ids use the id alphabet"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_shape() {
        let id = generate_snippet_id();
        assert_eq!(id.as_str().len(), SNIPPET_ID_LEN);
        assert!(id
            .as_str()
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
    }

    #[test]
    fn test_ids_do_not_repeat() {
        let ids: HashSet<String> = (0..1_000).map(|_| generate_id(SNIPPET_ID_LEN)).collect();
        assert_eq!(ids.len(), 1_000);
    }
}

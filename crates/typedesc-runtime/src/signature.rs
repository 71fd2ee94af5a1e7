//! Generic signature splitting.
//!
//! Supertype declarations are written as signature strings such as
//! `java.util.AbstractMap<K, V>`. These helpers split them into a base name
//! and top-level argument strings without resolving anything.

/// Split a signature into its base name and top-level argument strings.
///
/// Returns `None` when the angle brackets are unbalanced, the arguments are
/// empty (`List<>`), or text follows the closing bracket.
///
/// # Examples
///
/// ```
/// use typedesc_runtime::signature::split_signature;
///
/// let (base, args) = split_signature("java.util.Map<K, java.util.List<V>>").unwrap();
/// assert_eq!(base, "java.util.Map");
/// assert_eq!(args, vec!["K", "java.util.List<V>"]);
/// ```
pub fn split_signature(signature: &str) -> Option<(&str, Vec<&str>)> {
    let signature = signature.trim();
    let Some(angle_pos) = signature.find('<') else {
        if signature.is_empty() || signature.contains('>') || signature.contains(',') {
            return None;
        }
        return Some((signature, Vec::new()));
    };

    let base = signature[..angle_pos].trim();
    let inner = signature[angle_pos + 1..].strip_suffix('>')?;
    if base.is_empty() || inner.trim().is_empty() || !balanced(inner) {
        return None;
    }

    let args = split_type_params(inner);
    if args.iter().any(|a| a.is_empty()) {
        return None;
    }
    Some((base, args))
}

/// Split type parameters respecting nested angle brackets.
///
/// Given "A, B<C, D>, E", returns ["A", "B<C, D>", "E"] by tracking bracket depth.
pub fn split_type_params(s: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                result.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    if start <= s.len() {
        result.push(s[start..].trim());
    }

    result
}

fn balanced(s: &str) -> bool {
    let mut depth = 0i64;
    for c in s.chars() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

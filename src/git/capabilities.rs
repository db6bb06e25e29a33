//! Capability list handling for the rewritten `HEAD` line

/// Prefix of the capability announcing where `HEAD` points
pub const SYMREF_PREFIX: &str = "symref=";

/// Replacement prefix for a symref that no longer describes `HEAD`
pub const OLDREF_PREFIX: &str = "oldref=";

/// Renames every `symref=` capability to `oldref=`.
///
/// Other capabilities keep their order and spelling.
pub fn demote_symrefs(capabilities: &str) -> String {
    capabilities
        .split(' ')
        .map(|token| match token.strip_prefix(SYMREF_PREFIX) {
            Some(target) => format!("{}{}", OLDREF_PREFIX, target),
            None => token.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capability list for a `HEAD` line pointing at `target`.
///
/// Branches get a fresh `symref=HEAD:<branch>` in front of the preserved list.
/// Tags keep only the preserved list.
/// Returns `None` when nothing is left to advertise.
pub fn head_capabilities(target: &str, preserved: &str) -> Option<String> {
    let symref = target
        .starts_with("refs/heads/")
        .then(|| format!("{}HEAD:{}", SYMREF_PREFIX, target));

    match (symref, preserved.is_empty()) {
        (Some(symref), true) => Some(symref),
        (Some(symref), false) => Some(format!("{} {}", symref, preserved)),
        (None, true) => None,
        (None, false) => Some(preserved.to_string()),
    }
}

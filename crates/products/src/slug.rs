//! URL slugs derived from display names.

use catalog_core::{DomainError, DomainResult};

/// Lower-kebab slug: ASCII alphanumerics are kept (lowercased), every other
/// run of characters collapses to a single `-`, and leading/trailing dashes
/// are dropped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Validate a display name and derive its slug.
pub(crate) fn name_and_slug(name: &str, max: usize) -> DomainResult<(String, String)> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name", "is required"));
    }
    if name.chars().count() > max {
        return Err(DomainError::validation(
            "name",
            format!("cannot exceed {max} characters"),
        ));
    }

    let slug = slugify(name);
    if slug.is_empty() {
        return Err(DomainError::validation(
            "name",
            "must contain at least one letter or digit",
        ));
    }

    Ok((name.to_string(), slug))
}

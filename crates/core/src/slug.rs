use std::collections::{HashMap, HashSet};

/// Anchor slug for heading text: every run of characters outside
/// `[A-Za-z0-9]` becomes a single `-`, the rest is lowercased.
///
/// # Examples
///
/// ```
/// use dxmd_core::slug::slugify;
///
/// assert_eq!(slugify("Getting Started"), "getting-started");
/// assert_eq!(slugify("POST /api/v2/users"), "post-api-v2-users");
/// ```
pub fn slugify(text: &str) -> String {
    slug_with(text, '-')
}

/// Older anchor form that joins words with `_`. Existing pages still link to it.
pub fn legacy_slug(text: &str) -> String {
    slug_with(text, '_')
}

fn slug_with(text: &str, separator: char) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut in_run = false;

    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            in_run = false;
        } else if !in_run {
            slug.push(separator);
            in_run = true;
        }
    }

    slug
}

/// De-duplicates heading slugs in document order.
///
/// The first occurrence keeps its slug; later ones get `-1`, `-2`, ...
/// skipping any candidate that is already taken.
#[derive(Debug, Default)]
pub struct HeadingIds {
    taken: HashSet<String>,
    counts: HashMap<String, usize>,
}

impl HeadingIds {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a unique id for `slug` and marks it as taken.
    pub fn next_id(&mut self, slug: &str) -> String {
        if self.taken.insert(slug.to_string()) {
            self.counts.entry(slug.to_string()).or_insert(0);
            return slug.to_string();
        }

        let count = self.counts.entry(slug.to_string()).or_insert(0);
        loop {
            *count += 1;
            let candidate = format!("{}-{}", slug, count);
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    /// Reserves a slug so future ids won't collide with it.
    pub fn reserve(&mut self, slug: &str) {
        self.taken.insert(slug.to_string());
    }

    /// Whether `slug` has already been handed out or reserved.
    pub fn contains(&self, slug: &str) -> bool {
        self.taken.contains(slug)
    }
}

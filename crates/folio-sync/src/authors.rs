//! Author name normalization
//!
//! Publication indexes abbreviate names ("J Doe", "J. Doe", "Doe"). The
//! lookup maps such abbreviations back to full names already known from the
//! site owner and the persisted records.

use std::collections::HashMap;

use folio_domain::PublicationStore;

/// Persisted author strings this short are not trusted to be full names
const MIN_FULL_NAME_CHARS: usize = 3;

/// Lowercased abbreviations of a full name.
///
/// For "Jane Doe": `j doe`, `j. doe`, `jdoe`, `jane`, `doe`. Names with a
/// single token have no abbreviations.
pub fn abbreviations(full_name: &str) -> Vec<String> {
    let tokens: Vec<&str> = full_name.split_whitespace().collect();
    let (first, last) = match tokens.as_slice() {
        [first, .., last] => (first.to_lowercase(), last.to_lowercase()),
        _ => return Vec::new(),
    };
    let initial = match first.chars().next() {
        Some(c) => c,
        None => return Vec::new(),
    };

    vec![
        format!("{} {}", initial, last),
        format!("{}. {}", initial, last),
        format!("{}{}", initial, last),
        first,
        last,
    ]
}

/// Case-insensitive abbreviation to full name table
#[derive(Debug, Clone, Default)]
pub struct AuthorLookup {
    names: HashMap<String, String>,
}

impl AuthorLookup {
    /// Build the table from the owner's name and every persisted author.
    ///
    /// The first mapping written for a key is kept, and the owner's name is
    /// written first.
    pub fn build(owner: &str, store: &PublicationStore) -> Self {
        let mut lookup = Self::default();
        lookup.insert_name(owner);

        for (_, record) in store.records() {
            for author in &record.authors {
                if author.chars().count() > MIN_FULL_NAME_CHARS {
                    lookup.insert_name(author);
                }
            }
        }

        lookup
    }

    fn insert_name(&mut self, full_name: &str) {
        let full_name = full_name.trim();
        for key in abbreviations(full_name) {
            self.names
                .entry(key)
                .or_insert_with(|| full_name.to_string());
        }
    }

    /// Full name for an author string, or the trimmed input when unknown
    pub fn resolve(&self, author: &str) -> String {
        let trimmed = author.trim();
        self.names
            .get(&trimmed.to_lowercase())
            .cloned()
            .unwrap_or_else(|| trimmed.to_string())
    }

    pub fn normalize(&self, authors: &[String]) -> Vec<String> {
        authors.iter().map(|a| self.resolve(a)).collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Expand abbreviated authors against the owner and the store
pub fn normalize_authors(authors: &[String], store: &PublicationStore, owner: &str) -> Vec<String> {
    AuthorLookup::build(owner, store).normalize(authors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_domain::PublicationRecord;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_abbreviations() {
        assert_eq!(
            abbreviations("Jane Doe"),
            names(&["j doe", "j. doe", "jdoe", "jane", "doe"])
        );
        // Middle names are skipped
        assert_eq!(abbreviations("Jane Q Doe")[0], "j doe");
        assert!(abbreviations("Plato").is_empty());
        assert!(abbreviations("   ").is_empty());
    }

    #[test]
    fn test_owner_abbreviations() {
        let store = PublicationStore::new();
        let authors = names(&["J Doe", " j. doe ", "Doe", "Someone Else "]);
        assert_eq!(
            normalize_authors(&authors, &store, "Jane Doe"),
            names(&["Jane Doe", "Jane Doe", "Jane Doe", "Someone Else"])
        );
    }

    #[test]
    fn test_store_authors() {
        let mut store = PublicationStore::new();
        store.push(
            "2024",
            PublicationRecord::new("Paper", names(&["Jane Doe", "Ada Lovelace", "A B"])),
        );

        let lookup = AuthorLookup::build("Jane Doe", &store);
        assert_eq!(lookup.resolve("A Lovelace"), "Ada Lovelace");
        assert_eq!(lookup.resolve("ALOVELACE"), "Ada Lovelace");
        // "A B" is too short to be trusted as a full name
        assert_eq!(lookup.resolve("a b"), "a b");
    }

    #[test]
    fn test_owner_wins_collisions() {
        let mut store = PublicationStore::new();
        store.push(
            "2024",
            PublicationRecord::new("Paper", names(&["John Doe", "Jane Doe"])),
        );

        let lookup = AuthorLookup::build("Jane Doe", &store);
        assert_eq!(lookup.resolve("J Doe"), "Jane Doe");
        assert_eq!(lookup.resolve("Doe"), "Jane Doe");
        assert_eq!(lookup.resolve("John"), "John Doe");
    }

    #[test]
    fn test_first_store_author_wins() {
        let mut store = PublicationStore::new();
        store.push("2025", PublicationRecord::new("A", names(&["Mark Smith"])));
        store.push("2024", PublicationRecord::new("B", names(&["Mary Smith"])));

        let lookup = AuthorLookup::build("Jane Doe", &store);
        assert_eq!(lookup.resolve("M. Smith"), "Mark Smith");
        assert_eq!(lookup.resolve("Mary"), "Mary Smith");
    }

    #[test]
    fn test_empty_owner() {
        let lookup = AuthorLookup::build("", &PublicationStore::new());
        assert!(lookup.is_empty());
        assert_eq!(lookup.resolve(" X "), "X");
    }
}

//! Query matching over the in-memory product list.
//!
//! Matching is a pure function of (query, products): no mutation, no I/O,
//! linear in the total candidate text length. A product matches when the
//! query is a substring of its title or description, compared either
//! directly (lowercased) or through the transliteration table, so a
//! Latin-typed query finds Cyrillic text and vice versa.

use crate::product::Product;
use crate::translit;

/// Both comparison forms of one piece of text: the lowercased original and
/// its transliteration. Computed once per side; product fields are indexed
/// at load time so a keystroke only normalizes the query.
#[derive(Debug, Clone)]
pub struct SearchText {
    lower: String,
    translit: String,
}

impl SearchText {
    pub fn new(s: &str) -> Self {
        let lower = s.to_lowercase();
        let translit = translit::transliterate(&lower);
        Self { lower, translit }
    }

    /// Substring test against another normalized text. An empty needle
    /// matches everything, which is the "show all" state of an empty query.
    fn contains(&self, needle: &SearchText) -> bool {
        self.lower.contains(&needle.lower) || self.translit.contains(&needle.translit)
    }
}

/// Precomputed comparison forms of one product's searchable fields.
#[derive(Debug, Clone)]
pub struct ProductIndex {
    title: SearchText,
    description: SearchText,
}

impl ProductIndex {
    pub fn new(product: &Product) -> Self {
        Self {
            title: SearchText::new(&product.title),
            description: SearchText::new(&product.description),
        }
    }

    /// The four-way match predicate: raw or transliterated query against
    /// title or description.
    pub fn matches(&self, query: &SearchText) -> bool {
        self.title.contains(query) || self.description.contains(query)
    }
}

/// Filter a product list by a raw query string, preserving input order.
pub fn filter_products<'a>(query: &str, products: &'a [Product]) -> Vec<&'a Product> {
    let query = SearchText::new(query);
    products
        .iter()
        .filter(|p| ProductIndex::new(p).matches(&query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, title: &str, description: &str) -> Product {
        Product {
            id,
            title: title.to_string(),
            description: description.to_string(),
            details: None,
            image: String::new(),
            reverse: None,
        }
    }

    fn sample_catalog() -> Vec<Product> {
        vec![product(1, "Шапка", "Тёплая"), product(2, "Hat", "Warm")]
    }

    #[test]
    fn test_empty_query_returns_all_in_order() {
        let products = sample_catalog();
        let filtered = filter_products("", &products);
        let ids: Vec<i64> = filtered.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_transliterated_query_matches_cyrillic_title() {
        let products = sample_catalog();
        let filtered = filter_products("shapka", &products);
        let ids: Vec<i64> = filtered.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_latin_query_matches_latin_description() {
        let products = sample_catalog();
        let filtered = filter_products("warm", &products);
        let ids: Vec<i64> = filtered.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_cyrillic_query_matches_latin_text() {
        // Symmetry: "москва" transliterates to "moskva" and must find the
        // Latin-typed title.
        let products = vec![product(5, "Moskva tour", "")];
        assert_eq!(filter_products("Москва", &products).len(), 1);
        // And the other direction.
        let products = vec![product(6, "Москва", "")];
        assert_eq!(filter_products("moskva", &products).len(), 1);
    }

    #[test]
    fn test_case_insensitive() {
        let products = sample_catalog();
        assert_eq!(filter_products("ШАПКА", &products).len(), 1);
        assert_eq!(filter_products("WaRm", &products).len(), 1);
    }

    #[test]
    fn test_description_participates_in_matching() {
        let products = sample_catalog();
        let filtered = filter_products("tyoplaya", &products);
        let ids: Vec<i64> = filtered.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_raw_substring_match_implies_inclusion() {
        // Monotonic inclusion: whenever the plain lowercase test succeeds,
        // the product is in the result.
        let products = sample_catalog();
        for p in &products {
            for q in ["ша", "hat", "arm", "тёпл"] {
                if p.title.to_lowercase().contains(&q.to_lowercase())
                    || p.description.to_lowercase().contains(&q.to_lowercase())
                {
                    assert!(
                        filter_products(q, &products).iter().any(|m| m.id == p.id),
                        "query {:?} should include product {}",
                        q,
                        p.id
                    );
                }
            }
        }
    }

    #[test]
    fn test_query_longer_than_any_field_matches_nothing() {
        let products = sample_catalog();
        let filtered = filter_products("a query far longer than any field content", &products);
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_filter_is_stable() {
        let products = vec![
            product(3, "Шарф", "Шерсть"),
            product(1, "Шапка", "Шерсть"),
            product(2, "Шуба", "Шерсть"),
        ];
        let ids: Vec<i64> = filter_products("sh", &products).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let products = sample_catalog();
        let before: Vec<String> = products.iter().map(|p| p.title.clone()).collect();
        let _ = filter_products("shapka", &products);
        let after: Vec<String> = products.iter().map(|p| p.title.clone()).collect();
        assert_eq!(before, after);
    }
}

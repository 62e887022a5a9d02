use serde::Deserialize;

/// A single catalog item as returned by the remote API.
///
/// Products are immutable once fetched: the client never writes them back,
/// it only filters and displays them. Text fields the API may omit
/// deserialize as empty strings so a sparse record never aborts a whole
/// catalog fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub details: Option<String>,
    /// Relative path of the product image asset. Rendered as-is.
    #[serde(default)]
    pub image: String,
    /// Layout hint from the API (mirrored card orientation). Not used
    /// by search matching.
    #[serde(default)]
    pub reverse: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_record() {
        let product: Product = serde_json::from_str(
            r#"{
                "id": 3,
                "title": "Шапка",
                "description": "Тёплая",
                "details": "Шерстяная шапка на зиму",
                "image": "img/hat.jpg",
                "reverse": true
            }"#,
        )
        .unwrap();

        assert_eq!(product.id, 3);
        assert_eq!(product.title, "Шапка");
        assert_eq!(product.description, "Тёплая");
        assert_eq!(product.details.as_deref(), Some("Шерстяная шапка на зиму"));
        assert_eq!(product.image, "img/hat.jpg");
        assert_eq!(product.reverse, Some(true));
    }

    #[test]
    fn test_missing_text_fields_default_to_empty() {
        let product: Product = serde_json::from_str(r#"{"id": 7}"#).unwrap();

        assert_eq!(product.id, 7);
        assert_eq!(product.title, "");
        assert_eq!(product.description, "");
        assert_eq!(product.details, None);
        assert_eq!(product.image, "");
        assert_eq!(product.reverse, None);
    }

    #[test]
    fn test_id_is_required() {
        let result: Result<Product, _> = serde_json::from_str(r#"{"title": "Hat"}"#);
        assert!(result.is_err());
    }
}

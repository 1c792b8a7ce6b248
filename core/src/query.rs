//! Optional filter to query-string mapping.
//!
//! A filter key goes on the wire only when its value is truthy: present,
//! non-empty for strings, non-zero for numbers. Falsy values are dropped
//! entirely rather than sent as `key=`.

use url::form_urlencoded;

/// A value that may appear in a query string.
pub trait QueryValue {
    /// The wire form of the value, or `None` when it is falsy.
    fn to_query_value(&self) -> Option<String>;
}

impl QueryValue for str {
    fn to_query_value(&self) -> Option<String> {
        (!self.is_empty()).then(|| self.to_string())
    }
}

impl QueryValue for String {
    fn to_query_value(&self) -> Option<String> {
        self.as_str().to_query_value()
    }
}

impl QueryValue for u64 {
    fn to_query_value(&self) -> Option<String> {
        (*self != 0).then(|| self.to_string())
    }
}

impl<T: QueryValue + ?Sized> QueryValue for &T {
    fn to_query_value(&self) -> Option<String> {
        (**self).to_query_value()
    }
}

impl<T: QueryValue> QueryValue for Option<T> {
    fn to_query_value(&self) -> Option<String> {
        self.as_ref().and_then(QueryValue::to_query_value)
    }
}

/// Keep only the candidates whose value is truthy, preserving input order.
pub fn query_params(candidates: &[(&str, &dyn QueryValue)]) -> Vec<(String, String)> {
    candidates
        .iter()
        .filter_map(|(name, value)| value.to_query_value().map(|v| (name.to_string(), v)))
        .collect()
}

/// Percent-encode query pairs, or `None` when there are none.
pub(crate) fn encode(params: &[(String, String)]) -> Option<String> {
    if params.is_empty() {
        return None;
    }
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, value);
    }
    Some(serializer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_values_are_kept_in_order() {
        let group_id: Option<u64> = Some(7);
        let group_name = Some("Daily".to_string());
        let candidates: [(&str, &dyn QueryValue); 2] =
            [("group_id", &group_id), ("group_name", &group_name)];
        let params = query_params(&candidates);
        assert_eq!(
            params,
            vec![
                ("group_id".to_string(), "7".to_string()),
                ("group_name".to_string(), "Daily".to_string()),
            ]
        );
    }

    #[test]
    fn falsy_values_are_omitted() {
        let none: Option<String> = None;
        let empty = Some(String::new());
        let zero: Option<u64> = Some(0);
        let candidates: [(&str, &dyn QueryValue); 3] = [("a", &none), ("b", &empty), ("c", &zero)];
        let params = query_params(&candidates);
        assert!(params.is_empty());
    }

    #[test]
    fn encode_empty_is_none() {
        assert_eq!(encode(&[]), None);
    }

    #[test]
    fn encode_escapes_reserved_characters() {
        let params = vec![("name".to_string(), "a&b=c".to_string())];
        assert_eq!(encode(&params).as_deref(), Some("name=a%26b%3Dc"));
    }
}

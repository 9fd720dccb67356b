use serde::{Deserialize, Deserializer};

/// Para campos `Option<Option<T>>` em PATCH: ausente = `None`,
/// `null` = `Some(None)`, valor = `Some(Some(v))`.
/// Usar junto com `#[serde(default)]`.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Aplica uma alteração anulável sobre o valor atual.
pub fn apply<T>(current: Option<T>, change: Option<Option<T>>) -> Option<T> {
    match change {
        Some(new_value) => new_value,
        None => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_some")]
        assign_to: Option<Option<i64>>,
    }

    #[test]
    fn distinguishes_absent_null_and_value() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"assign_to": null}"#).unwrap();
        let value: Patch = serde_json::from_str(r#"{"assign_to": 4}"#).unwrap();
        assert_eq!(absent.assign_to, None);
        assert_eq!(null.assign_to, Some(None));
        assert_eq!(value.assign_to, Some(Some(4)));
    }

    #[test]
    fn apply_keeps_or_replaces() {
        assert_eq!(apply(Some(1), None), Some(1));
        assert_eq!(apply(Some(1), Some(None)), None);
        assert_eq!(apply(None, Some(Some(2))), Some(2));
    }
}

use thiserror::Error;

/// Separator placed before the object type and after every component.
pub const COMPOSITE_KEY_SEPARATOR: char = '\u{0}';

/// Highest code point; reserved by the ledger for range-query bounds.
const MAX_UNICODE_RUNE: char = '\u{10FFFF}';

/// Errors from composite-key construction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompositeKeyError {
    #[error("object type must not be empty")]
    EmptyObjectType,

    #[error("composite key component {index} contains a reserved character: {component:?}")]
    ReservedCharacter { index: usize, component: String },
}

fn validate(index: usize, component: &str) -> Result<(), CompositeKeyError> {
    if component.contains(COMPOSITE_KEY_SEPARATOR) || component.contains(MAX_UNICODE_RUNE) {
        return Err(CompositeKeyError::ReservedCharacter {
            index,
            component: component.to_string(),
        });
    }
    Ok(())
}

/// Build the canonical composite key for `object_type` and `attributes`.
///
/// Layout: `\0 object_type \0 (attribute \0)*`. Component 0 is the object
/// type; attribute `i` is component `i + 1` in errors.
///
/// Stricter than the peer's `CreateCompositeKey`: an empty object type,
/// which the peer accepts for partial-key range queries, is rejected here.
/// Assertions always name a full key.
pub fn build_composite_key<S: AsRef<str>>(
    object_type: &str,
    attributes: &[S],
) -> Result<String, CompositeKeyError> {
    if object_type.is_empty() {
        return Err(CompositeKeyError::EmptyObjectType);
    }
    validate(0, object_type)?;

    let capacity = 2 + object_type.len()
        + attributes
            .iter()
            .map(|attr| attr.as_ref().len() + 1)
            .sum::<usize>();
    let mut key = String::with_capacity(capacity);
    key.push(COMPOSITE_KEY_SEPARATOR);
    key.push_str(object_type);
    key.push(COMPOSITE_KEY_SEPARATOR);

    for (i, attr) in attributes.iter().enumerate() {
        let attr = attr.as_ref();
        validate(i + 1, attr)?;
        key.push_str(attr);
        key.push(COMPOSITE_KEY_SEPARATOR);
    }

    Ok(key)
}

/// Split a composite key back into its object type and attributes.
///
/// Returns `None` if `key` is not in composite form.
pub fn split_composite_key(key: &str) -> Option<(String, Vec<String>)> {
    let body = key.strip_prefix(COMPOSITE_KEY_SEPARATOR)?;
    let body = body.strip_suffix(COMPOSITE_KEY_SEPARATOR)?;
    let mut components = body.split(COMPOSITE_KEY_SEPARATOR).map(str::to_string);
    let object_type = components.next().filter(|t| !t.is_empty())?;
    Some((object_type, components.collect()))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn layout_matches_ledger_encoding() {
        let key = build_composite_key("com.example.SimpleAsset", &["id1"]).unwrap();
        assert_eq!(key, "\u{0}com.example.SimpleAsset\u{0}id1\u{0}");
    }

    #[test]
    fn no_attributes() {
        let key = build_composite_key::<&str>("asset", &[]).unwrap();
        assert_eq!(key, "\u{0}asset\u{0}");
        assert_eq!(split_composite_key(&key), Some(("asset".to_string(), vec![])));
    }

    #[test]
    fn rejects_reserved_characters() {
        assert_eq!(
            build_composite_key("asset", &["ok", "bad\u{0}"]),
            Err(CompositeKeyError::ReservedCharacter {
                index: 2,
                component: "bad\u{0}".into()
            })
        );
        assert!(build_composite_key("as\u{10FFFF}set", &["a"]).is_err());
    }

    #[test]
    fn empty_object_type_is_rejected() {
        assert_eq!(
            build_composite_key("", &["a"]),
            Err(CompositeKeyError::EmptyObjectType)
        );
        assert_eq!(
            build_composite_key::<&str>("", &[]),
            Err(CompositeKeyError::EmptyObjectType)
        );
    }

    #[test]
    fn split_rejects_simple_keys() {
        assert_eq!(split_composite_key("plain-key"), None);
        assert_eq!(split_composite_key("\u{0}\u{0}"), None);
    }

    proptest! {
        #[test]
        fn split_inverts_build(object_type in "[a-zA-Z.]{1,16}", attrs in proptest::collection::vec("[^\u{0}]{0,8}", 0..5)) {
            prop_assume!(attrs.iter().all(|a| !a.contains(MAX_UNICODE_RUNE)));
            let key = build_composite_key(&object_type, &attrs).unwrap();
            prop_assert_eq!(split_composite_key(&key), Some((object_type, attrs)));
        }

        #[test]
        fn distinct_attributes_never_collide(
            a in proptest::collection::vec("[a-z0-9]{0,6}", 0..4),
            b in proptest::collection::vec("[a-z0-9]{0,6}", 0..4),
        ) {
            prop_assume!(a != b);
            let ka = build_composite_key("asset", &a).unwrap();
            let kb = build_composite_key("asset", &b).unwrap();
            prop_assert_ne!(ka, kb);
        }
    }
}

//! Property-based tests for row value mapping.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;

use odkx_core::reshape::map_row_values;
use odkx_core::resource::DataKeyValue;

fn arb_base() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,12}"
}

fn arb_suffix() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "",
        "_contentType",
        "_CONTENTTYPE",
        "_contenttype",
        "_uriFragment",
        "_URIFRAGMENT",
        "_urifragment",
    ])
}

fn arb_column() -> impl Strategy<Value = DataKeyValue> {
    (arb_base(), arb_suffix(), proptest::option::of("[ -~]{0,16}")).prop_map(
        |(base, suffix, value)| DataKeyValue {
            column: format!("{base}{suffix}"),
            value,
        },
    )
}

proptest! {
    #[test]
    fn content_type_columns_never_appear(values in prop::collection::vec(arb_column(), 0..24)) {
        let mapped = map_row_values(&values);
        for key in mapped.keys() {
            prop_assert!(!key.to_ascii_lowercase().ends_with("_contenttype"));
        }
    }

    #[test]
    fn uri_fragment_columns_map_to_base_name(
        base in arb_base(),
        suffix in prop::sample::select(vec!["_uriFragment", "_URIFRAGMENT", "_UriFragment"]),
        value in "[ -~]{0,16}",
    ) {
        // A base that itself ends in a suffix would be rewritten again; keep it plain.
        prop_assume!(!base.ends_with("_contenttype") && !base.ends_with("_urifragment"));

        let column = format!("{base}{suffix}");
        let mapped = map_row_values(&[DataKeyValue::new(column.clone(), Some(value.as_str()))]);

        prop_assert_eq!(mapped.len(), 1);
        prop_assert_eq!(mapped.get(&base), Some(&Some(value)));
        prop_assert!(!mapped.contains_key(&column));
    }

    #[test]
    fn plain_columns_pass_through(values in prop::collection::vec(arb_column(), 0..24)) {
        let mapped = map_row_values(&values);
        let last_plain = values
            .iter()
            .rev()
            .find(|kv| {
                let lower = kv.column.to_ascii_lowercase();
                !lower.ends_with("_contenttype") && !lower.ends_with("_urifragment")
            });

        if let Some(kv) = last_plain {
            prop_assert!(mapped.contains_key(&kv.column));
        }
        prop_assert!(mapped.len() <= values.len());
    }
}


use proptest::prelude::*;
use rulescribe::{
    build, decide, merge, parse_path, parse_token, Config, DocBlock, Inferrer, Input, Method,
    PresencePolicy, RawRuleSet, Route, RuleSet, MULTIPART_MEDIA_TYPE, WARNING_MARKER,
};
use strategies::{arb_source, arb_sources, GenSource, KEYS, SCALAR_TOKENS, UNTYPED_TOKENS};

fn resolve(src: &GenSource) -> RuleSet {
    src.to_raw().resolve(8).expect("generated paths are well formed")
}

// ---------------------------------------------------------------------------
// Invariant 1: Merge identity and union
//
// Merging a single set gives it back unchanged, and the merged set contains
// exactly the union of the input paths.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn merge_singleton_is_identity(src in arb_source()) {
        let set = resolve(&src);
        prop_assert_eq!(&merge(vec![set.clone()], PresencePolicy::LatestSource), &set);
        prop_assert_eq!(&merge(vec![set.clone()], PresencePolicy::Accumulate), &set);
    }

    #[test]
    fn merge_is_pathwise_union(sources in arb_sources()) {
        let sets: Vec<RuleSet> = sources.iter().map(resolve).collect();
        let merged = merge(sets.clone(), PresencePolicy::default());
        for set in &sets {
            for path in set.paths() {
                prop_assert!(merged.contains(path), "lost path {}", path);
            }
        }
        let distinct: std::collections::HashSet<_> =
            sets.iter().flat_map(|s| s.paths()).collect();
        prop_assert_eq!(merged.len(), distinct.len());
    }
}

// ---------------------------------------------------------------------------
// Invariant 2: Tree shape
//
// Every declared top-level key appears at the root in first-declared order,
// and a parent receives its child no matter which was declared first.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn root_keys_follow_declaration_order(src in arb_source()) {
        let set = resolve(&src);
        let Some(root) = build(&set) else {
            prop_assert!(set.is_empty());
            return Ok(());
        };
        let mut expected: Vec<&str> = Vec::new();
        for path in set.paths() {
            let key = path.root_key();
            if !expected.contains(&key) {
                expected.push(key);
            }
        }
        let actual: Vec<&str> = root.properties.keys().map(String::as_str).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn parent_exists_before_child(
        parent in prop::sample::select(KEYS),
        child in prop::sample::select(KEYS),
        parent_token in prop::sample::select(UNTYPED_TOKENS),
        child_token in prop::sample::select(SCALAR_TOKENS),
        child_first in any::<bool>(),
    ) {
        let child_path = format!("{parent}.{child}");
        let raw = if child_first {
            RawRuleSet::structured()
                .field(child_path.as_str(), child_token)
                .field(parent, parent_token)
        } else {
            RawRuleSet::structured()
                .field(parent, parent_token)
                .field(child_path.as_str(), child_token)
        };
        let root = build(&raw.resolve(8).unwrap()).unwrap();
        let node = &root.get(parent).unwrap().schema;
        let obj = node.as_object().expect("parent must become an object");
        prop_assert!(obj.get(child).is_some());
    }
}

// ---------------------------------------------------------------------------
// Invariant 3: Placement
//
// Body-allowing methods pick multipart exactly when the tree holds a binary
// leaf; body-forbidding methods flatten the root one parameter per field.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn multipart_iff_binary_leaf(sources in arb_sources()) {
        let merged = merge(sources.iter().map(resolve).collect(), PresencePolicy::default());
        let root = build(&merged);
        let Some(Input::Body(body)) = decide(Method::Post, root.as_ref(), None) else {
            return Err(TestCaseError::fail("POST always has a body"));
        };
        prop_assert_eq!(
            body.media_type == MULTIPART_MEDIA_TYPE,
            body.schema.contains_binary()
        );
    }

    #[test]
    fn get_flattens_top_level(sources in arb_sources()) {
        let merged = merge(sources.iter().map(resolve).collect(), PresencePolicy::default());
        let root = build(&merged);
        match (decide(Method::Get, root.as_ref(), None), root) {
            (None, None) => {}
            (Some(Input::Parameters(params)), Some(root)) => {
                prop_assert_eq!(params.len(), root.properties.len());
                for (param, (name, property)) in params.iter().zip(&root.properties) {
                    prop_assert_eq!(&param.name, name);
                    prop_assert_eq!(param.required, property.required);
                }
            }
            (other, _) => return Err(TestCaseError::fail(format!("unexpected placement {other:?}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 4: Robustness
//
// Arbitrary text never panics the grammar, and a lenient inferrer always
// produces a descriptor.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn grammar_never_panics(input in "\\PC*") {
        let _ = parse_token(&input);
        let _ = parse_path(&input);
    }

    #[test]
    fn lenient_inference_always_describes(path in "[a-z.*\\[\\]]{0,12}", rules in "[a-z:,|0-9]{0,20}") {
        let sources = vec![RawRuleSet::inline().field(path.as_str(), rules.as_str())];
        let op = Inferrer::new(Config::default(), false)
            .describe(&Route::new(Method::Post, "/fuzz"), &sources, &DocBlock::new())
            .expect("lenient mode never fails");
        let body = op.body().expect("POST always has a body");
        if op.description.contains(WARNING_MARKER) {
            prop_assert!(body.schema.as_object().unwrap().is_empty());
        }
    }

    #[test]
    fn inference_is_deterministic(sources in arb_sources()) {
        let raw: Vec<RawRuleSet> = sources.iter().map(GenSource::to_raw).collect();
        let inferrer = Inferrer::new(Config::default(), true);
        let route = Route::new(Method::Patch, "/things/{id}");
        let first = inferrer.describe(&route, &raw, &DocBlock::new()).unwrap();
        let again = inferrer.describe(&route, &raw, &DocBlock::new()).unwrap();
        prop_assert_eq!(first, again);
    }
}

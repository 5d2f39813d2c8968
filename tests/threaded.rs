use std::sync::Arc;
use std::thread;

use rulescribe::{
    Config, DocBlock, Inferrer, Method, RawRuleSet, Route, JSON_MEDIA_TYPE, MULTIPART_MEDIA_TYPE,
};

fn routes() -> Vec<(Route, Vec<RawRuleSet>)> {
    vec![
        (
            Route::new(Method::Post, "/users"),
            vec![RawRuleSet::structured()
                .field("name", "required|string|max:255")
                .field("email", "required|email")],
        ),
        (
            Route::new(Method::Post, "/avatars"),
            vec![RawRuleSet::inline().field("avatar", ["required", "image"])],
        ),
        (
            Route::new(Method::Get, "/users"),
            vec![RawRuleSet::inline()
                .field("page", "integer|min:1")
                .field("per_page", "integer|between:1,100")],
        ),
        (Route::new(Method::Delete, "/users/{id}"), vec![]),
        (Route::new(Method::Head, "/health"), vec![]),
    ]
}

#[test]
fn describe_across_threads() {
    let inferrer = Arc::new(Inferrer::new(Config::default(), true));
    let mut handles = vec![];

    for (route, sources) in routes() {
        let inferrer = Arc::clone(&inferrer);
        handles.push(thread::spawn(move || {
            inferrer
                .describe(&route, &sources, &DocBlock::new())
                .unwrap()
        }));
    }

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results[0].body().unwrap().media_type, JSON_MEDIA_TYPE);
    assert_eq!(results[1].body().unwrap().media_type, MULTIPART_MEDIA_TYPE);
    assert_eq!(results[2].parameters().unwrap().len(), 2);
    assert!(results[3].body().unwrap().schema.as_object().unwrap().is_empty());
    assert_eq!(results[4].input, None);
}

#[test]
fn shared_inferrer_matches_sequential() {
    let inferrer = Inferrer::new(Config::default(), true);
    let sequential: Vec<_> = routes()
        .iter()
        .map(|(route, sources)| inferrer.describe(route, sources, &DocBlock::new()).unwrap())
        .collect();

    let routes = routes();
    let parallel: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = routes
            .iter()
            .map(|(route, sources)| {
                let inferrer = &inferrer;
                s.spawn(move || inferrer.describe(route, sources, &DocBlock::new()).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, parallel);
}

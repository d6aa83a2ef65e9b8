//! proptest strategies for assignment batches.

use eventadmin_core::codes::AssigneeRequest;
use proptest::prelude::*;

/// Pool of `1..=max` distinct codes `C0`, `C1`, ...
pub fn code_pool(max: usize) -> impl Strategy<Value = Vec<String>> {
    (1..=max).prop_map(|n| (0..n).map(|i| format!("C{i}")).collect())
}

/// Unpinned request with a generated name and email.
pub fn unpinned_request() -> impl Strategy<Value = AssigneeRequest> {
    ("[a-z]{1,8}", "[a-z]{1,8}", prop::option::of(prop::sample::select(vec!["en", "it", "de"])))
        .prop_map(|(name, domain, language)| {
            let request = AssigneeRequest::unpinned(name.clone(), format!("{name}@{domain}.test"));
            match language {
                Some(l) => request.with_language(l),
                None => request,
            }
        })
}

/// Pool plus a batch where some requests pin distinct pool codes.
///
/// The batch never exceeds the pool size.
pub fn valid_batch(max_pool: usize) -> impl Strategy<Value = (Vec<String>, Vec<AssigneeRequest>)> {
    code_pool(max_pool).prop_flat_map(|pool| {
        let size = pool.len();
        (
            Just(pool.clone()),
            prop::collection::vec(unpinned_request(), 0..=size),
            prop::sample::subsequence(pool, 0..=size),
        )
            .prop_map(|(pool, unpinned, pinned_codes)| {
                let room = pool.len().saturating_sub(pinned_codes.len());
                let mut batch: Vec<AssigneeRequest> = pinned_codes
                    .into_iter()
                    .enumerate()
                    .map(|(i, code)| AssigneeRequest::pinned(code, format!("pinned{i}"), format!("pinned{i}@x.test")))
                    .collect();
                batch.extend(unpinned.into_iter().take(room));
                (pool, batch)
            })
    })
}

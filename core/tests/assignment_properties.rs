//! Property tests for code assignment planning

#![allow(clippy::unwrap_used)] // Tests can unwrap
#![allow(clippy::expect_used)] // Tests can expect

use eventadmin_core::codes::{dedupe, plan_assignment, AssigneeRequest};
use eventadmin_core::AdminError;
use eventadmin_testing::properties::{code_pool, unpinned_request, valid_batch};
use proptest::prelude::*;
use std::collections::HashSet;

proptest! {
    #[test]
    fn auto_assignment_never_steals_a_pinned_code((pool, batch) in valid_batch(8)) {
        let batch = dedupe(batch);
        let pinned: HashSet<String> = batch
            .iter()
            .filter_map(|r| r.pinned_code().map(ToString::to_string))
            .collect();

        let planned = plan_assignment(batch.clone(), &pool).unwrap();
        prop_assert_eq!(planned.len(), batch.len());

        let codes: Vec<String> = planned.iter().filter_map(|r| r.code.clone()).collect();
        prop_assert_eq!(codes.len(), planned.len());

        // every code handed out once
        let distinct: HashSet<&String> = codes.iter().collect();
        prop_assert_eq!(distinct.len(), codes.len());

        for (original, assigned) in batch.iter().filter(|r| r.pinned_code().is_none()).zip(
            planned.iter().skip(pinned.len()),
        ) {
            prop_assert_eq!(&original.email, &assigned.email);
            let code = assigned.code.clone().unwrap();
            prop_assert!(!pinned.contains(&code));
            prop_assert!(pool.contains(&code));
        }
    }

    #[test]
    fn duplicated_pin_always_fails(pool in code_pool(6), others in prop::collection::vec(unpinned_request(), 0..3)) {
        let code = pool[0].clone();
        let mut batch = vec![
            AssigneeRequest::pinned(code.clone(), "first", "first@x.test"),
            AssigneeRequest::pinned(code, "second", "second@x.test"),
        ];
        batch.extend(others);
        let batch = dedupe(batch);

        let result = plan_assignment(batch.clone(), &pool);
        if batch.len() > pool.len() {
            let is_insufficient = matches!(result, Err(AdminError::InsufficientCodes { .. }));
            prop_assert!(is_insufficient);
        } else {
            prop_assert_eq!(result, Err(AdminError::DuplicateCodeRequest));
        }
    }

    #[test]
    fn oversized_batch_always_fails(pool in code_pool(5), extra in 1usize..4) {
        let batch: Vec<_> = (0..pool.len() + extra)
            .map(|i| AssigneeRequest::unpinned(format!("n{i}"), format!("{i}@x.test")))
            .collect();
        let result = plan_assignment(batch, &pool);
        prop_assert_eq!(
            result,
            Err(AdminError::InsufficientCodes { requested: pool.len() + extra, available: pool.len() })
        );
    }

    #[test]
    fn planning_is_deterministic((pool, batch) in valid_batch(6)) {
        let batch = dedupe(batch);
        prop_assert_eq!(
            plan_assignment(batch.clone(), &pool),
            plan_assignment(batch, &pool)
        );
    }
}

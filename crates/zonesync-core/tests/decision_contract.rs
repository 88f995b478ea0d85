//! Contract tests for the per-tick decision table
//!
//! One tick is resolve → lookup → decide → (maybe) mutate. These tests
//! drive a real Reconciler with scripted doubles and assert exactly
//! which mutations happen for each lookup/comparison combination.

mod common;

use common::*;
use zonesync_core::{Reconciler, TickOutcome};

fn build_reconciler(
    resolver: &ScriptedResolver,
    provider: &ScriptedProvider,
) -> Reconciler {
    let (engine, _events) = Reconciler::new(
        Box::new(resolver.clone()),
        Box::new(provider.clone()),
        minimal_config("home.example.com"),
    )
    .expect("engine construction succeeds");
    engine
}

#[tokio::test]
async fn missing_record_triggers_exactly_one_create() {
    // Scenario: resolver returns 203.0.113.9; lookup finds no record.

    let resolver = ScriptedResolver::returning("203.0.113.9");
    let provider = ScriptedProvider::without_record();
    let engine = build_reconciler(&resolver, &provider);

    let outcome = engine.tick().await;

    assert!(
        matches!(outcome, TickOutcome::Created { .. }),
        "expected Created, got {:?}",
        outcome
    );
    assert_eq!(
        provider.creates(),
        vec![("home.example.com".to_string(), "203.0.113.9".to_string())],
        "create must be invoked once with the resolved IP"
    );
    assert!(
        provider.updates().is_empty(),
        "update must never be invoked on the create path"
    );
}

#[tokio::test]
async fn matching_record_is_a_noop() {
    // Scenario: record content equals the resolved IP.

    let resolver = ScriptedResolver::returning("203.0.113.9");
    let provider =
        ScriptedProvider::with_record(a_record("abc", "home.example.com", "203.0.113.9"));
    let engine = build_reconciler(&resolver, &provider);

    let outcome = engine.tick().await;

    assert!(
        matches!(outcome, TickOutcome::Unchanged { .. }),
        "expected Unchanged, got {:?}",
        outcome
    );
    assert!(provider.creates().is_empty(), "no create on a matching record");
    assert!(provider.updates().is_empty(), "no update on a matching record");
}

#[tokio::test]
async fn stale_record_triggers_update_by_id() {
    // Scenario: record {id:"abc", content:"203.0.113.5"}, resolved IP differs.

    let resolver = ScriptedResolver::returning("203.0.113.9");
    let provider =
        ScriptedProvider::with_record(a_record("abc", "home.example.com", "203.0.113.5"));
    let engine = build_reconciler(&resolver, &provider);

    let outcome = engine.tick().await;

    match outcome {
        TickOutcome::Updated {
            record_id,
            previous,
            new_ip,
        } => {
            assert_eq!(record_id, "abc");
            assert_eq!(previous, "203.0.113.5");
            assert_eq!(new_ip.as_str(), "203.0.113.9");
        }
        other => panic!("expected Updated, got {:?}", other),
    }

    assert_eq!(
        provider.updates(),
        vec![(
            "abc".to_string(),
            "home.example.com".to_string(),
            "203.0.113.9".to_string()
        )],
        "update must be invoked exactly once, addressed by the record's id"
    );
    assert!(
        provider.creates().is_empty(),
        "create must never be invoked on the update path"
    );
}

#[tokio::test]
async fn consecutive_unchanged_ticks_do_not_mutate() {
    // Idempotence: stable IP and a matching record across two ticks
    // produces two no-ops, not two mutations.

    let resolver = ScriptedResolver::returning("203.0.113.9");
    let provider =
        ScriptedProvider::with_record(a_record("abc", "home.example.com", "203.0.113.9"));
    let engine = build_reconciler(&resolver, &provider);

    let first = engine.tick().await;
    let second = engine.tick().await;

    assert!(matches!(first, TickOutcome::Unchanged { .. }));
    assert!(matches!(second, TickOutcome::Unchanged { .. }));
    assert_eq!(resolver.resolve_calls(), 2, "each tick resolves afresh");
    assert_eq!(provider.lookup_calls(), 2, "each tick looks up afresh");
    assert!(provider.creates().is_empty());
    assert!(provider.updates().is_empty());
}

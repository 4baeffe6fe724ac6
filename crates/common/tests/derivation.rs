//! Integration tests for the deterministic derivation pipeline

mod testkit;

use common::crypto::{
    verify_round_trip, DerivationError, KeyContext, KeyProvider, P521Provider, Pkcs8Document,
    PublicPoint, Seed, ShareError, ShareToken,
};
use testkit::{CorruptingProvider, CountingProvider};

#[tokio::test]
async fn test_same_seed_same_key_material() {
    let seed = Seed::from_passphrase("determinism law");

    let mut first = KeyContext::new(P521Provider::new());
    let mut second = KeyContext::new(P521Provider::new());
    first.derive(&seed).await.unwrap();
    second.derive(&seed).await.unwrap();

    let a = first.session().unwrap();
    let b = second.session().unwrap();
    assert_eq!(a.public_point(), b.public_point());
    assert_eq!(a.document(), b.document());
}

#[tokio::test]
async fn test_different_seeds_different_containers() {
    let mut first = KeyContext::new(P521Provider::new());
    let mut second = KeyContext::new(P521Provider::new());
    first.derive(&Seed::from_passphrase("alpha")).await.unwrap();
    second.derive(&Seed::from_passphrase("beta")).await.unwrap();

    assert_ne!(
        first.session().unwrap().document(),
        second.session().unwrap().document()
    );
}

#[tokio::test]
async fn test_corrupted_container_fails_verification() {
    let provider = P521Provider::new();
    let seed = Seed::from_passphrase("integrity check");

    let mut ctx = KeyContext::new(provider.clone());
    let session = ctx.derive(&seed).await.unwrap();
    let scalar = session.document().private_scalar().unwrap();
    let point = session.public_point().clone();

    // Flip one byte inside the private-key field and re-import
    let mut bytes = session.document().bytes().to_vec();
    bytes[45] ^= 0x01;
    let corrupted = Pkcs8Document::from_der(bytes).unwrap();
    let handle = provider.import_pkcs8(&corrupted).await.unwrap();

    assert!(!verify_round_trip(&provider, &handle, &scalar, &point)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_corrupting_host_surfaces_integrity_error() {
    let mut ctx = KeyContext::new(CorruptingProvider::new());
    let result = ctx.derive(&Seed::from_passphrase("hostile host")).await;
    assert!(matches!(result, Err(DerivationError::Integrity(_))));
    // No session may survive a failed gate
    assert!(ctx.session().is_none());
}

#[tokio::test]
async fn test_combine_before_derive_makes_no_provider_calls() {
    let ctx = KeyContext::new(CountingProvider::new());
    let mut point_bytes = [0x33u8; 133];
    point_bytes[0] = 0x04;
    let remote = PublicPoint::from_slice(&point_bytes).unwrap();

    let result = ctx.combine(&remote).await;
    assert!(matches!(result, Err(ShareError::MissingKey)));
    assert_eq!(ctx.provider().calls(), 0, "missing-key check must short-circuit");
}

#[tokio::test]
async fn test_end_to_end_share_flow() {
    let seed = Seed::from_passphrase("end to end");

    // Derive, verify, export
    let mut ctx = KeyContext::new(P521Provider::new());
    let session = ctx.derive(&seed).await.unwrap();
    assert_eq!(session.document().len(), 250);
    let point = session.public_point().clone();

    // Encode as a share token and decode back
    let token = ctx.share_token().unwrap();
    assert_eq!(token.as_str().len(), 266);
    let decoded = ShareToken::decode(token.as_str()).unwrap();
    assert_eq!(decoded, point);
}

#[tokio::test]
async fn test_two_party_exchange_agrees() {
    let mut alice = KeyContext::new(P521Provider::new());
    let mut bob = KeyContext::new(P521Provider::new());
    alice.derive(&Seed::from_passphrase("alice")).await.unwrap();
    bob.derive(&Seed::from_passphrase("bob")).await.unwrap();

    // Exchange public points through the token codec, as the URL would
    let alice_token = alice.share_token().unwrap();
    let bob_token = bob.share_token().unwrap();
    let alice_point = ShareToken::decode(alice_token.as_str()).unwrap();
    let bob_point = ShareToken::decode(bob_token.as_str()).unwrap();

    let alice_secret = alice.combine(&bob_point).await.unwrap();
    let bob_secret = bob.combine(&alice_point).await.unwrap();
    assert_eq!(alice_secret, bob_secret);
}

#[tokio::test]
async fn test_retry_after_failure_is_idempotent() {
    let seed = Seed::from_passphrase("retry me");

    // A failed attempt against a corrupting host leaves no state behind
    let mut bad = KeyContext::new(CorruptingProvider::new());
    assert!(bad.derive(&seed).await.is_err());

    // The caller retries with the same seed against a sane host and gets
    // the deterministic key
    let mut first = KeyContext::new(P521Provider::new());
    let mut second = KeyContext::new(P521Provider::new());
    first.derive(&seed).await.unwrap();
    second.derive(&seed).await.unwrap();
    assert_eq!(
        first.session().unwrap().document(),
        second.session().unwrap().document()
    );
}

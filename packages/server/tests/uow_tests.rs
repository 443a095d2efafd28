//! Integration tests for the unit-of-work transaction boundary.

mod common;

use common::{TestHarness, KENT, MEDWAY};
use ember_core::common::CoreError;
use ember_core::domains::matching::Match;
use ember_core::domains::users::{Gender, User};
use ember_core::kernel::uow::UowTransaction;
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn commit_makes_all_writes_visible(ctx: &mut TestHarness) {
    let alice = ctx.create_user(Gender::Female, 26, KENT).await.unwrap();
    let bob = ctx.create_user(Gender::Male, 28, MEDWAY).await.unwrap();

    let match_id = ctx
        .deps
        .uow
        .execute(|tx: &mut UowTransaction| {
            Box::pin(async move {
                let created = Match::insert(alice.id, bob.id, &mut **tx).await?;
                User::increment_likes(bob.id, 1, &mut **tx).await?;
                Ok(created.id)
            })
        })
        .await
        .unwrap();

    assert!(Match::find_by_id(match_id, &ctx.db_pool)
        .await
        .unwrap()
        .is_some());
    let bob_after = User::find_by_id(bob.id, &ctx.db_pool).await.unwrap().unwrap();
    assert_eq!(bob_after.likes_count, 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn block_error_rolls_back_every_write(ctx: &mut TestHarness) {
    let alice = ctx.create_user(Gender::Female, 26, KENT).await.unwrap();
    let bob = ctx.create_user(Gender::Male, 28, MEDWAY).await.unwrap();

    let err = ctx
        .deps
        .uow
        .execute(|tx: &mut UowTransaction| {
            Box::pin(async move {
                Match::insert(alice.id, bob.id, &mut **tx).await?;
                User::increment_likes(bob.id, 1, &mut **tx).await?;
                Err::<(), _>(CoreError::Validation("forced failure".into()))
            })
        })
        .await
        .unwrap_err();

    // The block's error comes back unchanged.
    assert!(matches!(err, CoreError::Validation(_)));

    // Neither write is visible.
    assert!(Match::find_by_pair(alice.id, bob.id, &ctx.db_pool)
        .await
        .unwrap()
        .is_none());
    let bob_after = User::find_by_id(bob.id, &ctx.db_pool).await.unwrap().unwrap();
    assert_eq!(bob_after.likes_count, 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn panic_inside_block_leaves_no_partial_writes(ctx: &mut TestHarness) {
    let alice = ctx.create_user(Gender::Female, 26, KENT).await.unwrap();
    let bob = ctx.create_user(Gender::Male, 28, MEDWAY).await.unwrap();

    let uow = ctx.deps.uow.clone();
    let (a, b) = (alice.id, bob.id);
    let handle = tokio::spawn(async move {
        uow.execute(|tx: &mut UowTransaction| {
            Box::pin(async move {
                Match::insert(a, b, &mut **tx).await?;
                if a != b {
                    panic!("unrecoverable fault mid-transaction");
                }
                Ok(())
            })
        })
        .await
    });

    // The task dies, the dropped transaction rolls back.
    assert!(handle.await.is_err());
    assert!(Match::find_by_pair(alice.id, bob.id, &ctx.db_pool)
        .await
        .unwrap()
        .is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn statements_in_a_block_run_in_order(ctx: &mut TestHarness) {
    let user = ctx.create_user(Gender::Other, 30, KENT).await.unwrap();

    ctx.deps
        .uow
        .execute(|tx: &mut UowTransaction| {
            Box::pin(async move {
                User::increment_likes(user.id, 5, &mut **tx).await?;
                // Visible to later statements of the same transaction.
                let mid = User::find_by_id(user.id, &mut **tx).await?.unwrap();
                assert_eq!(mid.likes_count, 5);
                User::increment_likes(user.id, -2, &mut **tx).await?;
                Ok(())
            })
        })
        .await
        .unwrap();

    let after = User::find_by_id(user.id, &ctx.db_pool).await.unwrap().unwrap();
    assert_eq!(after.likes_count, 3);
}

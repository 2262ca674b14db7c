//! Round trips against a real PostgreSQL instance.
//!
//! Run with `DATABASE_URL=postgres://... cargo test -- --ignored`; each test
//! gets a fresh database with the migrations applied.
use interactions_repository::{
    CounterRepository, PostgresCounterRepository, PostgresProfileDirectory,
    PostgresVoteRepository, ProfileDirectory, RepositoryError, VoteRepository,
};
use interactions_shared::types::{
    ActorId, CountsDelta, TargetCounters, TargetId, TargetKind, VoteState,
};
use sqlx::PgPool;

fn actor() -> ActorId {
    ActorId::new("0xAAA").unwrap()
}

fn target() -> TargetId {
    TargetId::new("listing-42").unwrap()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_vote_requires_profile(pool: PgPool) {
    let votes = PostgresVoteRepository::new(pool.clone());

    let result = votes
        .set_vote(&actor(), &target(), TargetKind::Listing, VoteState::Liked.flags())
        .await;
    assert!(matches!(result, Err(RepositoryError::NotEligible(_))));

    PostgresProfileDirectory::new(pool).create_profile(&actor()).await.unwrap();
    let record = votes
        .set_vote(&actor(), &target(), TargetKind::Listing, VoteState::Liked.flags())
        .await
        .unwrap();
    assert_eq!(record.state(), VoteState::Liked);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_vote_upsert_keeps_one_row(pool: PgPool) {
    let profiles = PostgresProfileDirectory::new(pool.clone());
    let votes = PostgresVoteRepository::new(pool.clone());
    profiles.create_profile(&actor()).await.unwrap();

    for state in [VoteState::Liked, VoteState::Disliked, VoteState::Neutral] {
        votes
            .set_vote(&actor(), &target(), TargetKind::Listing, state.flags())
            .await
            .unwrap();
    }

    let stored = votes.get_vote(&actor(), &target()).await.unwrap().unwrap();
    assert_eq!(stored.state(), VoteState::Neutral);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vote_records")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_vote_kind_cannot_change(pool: PgPool) {
    let votes = PostgresVoteRepository::new(pool.clone());
    PostgresProfileDirectory::new(pool).create_profile(&actor()).await.unwrap();
    votes
        .set_vote(&actor(), &target(), TargetKind::Listing, VoteState::Liked.flags())
        .await
        .unwrap();

    let result = votes
        .set_vote(&actor(), &target(), TargetKind::Comment, VoteState::Disliked.flags())
        .await;
    assert!(matches!(
        result,
        Err(RepositoryError::KindMismatch { stored: TargetKind::Listing, .. })
    ));

    let stored = votes.get_vote(&actor(), &target()).await.unwrap().unwrap();
    assert_eq!(stored.target_kind, TargetKind::Listing);
    assert_eq!(stored.state(), VoteState::Liked);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_database_rejects_both_flags(pool: PgPool) {
    let result = sqlx::query(
        "INSERT INTO vote_records (actor_id, target_id, target_kind, liked, disliked) \
         VALUES ('0xaaa', 'listing-42', 0, TRUE, TRUE)",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_increment_and_compare_and_set(pool: PgPool) {
    let counters = PostgresCounterRepository::new(pool);

    let zero = counters.get_counts(&target(), TargetKind::Listing).await.unwrap();
    assert_eq!(zero, TargetCounters::zero(target(), TargetKind::Listing));

    let one = zero.apply(CountsDelta::new(1, 0));
    assert!(counters.compare_and_set(&zero, &one).await.unwrap());
    assert!(!counters.compare_and_set(&zero, &one).await.unwrap());

    let after = counters
        .increment(&target(), TargetKind::Listing, CountsDelta::new(-5, 2))
        .await
        .unwrap();
    assert_eq!((after.like_count, after.dislike_count), (0, 2));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_recount_from_records(pool: PgPool) {
    let profiles = PostgresProfileDirectory::new(pool.clone());
    let votes = PostgresVoteRepository::new(pool.clone());
    let counters = PostgresCounterRepository::new(pool);
    let other = ActorId::new("0xBBB").unwrap();
    profiles.create_profile(&actor()).await.unwrap();
    profiles.create_profile(&other).await.unwrap();

    votes
        .set_vote(&actor(), &target(), TargetKind::Listing, VoteState::Liked.flags())
        .await
        .unwrap();
    votes
        .set_vote(&other, &target(), TargetKind::Listing, VoteState::Liked.flags())
        .await
        .unwrap();
    counters
        .increment(&target(), TargetKind::Listing, CountsDelta::new(7, 3))
        .await
        .unwrap();

    let recounted = counters.recount(&target(), TargetKind::Listing).await.unwrap();
    assert_eq!((recounted.like_count, recounted.dislike_count), (2, 0));
}

//! Integration tests for `DieselUserRepository` against embedded PostgreSQL.
//!
//! Each test gets its own database cloned from a migrated template. Database
//! calls run on a Tokio runtime owned by the test context so the fixtures
//! stay synchronous.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use backend::domain::ports::{UserPersistenceError, UserRepository};
use backend::domain::validation::RegistrationDraft;
use backend::domain::{NewUser, ProfileUpdate, UserId};
use backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

#[path = "support/pg_embed.rs"]
mod pg_embed;

mod support;

use pg_embed::shared_cluster;
use support::{drop_table, handle_cluster_setup_failure, provision_template_database};

struct TestContext {
    runtime: Runtime,
    repository: DieselUserRepository,
    database_url: String,
    _database: TemporaryDatabase,
}

type SharedContext = Arc<Mutex<TestContext>>;

/// Run `operation` against the repository on the context's runtime.
fn with_repository<F, R>(
    world: &SharedContext,
    operation: impl FnOnce(DieselUserRepository) -> F,
) -> R
where
    F: std::future::Future<Output = R>,
{
    assert!(
        tokio::runtime::Handle::try_current().is_err(),
        "do not call with_repository from inside a Tokio runtime"
    );
    let (repo, handle) = {
        let ctx = world.lock().expect("context lock");
        (ctx.repository.clone(), ctx.runtime.handle().clone())
    };
    handle.block_on(operation(repo))
}

fn setup_test_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster()?;
    let temp_db = provision_template_database(cluster)?;
    let database_url = temp_db.url().to_owned();

    let pool = runtime
        .block_on(DbPool::new(PoolConfig::new(&database_url).with_max_size(2)))
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        repository: DieselUserRepository::new(pool),
        database_url,
        _database: temp_db,
    })
}

#[fixture]
fn diesel_world() -> Option<SharedContext> {
    match setup_test_context() {
        Ok(ctx) => Some(Arc::new(Mutex::new(ctx))),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn new_user(email: &str, phone: Option<&str>) -> NewUser {
    let genres = BTreeSet::from(["Aventura".to_owned(), "RPG".to_owned()]);
    NewUser::try_from_draft(&RegistrationDraft {
        full_name: "Ana Perez",
        email,
        password: "Secret123!",
        phone,
        favorite_genres: &genres,
    })
    .expect("valid registration")
}

#[rstest]
fn diesel_user_round_trip(diesel_world: Option<SharedContext>) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: diesel_user_round_trip skipped");
        return;
    };

    let draft = new_user("ana@duoc.cl", Some("912345678"));
    let (stored, by_email, by_id) = with_repository(&world, |repo| async move {
        let stored = repo.insert(&draft).await.expect("insert succeeds");
        let by_email = repo.find_by_email("ana@duoc.cl").await.expect("email lookup");
        let by_id = repo.find_by_id(stored.id()).await.expect("id lookup");
        (stored, by_email, by_id)
    });

    assert_eq!(by_email.as_ref(), Some(&stored));
    assert_eq!(by_id.as_ref(), Some(&stored));
    assert_eq!(stored.phone(), Some("912345678"));
    assert!(stored.password().matches("Secret123!"));
    assert_eq!(
        stored.favorite_genres(),
        &BTreeSet::from(["Aventura".to_owned(), "RPG".to_owned()])
    );
}

#[rstest]
fn diesel_rejects_duplicate_email(diesel_world: Option<SharedContext>) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: diesel_rejects_duplicate_email skipped");
        return;
    };

    let first = new_user("ana@duoc.cl", None);
    let second = new_user("ana@duoc.cl", Some("912345678"));
    let (result, listed) = with_repository(&world, |repo| async move {
        repo.insert(&first).await.expect("first insert");
        let result = repo.insert(&second).await;
        let listed = repo.list().await.expect("list succeeds");
        (result, listed)
    });

    assert_eq!(
        result,
        Err(UserPersistenceError::duplicate_email("ana@duoc.cl"))
    );
    assert_eq!(listed.len(), 1);
    assert_eq!(listed.first().and_then(|user| user.phone()), None);
}

#[rstest]
fn diesel_profile_update_clears_phone(diesel_world: Option<SharedContext>) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: diesel_profile_update_clears_phone skipped");
        return;
    };

    let draft = new_user("ana@duoc.cl", Some("912345678"));
    let update = ProfileUpdate::try_new("Ana Maria Perez", Some("")).expect("valid update");
    let (updated, reloaded) = with_repository(&world, |repo| async move {
        let stored = repo.insert(&draft).await.expect("insert succeeds");
        let updated = repo
            .update_profile(stored.id(), &update)
            .await
            .expect("update succeeds");
        let reloaded = repo.find_by_id(stored.id()).await.expect("reload");
        (updated, reloaded)
    });

    let updated = updated.expect("user exists");
    assert_eq!(updated.full_name(), "Ana Maria Perez");
    assert_eq!(updated.phone(), None);
    assert_eq!(reloaded, Some(updated));
}

#[rstest]
fn diesel_missing_user_is_none(diesel_world: Option<SharedContext>) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: diesel_missing_user_is_none skipped");
        return;
    };

    let update = ProfileUpdate::try_new("Nadie", None).expect("valid update");
    let (found, updated) = with_repository(&world, |repo| async move {
        let found = repo.find_by_id(UserId::new(9_999)).await.expect("lookup");
        let updated = repo
            .update_profile(UserId::new(9_999), &update)
            .await
            .expect("update runs");
        (found, updated)
    });

    assert!(found.is_none());
    assert!(updated.is_none());
}

#[rstest]
fn diesel_reports_query_errors_when_schema_missing(diesel_world: Option<SharedContext>) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: diesel_reports_query_errors_when_schema_missing skipped");
        return;
    };

    let url = world.lock().expect("context lock").database_url.clone();
    drop_table(&url, "users").expect("drop succeeds");

    let draft = new_user("ana@duoc.cl", None);
    let result = with_repository(&world, |repo| async move { repo.insert(&draft).await });
    assert!(
        matches!(result, Err(UserPersistenceError::Query { .. })),
        "expected Query error, got: {result:?}"
    );
}

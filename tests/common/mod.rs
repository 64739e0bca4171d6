use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use dompet::models::models::{NewPayment, NewUser, Payment, User, Wallet, PAYMENT_PENDING};
use dompet::schema::{payments, transactions, users, wallets};
use uuid::Uuid;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

// Low cost keeps fixture creation fast; never use outside tests.
const TEST_BCRYPT_COST: u32 = 4;

/// Builds a pool from TEST_DATABASE_URL and runs migrations. Returns None
/// when the variable is unset so database-backed tests skip instead of
/// failing on machines without Postgres.
pub fn try_pool() -> Option<DbPool> {
    let database_url = std::env::var("TEST_DATABASE_URL").ok()?;
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(4)
        .build(manager)
        .expect("Failed to create test database pool");
    run_migrations(&mut pool.get().expect("Failed to get test connection"));
    Some(pool)
}

fn run_migrations(conn: &mut PgConnection) {
    use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
    const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");
}

/// Creates a user with a bcrypt-hashed transfer PIN and a unique email.
#[allow(dead_code)]
pub fn create_user(conn: &mut PgConnection, pin: &str) -> User {
    diesel::insert_into(users::table)
        .values(NewUser {
            email: format!("user-{}@example.com", Uuid::new_v4()),
            name: Some("Test User".to_string()),
            transfer_pin_hash: bcrypt::hash(pin, TEST_BCRYPT_COST).expect("Failed to hash PIN"),
        })
        .returning(User::as_returning())
        .get_result(conn)
        .expect("Failed to create test user")
}

/// Creates a user plus a wallet seeded with the given balance. Fixture setup
/// writes the balance directly; everything under test goes through the
/// ledger service.
#[allow(dead_code)]
pub fn create_user_with_wallet(
    conn: &mut PgConnection,
    pin: &str,
    balance: i64,
) -> (User, Wallet) {
    let user = create_user(conn, pin);
    let wallet = diesel::insert_into(wallets::table)
        .values((wallets::user_id.eq(user.id), wallets::balance.eq(balance)))
        .returning(Wallet::as_returning())
        .get_result(conn)
        .expect("Failed to create test wallet");
    (user, wallet)
}

#[allow(dead_code)]
pub fn create_pending_payment(conn: &mut PgConnection, user_id: Uuid, amount: i64) -> Payment {
    diesel::insert_into(payments::table)
        .values(NewPayment {
            user_id,
            external_id: format!("topup-{}-{}", user_id, Uuid::new_v4()),
            payment_method: "va".to_string(),
            amount,
            provider_reference: None,
            virtual_account_number: Some("8808123456789012".to_string()),
            bank_code: Some("BCA".to_string()),
            status: PAYMENT_PENDING.to_string(),
        })
        .returning(Payment::as_returning())
        .get_result(conn)
        .expect("Failed to create test payment")
}

#[allow(dead_code)]
pub fn wallet_balance(conn: &mut PgConnection, wallet_id: Uuid) -> i64 {
    wallets::table
        .find(wallet_id)
        .select(wallets::balance)
        .first(conn)
        .expect("Failed to read wallet balance")
}

#[allow(dead_code)]
pub fn transaction_count(conn: &mut PgConnection, wallet_id: Uuid) -> i64 {
    transactions::table
        .filter(transactions::wallet_id.eq(wallet_id))
        .count()
        .get_result(conn)
        .expect("Failed to count transactions")
}

#[allow(dead_code)]
pub fn sum_of_amounts(conn: &mut PgConnection, wallet_id: Uuid) -> i64 {
    transactions::table
        .filter(transactions::wallet_id.eq(wallet_id))
        .select(transactions::amount)
        .load::<i64>(conn)
        .expect("Failed to load transaction amounts")
        .into_iter()
        .sum()
}

#[allow(dead_code)]
pub fn payment_status(conn: &mut PgConnection, payment_id: Uuid) -> String {
    payments::table
        .find(payment_id)
        .select(payments::status)
        .first(conn)
        .expect("Failed to read payment status")
}

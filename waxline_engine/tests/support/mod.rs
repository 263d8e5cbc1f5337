use log::*;
use sqlx::{migrate, migrate::MigrateDatabase, Sqlite};
use wax_common::Cents;
use waxline_engine::{
    db_types::{CustomerContact, Listing},
    SqliteDatabase,
};

pub fn random_db_path() -> String {
    format!("sqlite://{}/waxline_test_{}.db", std::env::temp_dir().display(), rand::random::<u64>())
}

pub async fn prepare_test_env(url: &str) -> SqliteDatabase {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    if let Err(e) = Sqlite::drop_database(url).await {
        warn!("Error dropping database {url}: {e:?}");
    }
    Sqlite::create_database(url).await.expect("Error creating database");
    let db = SqliteDatabase::new_with_url(url, 5).await.expect("Error creating connection to database");
    migrate!("./migrations").run(db.pool()).await.expect("Error running DB migrations");
    info!("🚀️ Test database ready at {url}");
    db
}

#[allow(dead_code)]
pub async fn seed_listing(db: &SqliteDatabase, id: &str, title: &str, price: i64, currency: &str) {
    let listing = Listing {
        id: id.into(),
        title: title.to_string(),
        artist: "Various Artists".to_string(),
        unit_price: Cents::from(price),
        currency: currency.to_string(),
    };
    db.add_listing(&listing).await.expect("Error seeding listing");
}

#[allow(dead_code)]
pub async fn seed_contact(db: &SqliteDatabase, customer_id: &str, email: &str, first_name: &str) {
    let contact = CustomerContact {
        customer_id: customer_id.to_string(),
        email: email.to_string(),
        first_name: first_name.to_string(),
    };
    db.add_contact(&contact).await.expect("Error seeding contact");
}

use anyhow::Result;
use litebind::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

const CREATE_USERS: &str = "CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    age INTEGER,
    email TEXT
)";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    std::fs::create_dir_all(&config.path)?;
    let conn = Connection::open_with(&config).await?;

    conn.execute_raw(CREATE_USERS, &[]).await?;
    conn.delete("users", &[Condition::is_not_null("id")]).await?;

    for (id, name, age) in [(1, "Alice", 30), (2, "Bob", 25), (3, "Carol", 18)] {
        conn.insert("users", &kwargs!(id = id, name = name, age = age))
            .await?;
    }

    conn.update(
        "users",
        &kwargs!(email = "bob@example.com"),
        &[cond!(name == "Bob")?],
    )
    .await?;

    let rows = conn
        .select(
            "users",
            &["name", "age", "email"],
            &[Condition::between("age", 20, 40)?, Condition::not_in("name", ["Carol"])?],
        )
        .await?;
    println!("{}", serde_json::to_string_pretty(&rows)?);

    let removed = conn.delete("users", &[cond!(age < 20)?]).await?;
    info!(removed, "deleted minors");

    if let Err(err) = conn.delete("users", &[]).await {
        info!(%err, "unconditional delete refused");
    }

    Ok(())
}

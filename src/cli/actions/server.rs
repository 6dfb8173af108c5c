use crate::cli::actions::Action;
use crate::identigi::{self, token::SessionKeys};
use anyhow::{Context, Result};
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            private_key,
            public_key,
        } => {
            // Fail fast on an unparseable DSN before touching the pool
            Url::parse(&dsn).context("Invalid database connection string")?;

            let private_key = tokio::fs::read(&private_key)
                .await
                .with_context(|| format!("Failed to read {}", private_key.display()))?;

            let public_key = tokio::fs::read(&public_key)
                .await
                .with_context(|| format!("Failed to read {}", public_key.display()))?;

            let keys = SessionKeys::new(public_key, private_key);

            identigi::new(port, dsn, keys).await?;
        }
    }

    Ok(())
}

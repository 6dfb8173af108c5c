use crate::cli::actions::Action;
use anyhow::Result;
use std::path::PathBuf;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        dsn: matches
            .get_one("dsn")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --dsn"))?,
        private_key: matches
            .get_one::<PathBuf>("rsa-private-key")
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --rsa-private-key"))?,
        public_key: matches
            .get_one::<PathBuf>("rsa-public-key")
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --rsa-public-key"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn test_dispatch_server_action() {
        temp_env::with_vars(
            [
                ("IDENTIGI_PORT", None::<&str>),
                ("IDENTIGI_DSN", None),
                ("IDENTIGI_RSA_PRIVATE_KEY", None),
                ("IDENTIGI_RSA_PUBLIC_KEY", None),
            ],
            || {
                let matches = commands::new().get_matches_from(vec![
                    "identigi",
                    "--dsn",
                    "postgres://localhost:5432/identigi",
                    "--rsa-private-key",
                    "/keys/private.pem",
                    "--rsa-public-key",
                    "/keys/public.pem",
                ]);

                let Action::Server {
                    port,
                    dsn,
                    private_key,
                    public_key,
                } = handler(&matches).expect("server action");

                assert_eq!(port, 8080);
                assert_eq!(dsn, "postgres://localhost:5432/identigi");
                assert_eq!(private_key, PathBuf::from("/keys/private.pem"));
                assert_eq!(public_key, PathBuf::from("/keys/public.pem"));
            },
        );
    }
}

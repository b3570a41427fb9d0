use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;

/// Builds the driver connection options from the configured credentials.
pub fn connect_options(settings: &DatabaseSettings) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.username)
        .password(&settings.password)
        .database(&settings.database_name)
}

/// Opens a single, dedicated connection to the PostgreSQL server.
pub async fn connect(options: &PgConnectOptions) -> Result<PgConnection, DbError> {
    PgConnection::connect_with(options)
        .await
        .map_err(DbError::ConnectionError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_carry_the_configured_location() {
        let settings = DatabaseSettings {
            host: "db.internal".to_string(),
            port: 6543,
            username: "reporter".to_string(),
            password: "pw".to_string(),
            database_name: "dorms".to_string(),
        };

        let options = connect_options(&settings);

        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "reporter");
        assert_eq!(options.get_database(), Some("dorms"));
    }
}

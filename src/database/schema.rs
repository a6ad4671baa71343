use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Schema};

use crate::database::connector::DB;
use crate::database::models::{clients, equipment, service_orders};

/// Creates the three collection tables when they are missing.
pub async fn ensure_schema(db: &DB) -> Result<(), DbErr> {
    create_table(db, clients::Entity).await?;
    create_table(db, equipment::Entity).await?;
    create_table(db, service_orders::Entity).await?;
    log::info!("Database schema is ready");
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DB, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;
    Ok(())
}

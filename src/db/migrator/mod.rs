use sea_orm_migration::prelude::*;

mod m20250501_initial;
mod m20250512_add_user_info;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250501_initial::Migration),
            Box::new(m20250512_add_user_info::Migration),
        ]
    }
}

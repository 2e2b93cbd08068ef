use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::db::error::StoreResult;
use crate::entities::{customers, prelude::*};

pub struct CustomerRepository {
    conn: DatabaseConnection,
}

impl CustomerRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        customer_id: &str,
        customer_name: &str,
    ) -> StoreResult<customers::Model> {
        let txn = self.conn.begin().await?;

        let model = customers::ActiveModel {
            customer_id: Set(customer_id.to_string()),
            customer_name: Set(customer_name.to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(model)
    }

    pub async fn get(&self, id: i32) -> StoreResult<Option<customers::Model>> {
        Ok(Customers::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn get_by_customer_id(
        &self,
        customer_id: &str,
    ) -> StoreResult<Option<customers::Model>> {
        let customer = Customers::find()
            .filter(customers::Column::CustomerId.eq(customer_id))
            .one(&self.conn)
            .await?;

        Ok(customer)
    }

    /// Substring match on the name. `%`, `_` and `!` in `fragment` match literally.
    pub async fn search_by_name(&self, fragment: &str) -> StoreResult<Vec<customers::Model>> {
        let pattern = format!("%{}%", escape_like(fragment));

        let found = Customers::find()
            .filter(
                Expr::col(customers::Column::CustomerName)
                    .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)),
            )
            .order_by_asc(customers::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(found)
    }

    pub async fn list(&self) -> StoreResult<Vec<customers::Model>> {
        Ok(Customers::find()
            .order_by_asc(customers::Column::Id)
            .all(&self.conn)
            .await?)
    }

    pub async fn delete(&self, id: i32) -> StoreResult<bool> {
        let txn = self.conn.begin().await?;
        let result = Customers::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(result.rows_affected > 0)
    }
}

// Emitted inline in the ESCAPE clause; must not need quoting
const LIKE_ESCAPE: char = '!';

fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

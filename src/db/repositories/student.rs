use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::db::error::StoreResult;
use crate::entities::{prelude::*, student_details, students};

/// A student together with its optional one-to-one detail row.
pub type StudentWithDetail = (students::Model, Option<student_details::Model>);

pub struct StudentInput {
    pub name: String,
    pub student_number: String,
    pub detail: Option<StudentDetailInput>,
}

pub struct StudentDetailInput {
    pub address: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
}

pub struct StudentRepository {
    conn: DatabaseConnection,
}

impl StudentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> StoreResult<Vec<StudentWithDetail>> {
        let rows = Students::find()
            .find_also_related(StudentDetails)
            .order_by_asc(students::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> StoreResult<Option<StudentWithDetail>> {
        let row = Students::find_by_id(id)
            .find_also_related(StudentDetails)
            .one(&self.conn)
            .await?;

        Ok(row)
    }

    pub async fn get_by_number(&self, student_number: &str) -> StoreResult<Option<StudentWithDetail>> {
        let row = Students::find()
            .filter(students::Column::StudentNumber.eq(student_number))
            .find_also_related(StudentDetails)
            .one(&self.conn)
            .await?;

        Ok(row)
    }

    /// Inserts the student and its detail in one transaction.
    pub async fn create(&self, input: StudentInput) -> StoreResult<StudentWithDetail> {
        let txn = self.conn.begin().await?;

        let student = students::ActiveModel {
            name: Set(input.name),
            student_number: Set(input.student_number),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let detail = match input.detail {
            Some(detail) => Some(insert_detail(&txn, student.id, detail).await?),
            None => None,
        };

        txn.commit().await?;
        Ok((student, detail))
    }

    /// Updates name and number; a supplied detail replaces or creates the
    /// detail row, an absent one leaves it as is.
    pub async fn update(
        &self,
        id: i32,
        input: StudentInput,
    ) -> StoreResult<Option<StudentWithDetail>> {
        let txn = self.conn.begin().await?;

        let Some(existing) = Students::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let mut active: students::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.student_number = Set(input.student_number);
        let student = active.update(&txn).await?;

        let current_detail = StudentDetails::find()
            .filter(student_details::Column::StudentId.eq(id))
            .one(&txn)
            .await?;

        let detail = match (input.detail, current_detail) {
            (Some(detail), Some(current)) => {
                let mut active: student_details::ActiveModel = current.into();
                active.address = Set(detail.address);
                active.phone_number = Set(detail.phone_number);
                active.email = Set(detail.email);
                active.date_of_birth = Set(detail.date_of_birth);
                Some(active.update(&txn).await?)
            }
            (Some(detail), None) => Some(insert_detail(&txn, id, detail).await?),
            (None, current) => current,
        };

        txn.commit().await?;
        Ok(Some((student, detail)))
    }

    /// Removes the student and its detail row.
    pub async fn delete(&self, id: i32) -> StoreResult<bool> {
        let txn = self.conn.begin().await?;

        StudentDetails::delete_many()
            .filter(student_details::Column::StudentId.eq(id))
            .exec(&txn)
            .await?;
        let result = Students::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }
}

async fn insert_detail(
    txn: &DatabaseTransaction,
    student_id: i32,
    detail: StudentDetailInput,
) -> StoreResult<student_details::Model> {
    let model = student_details::ActiveModel {
        address: Set(detail.address),
        phone_number: Set(detail.phone_number),
        email: Set(detail.email),
        date_of_birth: Set(detail.date_of_birth),
        student_id: Set(student_id),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    Ok(model)
}

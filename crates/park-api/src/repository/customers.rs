//! 고객 Repository (PostgreSQL).

use async_trait::async_trait;
use park_core::{Customer, CustomerStore, NewCustomer, Page, PageRequest, ParkResult};
use sqlx::{FromRow, PgPool};

use super::map_write_error;

#[derive(Debug, FromRow)]
struct CustomerRow {
    id: i64,
    name: String,
    cpf: String,
    user_id: i64,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    #[sqlx(default)]
    created_by: Option<String>,
    #[sqlx(default)]
    updated_by: Option<String>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            cpf: row.cpf,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by,
            updated_by: row.updated_by,
        }
    }
}

const COLUMNS: &str = "id, name, cpf, user_id, created_at, updated_at, created_by, updated_by";

/// PostgreSQL 고객 저장소.
#[derive(Clone)]
pub struct PgCustomerStore {
    pool: PgPool,
}

impl PgCustomerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn create(&self, customer: NewCustomer) -> ParkResult<Customer> {
        let sql = format!(
            "INSERT INTO customers (name, cpf, user_id, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $4)
             RETURNING {COLUMNS}"
        );

        let row = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(&customer.name)
            .bind(&customer.cpf)
            .bind(customer.user_id)
            .bind(&customer.created_by)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                map_write_error(e, |constraint| match constraint {
                    Some("customers_user_id_key") => "이미 고객 정보가 등록된 사용자입니다".to_string(),
                    _ => format!("이미 등록된 CPF입니다: {}", customer.cpf),
                })
            })?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> ParkResult<Option<Customer>> {
        let sql = format!("SELECT {COLUMNS} FROM customers WHERE id = $1");
        let row = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Customer::from))
    }

    async fn find_by_user_id(&self, user_id: i64) -> ParkResult<Option<Customer>> {
        let sql = format!("SELECT {COLUMNS} FROM customers WHERE user_id = $1");
        let row = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Customer::from))
    }

    async fn page(&self, request: PageRequest) -> ParkResult<Page<Customer>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        let sql = format!("SELECT {COLUMNS} FROM customers ORDER BY name, id LIMIT $1 OFFSET $2");
        let rows = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(i64::from(request.size))
            .bind(i64::try_from(request.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        let content = rows.into_iter().map(Customer::from).collect();
        Ok(Page::new(content, request, u64::try_from(total).unwrap_or(0)))
    }
}

//! PostgreSQL store over a sqlx `PgPool`, plus database/table bootstrap.

use super::Store;
use crate::error::AppError;
use crate::model::{Company, CompanyIndustry, Industry, IndustryCreated, Invoice, NewIndustry, NewInvoice};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// Tables in dependency order. No foreign keys: invoices and association rows may name
/// companies or industries that do not exist.
const TABLES_DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS companies (
        code TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS invoices (
        id BIGSERIAL PRIMARY KEY,
        comp_code TEXT NOT NULL,
        amt DOUBLE PRECISION NOT NULL,
        paid BOOLEAN NOT NULL DEFAULT FALSE,
        add_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        paid_date TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS industries (
        id BIGSERIAL PRIMARY KEY,
        code TEXT NOT NULL,
        industry TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS companyindustries (
        company_code TEXT NOT NULL,
        industry_id BIGINT NOT NULL
    )
    "#,
];

/// Create the four tables if they do not exist yet.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), AppError> {
    for ddl in TABLES_DDL {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url.rfind('/').ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))? + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

type CompanyRow = (String, String, String);
type InvoiceRow = (i64, String, f64, bool, DateTime<Utc>, Option<DateTime<Utc>>);

const INVOICE_COLUMNS: &str = "id, comp_code, amt, paid, add_date, paid_date";

fn company_from_row((code, name, description): CompanyRow) -> Company {
    Company {
        code,
        name,
        description,
    }
}

fn invoice_from_row((id, comp_code, amt, paid, add_date, paid_date): InvoiceRow) -> Invoice {
    Invoice {
        id,
        comp_code,
        amt,
        paid,
        add_date,
        paid_date,
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }

    async fn list_companies(&self) -> Result<Vec<Company>, AppError> {
        let sql = "SELECT code, name, description FROM companies";
        tracing::debug!(sql = %sql, "query");
        let rows: Vec<CompanyRow> = sqlx::query_as(sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(company_from_row).collect())
    }

    async fn get_company(&self, code: &str) -> Result<Option<Company>, AppError> {
        let sql = "SELECT code, name, description FROM companies WHERE code = $1";
        tracing::debug!(sql = %sql, code = %code, "query");
        let row: Option<CompanyRow> = sqlx::query_as(sql).bind(code).fetch_optional(&self.pool).await?;
        Ok(row.map(company_from_row))
    }

    async fn insert_company(&self, company: &Company) -> Result<Company, AppError> {
        let sql = "INSERT INTO companies (code, name, description) VALUES ($1, $2, $3) \
                   RETURNING code, name, description";
        tracing::debug!(sql = %sql, code = %company.code, "query");
        let row: CompanyRow = sqlx::query_as(sql)
            .bind(&company.code)
            .bind(&company.name)
            .bind(&company.description)
            .fetch_one(&self.pool)
            .await?;
        Ok(company_from_row(row))
    }

    async fn update_company(&self, code: &str, company: &Company) -> Result<Option<Company>, AppError> {
        let sql = "UPDATE companies SET code = $1, name = $2, description = $3 WHERE code = $4 \
                   RETURNING code, name, description";
        tracing::debug!(sql = %sql, code = %code, "query");
        let row: Option<CompanyRow> = sqlx::query_as(sql)
            .bind(&company.code)
            .bind(&company.name)
            .bind(&company.description)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(company_from_row))
    }

    async fn delete_company(&self, code: &str) -> Result<bool, AppError> {
        let sql = "DELETE FROM companies WHERE code = $1 RETURNING code";
        tracing::debug!(sql = %sql, code = %code, "query");
        let row: Option<(String,)> = sqlx::query_as(sql).bind(code).fetch_optional(&self.pool).await?;
        Ok(row.is_some())
    }

    async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        let sql = format!("SELECT {} FROM invoices ORDER BY id", INVOICE_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let rows: Vec<InvoiceRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(invoice_from_row).collect())
    }

    async fn invoices_for_company(&self, comp_code: &str) -> Result<Vec<Invoice>, AppError> {
        let sql = format!("SELECT {} FROM invoices WHERE comp_code = $1 ORDER BY id", INVOICE_COLUMNS);
        tracing::debug!(sql = %sql, comp_code = %comp_code, "query");
        let rows: Vec<InvoiceRow> = sqlx::query_as(&sql).bind(comp_code).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(invoice_from_row).collect())
    }

    async fn get_invoice(&self, id: i64) -> Result<Option<Invoice>, AppError> {
        let sql = format!("SELECT {} FROM invoices WHERE id = $1", INVOICE_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        let row: Option<InvoiceRow> = sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.map(invoice_from_row))
    }

    async fn insert_invoice(&self, invoice: &NewInvoice) -> Result<Invoice, AppError> {
        let sql = format!(
            "INSERT INTO invoices (comp_code, amt, paid, add_date, paid_date) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            INVOICE_COLUMNS
        );
        tracing::debug!(sql = %sql, comp_code = %invoice.comp_code, "query");
        let row: InvoiceRow = sqlx::query_as(&sql)
            .bind(&invoice.comp_code)
            .bind(invoice.amt)
            .bind(invoice.paid)
            .bind(invoice.add_date)
            .bind(invoice.paid_date)
            .fetch_one(&self.pool)
            .await?;
        Ok(invoice_from_row(row))
    }

    async fn update_invoice(&self, id: i64, invoice: &NewInvoice) -> Result<Option<Invoice>, AppError> {
        let sql = format!(
            "UPDATE invoices SET comp_code = $1, amt = $2, paid = $3, add_date = $4, paid_date = $5 \
             WHERE id = $6 RETURNING {}",
            INVOICE_COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        let row: Option<InvoiceRow> = sqlx::query_as(&sql)
            .bind(&invoice.comp_code)
            .bind(invoice.amt)
            .bind(invoice.paid)
            .bind(invoice.add_date)
            .bind(invoice.paid_date)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(invoice_from_row))
    }

    async fn delete_invoice(&self, id: i64) -> Result<bool, AppError> {
        let sql = "DELETE FROM invoices WHERE id = $1 RETURNING id";
        tracing::debug!(sql = %sql, id, "query");
        let row: Option<(i64,)> = sqlx::query_as(sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.is_some())
    }

    async fn industry_codes(&self, industry: &str) -> Result<Vec<String>, AppError> {
        let sql = "SELECT code FROM industries WHERE industry = $1 ORDER BY id";
        tracing::debug!(sql = %sql, industry = %industry, "query");
        let rows: Vec<(String,)> = sqlx::query_as(sql).bind(industry).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|(code,)| code).collect())
    }

    async fn insert_industry(&self, industry: &NewIndustry) -> Result<IndustryCreated, AppError> {
        let mut tx = self.pool.begin().await?;
        let (id, code, name): (i64, String, String) = sqlx::query_as(
            "INSERT INTO industries (code, industry) VALUES ($1, $2) RETURNING id, code, industry",
        )
        .bind(&industry.code)
        .bind(&industry.industry)
        .fetch_one(&mut *tx)
        .await?;

        let company: Option<(String,)> = sqlx::query_as("SELECT code FROM companies WHERE code = $1")
            .bind(&code)
            .fetch_optional(&mut *tx)
            .await?;
        let linked = company.is_some();
        if linked {
            sqlx::query("INSERT INTO companyindustries (company_code, industry_id) VALUES ($1, $2)")
                .bind(&code)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        tracing::debug!(industry_id = id, code = %code, linked, "industry inserted (tx)");

        Ok(IndustryCreated {
            industry: Industry {
                id,
                code,
                industry: name,
            },
            linked,
        })
    }

    async fn insert_company_industry(&self, link: &CompanyIndustry) -> Result<(), AppError> {
        let sql = "INSERT INTO companyindustries (company_code, industry_id) VALUES ($1, $2)";
        tracing::debug!(sql = %sql, company_code = %link.company_code, industry_id = link.industry_id, "query");
        sqlx::query(sql)
            .bind(&link.company_code)
            .bind(link.industry_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn company_industries(&self, company_code: &str) -> Result<Vec<CompanyIndustry>, AppError> {
        let sql = "SELECT company_code, industry_id FROM companyindustries WHERE company_code = $1";
        tracing::debug!(sql = %sql, company_code = %company_code, "query");
        let rows: Vec<(String, i64)> = sqlx::query_as(sql).bind(company_code).fetch_all(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|(company_code, industry_id)| CompanyIndustry {
                company_code,
                industry_id,
            })
            .collect())
    }
}

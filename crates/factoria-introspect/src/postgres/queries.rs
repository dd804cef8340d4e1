use sqlx::PgPool;

use factoria_core::{Error, Result};

fn db_error(err: sqlx::Error) -> Error {
    Error::Db(err.to_string())
}

pub async fn fetch_database_name(pool: &PgPool) -> Result<String> {
    sqlx::query_scalar::<_, String>("select current_database()::text")
        .fetch_one(pool)
        .await
        .map_err(db_error)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawTable {
    pub name: String,
    pub comment: Option<String>,
}

pub async fn find_table(pool: &PgPool, schema: &str, table: &str) -> Result<Option<RawTable>> {
    sqlx::query_as::<_, RawTable>(
        r#"
        select
          c.relname::text as name,
          pg_catalog.obj_description(c.oid, 'pg_class') as comment
        from pg_class c
        join pg_namespace n on n.oid = c.relnamespace
        where n.nspname = $1
          and c.relname = $2
          and c.relkind in ('r', 'p')
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_optional(pool)
    .await
    .map_err(db_error)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawColumn {
    pub ordinal_position: i16,
    pub name: String,
    pub data_type: String,
    pub udt_schema: String,
    pub udt_name: String,
    pub is_nullable: bool,
    pub default: Option<String>,
    pub identity_generation: Option<String>,
}

pub async fn list_columns(pool: &PgPool, schema: &str, table: &str) -> Result<Vec<RawColumn>> {
    sqlx::query_as::<_, RawColumn>(
        r#"
        select
          a.attnum as ordinal_position,
          a.attname::text as name,
          pg_catalog.format_type(a.atttypid, a.atttypmod) as data_type,
          tn.nspname::text as udt_schema,
          t.typname::text as udt_name,
          (not a.attnotnull) as is_nullable,
          pg_get_expr(ad.adbin, ad.adrelid) as "default",
          case
            when a.attidentity = 'a' then 'ALWAYS'
            when a.attidentity = 'd' then 'BY DEFAULT'
            else null
          end as identity_generation
        from pg_attribute a
        join pg_class c on c.oid = a.attrelid
        join pg_namespace n on n.oid = c.relnamespace
        join pg_type t on t.oid = a.atttypid
        join pg_namespace tn on tn.oid = t.typnamespace
        left join pg_attrdef ad on ad.adrelid = a.attrelid and ad.adnum = a.attnum
        where n.nspname = $1
          and c.relname = $2
          and a.attnum > 0
          and not a.attisdropped
        order by a.attnum
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(db_error)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawPrimaryKey {
    pub name: String,
    pub columns: Vec<String>,
}

pub async fn get_primary_key(
    pool: &PgPool,
    schema: &str,
    table: &str,
) -> Result<Option<RawPrimaryKey>> {
    sqlx::query_as::<_, RawPrimaryKey>(
        r#"
        select
          con.conname::text as name,
          array(
            select a.attname::text
            from unnest(con.conkey) with ordinality as k(attnum, ord)
            join pg_attribute a on a.attrelid = con.conrelid and a.attnum = k.attnum
            order by k.ord
          ) as columns
        from pg_constraint con
        join pg_class c on c.oid = con.conrelid
        join pg_namespace n on n.oid = c.relnamespace
        where n.nspname = $1
          and c.relname = $2
          and con.contype = 'p'
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_optional(pool)
    .await
    .map_err(db_error)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawForeignKey {
    pub name: String,
    pub columns: Vec<String>,
    pub referenced_schema: String,
    pub referenced_table: String,
    pub referenced_columns: Vec<String>,
}

pub async fn list_foreign_keys(
    pool: &PgPool,
    schema: &str,
    table: &str,
) -> Result<Vec<RawForeignKey>> {
    sqlx::query_as::<_, RawForeignKey>(
        r#"
        select
          con.conname::text as name,
          array(
            select a.attname::text
            from unnest(con.conkey) with ordinality as k(attnum, ord)
            join pg_attribute a on a.attrelid = con.conrelid and a.attnum = k.attnum
            order by k.ord
          ) as columns,
          rn.nspname::text as referenced_schema,
          rc.relname::text as referenced_table,
          array(
            select a.attname::text
            from unnest(con.confkey) with ordinality as k(attnum, ord)
            join pg_attribute a on a.attrelid = con.confrelid and a.attnum = k.attnum
            order by k.ord
          ) as referenced_columns
        from pg_constraint con
        join pg_class c on c.oid = con.conrelid
        join pg_namespace n on n.oid = c.relnamespace
        join pg_class rc on rc.oid = con.confrelid
        join pg_namespace rn on rn.oid = rc.relnamespace
        where n.nspname = $1
          and c.relname = $2
          and con.contype = 'f'
        order by con.conname
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(db_error)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawEnumType {
    pub schema: String,
    pub name: String,
    pub labels: Vec<String>,
}

/// Enum types used by the columns of one table.
pub async fn list_column_enums(
    pool: &PgPool,
    schema: &str,
    table: &str,
) -> Result<Vec<RawEnumType>> {
    sqlx::query_as::<_, RawEnumType>(
        r#"
        select
          tn.nspname::text as schema,
          t.typname::text as name,
          array_agg(e.enumlabel::text order by e.enumsortorder) as labels
        from pg_type t
        join pg_namespace tn on tn.oid = t.typnamespace
        join pg_enum e on e.enumtypid = t.oid
        where t.oid in (
          select a.atttypid
          from pg_attribute a
          join pg_class c on c.oid = a.attrelid
          join pg_namespace n on n.oid = c.relnamespace
          where n.nspname = $1
            and c.relname = $2
            and a.attnum > 0
            and not a.attisdropped
        )
        group by tn.nspname, t.typname
        order by tn.nspname, t.typname
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(db_error)
}

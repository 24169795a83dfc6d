// src/db/gasto_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::gasto::{ActualizarGasto, Gasto, GastoPorCategoria, NuevoGasto},
};

#[derive(Clone)]
pub struct GastoRepository {
    pool: PgPool,
}

impl GastoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(&self) -> Result<Vec<Gasto>, AppError> {
        let gastos = sqlx::query_as::<_, Gasto>("SELECT * FROM gastos ORDER BY fecha_gasto DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(gastos)
    }

    pub async fn obtener(&self, id: Uuid) -> Result<Option<Gasto>, AppError> {
        let gasto = sqlx::query_as::<_, Gasto>("SELECT * FROM gastos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(gasto)
    }

    // Relatório agregado por categoria, com recorte opcional de datas.
    pub async fn reporte_por_categoria(
        &self,
        fecha_desde: Option<DateTime<Utc>>,
        fecha_hasta: Option<DateTime<Utc>>,
    ) -> Result<Vec<GastoPorCategoria>, AppError> {
        let reporte = sqlx::query_as::<_, GastoPorCategoria>(
            r#"
            SELECT categoria, SUM(monto) AS total, COUNT(*) AS cantidad
            FROM gastos
            WHERE ($1::timestamptz IS NULL OR fecha_gasto >= $1)
              AND ($2::timestamptz IS NULL OR fecha_gasto <= $2)
            GROUP BY categoria
            ORDER BY total DESC
            "#,
        )
        .bind(fecha_desde)
        .bind(fecha_hasta)
        .fetch_all(&self.pool)
        .await?;
        Ok(reporte)
    }

    pub async fn crear<'e, E>(
        &self,
        executor: E,
        nuevo: &NuevoGasto,
        created_by: Uuid,
    ) -> Result<Gasto, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let gasto = sqlx::query_as::<_, Gasto>(
            r#"
            INSERT INTO gastos
                (concepto, descripcion, categoria, monto, fecha_gasto,
                 orden_produccion, comprobante, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&nuevo.concepto)
        .bind(&nuevo.descripcion)
        .bind(&nuevo.categoria)
        .bind(nuevo.monto)
        .bind(nuevo.fecha_gasto)
        .bind(&nuevo.orden_produccion)
        .bind(&nuevo.comprobante)
        .bind(created_by)
        .fetch_one(executor)
        .await?;
        Ok(gasto)
    }

    pub async fn actualizar<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        cambios: &ActualizarGasto,
    ) -> Result<Option<Gasto>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let gasto = sqlx::query_as::<_, Gasto>(
            r#"
            UPDATE gastos SET
                concepto = COALESCE($2, concepto),
                descripcion = COALESCE($3, descripcion),
                categoria = COALESCE($4, categoria),
                monto = COALESCE($5, monto),
                fecha_gasto = COALESCE($6, fecha_gasto),
                orden_produccion = COALESCE($7, orden_produccion),
                comprobante = COALESCE($8, comprobante),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&cambios.concepto)
        .bind(&cambios.descripcion)
        .bind(&cambios.categoria)
        .bind(cambios.monto)
        .bind(cambios.fecha_gasto)
        .bind(&cambios.orden_produccion)
        .bind(&cambios.comprobante)
        .fetch_optional(executor)
        .await?;
        Ok(gasto)
    }

    pub async fn eliminar<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM gastos WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

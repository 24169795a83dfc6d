// src/db/salida_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::salida::{MotivoSalida, RegistroSalida, TipoItem},
};

// Filtros opcionais do histórico de saídas. None = sem filtro.
#[derive(Debug, Default)]
pub struct FiltroHistorialSalidas {
    pub tipo_item: Option<TipoItem>,
    pub motivo_salida: Option<MotivoSalida>,
    pub fecha_desde: Option<DateTime<Utc>>,
    pub fecha_hasta: Option<DateTime<Utc>>,
}

// Dados de um registro de saída já validado pelo serviço; o repositório
// só persiste.
#[derive(Debug)]
pub struct InsertarSalida<'a> {
    pub tipo_item: TipoItem,
    pub materia_prima_id: Option<Uuid>,
    pub producto_terminado_id: Option<Uuid>,
    pub codigo_item: &'a str,
    pub nombre_item: &'a str,
    pub lote: &'a str,
    pub cantidad_salida: f64,
    pub unidad_medida: &'a str,
    pub motivo_salida: MotivoSalida,
    pub saldo_anterior: f64,
    pub saldo_actual: f64,
    pub observaciones: Option<&'a str>,
    pub created_by: Uuid,
}

#[derive(Clone)]
pub struct SalidaRepository {
    pool: PgPool,
}

impl SalidaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Insere o registro na mesma transação do desconto: a transição
    // saldo_anterior -> saldo_actual tem que casar com o UPDATE do estoque.
    pub async fn insertar<'e, E>(
        &self,
        executor: E,
        salida: &InsertarSalida<'_>,
    ) -> Result<RegistroSalida, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let registro = sqlx::query_as::<_, RegistroSalida>(
            r#"
            INSERT INTO registros_salidas
                (tipo_item, materia_prima_id, producto_terminado_id, codigo_item, nombre_item,
                 lote, cantidad_salida, unidad_medida, motivo_salida, saldo_anterior,
                 saldo_actual, observaciones, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(salida.tipo_item)
        .bind(salida.materia_prima_id)
        .bind(salida.producto_terminado_id)
        .bind(salida.codigo_item)
        .bind(salida.nombre_item)
        .bind(salida.lote)
        .bind(salida.cantidad_salida)
        .bind(salida.unidad_medida)
        .bind(salida.motivo_salida)
        .bind(salida.saldo_anterior)
        .bind(salida.saldo_actual)
        .bind(salida.observaciones)
        .bind(salida.created_by)
        .fetch_one(executor)
        .await?;
        Ok(registro)
    }

    pub async fn historial(
        &self,
        filtro: &FiltroHistorialSalidas,
    ) -> Result<Vec<RegistroSalida>, AppError> {
        let registros = sqlx::query_as::<_, RegistroSalida>(
            r#"
            SELECT * FROM registros_salidas
            WHERE ($1::text IS NULL OR tipo_item = $1)
              AND ($2::text IS NULL OR motivo_salida = $2)
              AND ($3::timestamptz IS NULL OR created_at >= $3)
              AND ($4::timestamptz IS NULL OR created_at <= $4)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filtro.tipo_item)
        .bind(filtro.motivo_salida)
        .bind(filtro.fecha_desde)
        .bind(filtro.fecha_hasta)
        .fetch_all(&self.pool)
        .await?;
        Ok(registros)
    }
}

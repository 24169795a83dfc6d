// src/db/materia_prima_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::materia_prima::{
        ActualizarMateriaPrima, MateriaPrima, MovimientoMateriaPrima, NuevaMateriaPrima,
        TipoInventario, TipoMovimiento,
    },
};

#[derive(Clone)]
pub struct MateriaPrimaRepository {
    pool: PgPool,
}

impl MateriaPrimaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras (usam a pool principal)
    // ---

    pub async fn listar(&self) -> Result<Vec<MateriaPrima>, AppError> {
        let materias =
            sqlx::query_as::<_, MateriaPrima>("SELECT * FROM materias_primas ORDER BY nombre ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(materias)
    }

    pub async fn obtener(&self, id: Uuid) -> Result<Option<MateriaPrima>, AppError> {
        let materia =
            sqlx::query_as::<_, MateriaPrima>("SELECT * FROM materias_primas WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(materia)
    }

    // Mesma leitura de obtener, mas dentro da transação do chamador, para
    // que o check de existência e o insert vejam o mesmo snapshot.
    pub async fn obtener_tx<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<MateriaPrima>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let materia =
            sqlx::query_as::<_, MateriaPrima>("SELECT * FROM materias_primas WHERE id = $1")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(materia)
    }

    pub async fn buscar_por_codigo(&self, codigo: &str) -> Result<Option<MateriaPrima>, AppError> {
        let materia =
            sqlx::query_as::<_, MateriaPrima>("SELECT * FROM materias_primas WHERE codigo = $1")
                .bind(codigo)
                .fetch_optional(&self.pool)
                .await?;
        Ok(materia)
    }

    pub async fn stock_bajo(&self) -> Result<Vec<MateriaPrima>, AppError> {
        let materias = sqlx::query_as::<_, MateriaPrima>(
            "SELECT * FROM materias_primas WHERE cantidad_actual <= cantidad_minima ORDER BY nombre ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(materias)
    }

    pub async fn lotes_disponibles(&self, codigo: &str) -> Result<Vec<MateriaPrima>, AppError> {
        let materias = sqlx::query_as::<_, MateriaPrima>(
            "SELECT * FROM materias_primas WHERE codigo = $1 AND cantidad_actual > 0",
        )
        .bind(codigo)
        .fetch_all(&self.pool)
        .await?;
        Ok(materias)
    }

    pub async fn listar_movimientos(
        &self,
        materia_prima_id: Uuid,
    ) -> Result<Vec<MovimientoMateriaPrima>, AppError> {
        let movimientos = sqlx::query_as::<_, MovimientoMateriaPrima>(
            r#"
            SELECT * FROM movimientos_materia_prima
            WHERE materia_prima_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(materia_prima_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(movimientos)
    }

    // ---
    // Escritas (padrão genérico 'Executor', rodam dentro de transações)
    // ---

    pub async fn crear<'e, E>(
        &self,
        executor: E,
        nueva: &NuevaMateriaPrima,
        created_by: Uuid,
    ) -> Result<MateriaPrima, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, MateriaPrima>(
            r#"
            INSERT INTO materias_primas
                (codigo, nombre, descripcion, unidad_medida, cantidad_actual, cantidad_minima,
                 lote, proveedor, fecha_ingreso, ubicacion, tipo_inventario, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(&nueva.codigo)
        .bind(&nueva.nombre)
        .bind(&nueva.descripcion)
        .bind(&nueva.unidad_medida)
        .bind(nueva.cantidad_actual)
        .bind(nueva.cantidad_minima)
        .bind(&nueva.lote)
        .bind(&nueva.proveedor)
        .bind(nueva.fecha_ingreso)
        .bind(&nueva.ubicacion)
        .bind(nueva.tipo_inventario)
        .bind(created_by)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::CodigoYaExiste(
                        "Ya existe una materia prima con este código".into(),
                    );
                }
            }
            e.into()
        })
    }

    // Atualização com campos mutáveis explícitos (COALESCE mantém o valor
    // atual quando o campo não vem no comando).
    pub async fn actualizar<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        cambios: &ActualizarMateriaPrima,
    ) -> Result<Option<MateriaPrima>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let materia = sqlx::query_as::<_, MateriaPrima>(
            r#"
            UPDATE materias_primas SET
                nombre = COALESCE($2, nombre),
                descripcion = COALESCE($3, descripcion),
                unidad_medida = COALESCE($4, unidad_medida),
                cantidad_actual = COALESCE($5, cantidad_actual),
                cantidad_minima = COALESCE($6, cantidad_minima),
                lote = COALESCE($7, lote),
                proveedor = COALESCE($8, proveedor),
                ubicacion = COALESCE($9, ubicacion),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&cambios.nombre)
        .bind(&cambios.descripcion)
        .bind(&cambios.unidad_medida)
        .bind(cambios.cantidad_actual)
        .bind(cambios.cantidad_minima)
        .bind(&cambios.lote)
        .bind(&cambios.proveedor)
        .bind(&cambios.ubicacion)
        .fetch_optional(executor)
        .await?;
        Ok(materia)
    }

    pub async fn eliminar<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM materias_primas WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::EntradaInvalida(
                            "No se puede eliminar: la materia prima tiene historial asociado"
                                .into(),
                        );
                    }
                }
                e.into()
            })?;
        Ok(result.rows_affected() > 0)
    }

    // Trava a linha de estoque pelo id (FOR UPDATE) para a duração da
    // transação: saídas e movimentações não podem intercalar o
    // check-and-deduct.
    pub async fn bloquear_por_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<MateriaPrima>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let materia = sqlx::query_as::<_, MateriaPrima>(
            "SELECT * FROM materias_primas WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(materia)
    }

    pub async fn bloquear_por_codigo<'e, E>(
        &self,
        executor: E,
        codigo: &str,
    ) -> Result<Option<MateriaPrima>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let materia = sqlx::query_as::<_, MateriaPrima>(
            "SELECT * FROM materias_primas WHERE codigo = $1 FOR UPDATE",
        )
        .bind(codigo)
        .fetch_optional(executor)
        .await?;
        Ok(materia)
    }

    // Localiza a instância da matéria no sub-inventário de destino da
    // produção. A chave é (nombre, tipo_inventario): a mesma matéria pode
    // existir em mais de um sub-inventário como registros distintos.
    pub async fn bloquear_para_descuento<'e, E>(
        &self,
        executor: E,
        nombre: &str,
        tipo_inventario: TipoInventario,
    ) -> Result<Option<MateriaPrima>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let materia = sqlx::query_as::<_, MateriaPrima>(
            r#"
            SELECT * FROM materias_primas
            WHERE nombre = $1 AND tipo_inventario = $2
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(nombre)
        .bind(tipo_inventario)
        .fetch_optional(executor)
        .await?;
        Ok(materia)
    }

    // Desconto guardado: o UPDATE só aplica se o saldo comporta. Retorna
    // None quando a guarda falha (o chamador decide o erro).
    pub async fn descontar<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        cantidad: f64,
    ) -> Result<Option<MateriaPrima>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let materia = sqlx::query_as::<_, MateriaPrima>(
            r#"
            UPDATE materias_primas
            SET cantidad_actual = cantidad_actual - $2, updated_at = now()
            WHERE id = $1 AND cantidad_actual >= $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(cantidad)
        .fetch_optional(executor)
        .await?;
        Ok(materia)
    }

    pub async fn ingresar<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        cantidad: f64,
    ) -> Result<Option<MateriaPrima>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let materia = sqlx::query_as::<_, MateriaPrima>(
            r#"
            UPDATE materias_primas
            SET cantidad_actual = cantidad_actual + $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(cantidad)
        .fetch_optional(executor)
        .await?;
        Ok(materia)
    }

    // Registra a movimentação no livro-razão (auditoria). Append-only.
    pub async fn registrar_movimiento<'e, E>(
        &self,
        executor: E,
        materia_prima_id: Uuid,
        tipo: TipoMovimiento,
        cantidad: f64,
        motivo: Option<&str>,
        created_by: Uuid,
    ) -> Result<MovimientoMateriaPrima, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movimiento = sqlx::query_as::<_, MovimientoMateriaPrima>(
            r#"
            INSERT INTO movimientos_materia_prima (materia_prima_id, tipo, cantidad, motivo, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(materia_prima_id)
        .bind(tipo)
        .bind(cantidad)
        .bind(motivo)
        .bind(created_by)
        .fetch_one(executor)
        .await?;
        Ok(movimiento)
    }
}

// src/db/producto_terminado_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        materia_prima::TipoMovimiento,
        producto_terminado::{
            ActualizarProductoTerminado, MovimientoProducto, NuevoProductoTerminado,
            ProductoTerminado,
        },
    },
};

#[derive(Clone)]
pub struct ProductoTerminadoRepository {
    pool: PgPool,
}

impl ProductoTerminadoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras
    // ---

    pub async fn listar(&self) -> Result<Vec<ProductoTerminado>, AppError> {
        let productos = sqlx::query_as::<_, ProductoTerminado>(
            "SELECT * FROM productos_terminados ORDER BY nombre ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(productos)
    }

    pub async fn obtener(&self, id: Uuid) -> Result<Option<ProductoTerminado>, AppError> {
        let producto = sqlx::query_as::<_, ProductoTerminado>(
            "SELECT * FROM productos_terminados WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(producto)
    }

    // Um código pode ter vários lotes; devolve o mais recente.
    pub async fn buscar_por_codigo(
        &self,
        codigo: &str,
    ) -> Result<Option<ProductoTerminado>, AppError> {
        let producto = sqlx::query_as::<_, ProductoTerminado>(
            r#"
            SELECT * FROM productos_terminados
            WHERE codigo = $1
            ORDER BY fecha_produccion DESC NULLS LAST
            LIMIT 1
            "#,
        )
        .bind(codigo)
        .fetch_optional(&self.pool)
        .await?;
        Ok(producto)
    }

    pub async fn stock_bajo(&self) -> Result<Vec<ProductoTerminado>, AppError> {
        let productos = sqlx::query_as::<_, ProductoTerminado>(
            "SELECT * FROM productos_terminados WHERE cantidad_actual <= cantidad_minima ORDER BY nombre ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(productos)
    }

    pub async fn lotes_disponibles(
        &self,
        codigo: &str,
    ) -> Result<Vec<ProductoTerminado>, AppError> {
        let productos = sqlx::query_as::<_, ProductoTerminado>(
            "SELECT * FROM productos_terminados WHERE codigo = $1 AND cantidad_actual > 0",
        )
        .bind(codigo)
        .fetch_all(&self.pool)
        .await?;
        Ok(productos)
    }

    pub async fn listar_movimientos(
        &self,
        producto_id: Uuid,
    ) -> Result<Vec<MovimientoProducto>, AppError> {
        let movimientos = sqlx::query_as::<_, MovimientoProducto>(
            r#"
            SELECT * FROM movimientos_productos
            WHERE producto_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(producto_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(movimientos)
    }

    // ---
    // Escritas
    // ---

    pub async fn crear<'e, E>(
        &self,
        executor: E,
        nuevo: &NuevoProductoTerminado,
        created_by: Uuid,
    ) -> Result<ProductoTerminado, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, ProductoTerminado>(
            r#"
            INSERT INTO productos_terminados
                (codigo, nombre, descripcion, unidad_medida, cantidad_actual, cantidad_minima,
                 precio_produccion, precio_venta, lote, fecha_produccion, fecha_vencimiento,
                 ubicacion, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(&nuevo.codigo)
        .bind(&nuevo.nombre)
        .bind(&nuevo.descripcion)
        .bind(&nuevo.unidad_medida)
        .bind(nuevo.cantidad_actual)
        .bind(nuevo.cantidad_minima)
        .bind(nuevo.precio_produccion)
        .bind(nuevo.precio_venta)
        .bind(&nuevo.lote)
        .bind(nuevo.fecha_produccion)
        .bind(nuevo.fecha_vencimiento)
        .bind(&nuevo.ubicacion)
        .bind(created_by)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::CodigoYaExiste(
                        "Ya existe un producto terminado con este código y lote".into(),
                    );
                }
            }
            e.into()
        })
    }

    pub async fn actualizar<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        cambios: &ActualizarProductoTerminado,
    ) -> Result<Option<ProductoTerminado>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let producto = sqlx::query_as::<_, ProductoTerminado>(
            r#"
            UPDATE productos_terminados SET
                codigo = COALESCE($2, codigo),
                nombre = COALESCE($3, nombre),
                descripcion = COALESCE($4, descripcion),
                unidad_medida = COALESCE($5, unidad_medida),
                cantidad_actual = COALESCE($6, cantidad_actual),
                cantidad_minima = COALESCE($7, cantidad_minima),
                precio_produccion = COALESCE($8, precio_produccion),
                precio_venta = COALESCE($9, precio_venta),
                lote = COALESCE($10, lote),
                fecha_produccion = COALESCE($11, fecha_produccion),
                fecha_vencimiento = COALESCE($12, fecha_vencimiento),
                ubicacion = COALESCE($13, ubicacion),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&cambios.codigo)
        .bind(&cambios.nombre)
        .bind(&cambios.descripcion)
        .bind(&cambios.unidad_medida)
        .bind(cambios.cantidad_actual)
        .bind(cambios.cantidad_minima)
        .bind(cambios.precio_produccion)
        .bind(cambios.precio_venta)
        .bind(&cambios.lote)
        .bind(cambios.fecha_produccion)
        .bind(cambios.fecha_vencimiento)
        .bind(&cambios.ubicacion)
        .fetch_optional(executor)
        .await?;
        Ok(producto)
    }

    pub async fn eliminar<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM productos_terminados WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::EntradaInvalida(
                            "No se puede eliminar: el producto terminado tiene movimientos asociados"
                                .into(),
                        );
                    }
                }
                e.into()
            })?;
        Ok(result.rows_affected() > 0)
    }

    // Trava a linha (FOR UPDATE) para a duração da transação.
    pub async fn bloquear_por_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<ProductoTerminado>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let producto = sqlx::query_as::<_, ProductoTerminado>(
            "SELECT * FROM productos_terminados WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(producto)
    }

    // Desconto guardado; None quando o saldo não comporta.
    pub async fn descontar<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        cantidad: f64,
    ) -> Result<Option<ProductoTerminado>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let producto = sqlx::query_as::<_, ProductoTerminado>(
            r#"
            UPDATE productos_terminados
            SET cantidad_actual = cantidad_actual - $2, updated_at = now()
            WHERE id = $1 AND cantidad_actual >= $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(cantidad)
        .fetch_optional(executor)
        .await?;
        Ok(producto)
    }

    pub async fn ingresar<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        cantidad: f64,
    ) -> Result<Option<ProductoTerminado>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let producto = sqlx::query_as::<_, ProductoTerminado>(
            r#"
            UPDATE productos_terminados
            SET cantidad_actual = cantidad_actual + $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(cantidad)
        .fetch_optional(executor)
        .await?;
        Ok(producto)
    }

    pub async fn registrar_movimiento<'e, E>(
        &self,
        executor: E,
        producto_id: Uuid,
        tipo: TipoMovimiento,
        cantidad: f64,
        motivo: Option<&str>,
        destino: Option<&str>,
        created_by: Uuid,
    ) -> Result<MovimientoProducto, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movimiento = sqlx::query_as::<_, MovimientoProducto>(
            r#"
            INSERT INTO movimientos_productos (producto_id, tipo, cantidad, motivo, destino, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(producto_id)
        .bind(tipo)
        .bind(cantidad)
        .bind(motivo)
        .bind(destino)
        .bind(created_by)
        .fetch_one(executor)
        .await?;
        Ok(movimiento)
    }
}

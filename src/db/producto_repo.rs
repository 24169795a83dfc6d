// src/db/producto_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::producto::{
        ActualizarProducto, ComposicionMateriaPrima, HistorialDescuentoMateriaPrima, Inventario,
        NuevoProducto, Producto,
    },
};

#[derive(Clone)]
pub struct ProductoRepository {
    pool: PgPool,
}

impl ProductoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras
    // ---

    pub async fn listar(&self) -> Result<Vec<Producto>, AppError> {
        let productos =
            sqlx::query_as::<_, Producto>("SELECT * FROM productos ORDER BY nombre ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(productos)
    }

    pub async fn obtener(&self, id: Uuid) -> Result<Option<Producto>, AppError> {
        let producto = sqlx::query_as::<_, Producto>("SELECT * FROM productos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(producto)
    }

    pub async fn listar_inventarios(&self) -> Result<Vec<Inventario>, AppError> {
        let inventarios =
            sqlx::query_as::<_, Inventario>("SELECT * FROM inventarios ORDER BY nombre ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(inventarios)
    }

    pub async fn obtener_inventario(&self, id: Uuid) -> Result<Option<Inventario>, AppError> {
        let inventario = sqlx::query_as::<_, Inventario>("SELECT * FROM inventarios WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(inventario)
    }

    pub async fn inventarios_de(&self, producto_id: Uuid) -> Result<Vec<Inventario>, AppError> {
        let inventarios = sqlx::query_as::<_, Inventario>(
            r#"
            SELECT i.* FROM inventarios i
            JOIN producto_inventario pi ON pi.inventario_id = i.id
            WHERE pi.producto_id = $1
            ORDER BY i.nombre ASC
            "#,
        )
        .bind(producto_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(inventarios)
    }

    pub async fn composicion_de(
        &self,
        producto_id: Uuid,
    ) -> Result<Vec<ComposicionMateriaPrima>, AppError> {
        self.composicion(&self.pool, producto_id).await
    }

    pub async fn historial_descuentos(
        &self,
        producto_id: Uuid,
    ) -> Result<Vec<HistorialDescuentoMateriaPrima>, AppError> {
        let historial = sqlx::query_as::<_, HistorialDescuentoMateriaPrima>(
            r#"
            SELECT * FROM historial_descuentos_materias_primas
            WHERE producto_id = $1
            ORDER BY fecha_descuento DESC
            "#,
        )
        .bind(producto_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(historial)
    }

    // ---
    // Resolução da composição (dentro da mesma transação do desconto)
    // ---

    pub async fn obtener_tx<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Producto>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let producto = sqlx::query_as::<_, Producto>("SELECT * FROM productos WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(producto)
    }

    pub async fn obtener_inventario_tx<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Inventario>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let inventario = sqlx::query_as::<_, Inventario>("SELECT * FROM inventarios WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(inventario)
    }

    // A concentração vive na associação; a leitura é feita no instante da
    // chamada, sem tolerância a dados velhos.
    pub async fn composicion<'e, E>(
        &self,
        executor: E,
        producto_id: Uuid,
    ) -> Result<Vec<ComposicionMateriaPrima>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let composicion = sqlx::query_as::<_, ComposicionMateriaPrima>(
            r#"
            SELECT pmp.materia_prima_id, mp.nombre, pmp.concentracion
            FROM producto_materia_prima pmp
            JOIN materias_primas mp ON mp.id = pmp.materia_prima_id
            WHERE pmp.producto_id = $1
            ORDER BY mp.nombre ASC
            "#,
        )
        .bind(producto_id)
        .fetch_all(executor)
        .await?;
        Ok(composicion)
    }

    // ---
    // Escritas
    // ---

    pub async fn crear<'e, E>(
        &self,
        executor: E,
        nuevo: &NuevoProducto,
        created_by: Uuid,
    ) -> Result<Producto, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Producto>(
            r#"
            INSERT INTO productos
                (codigo, nombre, descripcion, precio_produccion, precio_venta,
                 unidad_negocio, unidad_volumen, meses_vencimiento, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 6), $9)
            RETURNING *
            "#,
        )
        .bind(&nuevo.codigo)
        .bind(&nuevo.nombre)
        .bind(&nuevo.descripcion)
        .bind(nuevo.precio_produccion)
        .bind(nuevo.precio_venta)
        .bind(nuevo.unidad_negocio)
        .bind(&nuevo.unidad_volumen)
        .bind(nuevo.meses_vencimiento)
        .bind(created_by)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::CodigoYaExiste("Ya existe un producto con este código".into());
                }
            }
            e.into()
        })
    }

    pub async fn actualizar<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        cambios: &ActualizarProducto,
    ) -> Result<Option<Producto>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Producto>(
            r#"
            UPDATE productos SET
                codigo = COALESCE($2, codigo),
                nombre = COALESCE($3, nombre),
                descripcion = COALESCE($4, descripcion),
                precio_produccion = COALESCE($5, precio_produccion),
                precio_venta = COALESCE($6, precio_venta),
                unidad_negocio = COALESCE($7, unidad_negocio),
                unidad_volumen = COALESCE($8, unidad_volumen),
                meses_vencimiento = COALESCE($9, meses_vencimiento),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&cambios.codigo)
        .bind(&cambios.nombre)
        .bind(&cambios.descripcion)
        .bind(cambios.precio_produccion)
        .bind(cambios.precio_venta)
        .bind(cambios.unidad_negocio)
        .bind(&cambios.unidad_volumen)
        .bind(cambios.meses_vencimiento)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::CodigoYaExiste(
                        "Ya existe otro producto con este código".into(),
                    );
                }
            }
            e.into()
        })
    }

    pub async fn eliminar<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM productos WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::EntradaInvalida(
                            "No se puede eliminar: el producto tiene historial de producción"
                                .into(),
                        );
                    }
                }
                e.into()
            })?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn limpiar_composicion<'e, E>(
        &self,
        executor: E,
        producto_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM producto_materia_prima WHERE producto_id = $1")
            .bind(producto_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn agregar_composicion<'e, E>(
        &self,
        executor: E,
        producto_id: Uuid,
        materia_prima_id: Uuid,
        concentracion: f64,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO producto_materia_prima (producto_id, materia_prima_id, concentracion)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(producto_id)
        .bind(materia_prima_id)
        .bind(concentracion)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn limpiar_inventarios<'e, E>(
        &self,
        executor: E,
        producto_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM producto_inventario WHERE producto_id = $1")
            .bind(producto_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn agregar_inventario<'e, E>(
        &self,
        executor: E,
        producto_id: Uuid,
        inventario_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "INSERT INTO producto_inventario (producto_id, inventario_id) VALUES ($1, $2)",
        )
        .bind(producto_id)
        .bind(inventario_id)
        .execute(executor)
        .await?;
        Ok(())
    }

    // Lançamento imutável da trilha de descontos. Criado exatamente uma vez
    // por (matéria-prima, corrida de produção), dentro da mesma transação
    // do desconto.
    #[allow(clippy::too_many_arguments)]
    pub async fn insertar_historial_descuento<'e, E>(
        &self,
        executor: E,
        materia_prima_id: Uuid,
        producto_id: Uuid,
        producto_nombre: &str,
        cantidad_descontada: f64,
        concentracion: f64,
        volumen_producido: f64,
        unidad_volumen: &str,
        fecha_produccion: DateTime<Utc>,
    ) -> Result<HistorialDescuentoMateriaPrima, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let historial = sqlx::query_as::<_, HistorialDescuentoMateriaPrima>(
            r#"
            INSERT INTO historial_descuentos_materias_primas
                (materia_prima_id, producto_id, producto_nombre, cantidad_descontada,
                 concentracion, volumen_producido, unidad_volumen, fecha_produccion)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(materia_prima_id)
        .bind(producto_id)
        .bind(producto_nombre)
        .bind(cantidad_descontada)
        .bind(concentracion)
        .bind(volumen_producido)
        .bind(unidad_volumen)
        .bind(fecha_produccion)
        .fetch_one(executor)
        .await?;
        Ok(historial)
    }
}

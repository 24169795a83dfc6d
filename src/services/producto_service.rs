// src/services/producto_service.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{MateriaPrimaRepository, ProductoRepository},
    models::producto::{
        ActualizarProducto, HistorialDescuentoMateriaPrima, Inventario,
        MateriaPrimaAsociadaInput, NuevoProducto, Producto, ProductoDetalle,
    },
};

#[derive(Clone)]
pub struct ProductoService {
    producto_repo: ProductoRepository,
    materia_prima_repo: MateriaPrimaRepository,
}

impl ProductoService {
    pub fn new(
        producto_repo: ProductoRepository,
        materia_prima_repo: MateriaPrimaRepository,
    ) -> Self {
        Self {
            producto_repo,
            materia_prima_repo,
        }
    }

    pub async fn listar(&self) -> Result<Vec<Producto>, AppError> {
        self.producto_repo.listar().await
    }

    pub async fn listar_inventarios(&self) -> Result<Vec<Inventario>, AppError> {
        self.producto_repo.listar_inventarios().await
    }

    pub async fn detalle(&self, id: Uuid) -> Result<ProductoDetalle, AppError> {
        let producto = self
            .producto_repo
            .obtener(id)
            .await?
            .ok_or_else(|| AppError::NoEncontrado("Producto no encontrado".into()))?;

        let materias_primas = self.producto_repo.composicion_de(id).await?;
        let inventarios = self.producto_repo.inventarios_de(id).await?;

        Ok(ProductoDetalle {
            producto,
            materias_primas,
            inventarios,
        })
    }

    pub async fn historial_descuentos(
        &self,
        producto_id: Uuid,
    ) -> Result<Vec<HistorialDescuentoMateriaPrima>, AppError> {
        self.producto_repo
            .obtener(producto_id)
            .await?
            .ok_or_else(|| AppError::NoEncontrado("Producto no encontrado".into()))?;
        self.producto_repo.historial_descuentos(producto_id).await
    }

    // Cria o produto com composição e vínculos de inventário numa única
    // transação: ou entra tudo, ou nada.
    pub async fn crear<'e, E>(
        &self,
        executor: E,
        nuevo: &NuevoProducto,
        created_by: Uuid,
    ) -> Result<Producto, AppError>
    where
        E: Executor<'e, Database = Postgres> + sqlx::Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let producto = self.producto_repo.crear(&mut *tx, nuevo, created_by).await?;

        self.reemplazar_composicion(&mut tx, producto.id, &nuevo.materias_primas)
            .await?;
        self.reemplazar_inventarios(&mut tx, producto.id, &nuevo.inventarios)
            .await?;

        tx.commit().await?;
        tracing::info!(codigo = %producto.codigo, "producto creado");
        Ok(producto)
    }

    // As listas de composição/inventários, quando presentes no comando,
    // substituem o conjunto inteiro.
    pub async fn actualizar<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        cambios: &ActualizarProducto,
    ) -> Result<Producto, AppError>
    where
        E: Executor<'e, Database = Postgres> + sqlx::Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let producto = self
            .producto_repo
            .actualizar(&mut *tx, id, cambios)
            .await?
            .ok_or_else(|| AppError::NoEncontrado("Producto no encontrado".into()))?;

        if let Some(materias) = &cambios.materias_primas {
            self.producto_repo.limpiar_composicion(&mut *tx, id).await?;
            self.reemplazar_composicion(&mut tx, id, materias).await?;
        }
        if let Some(inventarios) = &cambios.inventarios {
            self.producto_repo.limpiar_inventarios(&mut *tx, id).await?;
            self.reemplazar_inventarios(&mut tx, id, inventarios).await?;
        }

        tx.commit().await?;
        Ok(producto)
    }

    pub async fn eliminar<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + sqlx::Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.producto_repo.limpiar_composicion(&mut *tx, id).await?;
        self.producto_repo.limpiar_inventarios(&mut *tx, id).await?;
        let eliminado = self.producto_repo.eliminar(&mut *tx, id).await?;
        if !eliminado {
            return Err(AppError::NoEncontrado("Producto no encontrado".into()));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn reemplazar_composicion(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        producto_id: Uuid,
        materias: &[MateriaPrimaAsociadaInput],
    ) -> Result<(), AppError> {
        for asociada in materias {
            // Valida a existência antes de inserir para devolver um erro
            // nomeado em vez de uma violação de FK crua. O check roda na
            // mesma transação do insert; um delete concorrente não abre
            // janela entre os dois.
            self.materia_prima_repo
                .obtener_tx(&mut **tx, asociada.materia_prima_id)
                .await?
                .ok_or_else(|| {
                    AppError::EntradaInvalida(format!(
                        "Materia prima con ID {} no existe",
                        asociada.materia_prima_id
                    ))
                })?;

            self.producto_repo
                .agregar_composicion(
                    &mut **tx,
                    producto_id,
                    asociada.materia_prima_id,
                    asociada.concentracion,
                )
                .await?;
        }
        Ok(())
    }

    async fn reemplazar_inventarios(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        producto_id: Uuid,
        inventarios: &[Uuid],
    ) -> Result<(), AppError> {
        for inventario_id in inventarios {
            self.producto_repo
                .obtener_inventario_tx(&mut **tx, *inventario_id)
                .await?
                .ok_or_else(|| {
                    AppError::EntradaInvalida(format!(
                        "Inventario con ID {} no existe",
                        inventario_id
                    ))
                })?;

            self.producto_repo
                .agregar_inventario(&mut **tx, producto_id, *inventario_id)
                .await?;
        }
        Ok(())
    }
}

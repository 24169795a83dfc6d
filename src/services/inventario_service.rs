// src/services/inventario_service.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::MateriaPrimaRepository,
    models::materia_prima::{
        ActualizarMateriaPrima, MateriaPrima, MovimientoMateriaPrima, NuevaMateriaPrima,
        NuevoMovimientoMateriaPrima, TipoMovimiento,
    },
};

#[derive(Clone)]
pub struct InventarioService {
    materia_prima_repo: MateriaPrimaRepository,
}

impl InventarioService {
    pub fn new(materia_prima_repo: MateriaPrimaRepository) -> Self {
        Self { materia_prima_repo }
    }

    pub async fn listar(&self) -> Result<Vec<MateriaPrima>, AppError> {
        self.materia_prima_repo.listar().await
    }

    pub async fn obtener(&self, id: Uuid) -> Result<MateriaPrima, AppError> {
        self.materia_prima_repo
            .obtener(id)
            .await?
            .ok_or_else(|| AppError::NoEncontrado("Materia prima no encontrada".into()))
    }

    pub async fn stock_bajo(&self) -> Result<Vec<MateriaPrima>, AppError> {
        self.materia_prima_repo.stock_bajo().await
    }

    pub async fn listar_movimientos(
        &self,
        materia_prima_id: Uuid,
    ) -> Result<Vec<MovimientoMateriaPrima>, AppError> {
        // 404 antes de devolver lista vazia para um id inexistente.
        self.obtener(materia_prima_id).await?;
        self.materia_prima_repo
            .listar_movimientos(materia_prima_id)
            .await
    }

    pub async fn crear<'e, E>(
        &self,
        executor: E,
        nueva: &NuevaMateriaPrima,
        created_by: Uuid,
    ) -> Result<MateriaPrima, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let materia = self
            .materia_prima_repo
            .crear(executor, nueva, created_by)
            .await?;
        tracing::info!(codigo = %materia.codigo, inventario = %materia.tipo_inventario, "materia prima creada");
        Ok(materia)
    }

    pub async fn actualizar<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        cambios: &ActualizarMateriaPrima,
    ) -> Result<MateriaPrima, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.materia_prima_repo
            .actualizar(executor, id, cambios)
            .await?
            .ok_or_else(|| AppError::NoEncontrado("Materia prima no encontrada".into()))
    }

    pub async fn eliminar<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let eliminada = self.materia_prima_repo.eliminar(executor, id).await?;
        if !eliminada {
            return Err(AppError::NoEncontrado("Materia prima no encontrada".into()));
        }
        Ok(())
    }

    // Movimentação manual (ajuste de estoque): trava a linha, aplica a
    // entrada ou a saída guardada e grava o lançamento na mesma transação.
    pub async fn registrar_movimiento<'e, E>(
        &self,
        executor: E,
        movimiento: &NuevoMovimientoMateriaPrima,
        created_by: Uuid,
    ) -> Result<MovimientoMateriaPrima, AppError>
    where
        E: Executor<'e, Database = Postgres> + sqlx::Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let materia = self
            .materia_prima_repo
            .bloquear_por_id(&mut *tx, movimiento.materia_prima_id)
            .await?
            .ok_or_else(|| AppError::NoEncontrado("Materia prima no encontrada".into()))?;

        match movimiento.tipo {
            TipoMovimiento::Entrada => {
                self.materia_prima_repo
                    .ingresar(&mut *tx, materia.id, movimiento.cantidad)
                    .await?
                    .ok_or_else(|| {
                        AppError::NoEncontrado("Materia prima no encontrada".into())
                    })?;
            }
            TipoMovimiento::Salida => {
                let descontada = self
                    .materia_prima_repo
                    .descontar(&mut *tx, materia.id, movimiento.cantidad)
                    .await?;
                if descontada.is_none() {
                    return Err(AppError::CantidadInsuficienteInventario);
                }
            }
        }

        let registro = self
            .materia_prima_repo
            .registrar_movimiento(
                &mut *tx,
                materia.id,
                movimiento.tipo,
                movimiento.cantidad,
                movimiento.motivo.as_deref(),
                created_by,
            )
            .await?;

        tx.commit().await?;
        Ok(registro)
    }
}

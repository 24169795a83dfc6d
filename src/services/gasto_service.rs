// src/services/gasto_service.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::GastoRepository,
    models::gasto::{ActualizarGasto, Gasto, GastoPorCategoria, NuevoGasto},
};

#[derive(Clone)]
pub struct GastoService {
    gasto_repo: GastoRepository,
}

impl GastoService {
    pub fn new(gasto_repo: GastoRepository) -> Self {
        Self { gasto_repo }
    }

    pub async fn listar(&self) -> Result<Vec<Gasto>, AppError> {
        self.gasto_repo.listar().await
    }

    pub async fn obtener(&self, id: Uuid) -> Result<Gasto, AppError> {
        self.gasto_repo
            .obtener(id)
            .await?
            .ok_or_else(|| AppError::NoEncontrado("Gasto no encontrado".into()))
    }

    pub async fn reporte_por_categoria(
        &self,
        fecha_desde: Option<DateTime<Utc>>,
        fecha_hasta: Option<DateTime<Utc>>,
    ) -> Result<Vec<GastoPorCategoria>, AppError> {
        self.gasto_repo
            .reporte_por_categoria(fecha_desde, fecha_hasta)
            .await
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
        self.gasto_repo.crear(executor, nuevo, created_by).await
    }

    pub async fn actualizar<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        cambios: &ActualizarGasto,
    ) -> Result<Gasto, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.gasto_repo
            .actualizar(executor, id, cambios)
            .await?
            .ok_or_else(|| AppError::NoEncontrado("Gasto no encontrado".into()))
    }

    pub async fn eliminar<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let eliminado = self.gasto_repo.eliminar(executor, id).await?;
        if !eliminado {
            return Err(AppError::NoEncontrado("Gasto no encontrado".into()));
        }
        Ok(())
    }
}

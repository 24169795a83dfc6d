// src/services/producto_terminado_service.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use std::collections::HashMap;

use crate::{
    common::error::AppError,
    db::{MateriaPrimaRepository, ProductoTerminadoRepository},
    models::{
        materia_prima::TipoMovimiento,
        producto_terminado::{
            ActualizarProductoTerminado, MovimientoProducto, NuevoMovimientoProducto,
            NuevoProductoTerminado, ProductoTerminado,
        },
    },
};

// Total de embalagens a descontar: soma das unidades por apresentação.
pub fn unidades_totales(presentaciones: Option<&HashMap<String, i64>>) -> i64 {
    presentaciones.map(|p| p.values().sum()).unwrap_or(0)
}

#[derive(Clone)]
pub struct ProductoTerminadoService {
    producto_terminado_repo: ProductoTerminadoRepository,
    materia_prima_repo: MateriaPrimaRepository,
}

impl ProductoTerminadoService {
    pub fn new(
        producto_terminado_repo: ProductoTerminadoRepository,
        materia_prima_repo: MateriaPrimaRepository,
    ) -> Self {
        Self {
            producto_terminado_repo,
            materia_prima_repo,
        }
    }

    pub async fn listar(&self) -> Result<Vec<ProductoTerminado>, AppError> {
        self.producto_terminado_repo.listar().await
    }

    pub async fn obtener(&self, id: Uuid) -> Result<ProductoTerminado, AppError> {
        self.producto_terminado_repo
            .obtener(id)
            .await?
            .ok_or_else(|| AppError::NoEncontrado("Producto terminado no encontrado".into()))
    }

    pub async fn stock_bajo(&self) -> Result<Vec<ProductoTerminado>, AppError> {
        self.producto_terminado_repo.stock_bajo().await
    }

    pub async fn listar_movimientos(
        &self,
        producto_id: Uuid,
    ) -> Result<Vec<MovimientoProducto>, AppError> {
        self.obtener(producto_id).await?;
        self.producto_terminado_repo
            .listar_movimientos(producto_id)
            .await
    }

    // O cadastro de um lote acabado medido em unidades também desconta as
    // embalagens (envase/gotero/caja) do estoque de matérias-primas, tudo
    // na mesma transação.
    pub async fn crear<'e, E>(
        &self,
        executor: E,
        nuevo: &NuevoProductoTerminado,
        created_by: Uuid,
    ) -> Result<ProductoTerminado, AppError>
    where
        E: Executor<'e, Database = Postgres> + sqlx::Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let producto = self
            .producto_terminado_repo
            .crear(&mut *tx, nuevo, created_by)
            .await?;

        if nuevo.unidad_medida == "unidades" {
            if let Some(materiales) = &nuevo.materiales {
                let unidades = unidades_totales(nuevo.presentaciones.as_ref());

                if unidades > 0 {
                    let pares = [
                        ("Envase", materiales.envase.as_deref()),
                        ("Gotero", materiales.gotero.as_deref()),
                        ("Caja", materiales.caja.as_deref()),
                    ];
                    for (etiqueta, codigo) in pares {
                        if let Some(codigo) = codigo {
                            self.descontar_empaque(&mut tx, etiqueta, codigo, unidades as f64)
                                .await?;
                        }
                    }
                }
            }
        }

        tx.commit().await?;
        tracing::info!(codigo = %producto.codigo, lote = ?producto.lote, "producto terminado registrado");
        Ok(producto)
    }

    async fn descontar_empaque(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        etiqueta: &str,
        codigo: &str,
        cantidad: f64,
    ) -> Result<(), AppError> {
        let materia = self
            .materia_prima_repo
            .bloquear_por_codigo(&mut **tx, codigo)
            .await?
            .ok_or_else(|| AppError::NoEncontrado(format!("{etiqueta} no encontrado")))?;

        if materia.cantidad_actual < cantidad {
            return Err(AppError::EntradaInvalida(format!(
                "Cantidad insuficiente de {}: disponible {}, requerido {}",
                etiqueta.to_lowercase(),
                materia.cantidad_actual,
                cantidad
            )));
        }

        self.materia_prima_repo
            .descontar(&mut **tx, materia.id, cantidad)
            .await?
            .ok_or(AppError::CantidadInsuficienteInventario)?;
        Ok(())
    }

    pub async fn actualizar<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        cambios: &ActualizarProductoTerminado,
    ) -> Result<ProductoTerminado, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.producto_terminado_repo
            .actualizar(executor, id, cambios)
            .await?
            .ok_or_else(|| AppError::NoEncontrado("Producto terminado no encontrado".into()))
    }

    pub async fn eliminar<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let eliminado = self.producto_terminado_repo.eliminar(executor, id).await?;
        if !eliminado {
            return Err(AppError::NoEncontrado(
                "Producto terminado no encontrado".into(),
            ));
        }
        Ok(())
    }

    pub async fn registrar_movimiento<'e, E>(
        &self,
        executor: E,
        movimiento: &NuevoMovimientoProducto,
        created_by: Uuid,
    ) -> Result<MovimientoProducto, AppError>
    where
        E: Executor<'e, Database = Postgres> + sqlx::Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let producto = self
            .producto_terminado_repo
            .bloquear_por_id(&mut *tx, movimiento.producto_id)
            .await?
            .ok_or_else(|| AppError::NoEncontrado("Producto terminado no encontrado".into()))?;

        match movimiento.tipo {
            TipoMovimiento::Entrada => {
                self.producto_terminado_repo
                    .ingresar(&mut *tx, producto.id, movimiento.cantidad)
                    .await?
                    .ok_or_else(|| {
                        AppError::NoEncontrado("Producto terminado no encontrado".into())
                    })?;
            }
            TipoMovimiento::Salida => {
                let descontado = self
                    .producto_terminado_repo
                    .descontar(&mut *tx, producto.id, movimiento.cantidad)
                    .await?;
                if descontado.is_none() {
                    return Err(AppError::CantidadInsuficienteInventario);
                }
            }
        }

        let registro = self
            .producto_terminado_repo
            .registrar_movimiento(
                &mut *tx,
                producto.id,
                movimiento.tipo,
                movimiento.cantidad,
                movimiento.motivo.as_deref(),
                movimiento.destino.as_deref(),
                created_by,
            )
            .await?;

        tx.commit().await?;
        Ok(registro)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suma_de_presentaciones() {
        let mut presentaciones = HashMap::new();
        presentaciones.insert("30mL".to_string(), 10);
        presentaciones.insert("60mL".to_string(), 5);
        assert_eq!(unidades_totales(Some(&presentaciones)), 15);
    }

    #[test]
    fn sin_presentaciones_no_descuenta() {
        assert_eq!(unidades_totales(None), 0);
        assert_eq!(unidades_totales(Some(&HashMap::new())), 0);
    }
}

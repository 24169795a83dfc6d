// src/services/salida_service.rs

use std::str::FromStr;

use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    db::{
        MateriaPrimaRepository, ProductoTerminadoRepository, SalidaRepository,
        salida_repo::{FiltroHistorialSalidas, InsertarSalida},
    },
    models::salida::{
        ItemPorCodigo, LoteDisponible, MotivoSalida, NuevaSalida, RegistroSalida, TipoItem,
    },
};

// Transição de saldo de uma saída. Pura: o serviço captura saldo_anterior
// da linha travada e deriva saldo_actual daqui.
pub fn transicion_saldo(saldo_anterior: f64, cantidad_salida: f64) -> (f64, f64) {
    (saldo_anterior, saldo_anterior - cantidad_salida)
}

// O lote do pedido tem que casar exatamente com o da linha (igualdade de
// string, sem famílias de lote nem caixa flexível).
pub fn verificar_lote(registrado: Option<&str>, solicitado: &str) -> Result<(), AppError> {
    if registrado != Some(solicitado) {
        return Err(AppError::LoteNoCoincide);
    }
    Ok(())
}

#[derive(Clone)]
pub struct SalidaService {
    salida_repo: SalidaRepository,
    materia_prima_repo: MateriaPrimaRepository,
    producto_terminado_repo: ProductoTerminadoRepository,
}

impl SalidaService {
    pub fn new(
        salida_repo: SalidaRepository,
        materia_prima_repo: MateriaPrimaRepository,
        producto_terminado_repo: ProductoTerminadoRepository,
    ) -> Self {
        Self {
            salida_repo,
            materia_prima_repo,
            producto_terminado_repo,
        }
    }

    pub fn motivos(&self) -> Vec<&'static str> {
        MotivoSalida::TODOS.iter().map(|m| m.as_str()).collect()
    }

    pub async fn historial(
        &self,
        filtro: &FiltroHistorialSalidas,
    ) -> Result<Vec<RegistroSalida>, AppError> {
        self.salida_repo.historial(filtro).await
    }

    // Busca um item (matéria-prima ou produto acabado) pelo código, para a
    // tela de registro de saída. Matéria-prima tem precedência.
    pub async fn buscar_por_codigo(&self, codigo: &str) -> Result<ItemPorCodigo, AppError> {
        if let Some(materia) = self.materia_prima_repo.buscar_por_codigo(codigo).await? {
            return Ok(ItemPorCodigo {
                id: materia.id,
                codigo: materia.codigo,
                nombre: materia.nombre,
                lote: materia.lote,
                cantidad_actual: materia.cantidad_actual,
                unidad_medida: materia.unidad_medida,
                tipo_item: TipoItem::MateriaPrima,
            });
        }
        if let Some(producto) = self.producto_terminado_repo.buscar_por_codigo(codigo).await? {
            return Ok(ItemPorCodigo {
                id: producto.id,
                codigo: producto.codigo,
                nombre: producto.nombre,
                lote: producto.lote,
                cantidad_actual: producto.cantidad_actual,
                unidad_medida: producto.unidad_medida,
                tipo_item: TipoItem::ProductoTerminado,
            });
        }
        Err(AppError::NoEncontrado(format!(
            "No se encontró ningún item con el código {codigo}"
        )))
    }

    pub async fn lotes_disponibles(&self, codigo: &str) -> Result<Vec<LoteDisponible>, AppError> {
        let mut lotes: Vec<LoteDisponible> = self
            .materia_prima_repo
            .lotes_disponibles(codigo)
            .await?
            .into_iter()
            .map(|m| LoteDisponible {
                id: m.id,
                lote: m.lote,
                cantidad_disponible: m.cantidad_actual,
                unidad_medida: m.unidad_medida,
                fecha_produccion: None,
            })
            .collect();

        if lotes.is_empty() {
            lotes = self
                .producto_terminado_repo
                .lotes_disponibles(codigo)
                .await?
                .into_iter()
                .map(|p| LoteDisponible {
                    id: p.id,
                    lote: p.lote,
                    cantidad_disponible: p.cantidad_actual,
                    unidad_medida: p.unidad_medida,
                    fecha_produccion: p.fecha_produccion,
                })
                .collect();
        }

        Ok(lotes)
    }

    // Registra uma saída de estoque. A ordem de validação é contratual:
    // motivo, tipo de item, id obrigatório, existência, lote, suficiência.
    pub async fn registrar_salida<'e, E>(
        &self,
        executor: E,
        salida: &NuevaSalida,
        created_by: uuid::Uuid,
    ) -> Result<RegistroSalida, AppError>
    where
        E: Executor<'e, Database = Postgres> + sqlx::Acquire<'e, Database = Postgres>,
    {
        let motivo = MotivoSalida::from_str(&salida.motivo_salida)
            .map_err(|_| AppError::EntradaInvalida("Motivo de salida inválido".into()))?;
        let tipo_item = TipoItem::from_str(&salida.tipo_item)
            .map_err(|_| AppError::EntradaInvalida("Tipo de item inválido".into()))?;

        let mut tx = executor.begin().await?;

        let registro = match tipo_item {
            TipoItem::MateriaPrima => {
                let id = salida.materia_prima_id.ok_or_else(|| {
                    AppError::EntradaInvalida("materia_prima_id requerido".into())
                })?;

                let materia = self
                    .materia_prima_repo
                    .bloquear_por_id(&mut *tx, id)
                    .await?
                    .ok_or_else(|| AppError::NoEncontrado("Materia prima no encontrada".into()))?;

                verificar_lote(materia.lote.as_deref(), &salida.lote)?;

                let descontada = self
                    .materia_prima_repo
                    .descontar(&mut *tx, materia.id, salida.cantidad_salida)
                    .await?
                    .ok_or(AppError::CantidadInsuficienteInventario)?;

                let (saldo_anterior, saldo_actual) =
                    transicion_saldo(materia.cantidad_actual, salida.cantidad_salida);
                debug_assert!((descontada.cantidad_actual - saldo_actual).abs() < 1e-9);

                self.salida_repo
                    .insertar(
                        &mut *tx,
                        &InsertarSalida {
                            tipo_item,
                            materia_prima_id: Some(materia.id),
                            producto_terminado_id: None,
                            codigo_item: &materia.codigo,
                            nombre_item: &materia.nombre,
                            lote: &salida.lote,
                            cantidad_salida: salida.cantidad_salida,
                            unidad_medida: &materia.unidad_medida,
                            motivo_salida: motivo,
                            saldo_anterior,
                            saldo_actual,
                            observaciones: salida.observaciones.as_deref(),
                            created_by,
                        },
                    )
                    .await?
            }
            TipoItem::ProductoTerminado => {
                let id = salida.producto_terminado_id.ok_or_else(|| {
                    AppError::EntradaInvalida("producto_terminado_id requerido".into())
                })?;

                let producto = self
                    .producto_terminado_repo
                    .bloquear_por_id(&mut *tx, id)
                    .await?
                    .ok_or_else(|| {
                        AppError::NoEncontrado("Producto terminado no encontrado".into())
                    })?;

                verificar_lote(producto.lote.as_deref(), &salida.lote)?;

                let descontado = self
                    .producto_terminado_repo
                    .descontar(&mut *tx, producto.id, salida.cantidad_salida)
                    .await?
                    .ok_or(AppError::CantidadInsuficienteInventario)?;

                let (saldo_anterior, saldo_actual) =
                    transicion_saldo(producto.cantidad_actual, salida.cantidad_salida);
                debug_assert!((descontado.cantidad_actual - saldo_actual).abs() < 1e-9);

                self.salida_repo
                    .insertar(
                        &mut *tx,
                        &InsertarSalida {
                            tipo_item,
                            materia_prima_id: None,
                            producto_terminado_id: Some(producto.id),
                            codigo_item: &producto.codigo,
                            nombre_item: &producto.nombre,
                            lote: &salida.lote,
                            cantidad_salida: salida.cantidad_salida,
                            unidad_medida: &producto.unidad_medida,
                            motivo_salida: motivo,
                            saldo_anterior,
                            saldo_actual,
                            observaciones: salida.observaciones.as_deref(),
                            created_by,
                        },
                    )
                    .await?
            }
        };

        tx.commit().await?;

        tracing::info!(
            item = %registro.nombre_item,
            lote = %registro.lote,
            cantidad = registro.cantidad_salida,
            motivo = registro.motivo_salida.as_str(),
            "salida registrada"
        );

        Ok(registro)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transicion_captura_saldos_exactos() {
        // Saída do saldo inteiro: (5, 5) vira anterior 5, actual 0.
        let (anterior, actual) = transicion_saldo(5.0, 5.0);
        assert_eq!(anterior, 5.0);
        assert_eq!(actual, 0.0);
    }

    #[test]
    fn transicion_salida_parcial() {
        let (anterior, actual) = transicion_saldo(100.0, 37.5);
        assert_eq!(anterior, 100.0);
        assert_eq!(actual, 62.5);
    }

    #[test]
    fn motivo_invalido_corta_antes_del_tipo() {
        // A ordem de validação é motivo primeiro; um motivo desconhecido
        // falha mesmo com tipo_item também inválido.
        assert!(MotivoSalida::from_str("Regalo").is_err());
    }

    #[test]
    fn lote_distinto_rechaza_la_salida() {
        // Linha com lote L2, pedido por L1: nada é descontado.
        assert!(matches!(
            verificar_lote(Some("L2"), "L1"),
            Err(AppError::LoteNoCoincide)
        ));
    }

    #[test]
    fn lote_igual_pasa() {
        assert!(verificar_lote(Some("L1"), "L1").is_ok());
    }

    #[test]
    fn linea_sin_lote_nunca_coincide() {
        assert!(matches!(
            verificar_lote(None, "L1"),
            Err(AppError::LoteNoCoincide)
        ));
    }

    #[test]
    fn la_comparacion_de_lote_distingue_mayusculas() {
        assert!(verificar_lote(Some("l1"), "L1").is_err());
    }
}

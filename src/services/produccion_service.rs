// src/services/produccion_service.rs

use chrono::Utc;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{MateriaPrimaRepository, ProductoRepository},
    models::{
        materia_prima::MateriaPrima,
        producto::{ConsumoMateriaPrima, RegistrarProduccionInput, RegistroProduccionResponse},
    },
};

// Margem de 5% sobre o teórico para cobrir a perda de processo.
pub const FACTOR_CORRECCION: f64 = 1.05;

// Tentativas frente a conflito de concorrência (lock/statement timeout).
const MAX_INTENTOS: u32 = 3;

// Quantidade a descontar de uma matéria-prima para um volume produzido:
// (concentración/100) * volumen * 1.05. Contrato mL -> gramas declarado
// na unidad_volumen do produto.
pub fn cantidad_a_descontar(concentracion: f64, volumen: f64) -> f64 {
    (concentracion / 100.0) * volumen * FACTOR_CORRECCION
}

// Decisão por material dentro de uma corrida: sem registro no
// sub-inventário de destino a matéria é omitida; saldo insuficiente
// aborta a corrida inteira; senão, desconta.
#[derive(Debug)]
pub enum PasoConsumo {
    Omitir,
    Insuficiente,
    Descontar(MateriaPrima),
}

pub fn decidir_consumo(bloqueada: Option<MateriaPrima>, requerido: f64) -> PasoConsumo {
    match bloqueada {
        None => PasoConsumo::Omitir,
        Some(m) if m.cantidad_actual < requerido => PasoConsumo::Insuficiente,
        Some(m) => PasoConsumo::Descontar(m),
    }
}

#[derive(Clone)]
pub struct ProduccionService {
    producto_repo: ProductoRepository,
    materia_prima_repo: MateriaPrimaRepository,
}

impl ProduccionService {
    pub fn new(
        producto_repo: ProductoRepository,
        materia_prima_repo: MateriaPrimaRepository,
    ) -> Self {
        Self {
            producto_repo,
            materia_prima_repo,
        }
    }

    // Registra uma corrida de produção: desconta todas as matérias-primas
    // da fórmula no sub-inventário de destino, numa única transação
    // tudo-ou-nada. Conflitos de lock são retentados (a transação abortada
    // não deixou efeito algum).
    pub async fn registrar_produccion<'e, E>(
        &self,
        executor: E,
        producto_id: Uuid,
        input: &RegistrarProduccionInput,
    ) -> Result<RegistroProduccionResponse, AppError>
    where
        E: Executor<'e, Database = Postgres> + sqlx::Acquire<'e, Database = Postgres> + Copy,
    {
        input.validate_input()?;

        let mut intento = 1;
        loop {
            match self.intentar_produccion(executor, producto_id, input).await {
                Err(AppError::ConflictoConcurrencia) if intento < MAX_INTENTOS => {
                    tracing::warn!(
                        producto_id = %producto_id,
                        intento,
                        "conflicto de concurrencia al registrar producción, reintentando"
                    );
                    intento += 1;
                }
                otro => return otro,
            }
        }
    }

    async fn intentar_produccion<'e, E>(
        &self,
        executor: E,
        producto_id: Uuid,
        input: &RegistrarProduccionInput,
    ) -> Result<RegistroProduccionResponse, AppError>
    where
        E: Executor<'e, Database = Postgres> + sqlx::Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let producto = self
            .producto_repo
            .obtener_tx(&mut *tx, producto_id)
            .await?
            .ok_or_else(|| AppError::NoEncontrado("Producto no encontrado".into()))?;

        let inventario_destino = producto.unidad_negocio.inventario_destino();
        let composicion = self.producto_repo.composicion(&mut *tx, producto_id).await?;

        let fecha_produccion = input.fecha_produccion.unwrap_or_else(Utc::now);
        let mut consumos = Vec::with_capacity(composicion.len());

        for asociada in &composicion {
            let cantidad = cantidad_a_descontar(asociada.concentracion, input.cantidad);

            // Trava a linha do sub-inventário de destino e decide o passo.
            let bloqueada = self
                .materia_prima_repo
                .bloquear_para_descuento(&mut *tx, &asociada.nombre, inventario_destino)
                .await?;

            let materia = match decidir_consumo(bloqueada, cantidad) {
                PasoConsumo::Omitir => {
                    tracing::warn!(
                        materia = %asociada.nombre,
                        inventario = %inventario_destino,
                        "materia prima sin registro en el inventario destino, omitida"
                    );
                    continue;
                }
                PasoConsumo::Insuficiente => {
                    return Err(AppError::CantidadInsuficiente {
                        nombre: asociada.nombre.clone(),
                        inventario: inventario_destino.as_str().to_string(),
                    });
                }
                PasoConsumo::Descontar(materia) => materia,
            };

            // Desconto guardado: a linha está travada, mas a guarda do
            // UPDATE continua sendo a autoridade final do invariante.
            let descontada = self
                .materia_prima_repo
                .descontar(&mut *tx, materia.id, cantidad)
                .await?;
            if descontada.is_none() {
                return Err(AppError::CantidadInsuficiente {
                    nombre: asociada.nombre.clone(),
                    inventario: inventario_destino.as_str().to_string(),
                });
            }

            self.producto_repo
                .insertar_historial_descuento(
                    &mut *tx,
                    materia.id,
                    producto.id,
                    &producto.nombre,
                    cantidad,
                    asociada.concentracion,
                    input.cantidad,
                    &producto.unidad_volumen,
                    fecha_produccion,
                )
                .await?;

            consumos.push(ConsumoMateriaPrima {
                materia_prima_id: materia.id,
                nombre: asociada.nombre.clone(),
                cantidad_descontada: cantidad,
                concentracion: asociada.concentracion,
            });
        }

        tx.commit().await?;

        tracing::info!(
            producto = %producto.nombre,
            volumen = input.cantidad,
            inventario = %inventario_destino,
            consumos = consumos.len(),
            "producción registrada"
        );

        Ok(RegistroProduccionResponse {
            success: true,
            message: format!(
                "Producción de {} {} de {} registrada correctamente",
                input.cantidad, producto.unidad_volumen, producto.nombre
            ),
            inventario_utilizado: inventario_destino,
            consumos,
        })
    }
}

impl RegistrarProduccionInput {
    fn validate_input(&self) -> Result<(), AppError> {
        if self.cantidad <= 0.0 || !self.cantidad.is_finite() {
            return Err(AppError::EntradaInvalida(
                "La cantidad producida debe ser mayor que cero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::materia_prima::TipoInventario;
    use chrono::Utc;
    use uuid::Uuid;

    fn materia_con_saldo(saldo: f64) -> MateriaPrima {
        MateriaPrima {
            id: Uuid::new_v4(),
            codigo: "MP-001".into(),
            nombre: "Minoxidil".into(),
            descripcion: None,
            unidad_medida: "g".into(),
            cantidad_actual: saldo,
            cantidad_minima: 0.0,
            lote: None,
            proveedor: None,
            fecha_ingreso: None,
            ubicacion: None,
            tipo_inventario: TipoInventario::Magistral,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn formula_con_factor_de_correccion() {
        // 2% sobre 1000 mL: teórico 20 g, com 5% de margem dá 21 g.
        let cantidad = cantidad_a_descontar(2.0, 1000.0);
        assert!((cantidad - 21.0).abs() < 1e-9);
    }

    #[test]
    fn concentracion_total_escala_linealmente() {
        let base = cantidad_a_descontar(10.0, 500.0);
        let doble = cantidad_a_descontar(20.0, 500.0);
        assert!((doble - 2.0 * base).abs() < 1e-9);
    }

    #[test]
    fn volumen_no_positivo_es_rechazado() {
        let input = RegistrarProduccionInput {
            cantidad: 0.0,
            lote: None,
            fecha_produccion: None,
        };
        assert!(matches!(
            input.validate_input(),
            Err(AppError::EntradaInvalida(_))
        ));

        let input = RegistrarProduccionInput {
            cantidad: -5.0,
            lote: None,
            fecha_produccion: None,
        };
        assert!(input.validate_input().is_err());
    }

    #[test]
    fn saldo_suficiente_desconta() {
        // 2% sobre 1000 mL exige 21 g; com saldo 21 o passo é descontar.
        let requerido = cantidad_a_descontar(2.0, 1000.0);
        match decidir_consumo(Some(materia_con_saldo(21.0)), requerido) {
            PasoConsumo::Descontar(m) => assert_eq!(m.cantidad_actual, 21.0),
            otro => panic!("esperaba Descontar, obtuve {otro:?}"),
        }
    }

    #[test]
    fn saldo_insuficiente_aborta_la_corrida() {
        // Saldo 20 frente a requerido 21: insuficiente, nada é descontado.
        let requerido = cantidad_a_descontar(2.0, 1000.0);
        assert!(matches!(
            decidir_consumo(Some(materia_con_saldo(20.0)), requerido),
            PasoConsumo::Insuficiente
        ));
    }

    #[test]
    fn materia_sin_registro_se_omite() {
        assert!(matches!(decidir_consumo(None, 21.0), PasoConsumo::Omitir));
    }

    #[test]
    fn omision_no_detiene_los_demas_materiales() {
        // Fórmula com duas matérias: a primeira sem registro no destino,
        // a segunda com saldo. A omissão não vira aborto.
        let pasos: Vec<PasoConsumo> = [None, Some(materia_con_saldo(100.0))]
            .into_iter()
            .map(|bloqueada| decidir_consumo(bloqueada, 21.0))
            .collect();
        assert!(matches!(pasos[0], PasoConsumo::Omitir));
        assert!(matches!(pasos[1], PasoConsumo::Descontar(_)));
    }

    #[test]
    fn dos_corridas_sobre_el_mismo_saldo_solo_una_pasa() {
        // Saldo 10, duas corridas de 6 serializadas pelo lock de linha: a
        // primeira desconta e deixa 4, a segunda encontra insuficiência.
        let mut saldo = 10.0;
        let primera = decidir_consumo(Some(materia_con_saldo(saldo)), 6.0);
        assert!(matches!(primera, PasoConsumo::Descontar(_)));
        saldo -= 6.0;
        assert!(matches!(
            decidir_consumo(Some(materia_con_saldo(saldo)), 6.0),
            PasoConsumo::Insuficiente
        ));
    }
}

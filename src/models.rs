pub mod auth;
pub mod gasto;
pub mod materia_prima;
pub mod producto;
pub mod producto_terminado;
pub mod salida;

use validator::ValidationError;

// Validação customizada compartilhada pelos payloads de quantidade.
pub fn validar_no_negativo(val: f64) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("El valor no puede ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

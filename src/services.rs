pub mod auth;
pub mod gasto_service;
pub mod inventario_service;
pub mod produccion_service;
pub mod producto_service;
pub mod producto_terminado_service;
pub mod salida_service;

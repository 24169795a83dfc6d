pub mod gastos;
pub mod materias_primas;
pub mod productos;
pub mod productos_terminados;
pub mod salidas;

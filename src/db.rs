pub mod user_repo;
pub use user_repo::UserRepository;
pub mod materia_prima_repo;
pub use materia_prima_repo::MateriaPrimaRepository;
pub mod producto_repo;
pub use producto_repo::ProductoRepository;
pub mod producto_terminado_repo;
pub use producto_terminado_repo::ProductoTerminadoRepository;
pub mod salida_repo;
pub use salida_repo::SalidaRepository;
pub mod gasto_repo;
pub use gasto_repo::GastoRepository;

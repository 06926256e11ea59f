pub mod an;
pub mod constant;
pub mod cv;
pub mod ds;
pub mod error;
pub mod im;
pub mod io;
pub mod ut;

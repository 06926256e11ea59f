pub mod path;
pub mod track;

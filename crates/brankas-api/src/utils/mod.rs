pub mod provenance;
pub mod upload;

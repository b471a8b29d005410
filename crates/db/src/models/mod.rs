//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row and, where the API writes the table, a `Deserialize`
//! input DTO.

pub mod form;
pub mod form_response;
pub mod playlist;
pub mod setting;
pub mod whatsapp_user;
